use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::atomic::AtomicBool;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
}

type Builder = config::builder::ConfigBuilder<config::builder::DefaultState>;

/// Hard defaults: port 3000 on loopback, access log on.
fn with_defaults(builder: Builder) -> Result<Builder, config::ConfigError> {
    builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 3000)?
        .set_default("logging.access_log", true)?
        .set_default("http.server_name", "xss-lab/0.1")
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = with_defaults(
            config::Config::builder()
                .add_source(config::File::with_name("config").required(false))
                .add_source(config::Environment::with_prefix("XSS_LAB")),
        )?
        .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

pub struct AppState {
    pub config: Config,

    // Cached so the per-request path never takes a lock
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            cached_access_log: AtomicBool::new(config.logging.access_log),
        }
    }
}
