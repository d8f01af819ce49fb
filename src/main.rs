use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::sync::Arc;
use tokio::net::TcpListener;

mod config;
mod handler;
mod logger;
mod response;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // A bind failure (port taken, no privilege) is fatal: the error
    // propagates out of main and the process exits non-zero.
    let listener =
        create_listener(addr).map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    let state = Arc::new(config::AppState::new(&cfg));
    logger::log_server_start(&addr);

    serve(listener, state).await
}

/// Accept connections forever, serving each on its own task. The handler
/// holds no shared mutable state, so connections need no coordination.
async fn serve(
    listener: TcpListener,
    state: Arc<config::AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        match listener.accept().await {
            Ok((stream, _peer_addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);
                    let conn = http1::Builder::new().serve_connection(
                        io,
                        service_fn(move |req| {
                            handler::handle_request(req, Arc::clone(&state))
                        }),
                    );
                    if let Err(err) = conn.await {
                        logger::log_connection_error(&err);
                    }
                });
            }
            Err(e) => {
                eprintln!("[ERROR] Failed to accept connection: {e}");
            }
        }
    }
}

/// Create a TcpListener with SO_REUSEADDR enabled, so a restart does not
/// trip over sockets lingering in TIME_WAIT. SO_REUSEPORT stays off: a
/// second instance on the same port must fail to bind.
fn create_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
