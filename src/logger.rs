use chrono::Local;
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;

/// One-line startup notice, written to stdout once the listener is bound.
/// The loopback default is printed as `localhost` to match the documented
/// form of the URL.
pub fn log_server_start(addr: &SocketAddr) {
    let host = if addr.ip().is_loopback() {
        "localhost".to_string()
    } else {
        addr.ip().to_string()
    };
    println!("Server running at http://{}:{}", host, addr.port());
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    println!(
        "[{}] {} {} {:?}",
        Local::now().format("%d/%b/%Y:%H:%M:%S %z"),
        method,
        uri,
        version
    );
}

pub fn log_response(size: usize) {
    println!("[Response] Sent 200 OK ({size} bytes)");
}

pub fn log_warning(msg: &str) {
    eprintln!("[WARN] {msg}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[Error] Failed to serve connection: {err:?}");
}
