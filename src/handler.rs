use crate::config::AppState;
use crate::logger;
use crate::response;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Check HTTP method and return early response if not GET/HEAD
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(response::build_405_response())
        }
    }
}

/// Extract the URL-decoded `input` query parameter, empty string if absent.
fn input_param(query: Option<&str>) -> String {
    let Some(query) = query else {
        return String::new();
    };
    form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == "input")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let uri = req.uri();
    let is_head = *method == Method::HEAD;

    let access_log = state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed);
    if access_log {
        logger::log_request(method, uri, req.version());
    }

    if let Some(resp) = check_http_method(method) {
        return Ok(resp);
    }

    // Single route: everything except "/" falls through to 404
    if uri.path() != "/" {
        return Ok(response::build_404_response());
    }

    let input = input_param(uri.query());
    let html = response::render_page(&input);
    if access_log {
        // hyper suppresses the response body for HEAD
        logger::log_response(if is_head { 0 } else { html.len() });
    }
    Ok(response::build_html_response(html, &state.config.http))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, HttpConfig, LoggingConfig, ServerConfig};

    fn make_state_with_logging(access_log: bool) -> Arc<AppState> {
        let cfg = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                workers: None,
            },
            logging: LoggingConfig { access_log },
            http: HttpConfig {
                server_name: "xss-lab/0.1".to_string(),
            },
        };
        Arc::new(AppState::new(&cfg))
    }

    fn make_state() -> Arc<AppState> {
        make_state_with_logging(false)
    }

    fn make_request(method: Method, uri: &str) -> Request<()> {
        Request::builder().method(method).uri(uri).body(()).unwrap()
    }

    async fn body_of(resp: Response<Full<Bytes>>) -> String {
        use http_body_util::BodyExt;
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_input_param_absent() {
        assert_eq!(input_param(None), "");
        assert_eq!(input_param(Some("other=1")), "");
    }

    #[test]
    fn test_input_param_decodes() {
        assert_eq!(input_param(Some("input=hello")), "hello");
        assert_eq!(input_param(Some("input=a+b")), "a b");
        assert_eq!(
            input_param(Some("input=%3Cscript%3Ealert(1)%3C%2Fscript%3E")),
            "<script>alert(1)</script>"
        );
    }

    #[tokio::test]
    async fn test_root_reflects_input() {
        let req = make_request(Method::GET, "/?input=hello");
        let resp = handle_request(req, make_state()).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");
        let body = body_of(resp).await;
        assert!(body.contains("You entered: hello"));
    }

    #[tokio::test]
    async fn test_root_reflects_script_unescaped() {
        let req = make_request(Method::GET, "/?input=%3Cscript%3Ealert(1)%3C%2Fscript%3E");
        let resp = handle_request(req, make_state()).await.unwrap();
        assert_eq!(resp.status(), 200);
        let body = body_of(resp).await;
        assert!(body.contains("<script>alert(1)</script>"));
        assert!(!body.contains("&lt;"));
    }

    #[tokio::test]
    async fn test_root_without_input_is_empty_echo() {
        let req = make_request(Method::GET, "/");
        let resp = handle_request(req, make_state()).await.unwrap();
        assert_eq!(resp.status(), 200);
        let body = body_of(resp).await;
        assert!(body.contains("You entered: </p>"));
        assert!(body.contains("<title>Vulnerable XSS Test Page</title>"));
    }

    #[tokio::test]
    async fn test_head_root_is_200() {
        // access log on so the HEAD branch of the size log runs
        let req = make_request(Method::HEAD, "/?input=hello");
        let resp = handle_request(req, make_state_with_logging(true))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let req = make_request(Method::GET, "/missing");
        let resp = handle_request(req, make_state()).await.unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_post_is_405() {
        let req = make_request(Method::POST, "/");
        let resp = handle_request(req, make_state()).await.unwrap();
        assert_eq!(resp.status(), 405);
    }
}
