use crate::config::HttpConfig;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Render the demo page with the user's input spliced in verbatim.
///
/// The input is concatenated into the markup with no encoding or length
/// limit. That is the reflected-XSS vulnerability this server exists to
/// demonstrate; do not add escaping here.
pub fn render_page(input: &str) -> String {
    format!(
        r#"<html>
<head>
    <title>Vulnerable XSS Test Page</title>
</head>
<body>
    <h1>Vulnerable XSS Test Page</h1>
    <form method="GET">
        <label for="input">Enter something (XSS test):</label>
        <input type="text" id="input" name="input">
        <button type="submit">Submit</button>
    </form>
    <p>You entered: {input}</p>
</body>
</html>
"#
    )
}

pub fn build_html_response(html: String, http_config: &HttpConfig) -> Response<Full<Bytes>> {
    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Server", &http_config.server_name)
        .body(Full::new(Bytes::from(html)))
        .expect("Failed to build response")
}

pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("Not Found")))
        .expect("Failed to build 404 response")
}

pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD")
        .body(Full::new(Bytes::from("Method Not Allowed")))
        .expect("Failed to build 405 response")
}
