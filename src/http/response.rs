//! HTTP response building module
//!
//! Provides builders for various HTTP status code responses, decoupled from specific business logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::CONTENT_RANGE;
use hyper::{Response, StatusCode};

/// Content-Type used for generated error pages
const ERROR_CONTENT_TYPE: &str = "text/html;charset=utf-8";

/// Build an HTML error page for `status`
///
/// `message` defaults to the status's canonical reason. HEAD requests get the
/// headers without the body.
pub fn build_error_response(
    status: StatusCode,
    message: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let page = render_error_page(status, message);
    let content_length = page.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(page)
    };

    Response::builder()
        .status(status)
        .header("Content-Type", ERROR_CONTENT_TYPE)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn render_error_page(status: StatusCode, message: Option<&str>) -> String {
    let reason = status.canonical_reason().unwrap_or("Unknown");
    let message = escape_html(message.unwrap_or(reason));
    let code = status.as_u16();
    let explain = explain(status);
    format!(
        r#"<!DOCTYPE HTML>
<html lang="en">
    <head>
        <meta charset="utf-8">
        <title>Error response</title>
    </head>
    <body>
        <h1>Error response</h1>
        <p>Error code: {code}</p>
        <p>Message: {message}.</p>
        <p>Error code explanation: {code} - {explain}.</p>
    </body>
</html>
"#
    )
}

/// Long-form explanation shown on error pages
fn explain(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Bad request syntax or unsupported method",
        StatusCode::FORBIDDEN => "Request forbidden -- authorization will not help",
        StatusCode::NOT_FOUND => "Nothing matches the given URI",
        StatusCode::RANGE_NOT_SATISFIABLE => "Cannot satisfy request range",
        StatusCode::NOT_IMPLEMENTED => "Server does not support this operation",
        _ => "No further information",
    }
}

/// Build 304 Not Modified response
pub fn build_304_response(last_modified: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("Last-Modified", last_modified)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: u64, is_head: bool) -> Response<Full<Bytes>> {
    let mut response = build_error_response(StatusCode::RANGE_NOT_SATISFIABLE, None, is_head);
    if let Ok(value) = format!("bytes */{file_size}").parse() {
        response.headers_mut().insert(CONTENT_RANGE, value);
    }
    response
}

/// Build 301 redirect response
pub fn build_redirect_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 200 response for a whole file
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    last_modified: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Last-Modified", last_modified)
        .header("Accept-Ranges", "bytes")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Byte range of a file, ready to send as 206
pub struct PartialContent<'a> {
    pub data: Bytes,
    pub content_type: &'a str,
    pub last_modified: &'a str,
    pub start: u64,
    pub end: u64,
    pub total_size: u64,
}

/// Build 206 Partial Content response
pub fn build_partial_response(part: PartialContent<'_>, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = part.end - part.start + 1;
    let body = if is_head { Bytes::new() } else { part.data };

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header("Content-Type", part.content_type)
        .header("Content-Length", content_length)
        .header(
            "Content-Range",
            format!("bytes {}-{}/{}", part.start, part.end, part.total_size),
        )
        .header("Last-Modified", part.last_modified)
        .header("Accept-Ranges", "bytes")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Escape text for inclusion in HTML, quotes included
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_error_page() {
        let resp = build_error_response(StatusCode::NOT_FOUND, Some("File not found"), false);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["content-type"], ERROR_CONTENT_TYPE);
        let body = body_string(resp).await;
        assert!(body.contains("<p>Error code: 404</p>"));
        assert!(body.contains("<p>Message: File not found.</p>"));
        assert!(body.contains("404 - Nothing matches the given URI."));
    }

    #[tokio::test]
    async fn test_error_page_escapes_message() {
        let resp = build_error_response(
            StatusCode::NOT_IMPLEMENTED,
            Some("Unsupported method ('<X>')"),
            false,
        );
        let body = body_string(resp).await;
        assert!(body.contains("Unsupported method (&#x27;&lt;X&gt;&#x27;)"));
    }

    #[tokio::test]
    async fn test_head_error_has_length_but_no_body() {
        let resp = build_error_response(StatusCode::NOT_FOUND, None, true);
        let length: usize = resp.headers()["content-length"]
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!(length > 0);
        assert!(body_string(resp).await.is_empty());
    }

    #[test]
    fn test_416_content_range() {
        let resp = build_416_response(1234, false);
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(resp.headers()["content-range"], "bytes */1234");
    }

    #[test]
    fn test_redirect() {
        let resp = build_redirect_response("/docs/?page=2");
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()["location"], "/docs/?page=2");
        assert_eq!(resp.headers()["content-length"], "0");
    }

    #[tokio::test]
    async fn test_partial_response() {
        let resp = build_partial_response(
            PartialContent {
                data: Bytes::from_static(b"llo"),
                content_type: "text/plain",
                last_modified: "Sun, 06 Nov 1994 08:49:37 GMT",
                start: 2,
                end: 4,
                total_size: 11,
            },
            false,
        );
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()["content-range"], "bytes 2-4/11");
        assert_eq!(resp.headers()["content-length"], "3");
        assert_eq!(body_string(resp).await, "llo");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a&b"), "a&amp;b");
        assert_eq!(escape_html("<\"x\">"), "&lt;&quot;x&quot;&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
