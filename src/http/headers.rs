//! Response header injection
//!
//! Every response leaving the server passes through `inject_default_headers`,
//! whatever its status or the request method.

use hyper::header::{HeaderName, HeaderValue, SERVER};
use hyper::Response;

/// Headers added to every response (names must be lowercase)
pub const DEFAULT_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("cache-control", "no-store, no-cache, must-revalidate"),
];

/// Set the CORS and cache-control headers, replacing any earlier value
pub fn inject_default_headers<B>(response: &mut Response<B>) {
    let headers = response.headers_mut();
    for (name, value) in DEFAULT_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

/// Set the `Server` header unless the response already has one
pub fn set_server_header<B>(response: &mut Response<B>, server_name: &str) {
    if let Ok(value) = HeaderValue::from_str(server_name) {
        response.headers_mut().entry(SERVER).or_insert(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::CACHE_CONTROL;
    use hyper::StatusCode;

    #[test]
    fn test_injects_all_headers() {
        let mut resp = Response::new(());
        inject_default_headers(&mut resp);
        let h = resp.headers();
        assert_eq!(h["access-control-allow-origin"], "*");
        assert_eq!(h["access-control-allow-methods"], "GET, POST, OPTIONS");
        assert_eq!(h["cache-control"], "no-store, no-cache, must-revalidate");
    }

    #[test]
    fn test_overrides_existing_cache_control() {
        let mut resp = Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header("Cache-Control", "public, max-age=3600")
            .body(())
            .unwrap();
        inject_default_headers(&mut resp);
        let values: Vec<_> = resp.headers().get_all(CACHE_CONTROL).iter().collect();
        assert_eq!(values, vec!["no-store, no-cache, must-revalidate"]);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_server_header() {
        let mut resp = Response::new(());
        set_server_header(&mut resp, "cors_static_server/0.1.0");
        assert_eq!(resp.headers()[SERVER], "cors_static_server/0.1.0");

        // Invalid header values are skipped
        let mut resp = Response::new(());
        set_server_header(&mut resp, "bad\nname");
        assert!(resp.headers().get(SERVER).is_none());
    }
}
