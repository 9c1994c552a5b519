//! End-to-end tests: a real server on an ephemeral port, raw HTTP/1.1 over TCP.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use cors_static_server::config::ServerConfig;
use cors_static_server::error::ServerError;
use cors_static_server::server::{Server, SignalHandler};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

const INJECTED: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-methods", "GET, POST, OPTIONS"),
    ("cache-control", "no-store, no-cache, must-revalidate"),
];

struct TestServer {
    addr: SocketAddr,
    shutdown: Arc<Notify>,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    fn start(root: &Path) -> Self {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            access_log: false,
            ..ServerConfig::with_root(root)
        };
        let server = Server::bind(config).expect("bind");
        let addr = server.local_addr().expect("local addr");
        let shutdown = server.shutdown_handle();
        let handle = tokio::spawn(server.run());
        Self {
            addr,
            shutdown,
            handle,
        }
    }

    async fn request(&self, method: &str, target: &str, extra_headers: &[&str]) -> RawResponse {
        let mut stream = TcpStream::connect(self.addr).await.expect("connect");
        let mut req = format!("{method} {target} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n");
        for header in extra_headers {
            req.push_str(header);
            req.push_str("\r\n");
        }
        req.push_str("\r\n");
        stream.write_all(req.as_bytes()).await.expect("write");

        let mut raw = Vec::new();
        tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut raw))
            .await
            .expect("response within timeout")
            .expect("read");
        RawResponse::parse(&raw)
    }

    async fn stop(self) {
        self.shutdown.notify_one();
        let result = tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server stops")
            .expect("join");
        assert!(result.is_ok());
    }
}

struct RawResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl RawResponse {
    fn parse(raw: &[u8]) -> Self {
        let split = raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("header terminator");
        let head = String::from_utf8_lossy(&raw[..split]).into_owned();
        let body = raw[split + 4..].to_vec();

        let mut lines = head.split("\r\n");
        let status_line = lines.next().expect("status line");
        let status = status_line
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .expect("status code");
        let headers = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();

        Self {
            status,
            headers,
            body,
        }
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn header_count(&self, name: &str) -> usize {
        self.headers.iter().filter(|(k, _)| k == name).count()
    }

    fn assert_injected(&self) {
        for (name, value) in INJECTED {
            assert_eq!(self.header(name), Some(value), "header {name}");
            assert_eq!(self.header_count(name), 1, "duplicate {name}");
        }
    }

    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.js"), b"const x = 1;\n").unwrap();
    std::fs::write(dir.path().join("context.jsonld"), b"{\"@context\":{}}").unwrap();
    std::fs::create_dir(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src").join("normalizer.js"), b"// n\n").unwrap();
    dir
}

#[tokio::test]
async fn existing_file_carries_injected_headers() {
    let dir = site();
    let server = TestServer::start(dir.path());

    let resp = server.request("GET", "/app.js", &[]).await;
    assert_eq!(resp.status, 200);
    resp.assert_injected();
    assert_eq!(resp.header("content-type"), Some("text/javascript"));
    assert_eq!(resp.body, b"const x = 1;\n");

    let resp = server.request("GET", "/context.jsonld", &[]).await;
    assert_eq!(resp.status, 200);
    resp.assert_injected();
    assert_eq!(resp.header("content-type"), Some("application/ld+json"));

    server.stop().await;
}

#[tokio::test]
async fn root_lists_directory_without_index() {
    let dir = site();
    let server = TestServer::start(dir.path());

    let resp = server.request("GET", "/", &[]).await;
    assert_eq!(resp.status, 200);
    assert_eq!(
        resp.header("cache-control"),
        Some("no-store, no-cache, must-revalidate")
    );
    let html = resp.body_text();
    assert!(html.contains("Directory listing for /"));
    assert!(html.contains("<a href=\"app.js\">app.js</a>"));
    assert!(html.contains("<a href=\"src/\">src/</a>"));

    server.stop().await;
}

#[tokio::test]
async fn root_serves_index_html() {
    let dir = site();
    std::fs::write(dir.path().join("index.html"), b"<h1>Matcher</h1>").unwrap();
    let server = TestServer::start(dir.path());

    let resp = server.request("GET", "/", &[]).await;
    assert_eq!(resp.status, 200);
    resp.assert_injected();
    assert_eq!(resp.body_text(), "<h1>Matcher</h1>");

    server.stop().await;
}

#[tokio::test]
async fn missing_path_is_404_with_headers() {
    let dir = site();
    let server = TestServer::start(dir.path());

    let resp = server.request("GET", "/does/not/exist.js", &[]).await;
    assert_eq!(resp.status, 404);
    resp.assert_injected();
    assert!(resp.body_text().contains("File not found"));

    server.stop().await;
}

#[tokio::test]
async fn options_preflight_gets_allow_methods() {
    let dir = site();
    let server = TestServer::start(dir.path());

    let resp = server
        .request(
            "OPTIONS",
            "/app.js",
            &[
                "Origin: http://example.org",
                "Access-Control-Request-Method: GET",
            ],
        )
        .await;
    assert_eq!(resp.status, 501);
    assert_eq!(
        resp.header("access-control-allow-methods"),
        Some("GET, POST, OPTIONS")
    );
    resp.assert_injected();

    server.stop().await;
}

#[tokio::test]
async fn unsupported_methods_still_get_headers() {
    let dir = site();
    let server = TestServer::start(dir.path());

    for method in ["POST", "PUT", "DELETE", "PATCH"] {
        let resp = server.request(method, "/app.js", &["Content-Length: 0"]).await;
        assert_eq!(resp.status, 501, "{method}");
        assert!(resp
            .body_text()
            .contains(&format!("Unsupported method (&#x27;{method}&#x27;)")));
        resp.assert_injected();
    }

    server.stop().await;
}

#[tokio::test]
async fn directory_without_slash_redirects() {
    let dir = site();
    let server = TestServer::start(dir.path());

    let resp = server.request("GET", "/src", &[]).await;
    assert_eq!(resp.status, 301);
    assert_eq!(resp.header("location"), Some("/src/"));
    resp.assert_injected();

    let resp = server.request("GET", "/src/", &[]).await;
    assert_eq!(resp.status, 200);
    assert!(resp.body_text().contains("normalizer.js"));

    server.stop().await;
}

#[tokio::test]
async fn traversal_cannot_leave_root() {
    let outer = tempfile::tempdir().unwrap();
    let root = outer.path().join("public");
    std::fs::create_dir(&root).unwrap();
    std::fs::write(outer.path().join("secret.txt"), b"top secret").unwrap();
    let server = TestServer::start(&root);

    for target in ["/../secret.txt", "/%2e%2e/secret.txt", "/src/..%2f..%2fsecret.txt"] {
        let resp = server.request("GET", target, &[]).await;
        assert_eq!(resp.status, 404, "{target}");
        assert!(!resp.body_text().contains("top secret"));
        resp.assert_injected();
    }

    server.stop().await;
}

#[tokio::test]
async fn head_has_headers_but_no_body() {
    let dir = site();
    let server = TestServer::start(dir.path());

    let resp = server.request("HEAD", "/app.js", &[]).await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("content-length"), Some("13"));
    assert!(resp.body.is_empty());
    resp.assert_injected();

    server.stop().await;
}

#[tokio::test]
async fn conditional_and_range_requests() {
    let dir = site();
    let server = TestServer::start(dir.path());

    let resp = server
        .request(
            "GET",
            "/app.js",
            &["If-Modified-Since: Fri, 01 Jan 2100 00:00:00 GMT"],
        )
        .await;
    assert_eq!(resp.status, 304);
    assert!(resp.body.is_empty());
    resp.assert_injected();

    let resp = server.request("GET", "/app.js", &["Range: bytes=6-6"]).await;
    assert_eq!(resp.status, 206);
    assert_eq!(resp.header("content-range"), Some("bytes 6-6/13"));
    assert_eq!(resp.body, b"x");
    resp.assert_injected();

    let resp = server.request("GET", "/app.js", &["Range: bytes=100-"]).await;
    assert_eq!(resp.status, 416);
    resp.assert_injected();

    server.stop().await;
}

#[tokio::test]
async fn keep_alive_serves_multiple_requests() {
    let dir = site();
    let server = TestServer::start(dir.path());

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    stream
        .write_all(
            b"GET /app.js HTTP/1.1\r\nHost: localhost\r\n\r\n\
              GET /missing HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await
        .unwrap();
    let mut raw = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut raw))
        .await
        .unwrap()
        .unwrap();
    let text = String::from_utf8_lossy(&raw);
    assert!(text.starts_with("HTTP/1.1 200 OK"));
    assert!(text.contains("HTTP/1.1 404 Not Found"));
    assert_eq!(
        text.matches("no-store, no-cache, must-revalidate").count(),
        2
    );

    server.stop().await;
}

#[tokio::test]
async fn shutdown_request_stops_accept_loop() {
    let dir = site();
    let server = TestServer::start(dir.path());
    let signals = SignalHandler::new(Arc::clone(&server.shutdown));

    signals.request_shutdown("test");
    assert!(signals.is_shutdown_requested());

    let result = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server stops")
        .expect("join");
    assert!(result.is_ok());
}

#[tokio::test]
async fn bind_rejects_missing_root() {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..ServerConfig::with_root("/no/such/document/root")
    };
    assert!(matches!(
        Server::bind(config),
        Err(ServerError::DocumentRoot(..))
    ));
}
