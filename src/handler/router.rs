//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, dispatch to
//! the static file handler, header injection and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderName, CONTENT_LENGTH, IF_MODIFIED_SINCE, RANGE};
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
///
/// Owns everything it needs so the request itself can be dropped before any
/// filesystem work starts.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Raw (still percent-encoded) URL path
    pub path: String,
    pub query: Option<String>,
    pub version: Version,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub range_header: Option<String>,
}

impl RequestContext {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let header = |name: HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            version: req.version(),
            is_head: req.method() == Method::HEAD,
            if_modified_since: header(IF_MODIFIED_SINCE),
            range_header: header(RANGE),
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let ctx = RequestContext::from_request(&req);
    drop(req);

    let mut response = dispatch(&ctx, &state).await;
    http::inject_default_headers(&mut response);
    http::set_server_header(&mut response, &state.config.server_name);

    if state.config.access_log {
        log_access(&ctx, &response, peer_addr);
    }

    Ok(response)
}

/// Route by method: GET and HEAD are served, everything else is 501
async fn dispatch(ctx: &RequestContext, state: &AppState) -> Response<Full<Bytes>> {
    match ctx.method {
        Method::GET | Method::HEAD => static_files::serve(ctx, state).await,
        _ => http::build_error_response(
            StatusCode::NOT_IMPLEMENTED,
            Some(&format!("Unsupported method ('{}')", ctx.method)),
            false,
        ),
    }
}

fn log_access(ctx: &RequestContext, response: &Response<Full<Bytes>>, peer_addr: SocketAddr) {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        ctx.method.to_string(),
        ctx.path.clone(),
    );
    entry.query.clone_from(&ctx.query);
    entry.http_version = version_label(ctx.version).to_string();
    entry.status = response.status().as_u16();
    if !ctx.is_head {
        entry.body_bytes = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
    }
    logger::log_access(&entry);
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
