//! Static file serving module
//!
//! Resolves request paths under the document root, then answers with the
//! file, an index file, a directory listing, a redirect or an error page.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::path::translate_path;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeParseResult, response::PartialContent};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;
use tokio::fs;

/// Serve the target of `ctx.path` from the document root
pub async fn serve(ctx: &RequestContext, state: &AppState) -> Response<Full<Bytes>> {
    let fs_path = translate_path(&state.root, &ctx.path);

    let Ok(metadata) = fs::metadata(&fs_path).await else {
        return not_found(ctx);
    };

    if !is_within_root(&fs_path, &state.root).await {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            ctx.path,
            fs_path.display()
        ));
        return not_found(ctx);
    }

    if metadata.is_dir() {
        return serve_directory(ctx, state, &fs_path).await;
    }

    // A file must not be addressed as a directory
    if ctx.path.ends_with('/') {
        return not_found(ctx);
    }

    serve_file(ctx, &fs_path, &metadata).await
}

/// Directory: redirect to the slash form, then index file, then listing
async fn serve_directory(
    ctx: &RequestContext,
    state: &AppState,
    dir: &Path,
) -> Response<Full<Bytes>> {
    if !ctx.path.ends_with('/') {
        let location = match &ctx.query {
            Some(query) => format!("{}/?{query}", ctx.path),
            None => format!("{}/", ctx.path),
        };
        return http::build_redirect_response(&location);
    }

    for index_file in &state.config.index_files {
        let index_path = dir.join(index_file);
        if let Ok(metadata) = fs::metadata(&index_path).await {
            if metadata.is_file() {
                return serve_file(ctx, &index_path, &metadata).await;
            }
        }
    }

    listing::serve_listing(ctx, dir).await
}

/// Serve a regular file with `Last-Modified`, conditional and Range support
async fn serve_file(
    ctx: &RequestContext,
    file_path: &Path,
    metadata: &Metadata,
) -> Response<Full<Bytes>> {
    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    let last_modified = cache::format_http_date(modified);

    if cache::is_not_modified(ctx.if_modified_since.as_deref(), modified) {
        return http::build_304_response(&last_modified);
    }

    let content = match fs::read(file_path).await {
        Ok(c) => Bytes::from(c),
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return not_found(ctx);
        }
    };

    let content_type = mime::content_type_for(file_path);
    let total_size = content.len() as u64;

    match http::parse_range_header(ctx.range_header.as_deref(), total_size) {
        RangeParseResult::Valid(range) => {
            let start = range.start;
            let end = range.end_position(total_size);
            let data = slice_range(&content, start, end);
            http::response::build_partial_response(
                PartialContent {
                    data,
                    content_type,
                    last_modified: &last_modified,
                    start,
                    end,
                    total_size,
                },
                ctx.is_head,
            )
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(total_size, ctx.is_head),
        RangeParseResult::None => {
            http::response::build_file_response(content, content_type, &last_modified, ctx.is_head)
        }
    }
}

/// Bytes `start..=end` of `content`; bounds come from `parse_range_header`
fn slice_range(content: &Bytes, start: u64, end: u64) -> Bytes {
    let start = usize::try_from(start).unwrap_or(usize::MAX).min(content.len());
    let end = usize::try_from(end)
        .map_or(content.len(), |e| e.saturating_add(1))
        .min(content.len());
    content.slice(start..end.max(start))
}

/// Symlinks may not lead outside the document root
async fn is_within_root(path: &Path, root: &Path) -> bool {
    fs::canonicalize(path)
        .await
        .is_ok_and(|canonical| canonical.starts_with(root))
}

fn not_found(ctx: &RequestContext) -> Response<Full<Bytes>> {
    http::build_error_response(StatusCode::NOT_FOUND, Some("File not found"), ctx.is_head)
}
