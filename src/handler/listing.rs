//! Directory listing module
//!
//! Renders an HTML index for directories without an index file.

use crate::handler::router::RequestContext;
use crate::http::{self, response::escape_html};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::Path;
use tokio::fs;

/// Characters left unescaped in listing links
const LINK_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Link target, with a trailing slash for directories
    fn link(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Shown name: `/` suffix for directories, `@` for symlinks
    fn display(&self) -> String {
        if self.is_symlink {
            format!("{}@", self.name)
        } else {
            self.link()
        }
    }
}

/// Serve a listing of `dir`, or 404 if it cannot be read
pub async fn serve_listing(ctx: &RequestContext, dir: &Path) -> Response<Full<Bytes>> {
    match read_entries(dir).await {
        Ok(entries) => {
            let display_path = super::path::decode_for_display(&ctx.path);
            let html = render_listing(&display_path, entries);
            http::response::build_html_response(html, ctx.is_head)
        }
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to list directory '{}': {e}",
                dir.display()
            ));
            http::build_error_response(
                StatusCode::NOT_FOUND,
                Some("No permission to list directory"),
                ctx.is_head,
            )
        }
    }
}

async fn read_entries(dir: &Path) -> std::io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let is_symlink = entry
            .file_type()
            .await
            .is_ok_and(|t| t.is_symlink());
        // Follows symlinks, so a link to a directory still gets a trailing slash
        let is_dir = fs::metadata(entry.path())
            .await
            .is_ok_and(|m| m.is_dir());
        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }
    Ok(entries)
}

/// Render the listing page, sorting entries case-insensitively by name
pub fn render_listing(display_path: &str, mut entries: Vec<ListingEntry>) -> String {
    entries.sort_by_cached_key(|e| e.name.to_lowercase());

    let title = escape_html(display_path);
    let mut html = format!(
        "<!DOCTYPE HTML>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Directory listing for {title}</title>\n\
         </head>\n\
         <body>\n\
         <h1>Directory listing for {title}</h1>\n\
         <hr>\n\
         <ul>\n"
    );
    for entry in &entries {
        let href = utf8_percent_encode(&entry.link(), LINK_SAFE).to_string();
        html.push_str(&format!(
            "<li><a href=\"{href}\">{}</a></li>\n",
            escape_html(&entry.display())
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}
