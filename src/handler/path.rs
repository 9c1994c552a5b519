//! Request path translation
//!
//! Maps a URL path onto the document root. The result never leaves the root:
//! `..` only pops segments gathered so far, and anything that is not a plain
//! file name is dropped.

use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

/// Translate a request path (query allowed) into a filesystem path under `root`
///
/// # Examples
/// ```
/// use cors_static_server::handler::path::translate_path;
/// use std::path::Path;
///
/// let p = translate_path(Path::new("/srv"), "/a/../b/%63.txt?x=1");
/// assert_eq!(p, Path::new("/srv/b/c.txt"));
/// ```
pub fn translate_path(root: &Path, request_path: &str) -> PathBuf {
    let path = request_path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let decoded = percent_decode_str(path).decode_utf8_lossy();

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ if is_plain_name(segment) => segments.push(segment),
            _ => {}
        }
    }

    let mut translated = root.to_path_buf();
    translated.extend(segments);
    translated
}

/// A single normal path component: no separators, drive prefixes or roots
fn is_plain_name(segment: &str) -> bool {
    if segment.contains('\0') || segment.chars().any(std::path::is_separator) {
        return false;
    }
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Decoded form of a request path, for display
pub fn decode_for_display(request_path: &str) -> String {
    percent_decode_str(request_path)
        .decode_utf8_lossy()
        .into_owned()
}
