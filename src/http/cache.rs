//! HTTP cache validation module
//!
//! Provides `Last-Modified` formatting and `If-Modified-Since` handling.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Format a timestamp as an RFC 7231 IMF-fixdate
///
/// # Examples
/// ```
/// use cors_static_server::http::cache::format_http_date;
/// use std::time::{Duration, UNIX_EPOCH};
///
/// let t = UNIX_EPOCH + Duration::from_secs(784_111_777);
/// assert_eq!(format_http_date(t), "Sun, 06 Nov 1994 08:49:37 GMT");
/// ```
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Parse an HTTP-date, returning None when malformed
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Check whether the client's copy is still current
///
/// HTTP dates have one-second resolution, so the file's mtime is truncated
/// before comparing. A malformed header never matches.
///
/// # Returns
/// Returns true if not modified (should return 304), false otherwise
pub fn is_not_modified(if_modified_since: Option<&str>, modified: SystemTime) -> bool {
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    let modified = DateTime::<Utc>::from(modified).timestamp();
    modified <= since.timestamp()
}
