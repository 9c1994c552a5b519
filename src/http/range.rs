//! HTTP Range request parsing module
//!
//! Range header parsing for resumable downloads, compliant with RFC 7233.

/// Parsed Range request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRequest {
    /// Start byte position
    pub start: u64,
    /// End byte position, None means until end of file
    pub end: Option<u64>,
}

impl RangeRequest {
    /// Calculate actual end position (considering file size)
    #[inline]
    pub fn end_position(&self, file_size: u64) -> u64 {
        self.end.unwrap_or_else(|| file_size.saturating_sub(1))
    }

    /// Number of bytes covered by the range
    #[cfg(test)]
    pub fn content_length(&self, file_size: u64) -> u64 {
        let end = self.end_position(file_size);
        end.saturating_sub(self.start) + 1
    }
}

/// Range header parse result
#[derive(Debug)]
pub enum RangeParseResult {
    /// Valid range request
    Valid(RangeRequest),
    /// Range not satisfiable (start >= `file_size`) - should return 416
    NotSatisfiable,
    /// No Range header or malformed (ignore, return full content)
    None,
}

/// Parse HTTP Range header (single range only, bytes unit)
///
/// Supported formats:
/// - `bytes=start-end` - Specific range
/// - `bytes=start-` - From start to end
/// - `bytes=-suffix` - Last suffix bytes
///
/// # Examples
/// ```
/// use cors_static_server::http::range::{parse_range_header, RangeParseResult};
///
/// let result = parse_range_header(Some("bytes=0-99"), 1000);
/// assert!(matches!(result, RangeParseResult::Valid(_)));
///
/// let result = parse_range_header(None, 1000);
/// assert!(matches!(result, RangeParseResult::None));
/// ```
pub fn parse_range_header(range_header: Option<&str>, file_size: u64) -> RangeParseResult {
    let Some(header) = range_header else {
        return RangeParseResult::None;
    };

    let Some(header) = header.trim().strip_prefix("bytes=") else {
        return RangeParseResult::None; // Not bytes unit, ignore
    };

    // Only support single range (not multi-range)
    if header.contains(',') {
        return RangeParseResult::None;
    }

    let Some((start_str, end_str)) = header.split_once('-') else {
        return RangeParseResult::None;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    // Suffix range: "-500" means last 500 bytes
    if start_str.is_empty() {
        return parse_suffix_range(end_str, file_size);
    }

    parse_standard_range(start_str, end_str, file_size)
}

/// Parse suffix range (e.g., "-500")
fn parse_suffix_range(suffix_str: &str, file_size: u64) -> RangeParseResult {
    let Ok(suffix) = suffix_str.parse::<u64>() else {
        return RangeParseResult::None;
    };

    if suffix == 0 || file_size == 0 {
        return RangeParseResult::NotSatisfiable;
    }

    // Suffix larger than file is valid, just return whole file as range
    let start = file_size.saturating_sub(suffix);
    RangeParseResult::Valid(RangeRequest {
        start,
        end: Some(file_size - 1),
    })
}

/// Parse standard range (e.g., "0-99" or "100-")
fn parse_standard_range(start_str: &str, end_str: &str, file_size: u64) -> RangeParseResult {
    let Ok(start) = start_str.parse::<u64>() else {
        return RangeParseResult::None;
    };

    let end = if end_str.is_empty() {
        None
    } else {
        let Ok(e) = end_str.parse::<u64>() else {
            return RangeParseResult::None;
        };
        if e < start {
            // Syntactically invalid per RFC 7233, ignore the header
            return RangeParseResult::None;
        }
        Some(e)
    };

    if start >= file_size {
        return RangeParseResult::NotSatisfiable;
    }

    RangeParseResult::Valid(RangeRequest {
        start,
        end: end.map(|e| e.min(file_size - 1)),
    })
}
