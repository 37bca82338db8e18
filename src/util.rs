//! Small shared helpers: URL query encoding and timestamp formatting.

/// Percent-encode a string for use as a URL query value.
///
/// Unreserved characters (RFC 3986) pass through untouched; everything else
/// is emitted as `%XX` byte escapes.
#[must_use]
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push_str("%20"),
            _ => {
                out.push('%');
                out.push_str(&format!("{b:02X}"));
            }
        }
    }
    out
}

/// Format epoch seconds as `"YYYY-MM-DD HH:MM:SS"` (UTC).
///
/// Returns an empty string when `ts` is `None` or out of chrono's range.
#[must_use]
pub fn ts_to_date(ts: Option<i64>) -> String {
    ts.and_then(|t| chrono::DateTime::from_timestamp(t, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Format epoch milliseconds as `"YYYY-MM-DD HH:MM:SS"` (UTC).
///
/// Catalog items carry millisecond creation stamps; logs render them through
/// this helper. Empty string for out-of-range values.
#[must_use]
pub fn ms_to_date(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
