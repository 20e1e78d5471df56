//! RFC 3986 percent-encoding used for base strings and header values.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything except the RFC 3986 unreserved characters (`A-Z a-z 0-9 - . _ ~`).
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encodes `value` as `%XX` (uppercase hex) for every byte outside the unreserved set.
pub fn percent_encode(value: &str) -> String {
	utf8_percent_encode(value, UNRESERVED).to_string()
}
