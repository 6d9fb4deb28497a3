//! Key and value extraction from a single line.
//!
//! Both extractors return a [`LineError`] instead of a placeholder when the
//! line does not have the expected shape, so callers can keep walking the
//! document and report the problem separately.

use crate::error::LineError;
use crate::types::RawLine;

/// The key of a key-only or value line: everything before the first colon,
/// trimmed, with one leading list marker (`-`) removed.
///
/// `"  - name: web"` → `"name"`.
pub fn extract_key(line: &RawLine) -> Result<String, LineError> {
    let malformed = || LineError::MalformedKeyLine {
        line: line.index,
        text: line.text.clone(),
    };

    let (head, _) = line.text.split_once(':').ok_or_else(malformed)?;
    let mut key = head.trim();
    if let Some(rest) = key.strip_prefix('-') {
        key = rest.trim();
    }
    if key.is_empty() {
        return Err(malformed());
    }
    Ok(key.to_string())
}

/// The value of a value line: the text after the first colon that directly
/// follows an ASCII letter or digit, trimmed, with surrounding quotes removed.
///
/// Only the first qualifying colon splits the line, so `time: 12:30` yields
/// `12:30` and `url: http://host` yields `http://host`.
pub fn extract_value(line: &RawLine) -> Result<String, LineError> {
    let text = line.text.as_str();
    let split = text
        .as_bytes()
        .windows(2)
        .position(|pair| pair[0].is_ascii_alphanumeric() && pair[1] == b':')
        .ok_or_else(|| LineError::MalformedValueLine {
            line: line.index,
            text: line.text.clone(),
        })?;

    let value = text[split + 2..].trim();
    Ok(strip_quotes(value).to_string())
}

/// Drop the first and last characters of a value that opens with a quote.
/// Two-character values such as `""` are kept as written.
fn strip_quotes(value: &str) -> &str {
    if !(value.starts_with('"') || value.starts_with('\'')) {
        return value;
    }
    let mut chars = value.chars();
    if chars.clone().count() <= 2 {
        return value;
    }
    chars.next();
    chars.next_back();
    chars.as_str()
}
