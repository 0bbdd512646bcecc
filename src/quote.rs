//! Bare-versus-quoted rendering decisions for keys and string scalars.

use crate::num::is_numeric_token;

const RESERVED: &[&str] = &["true", "false", "null"];

/// True when a key can render without quotes: non-empty and composed only
/// of ASCII letters, digits, underscore and hyphen.
pub fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// True when a string scalar must be quoted to survive a decode: it would
/// otherwise collide with the active delimiter, structural characters, a
/// reserved literal, a numeric literal, or leading/trailing whitespace.
pub fn needs_quoting(s: &str, delimiter: char) -> bool {
    if s.is_empty() {
        return true;
    }
    if RESERVED.contains(&s) || is_numeric_token(s) {
        return true;
    }

    if s.starts_with(|ch: char| ch.is_whitespace() || ch == '-' || ch == '"') {
        return true;
    }
    if s.ends_with(char::is_whitespace) {
        return true;
    }

    s.chars().any(|ch| {
        matches!(ch, ':' | '[' | ']' | '{' | '}' | '"' | '\\')
            || ch.is_control()
            || ch == delimiter
    })
}

/// Append `s` with the codec's escape set applied, without surrounding
/// quotes.
pub(crate) fn escape_into(out: &mut Vec<u8>, s: &str) {
    for ch in s.chars() {
        match ch {
            '\n' => out.extend_from_slice(b"\\n"),
            '\r' => out.extend_from_slice(b"\\r"),
            '\t' => out.extend_from_slice(b"\\t"),
            '"' => out.extend_from_slice(b"\\\""),
            '\\' => out.extend_from_slice(b"\\\\"),
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
}

/// Append `s` as a double-quoted, escaped string literal.
pub(crate) fn quote_into(out: &mut Vec<u8>, s: &str) {
    out.push(b'"');
    escape_into(out, s);
    out.push(b'"');
}

/// Append a key, bare when possible and quoted otherwise.
pub(crate) fn write_key_into(out: &mut Vec<u8>, key: &str) {
    if is_bare_key(key) {
        out.extend_from_slice(key.as_bytes());
    } else {
        quote_into(out, key);
    }
}

/// Escape a string for quoted output.
pub fn escape_string(s: &str) -> String {
    let mut out = Vec::with_capacity(s.len());
    escape_into(&mut out, s);
    // escape_into only appends UTF-8 fragments
    String::from_utf8(out).unwrap_or_default()
}
