//! Numeric literal grammar and canonical formatting.
//!
//! The same grammar drives both directions: the parser uses it to decide
//! whether a bare token resolves to a number, and the encoder uses it to
//! decide whether a string scalar would be mistaken for a number and must
//! be quoted.

/// Parse a bare token as a numeric literal.
///
/// The grammar is JSON's: optional minus sign, `0` or non-zero-led digits,
/// optional fraction, optional exponent. Tokens with leading zeros (`05`)
/// or a leading plus never match and stay strings. A token matching the
/// grammar but failing `f64` conversion falls back to string.
pub fn parse_number_token(token: &str) -> Option<f64> {
    if !is_numeric_token(token) {
        return None;
    }
    token.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Full-match check against the numeric grammar.
pub fn is_numeric_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    let mut idx = 0;

    if bytes.first() == Some(&b'-') {
        idx += 1;
    }

    // Integer part: '0' or a non-zero digit followed by digits.
    match bytes.get(idx) {
        Some(b'0') => idx += 1,
        Some(b'1'..=b'9') => {
            idx += 1;
            while matches!(bytes.get(idx), Some(b'0'..=b'9')) {
                idx += 1;
            }
        }
        _ => return false,
    }

    if bytes.get(idx) == Some(&b'.') {
        idx += 1;
        if !matches!(bytes.get(idx), Some(b'0'..=b'9')) {
            return false;
        }
        while matches!(bytes.get(idx), Some(b'0'..=b'9')) {
            idx += 1;
        }
    }

    if matches!(bytes.get(idx), Some(b'e' | b'E')) {
        idx += 1;
        if matches!(bytes.get(idx), Some(b'+' | b'-')) {
            idx += 1;
        }
        if !matches!(bytes.get(idx), Some(b'0'..=b'9')) {
            return false;
        }
        while matches!(bytes.get(idx), Some(b'0'..=b'9')) {
            idx += 1;
        }
    }

    idx == bytes.len()
}

/// Write the canonical rendering of a number into `out`.
///
/// Integral values in `i64` range print without a fraction; everything else
/// uses ryu's shortest round-trippable form. Negative zero normalizes to
/// `0`; non-finite values render as `null`.
pub(crate) fn write_number_into(value: f64, out: &mut Vec<u8>) {
    if !value.is_finite() {
        out.extend_from_slice(b"null");
        return;
    }
    if value == 0.0 {
        out.push(b'0');
        return;
    }
    if value.fract() == 0.0 && value.abs() <= i64::MAX as f64 {
        let mut buf = itoa::Buffer::new();
        out.extend_from_slice(buf.format(value as i64).as_bytes());
        return;
    }
    let mut buf = ryu::Buffer::new();
    out.extend_from_slice(buf.format(value).as_bytes());
}

pub(crate) fn format_number(value: f64) -> String {
    let mut out = Vec::new();
    write_number_into(value, &mut out);
    // itoa and ryu emit ASCII only
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_numeric_token_grammar() {
        assert!(is_numeric_token("0"));
        assert!(is_numeric_token("42"));
        assert!(is_numeric_token("-5"));
        assert!(is_numeric_token("3.25"));
        assert!(is_numeric_token("-0.5"));
        assert!(is_numeric_token("1e10"));
        assert!(is_numeric_token("2.5E-3"));

        assert!(!is_numeric_token(""));
        assert!(!is_numeric_token("05"));
        assert!(!is_numeric_token("-05"));
        assert!(!is_numeric_token("+5"));
        assert!(!is_numeric_token("1."));
        assert!(!is_numeric_token(".5"));
        assert!(!is_numeric_token("1e"));
        assert!(!is_numeric_token("1x"));
        assert!(!is_numeric_token("0(f)"));
        assert!(!is_numeric_token("1 2"));
    }

    #[rstest::rstest]
    fn test_parse_number_token() {
        assert_eq!(parse_number_token("42"), Some(42.0));
        assert_eq!(parse_number_token("-0.5"), Some(-0.5));
        assert_eq!(parse_number_token("1e2"), Some(100.0));
        assert_eq!(parse_number_token("hello"), None);
        assert_eq!(parse_number_token("05"), None);
    }

    #[rstest::rstest]
    fn test_format_integral() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-123.0), "-123");
        assert_eq!(format_number(1_000_000.0), "1000000");
    }

    #[rstest::rstest]
    fn test_format_fractional() {
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(0.001), "0.001");
        assert_eq!(format_number(std::f64::consts::PI), "3.141592653589793");
    }

    #[rstest::rstest]
    fn test_format_non_finite() {
        assert_eq!(format_number(f64::NAN), "null");
        assert_eq!(format_number(f64::INFINITY), "null");
    }

    #[rstest::rstest]
    fn test_format_round_trips() {
        for value in [1.5, -2.25e-7, 1e300, 123456.789, -0.1] {
            let text = format_number(value);
            assert_eq!(text.parse::<f64>().unwrap(), value, "{text}");
        }
    }
}
