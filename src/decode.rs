//! Deserializer entry points: text in, value tree out.

use crate::options::DecodeOptions;
use crate::parser::Parser;
use crate::value::Value;
use crate::Result;

/// Parses TOON text under the selected mode. The first error aborts with no
/// partial tree; lenient mode recovers only from declared-length mismatches.
pub fn decode(input: &str, options: &DecodeOptions) -> Result<Value> {
    Parser::new(input, options)?.parse()
}

/// Strict-mode [`decode`].
pub fn decode_default(input: &str) -> Result<Value> {
    decode(input, &DecodeOptions::default())
}
