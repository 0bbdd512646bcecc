//! TOON is a compact, indentation-based text format for JSON-like values.
//!
//! Structure comes from indentation instead of braces, arrays carry a
//! declared length in their header, and arrays of uniform objects collapse
//! into delimited tables. Typical documents are noticeably smaller than
//! their JSON equivalents while staying losslessly convertible back.
//!
//! ```
//! use toon_codec::{decode_default, encode_default};
//!
//! let text = "a: 1\nrows[2]{id,name}:\n  1,Ada\n  2,Lin\n";
//! let value = decode_default(text)?;
//! assert_eq!(value["rows"][1]["name"].as_str(), Some("Lin"));
//! assert_eq!(encode_default(&value), text);
//! # Ok::<(), toon_codec::Error>(())
//! ```
//!
//! Decoding is strict by default: declared lengths must match, tabs in
//! indentation are rejected, and the first error aborts. Lenient mode
//! ([`DecodeOptions::with_lenient`]) trusts actual element counts when a
//! declared length disagrees, and nothing else.

mod analyze;
mod decode;
mod encode;
mod error;
mod lexer;
mod num;
mod options;
mod parser;
mod quote;
mod value;

pub use analyze::{analyze_array, ArrayShape};
pub use decode::{decode, decode_default};
pub use encode::encode;
pub use error::Error;
pub use options::{DecodeOptions, Delimiter, EncodeOptions, Indent, KeyFolding};
pub use quote::{escape_string, is_bare_key, needs_quoting};
pub use value::{Map, Value};

pub type Result<T> = std::result::Result<T, Error>;

/// [`encode`] with default options: two-space indent, comma delimiter, no
/// key folding.
pub fn encode_default(value: &Value) -> String {
    encode(value, &EncodeOptions::default())
}
