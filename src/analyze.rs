//! Array representation analysis for the encoder.
//!
//! Every array gets exactly one of four layouts. The rules are checked in
//! order and are mutually exclusive, so classification is total: empty wins
//! first, then the tabular form for uniform objects, then the inline form
//! for all-scalar arrays, and the dash list absorbs everything else.

use crate::options::Delimiter;
use crate::value::Value;

/// Layout chosen for one array at encode time. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayShape {
    /// `key[0]:` with no body.
    Empty,
    /// `key[N]: v1,v2,...` on the header line.
    Inline,
    /// `key[N]{h1,h2}:` with one delimited row per element. Carries the
    /// header names in the order taken from the first element.
    Tabular(Vec<String>),
    /// One `- ` line per element.
    List,
}

/// Classifies `elements` into the layout the encoder will use. The
/// delimiter does not influence the decision (quoting absorbs collisions);
/// the parameter mirrors the encoder call site so tooling can probe the
/// decision the encoder would make.
pub fn analyze_array(elements: &[Value], _delimiter: Delimiter) -> ArrayShape {
    if elements.is_empty() {
        return ArrayShape::Empty;
    }
    if let Some(headers) = tabular_headers(elements) {
        return ArrayShape::Tabular(headers);
    }
    if elements.iter().all(Value::is_scalar) {
        return ArrayShape::Inline;
    }
    ArrayShape::List
}

/// `Some(headers)` when every element is an object with the same keys in
/// the same order and only scalar values.
fn tabular_headers(elements: &[Value]) -> Option<Vec<String>> {
    let first = match &elements[0] {
        Value::Object(map) if !map.is_empty() => map,
        _ => return None,
    };
    for element in elements {
        let map = match element {
            Value::Object(map) => map,
            _ => return None,
        };
        if map.len() != first.len() {
            return None;
        }
        for ((key, value), header) in map.iter().zip(first.keys()) {
            if key != header || !value.is_scalar() {
                return None;
            }
        }
    }
    Some(first.keys().cloned().collect())
}
