//! Key folding: chains of single-key objects collapse into one dotted key.
//!
//! Folding is encoder-only and lossy. A folded `a.b.c: 1` decodes to the
//! literal key `a.b.c`, not to the nested objects it came from, so there is
//! no round-trip guarantee when folding is enabled.

use crate::quote::is_bare_key;
use crate::value::Value;

/// Follows a chain of single-key objects starting at `key: value` and
/// returns the dotted path plus the value it lands on, or `None` when the
/// chain is not foldable. Every segment must be a bare key (which also
/// guarantees it is dot-free); `flatten_depth` caps the number of segments.
pub(crate) fn fold_chain<'a>(
    key: &'a str,
    value: &'a Value,
    flatten_depth: Option<usize>,
) -> Option<(String, &'a Value)> {
    if !is_bare_key(key) {
        return None;
    }
    let max_segments = flatten_depth.unwrap_or(usize::MAX);
    if max_segments < 2 {
        return None;
    }

    let mut path = key.to_string();
    let mut segments = 1;
    let mut current = value;
    loop {
        let map = match current {
            Value::Object(map) if map.len() == 1 => map,
            _ => break,
        };
        let (next_key, next_value) = match map.get_index(0) {
            Some(entry) => entry,
            None => break,
        };
        if !is_bare_key(next_key) || segments >= max_segments {
            break;
        }
        path.push('.');
        path.push_str(next_key);
        segments += 1;
        current = next_value;
    }

    if segments > 1 {
        Some((path, current))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Map;

    fn single(key: &str, value: Value) -> Value {
        let mut map = Map::new();
        map.insert(key.to_string(), value);
        Value::Object(map)
    }

    #[rstest::rstest]
    fn test_folds_single_key_chain() {
        let value = single("b", single("c", Value::Number(1.0)));
        let (path, leaf) = fold_chain("a", &value, None).unwrap();
        assert_eq!(path, "a.b.c");
        assert_eq!(leaf, &Value::Number(1.0));
    }

    #[rstest::rstest]
    fn test_stops_at_multi_key_object() {
        let mut inner = Map::new();
        inner.insert("x".to_string(), Value::Number(1.0));
        inner.insert("y".to_string(), Value::Number(2.0));
        let value = single("b", Value::Object(inner));
        let (path, leaf) = fold_chain("a", &value, None).unwrap();
        assert_eq!(path, "a.b");
        assert!(leaf.is_object());
    }

    #[rstest::rstest]
    fn test_requires_bare_segments() {
        let value = single("has space", Value::Number(1.0));
        assert!(fold_chain("a", &value, None).is_none());
        assert!(fold_chain("not bare!", &single("b", Value::Null), None).is_none());
    }

    #[rstest::rstest]
    fn test_flatten_depth_caps_segments() {
        let value = single("b", single("c", Value::Number(1.0)));
        let (path, leaf) = fold_chain("a", &value, Some(2)).unwrap();
        assert_eq!(path, "a.b");
        assert!(leaf.is_object());
    }

    #[rstest::rstest]
    fn test_nothing_to_fold() {
        assert!(fold_chain("a", &Value::Number(1.0), None).is_none());
    }
}
