//! Deterministic cache keys for argument lists.

use serde::Serialize;
use serde_json::{Map, Value};

/// Serializes an argument list into a cache key.
///
/// The arguments go through `serde_json::Value` and every object has its keys
/// sorted, so two argument lists with the same values in the same order
/// produce the same key regardless of the map type they were built from.
/// Position matters: `("a", "b")` and `("b", "a")` are different keys.
pub fn cache_key<A: Serialize + ?Sized>(args: &A) -> serde_json::Result<String> {
    let value = canonicalize(serde_json::to_value(args)?);
    serde_json::to_string(&value)
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<(String, Value)> = map.into_iter().collect();
            pairs.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k, canonicalize(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn test_order_sensitive() {
        assert_ne!(cache_key(&("a", "b")).unwrap(), cache_key(&("b", "a")).unwrap());
        assert_ne!(cache_key(&["a"]).unwrap(), cache_key(&["b"]).unwrap());
    }

    #[test]
    fn test_map_type_does_not_matter() {
        let hashed: HashMap<&str, u32> = [("z", 1), ("a", 2), ("m", 3)].into_iter().collect();
        let sorted: BTreeMap<&str, u32> = [("a", 2), ("m", 3), ("z", 1)].into_iter().collect();

        assert_eq!(
            cache_key(&("url", &hashed)).unwrap(),
            cache_key(&("url", &sorted)).unwrap()
        );
    }

    #[test]
    fn test_structure_matters() {
        assert_ne!(cache_key(&("a", "b")).unwrap(), cache_key(&(("a", "b"),)).unwrap());
        assert_ne!(cache_key(&(1,)).unwrap(), cache_key(&("1",)).unwrap());
    }

    proptest! {
        #[test]
        fn prop_equal_args_equal_keys(args in proptest::collection::vec(".*", 0..6)) {
            let copy = args.clone();
            prop_assert_eq!(cache_key(&args).unwrap(), cache_key(&copy).unwrap());
        }

        #[test]
        fn prop_different_args_different_keys(
            a in proptest::collection::vec(".*", 0..4),
            b in proptest::collection::vec(".*", 0..4),
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(cache_key(&a).unwrap(), cache_key(&b).unwrap());
        }
    }
}
