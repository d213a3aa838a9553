//! Conversion of single items between the local and remote shapes.

use crate::KeyMap;
use serde_json::{Map, Value};

/// A list item: a JSON object keyed by field name.
pub type Item = Map<String, Value>;

/// Name of the occurrence counter carried by remote items.
pub const COUNT_FIELD: &str = "count";

/// Convert a remote item into the local shape.
///
/// Fields outside the key map (including `count`, unless declared as a
/// secondary key) are dropped.
pub fn to_local(remote: &Item, keys: &KeyMap) -> Item {
    convert(remote, &keys.remote_primary, &keys.local_primary, &keys.secondary)
}

/// Convert a local item into the remote shape.
pub fn to_remote(local: &Item, keys: &KeyMap) -> Item {
    convert(local, &keys.local_primary, &keys.remote_primary, &keys.secondary)
}

fn convert(source: &Item, from: &str, to: &str, secondary: &[String]) -> Item {
    let mut out = Map::new();
    if let Some(value) = source.get(from) {
        out.insert(to.to_string(), value.clone());
    }
    for key in secondary {
        if let Some(value) = source.get(key) {
            out.insert(key.clone(), value.clone());
        }
    }
    out
}

/// Read the occurrence count of an item, if it is an integer.
pub fn count_of(item: &Item) -> Option<i64> {
    item.get(COUNT_FIELD).and_then(Value::as_i64)
}

/// Primary-key equality. Numbers compare by value, so `1` matches `1.0`;
/// every other value (including numbers nested in arrays or objects) compares
/// structurally. A missing key only matches another missing key.
pub fn same_key(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x == y
            } else {
                x.as_f64() == y.as_f64()
            }
        }
        _ => a == b,
    }
}

/// Truthiness as the UI layer sees it: null, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ItemKeys;
    use serde_json::json;

    fn item(value: Value) -> Item {
        value.as_object().cloned().unwrap()
    }

    fn keys() -> KeyMap {
        ItemKeys::mapped("text", "value", ["count"]).resolve().unwrap()
    }

    #[test]
    fn local_to_remote() {
        let keys = keys();
        assert_eq!(
            to_remote(&item(json!({"text": "one"})), &keys),
            item(json!({"value": "one"}))
        );
        assert_eq!(
            to_remote(&item(json!({"text": "one", "count": 1})), &keys),
            item(json!({"value": "one", "count": 1}))
        );
        assert_eq!(
            to_remote(&item(json!({"text": "one", "count": 1, "extra": true})), &keys),
            item(json!({"value": "one", "count": 1}))
        );
    }

    #[test]
    fn remote_to_local() {
        let keys = keys();
        assert_eq!(
            to_local(&item(json!({"value": "one"})), &keys),
            item(json!({"text": "one"}))
        );
        assert_eq!(
            to_local(&item(json!({"value": "one", "count": 1})), &keys),
            item(json!({"text": "one", "count": 1}))
        );
        assert_eq!(
            to_local(&item(json!({"value": "one", "count": 1, "extra": true})), &keys),
            item(json!({"text": "one", "count": 1}))
        );
    }

    #[test]
    fn count_is_dropped_when_not_declared() {
        let keys = ItemKeys::plain("text", Vec::<String>::new()).resolve().unwrap();
        assert_eq!(
            to_local(&item(json!({"text": "one", "count": 3})), &keys),
            item(json!({"text": "one"}))
        );
    }

    #[test]
    fn conversion_does_not_touch_input() {
        let keys = keys();
        let remote = item(json!({"value": "one", "count": 2, "extra": 1}));
        let before = remote.clone();
        let _ = to_local(&remote, &keys);
        assert_eq!(remote, before);
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(0.0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(is_truthy(Some(&json!(1))));
        assert!(is_truthy(Some(&json!(-1))));
        assert!(is_truthy(Some(&json!("0"))));
        assert!(is_truthy(Some(&json!([]))));
    }

    #[test]
    fn keys_compare_numbers_by_value() {
        assert!(same_key(Some(&json!(1)), Some(&json!(1.0))));
        assert!(same_key(Some(&json!(-3)), Some(&json!(-3.0))));
        assert!(same_key(Some(&json!(u64::MAX)), Some(&json!(u64::MAX))));
        assert!(!same_key(Some(&json!(1)), Some(&json!(1.5))));
        assert!(!same_key(Some(&json!(1)), Some(&json!("1"))));
        assert!(same_key(Some(&json!("a")), Some(&json!("a"))));
        assert!(same_key(None, None));
        assert!(!same_key(None, Some(&json!(null))));
    }

    #[test]
    fn count_reads_integers_only() {
        assert_eq!(count_of(&item(json!({"count": 4}))), Some(4));
        assert_eq!(count_of(&item(json!({"count": "4"}))), None);
        assert_eq!(count_of(&item(json!({}))), None);
    }
}
