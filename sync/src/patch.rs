//! Patch builders for counted lists.
//!
//! These produce the `transform` a smart-list input hands to
//! [`ListSync::patch_list`](crate::ListSync::patch_list): the matching entry is
//! swapped for a copy with its count moved by one, in a single round trip.

use crate::api::ListPatch;
use serde_json::Value;
use smartlist_engine::{item, Item, ItemKeys, KeyMap, COUNT_FIELD};

fn remote_with_count(local: &Item, keys: &KeyMap, count: i64) -> Item {
    let mut remote = item::to_remote(local, keys);
    remote.insert(COUNT_FIELD.to_string(), Value::from(count));
    remote
}

fn find<'i>(items: &'i [Item], wanted: &Item, keys: &KeyMap) -> Option<&'i Item> {
    let key = wanted.get(&keys.local_primary)?;
    items.iter().find(|entry| item::same_key(entry.get(&keys.local_primary), Some(key)))
}

/// Patch adding one occurrence of `wanted` to `items`.
pub fn increment_patch(
    items: &[Item],
    wanted: &Item,
    keys: &ItemKeys,
) -> smartlist_engine::error::Result<ListPatch> {
    let keys = keys.resolve()?;
    Ok(match find(items, wanted, &keys) {
        Some(entry) => {
            let count = item::count_of(entry).unwrap_or(0);
            ListPatch::new(
                Some(vec![remote_with_count(entry, &keys, count.saturating_add(1))]),
                Some(vec![remote_with_count(entry, &keys, count)]),
            )
        }
        None => ListPatch::adding(vec![remote_with_count(wanted, &keys, 1)]),
    })
}

/// Patch removing one occurrence of `wanted` from `items`.
///
/// Returns `None` when `wanted` is not in the list. The entry is dropped
/// entirely once its count would reach zero.
pub fn decrement_patch(
    items: &[Item],
    wanted: &Item,
    keys: &ItemKeys,
) -> smartlist_engine::error::Result<Option<ListPatch>> {
    let keys = keys.resolve()?;
    let Some(entry) = find(items, wanted, &keys) else {
        return Ok(None);
    };

    let count = item::count_of(entry).unwrap_or(1);
    let remove = vec![remote_with_count(entry, &keys, count)];
    let add = (count > 1).then(|| vec![remote_with_count(entry, &keys, count - 1)]);
    Ok(Some(ListPatch::new(add, Some(remove))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> Item {
        value.as_object().cloned().unwrap()
    }

    fn items() -> Vec<Item> {
        vec![
            item(json!({"text": "test1", "count": 1})),
            item(json!({"text": "test2", "count": 2})),
        ]
    }

    fn keys() -> ItemKeys {
        ItemKeys::plain("text", Vec::<String>::new())
    }

    #[test]
    fn decrease_count_of_existing_item() {
        let patch = decrement_patch(&items(), &item(json!({"text": "test2"})), &keys()).unwrap();
        assert_eq!(
            patch,
            Some(ListPatch::new(
                Some(vec![item(json!({"text": "test2", "count": 1}))]),
                Some(vec![item(json!({"text": "test2", "count": 2}))]),
            ))
        );
    }

    #[test]
    fn decrease_to_zero_only_removes() {
        let patch = decrement_patch(&items(), &item(json!({"text": "test1"})), &keys()).unwrap();
        assert_eq!(
            patch,
            Some(ListPatch::removing(vec![item(json!({"text": "test1", "count": 1}))]))
        );
    }

    #[test]
    fn decrease_missing_item_is_none() {
        let patch =
            decrement_patch(&items(), &item(json!({"text": "something else"})), &keys()).unwrap();
        assert_eq!(patch, None);

        let patch = decrement_patch(&items(), &item(json!({})), &keys()).unwrap();
        assert_eq!(patch, None);
    }

    #[test]
    fn increase_existing_and_new_items() {
        let patch = increment_patch(&items(), &item(json!({"text": "test1"})), &keys()).unwrap();
        assert_eq!(
            patch,
            ListPatch::new(
                Some(vec![item(json!({"text": "test1", "count": 2}))]),
                Some(vec![item(json!({"text": "test1", "count": 1}))]),
            )
        );

        let patch = increment_patch(&items(), &item(json!({"text": "new"})), &keys()).unwrap();
        assert_eq!(
            patch,
            ListPatch::adding(vec![item(json!({"text": "new", "count": 1}))])
        );
    }

    #[test]
    fn increase_saturates_at_max_count() {
        let items = vec![item(json!({"text": "big", "count": i64::MAX}))];
        let patch = increment_patch(&items, &item(json!({"text": "big"})), &keys()).unwrap();
        assert_eq!(
            patch.add,
            Some(vec![item(json!({"text": "big", "count": i64::MAX}))])
        );
    }

    #[test]
    fn numeric_keys_find_by_value() {
        let keys = ItemKeys::plain("id", Vec::<String>::new());
        let items = vec![item(json!({"id": 7, "count": 2}))];
        let patch = decrement_patch(&items, &item(json!({"id": 7.0})), &keys).unwrap();
        assert_eq!(
            patch,
            Some(ListPatch::new(
                Some(vec![item(json!({"id": 7, "count": 1}))]),
                Some(vec![item(json!({"id": 7, "count": 2}))]),
            ))
        );
    }

    #[test]
    fn patches_use_remote_names() {
        let keys = ItemKeys::mapped("text", "value", ["count"]);
        let patch = decrement_patch(&items(), &item(json!({"text": "test2"})), &keys)
            .unwrap()
            .unwrap();
        assert_eq!(
            patch.remove,
            Some(vec![item(json!({"value": "test2", "count": 2}))])
        );
    }
}
