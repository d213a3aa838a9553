//! Merging single remote deltas into a local list.
//!
//! The smart-list API answers an add or remove with just the affected item,
//! carrying its post-operation `count`. These functions fold that item into a
//! previously loaded list instead of re-fetching the whole collection.
//!
//! Both functions take the list by value and hand back the updated list.
//! Items are addressed by their local primary key; existing positions are
//! preserved and new items go to the end.

use crate::item::{self, Item, COUNT_FIELD};
use crate::KeyMap;

/// Position of the first local item sharing the remote item's primary key.
fn find_existing(list: &[Item], remote: &Item, keys: &KeyMap) -> Option<usize> {
    let wanted = remote.get(&keys.remote_primary);
    list.iter().position(|local| item::same_key(local.get(&keys.local_primary), wanted))
}

/// Add or update `remote` in `list`.
///
/// An item already present (by primary key) is replaced in place; otherwise
/// the converted item is appended. Applying the same item twice is the same
/// as applying it once.
pub fn apply_add(mut list: Vec<Item>, remote: &Item, keys: &KeyMap) -> Vec<Item> {
    let local = item::to_local(remote, keys);
    match find_existing(&list, remote, keys) {
        Some(index) => list[index] = local,
        None => list.push(local),
    }
    list
}

/// Remove `remote` from `list`, or update it if its count is still positive.
///
/// The remote `count` is the post-operation truth: a truthy count replaces the
/// local entry, a falsy or missing count deletes it. Removing an item that is
/// not in the list is a no-op.
pub fn apply_remove(mut list: Vec<Item>, remote: &Item, keys: &KeyMap) -> Vec<Item> {
    if let Some(index) = find_existing(&list, remote, keys) {
        if item::is_truthy(remote.get(COUNT_FIELD)) {
            list[index] = item::to_local(remote, keys);
        } else {
            list.remove(index);
        }
    }
    list
}
