//! The remote list API consumed by sync operations.
//!
//! Transport mechanics live outside this crate; anything that can answer
//! these six calls can back a [`ListSync`](crate::ListSync).

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use smartlist_engine::{ApiError, Item};

/// Result of a list API call.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Bulk change sent to the patch endpoint: removals are applied before
/// additions, in one round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add: Option<Vec<Item>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove: Option<Vec<Item>>,
}

impl ListPatch {
    pub fn new(add: Option<Vec<Item>>, remove: Option<Vec<Item>>) -> Self {
        Self { add, remove }
    }

    pub fn adding(items: Vec<Item>) -> Self {
        Self {
            add: Some(items),
            remove: None,
        }
    }

    pub fn removing(items: Vec<Item>) -> Self {
        Self {
            add: None,
            remove: Some(items),
        }
    }

    /// A patch with neither key present needs no remote call.
    pub fn is_empty(&self) -> bool {
        self.add.is_none() && self.remove.is_none()
    }
}

/// Backend list endpoints.
///
/// A missing list is reported as a 404 ([`ApiError::is_not_found`]).
pub trait ListApi: Send + Sync {
    /// Fetch a whole list.
    fn fetch_list<'a>(
        &'a self,
        prefix: &'a str,
        list_name: &'a str,
    ) -> BoxFuture<'a, ApiResult<Vec<Item>>>;

    /// Fetch the entries of a list matching `query`.
    fn fetch_smart_list<'a>(
        &'a self,
        prefix: &'a str,
        list_name: &'a str,
        query: &'a str,
    ) -> BoxFuture<'a, ApiResult<Vec<Item>>>;

    /// Create a list, or overwrite it, with `items`.
    fn create_list<'a>(
        &'a self,
        prefix: &'a str,
        list_name: &'a str,
        items: Vec<Item>,
    ) -> BoxFuture<'a, ApiResult<Vec<Item>>>;

    /// Apply a bulk patch. Returns the full resulting list.
    fn patch_list<'a>(
        &'a self,
        prefix: &'a str,
        list_name: &'a str,
        patch: ListPatch,
    ) -> BoxFuture<'a, ApiResult<Vec<Item>>>;

    /// Add one occurrence of an item. Returns only that item, with its count.
    fn add_item<'a>(
        &'a self,
        prefix: &'a str,
        list_name: &'a str,
        item: Item,
    ) -> BoxFuture<'a, ApiResult<Item>>;

    /// Remove one occurrence of an item. Returns only that item, with its
    /// updated count.
    fn remove_item<'a>(
        &'a self,
        prefix: &'a str,
        list_name: &'a str,
        item: Item,
    ) -> BoxFuture<'a, ApiResult<Item>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_skips_absent_keys() {
        let patch = ListPatch::removing(Vec::new());
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"remove": []}));
        assert!(!patch.is_empty());

        let patch: ListPatch = serde_json::from_value(json!({})).unwrap();
        assert!(patch.is_empty());
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({}));
    }
}
