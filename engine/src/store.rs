//! List store - per-list load state driven by committed actions.
//!
//! Each named list moves through three states:
//!
//! - **pending**: a request is in flight. Previously loaded items stay visible.
//! - **success**: items were replaced wholesale or merged with a single delta.
//! - **fail**: the request failed. Items are discarded so stale data is not
//!   shown as if it were still valid.
//!
//! There is no idle state; a list that was never requested is simply absent.

use crate::{error::Result, merge, ApiError, Error, Item, ItemKeys, ListName};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Load state of a single list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListState {
    /// A request for this list is in flight
    pub is_loading: bool,
    /// The error of the last failed request
    pub error: Option<ApiError>,
    /// Items in local shape
    pub items: Vec<Item>,
}

/// What a successful request produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Delta {
    /// The full list, replacing whatever was loaded
    Replace(Vec<Item>),
    /// A single remote item that was added
    Added(Item),
    /// A single remote item that was removed (with its new count)
    Removed(Item),
}

/// An action committed to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    #[serde(rename_all = "camelCase")]
    Pending { list_name: ListName },

    #[serde(rename_all = "camelCase")]
    Success {
        list_name: ListName,
        delta: Delta,
        /// Required for [`Delta::Added`] and [`Delta::Removed`]
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item_keys: Option<ItemKeys>,
    },

    #[serde(rename_all = "camelCase")]
    Fail { list_name: ListName, error: ApiError },
}

impl Action {
    pub fn pending(list_name: impl Into<ListName>) -> Self {
        Action::Pending {
            list_name: list_name.into(),
        }
    }

    pub fn loaded(list_name: impl Into<ListName>, items: Vec<Item>) -> Self {
        Action::Success {
            list_name: list_name.into(),
            delta: Delta::Replace(items),
            item_keys: None,
        }
    }

    pub fn item_added(list_name: impl Into<ListName>, item: Item, keys: ItemKeys) -> Self {
        Action::Success {
            list_name: list_name.into(),
            delta: Delta::Added(item),
            item_keys: Some(keys),
        }
    }

    pub fn item_removed(list_name: impl Into<ListName>, item: Item, keys: ItemKeys) -> Self {
        Action::Success {
            list_name: list_name.into(),
            delta: Delta::Removed(item),
            item_keys: Some(keys),
        }
    }

    pub fn fail(list_name: impl Into<ListName>, error: ApiError) -> Self {
        Action::Fail {
            list_name: list_name.into(),
            error,
        }
    }

    /// The list this action targets.
    pub fn list_name(&self) -> &str {
        match self {
            Action::Pending { list_name }
            | Action::Success { list_name, .. }
            | Action::Fail { list_name, .. } => list_name,
        }
    }
}

/// Owner of every list's state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStore {
    lists: HashMap<ListName, ListState>,
}

impl ListStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            lists: HashMap::new(),
        }
    }

    /// Get the state of a list.
    pub fn get(&self, list_name: &str) -> Option<&ListState> {
        self.lists.get(list_name)
    }

    /// Names of every list the store has seen.
    pub fn list_names(&self) -> impl Iterator<Item = &ListName> {
        self.lists.keys()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Apply an action.
    ///
    /// On error the store is left untouched.
    pub fn commit(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Pending { list_name } => {
                let items = self
                    .lists
                    .remove(&list_name)
                    .map(|state| state.items)
                    .unwrap_or_default();
                self.lists.insert(
                    list_name,
                    ListState {
                        is_loading: true,
                        error: None,
                        items,
                    },
                );
            }
            Action::Success {
                list_name,
                delta,
                item_keys,
            } => {
                let items = self.merged_items(&list_name, delta, item_keys.as_ref())?;
                self.lists.insert(
                    list_name,
                    ListState {
                        is_loading: false,
                        error: None,
                        items,
                    },
                );
            }
            Action::Fail { list_name, error } => {
                self.lists.insert(
                    list_name,
                    ListState {
                        is_loading: false,
                        error: Some(error),
                        items: Vec::new(),
                    },
                );
            }
        }
        Ok(())
    }

    fn merged_items(
        &self,
        list_name: &str,
        delta: Delta,
        item_keys: Option<&ItemKeys>,
    ) -> Result<Vec<Item>> {
        let keys = || {
            item_keys
                .ok_or_else(|| Error::MissingKeys(list_name.to_string()))
                .and_then(|keys| keys.resolve())
        };
        let current = || {
            self.lists
                .get(list_name)
                .map(|state| state.items.clone())
                .unwrap_or_default()
        };

        Ok(match delta {
            Delta::Replace(items) => items,
            Delta::Added(item) => merge::apply_add(current(), &item, &keys()?),
            Delta::Removed(item) => merge::apply_remove(current(), &item, &keys()?),
        })
    }
}
