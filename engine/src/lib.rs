//! # Smart-list Engine
//!
//! Reconciliation logic that keeps a locally shaped list of items in step with
//! the counted lists exposed by a backend list API.
//!
//! This crate has no IO. It translates items between the UI's field names and
//! the API's field names, folds single added/removed items into a loaded list,
//! and tracks the load state of every named list.
//!
//! ## Core Concepts
//!
//! ### Item keys
//!
//! An [`ItemKeys`] specification names the primary key (optionally renamed
//! between local and remote shapes) and the secondary keys copied verbatim:
//! `[{"text": "value"}, "count"]`. [`ItemKeys::resolve`] turns it into a
//! [`KeyMap`].
//!
//! ### Counted items
//!
//! Remote items carry a `count`. The API answers a single add or remove with
//! the affected item and its new count; [`merge::apply_add`] and
//! [`merge::apply_remove`] fold that answer into the local list.
//!
//! ### List store
//!
//! [`ListStore`] holds a [`ListState`] per list name and changes only through
//! committed [`Action`]s (pending, success, fail).
//!
//! ## Quick Start
//!
//! ```rust
//! use smartlist_engine::{Action, ItemKeys, ListStore};
//! use serde_json::json;
//!
//! let keys = ItemKeys::mapped("text", "value", ["count"]);
//! let mut store = ListStore::new();
//!
//! store.commit(Action::pending("tags")).unwrap();
//! let loaded = json!([{"text": "one", "count": 1}]);
//! let items = serde_json::from_value(loaded).unwrap();
//! store.commit(Action::loaded("tags", items)).unwrap();
//!
//! let added = json!({"value": "one", "count": 2}).as_object().cloned().unwrap();
//! store.commit(Action::item_added("tags", added, keys)).unwrap();
//!
//! let state = store.get("tags").unwrap();
//! assert!(!state.is_loading);
//! assert_eq!(state.items[0]["count"], 2);
//! ```

pub mod error;
pub mod item;
pub mod keys;
pub mod merge;
pub mod store;

// Re-export main types at crate root
pub use error::{ApiError, Error, NOT_FOUND_STATUS};
pub use item::{Item, COUNT_FIELD};
pub use keys::{ItemKeys, KeyEntry, KeyMap};
pub use store::{Action, Delta, ListState, ListStore};

/// Name of a list as known to the list API.
pub type ListName = String;
