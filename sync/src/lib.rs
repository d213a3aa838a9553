//! # Smart-list Sync
//!
//! Asynchronous list operations on top of [`smartlist_engine`].
//!
//! A [`ListSync`] loads, creates, replaces and patches lists through a
//! [`ListApi`] backend and reports every outcome to a store task via
//! [`StoreHandle`]. Callers read list state from the store; failed requests
//! show up there as a list with an error and no items.
//!
//! ```rust
//! use serde_json::json;
//! use smartlist_sync::{ListSync, MemoryListApi, StoreHandle};
//! use smartlist_engine::ItemKeys;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let api = Arc::new(MemoryListApi::new("value"));
//! let (store, _task) = StoreHandle::spawn();
//! let lists = ListSync::new(api, store.clone(), "example.com");
//!
//! let keys = ItemKeys::mapped("text", "value", ["count"]);
//! let tag = json!({"text": "rust"}).as_object().cloned().unwrap();
//! lists.add_item("tags", &tag, &keys).await.unwrap();
//!
//! let state = store.list("tags").await.unwrap().unwrap();
//! assert_eq!(state.items[0]["count"], 1);
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod handle;
pub mod memory;
pub mod ops;
pub mod patch;

pub use api::{ApiResult, ListApi, ListPatch};
pub use config::{ConfigError, SyncConfig};
pub use error::{Result, SyncError};
pub use handle::StoreHandle;
pub use memory::{ApiCall, MemoryListApi};
pub use ops::ListSync;
pub use patch::{decrement_patch, increment_patch};
