//! In-memory list API with counted smart-list semantics.
//!
//! Behaves like the backend list endpoints: adding an item bumps its `count`,
//! removing one lowers it and drops the entry at zero. Every call is recorded
//! and failures can be injected, which makes it the backend of choice for
//! tests and local tooling.

use crate::api::{ApiResult, ListApi, ListPatch};
use dashmap::DashMap;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use smartlist_engine::{item, ApiError, Item, COUNT_FIELD};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A recorded call to [`MemoryListApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    FetchList { list_name: String },
    FetchSmartList { list_name: String, query: String },
    CreateList { list_name: String, len: usize },
    PatchList { list_name: String },
    AddItem { list_name: String },
    RemoveItem { list_name: String },
}

/// Counted lists held in memory, keyed by site prefix and list name.
#[derive(Debug)]
pub struct MemoryListApi {
    /// Remote primary key entries are identified by
    key: String,
    lists: DashMap<String, Vec<Item>>,
    calls: Mutex<Vec<ApiCall>>,
    failures: Mutex<VecDeque<ApiError>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn list_path(prefix: &str, list_name: &str) -> String {
    format!("{}/_lists/{}", prefix, list_name)
}

fn with_count(mut item: Item, count: i64) -> Item {
    item.insert(COUNT_FIELD.to_string(), Value::from(count));
    item
}

impl MemoryListApi {
    /// Create an empty backend whose entries are identified by `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            lists: DashMap::new(),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Seed a list.
    pub fn with_list(self, prefix: &str, list_name: &str, items: Vec<Item>) -> Self {
        self.lists.insert(list_path(prefix, list_name), items);
        self
    }

    /// Current content of a list, if it exists.
    pub fn list(&self, prefix: &str, list_name: &str) -> Option<Vec<Item>> {
        self.lists.get(&list_path(prefix, list_name)).map(|items| items.clone())
    }

    /// Make the next call (of any kind) fail with `error`. Queued failures
    /// are consumed in order.
    pub fn fail_next(&self, error: ApiError) {
        lock(&self.failures).push_back(error);
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<ApiCall> {
        lock(&self.calls).clone()
    }

    fn begin(&self, call: ApiCall) -> ApiResult<()> {
        tracing::trace!(?call, "Memory list API call");
        lock(&self.calls).push(call);
        match lock(&self.failures).pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn key_of<'i>(&self, item: &'i Item, list_name: &str) -> ApiResult<&'i Value> {
        item.get(&self.key).ok_or_else(|| {
            ApiError::from_status(400, list_name, format!("item is missing '{}'", self.key))
        })
    }

    fn position(&self, items: &[Item], key: &Value) -> Option<usize> {
        items.iter().position(|entry| item::same_key(entry.get(&self.key), Some(key)))
    }
}

impl ListApi for MemoryListApi {
    fn fetch_list<'a>(
        &'a self,
        prefix: &'a str,
        list_name: &'a str,
    ) -> BoxFuture<'a, ApiResult<Vec<Item>>> {
        async move {
            self.begin(ApiCall::FetchList {
                list_name: list_name.to_string(),
            })?;
            self.list(prefix, list_name)
                .ok_or_else(|| ApiError::NotFound(list_name.to_string()))
        }
        .boxed()
    }

    fn fetch_smart_list<'a>(
        &'a self,
        prefix: &'a str,
        list_name: &'a str,
        query: &'a str,
    ) -> BoxFuture<'a, ApiResult<Vec<Item>>> {
        async move {
            self.begin(ApiCall::FetchSmartList {
                list_name: list_name.to_string(),
                query: query.to_string(),
            })?;
            let items = self
                .list(prefix, list_name)
                .ok_or_else(|| ApiError::NotFound(list_name.to_string()))?;
            let query = query.to_lowercase();
            Ok(items
                .into_iter()
                .filter(|entry| {
                    let key = entry.get(&self.key).and_then(Value::as_str);
                    key.is_some_and(|key| key.to_lowercase().contains(&query))
                })
                .collect())
        }
        .boxed()
    }

    fn create_list<'a>(
        &'a self,
        prefix: &'a str,
        list_name: &'a str,
        items: Vec<Item>,
    ) -> BoxFuture<'a, ApiResult<Vec<Item>>> {
        async move {
            self.begin(ApiCall::CreateList {
                list_name: list_name.to_string(),
                len: items.len(),
            })?;
            self.lists.insert(list_path(prefix, list_name), items.clone());
            Ok(items)
        }
        .boxed()
    }

    fn patch_list<'a>(
        &'a self,
        prefix: &'a str,
        list_name: &'a str,
        patch: ListPatch,
    ) -> BoxFuture<'a, ApiResult<Vec<Item>>> {
        async move {
            self.begin(ApiCall::PatchList {
                list_name: list_name.to_string(),
            })?;
            let remove = patch.remove.unwrap_or_default();
            let add = patch.add.unwrap_or_default();
            // A rejected patch leaves the list untouched.
            let removed_keys = remove
                .iter()
                .map(|entry| self.key_of(entry, list_name))
                .collect::<ApiResult<Vec<_>>>()?;
            for entry in &add {
                self.key_of(entry, list_name)?;
            }

            let mut entries = self.lists.entry(list_path(prefix, list_name)).or_default();
            entries.retain(|entry| {
                let key = entry.get(&self.key);
                !removed_keys.iter().any(|removed| item::same_key(key, Some(*removed)))
            });
            for added in add {
                let index = added.get(&self.key).and_then(|key| self.position(&entries, key));
                match index {
                    Some(index) => entries[index] = added,
                    None => entries.push(added),
                }
            }
            Ok(entries.clone())
        }
        .boxed()
    }

    fn add_item<'a>(
        &'a self,
        prefix: &'a str,
        list_name: &'a str,
        item: Item,
    ) -> BoxFuture<'a, ApiResult<Item>> {
        async move {
            self.begin(ApiCall::AddItem {
                list_name: list_name.to_string(),
            })?;
            let key = self.key_of(&item, list_name)?;
            let mut entries = self.lists.entry(list_path(prefix, list_name)).or_default();

            let updated = match self.position(&entries, key) {
                Some(index) => {
                    let count = item::count_of(&entries[index]).unwrap_or(0).saturating_add(1);
                    let updated = with_count(entries[index].clone(), count);
                    entries[index] = updated.clone();
                    updated
                }
                None => {
                    let added = with_count(item.clone(), 1);
                    entries.push(added.clone());
                    added
                }
            };
            Ok(updated)
        }
        .boxed()
    }

    fn remove_item<'a>(
        &'a self,
        prefix: &'a str,
        list_name: &'a str,
        item: Item,
    ) -> BoxFuture<'a, ApiResult<Item>> {
        async move {
            self.begin(ApiCall::RemoveItem {
                list_name: list_name.to_string(),
            })?;
            let key = self.key_of(&item, list_name)?;
            let Some(mut entries) = self.lists.get_mut(&list_path(prefix, list_name)) else {
                return Ok(with_count(item.clone(), 0));
            };

            let removed = match self.position(&entries, key) {
                Some(index) => {
                    let count = item::count_of(&entries[index]).unwrap_or(1).saturating_sub(1);
                    if count > 0 {
                        let updated = with_count(entries[index].clone(), count);
                        entries[index] = updated.clone();
                        updated
                    } else {
                        with_count(entries.remove(index), 0)
                    }
                }
                None => with_count(item.clone(), 0),
            };
            Ok(removed)
        }
        .boxed()
    }
}
