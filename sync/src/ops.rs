//! List sync operations.
//!
//! Every operation commits `pending`, talks to the list API, then commits
//! `success` or `fail`. API failures end up in the store, not in the return
//! value: an operation only returns an error when the store itself refuses a
//! commit or has shut down. Nothing is retried.

use crate::api::{ListApi, ListPatch};
use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::handle::StoreHandle;
use smartlist_engine::{item, Action, Item, ItemKeys, KeyMap};
use std::sync::Arc;

/// Key map for the single-item endpoints, which take the primary key alone.
///
/// The whole spec is validated first: the merge after the remote call uses
/// all of it, so a malformed secondary key must fail before anything is sent.
fn primary_map(item_keys: &ItemKeys) -> smartlist_engine::error::Result<KeyMap> {
    let keys = item_keys.resolve()?;
    Ok(KeyMap {
        secondary: Vec::new(),
        ..keys
    })
}

/// Runs list operations against a [`ListApi`] and reports into a store.
#[derive(Debug)]
pub struct ListSync<A> {
    api: Arc<A>,
    store: StoreHandle,
    prefix: String,
}

impl<A> Clone for ListSync<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            store: self.store.clone(),
            prefix: self.prefix.clone(),
        }
    }
}

impl<A: ListApi> ListSync<A> {
    pub fn new(api: Arc<A>, store: StoreHandle, prefix: impl Into<String>) -> Self {
        Self {
            api,
            store,
            prefix: prefix.into(),
        }
    }

    pub fn from_config(api: Arc<A>, store: StoreHandle, config: &SyncConfig) -> Self {
        Self::new(api, store, config.prefix.clone())
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Load a whole list.
    pub async fn load_list(&self, list_name: &str) -> Result<()> {
        tracing::debug!(list = %list_name, "Loading list");
        self.store.commit(Action::pending(list_name)).await?;

        let outcome = self.api.fetch_list(&self.prefix, list_name).await;
        self.settle(list_name, outcome.map_err(SyncError::from)).await
    }

    /// Load the entries of a list matching `query`.
    pub async fn load_smart_list(&self, list_name: &str, query: &str) -> Result<()> {
        tracing::debug!(list = %list_name, query = %query, "Loading smart list");
        self.store.commit(Action::pending(list_name)).await?;

        let outcome = self.api.fetch_smart_list(&self.prefix, list_name, query).await;
        self.settle(list_name, outcome.map_err(SyncError::from)).await
    }

    /// Fetch a list, creating it empty if the API does not know it yet.
    ///
    /// Commits `pending` but leaves the final commit to the caller. Any
    /// failure other than a 404 is returned unchanged.
    pub async fn get_or_create(&self, list_name: &str) -> Result<Vec<Item>> {
        self.store.commit(Action::pending(list_name)).await?;

        match self.api.fetch_list(&self.prefix, list_name).await {
            Ok(items) => Ok(items),
            Err(e) if e.is_not_found() => {
                tracing::info!(list = %list_name, "List does not exist yet, creating it");
                Ok(self
                    .api
                    .create_list(&self.prefix, list_name, Vec::new())
                    .await?)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a list with `transform` applied to its current items.
    pub async fn update_list<F>(&self, list_name: &str, transform: F) -> Result<()>
    where
        F: FnOnce(Vec<Item>) -> Vec<Item>,
    {
        tracing::debug!(list = %list_name, "Updating list");
        let outcome = self.save_transformed(list_name, transform).await;
        self.settle(list_name, outcome).await
    }

    /// Patch a list with whatever `transform` derives from its current items.
    ///
    /// When `transform` yields no patch, or an empty one, nothing is sent and
    /// the fetched list is committed as is.
    pub async fn patch_list<F>(&self, list_name: &str, transform: F) -> Result<()>
    where
        F: FnOnce(&[Item]) -> Option<ListPatch>,
    {
        tracing::debug!(list = %list_name, "Patching list");
        let outcome = self.apply_patch(list_name, transform).await;
        self.settle(list_name, outcome).await
    }

    /// Add one occurrence of a local item and merge the answer into the list.
    pub async fn add_item(&self, list_name: &str, item: &Item, item_keys: &ItemKeys) -> Result<()> {
        let remote = item::to_remote(item, &primary_map(item_keys)?);
        tracing::debug!(list = %list_name, "Adding list item");
        self.store.commit(Action::pending(list_name)).await?;

        match self.api.add_item(&self.prefix, list_name, remote).await {
            Ok(added) => {
                self.store
                    .commit(Action::item_added(list_name, added, item_keys.clone()))
                    .await
            }
            Err(e) => self.settle(list_name, Err(e.into())).await,
        }
    }

    /// Remove one occurrence of a local item and merge the answer into the list.
    pub async fn remove_item(
        &self,
        list_name: &str,
        item: &Item,
        item_keys: &ItemKeys,
    ) -> Result<()> {
        let remote = item::to_remote(item, &primary_map(item_keys)?);
        tracing::debug!(list = %list_name, "Removing list item");
        self.store.commit(Action::pending(list_name)).await?;

        match self.api.remove_item(&self.prefix, list_name, remote).await {
            Ok(removed) => {
                self.store
                    .commit(Action::item_removed(list_name, removed, item_keys.clone()))
                    .await
            }
            Err(e) => self.settle(list_name, Err(e.into())).await,
        }
    }

    async fn save_transformed<F>(&self, list_name: &str, transform: F) -> Result<Vec<Item>>
    where
        F: FnOnce(Vec<Item>) -> Vec<Item>,
    {
        let items = transform(self.get_or_create(list_name).await?);
        Ok(self.api.create_list(&self.prefix, list_name, items).await?)
    }

    async fn apply_patch<F>(&self, list_name: &str, transform: F) -> Result<Vec<Item>>
    where
        F: FnOnce(&[Item]) -> Option<ListPatch>,
    {
        let items = self.get_or_create(list_name).await?;
        match transform(&items) {
            Some(patch) if !patch.is_empty() => {
                Ok(self.api.patch_list(&self.prefix, list_name, patch).await?)
            }
            _ => Ok(items),
        }
    }

    /// Commit the outcome of a whole-list request. API errors become a `fail`
    /// commit; store errors are passed through.
    async fn settle(&self, list_name: &str, outcome: Result<Vec<Item>>) -> Result<()> {
        let action = match outcome {
            Ok(items) => Action::loaded(list_name, items),
            Err(SyncError::Api(e)) => {
                tracing::warn!(list = %list_name, error = %e, "List request failed");
                Action::fail(list_name, e)
            }
            Err(e) => return Err(e),
        };
        self.store.commit(action).await
    }
}
