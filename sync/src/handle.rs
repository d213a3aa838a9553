//! Store task and its handle.
//!
//! The [`ListStore`] is owned by a single tokio task. Everything else talks to
//! it through a cloneable [`StoreHandle`], so commits are applied one at a
//! time in the order they arrive.

use crate::error::{Result, SyncError};
use smartlist_engine::{Action, ListState, ListStore};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Requests understood by the store task.
#[derive(Debug)]
enum Command {
    Commit {
        action: Action,
        reply: oneshot::Sender<smartlist_engine::error::Result<()>>,
    },
    List {
        list_name: String,
        reply: oneshot::Sender<Option<ListState>>,
    },
    Snapshot {
        reply: oneshot::Sender<ListStore>,
    },
}

/// Handle to the store task.
///
/// The task stops once every handle is dropped and yields the final store
/// through its [`JoinHandle`].
#[derive(Debug, Clone)]
pub struct StoreHandle {
    sender: mpsc::UnboundedSender<Command>,
}

impl StoreHandle {
    /// Spawn a task owning an empty store.
    pub fn spawn() -> (Self, JoinHandle<ListStore>) {
        Self::spawn_with(ListStore::new())
    }

    /// Spawn a task owning `store`, e.g. one preloaded from a snapshot.
    pub fn spawn_with(store: ListStore) -> (Self, JoinHandle<ListStore>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(store, receiver));
        (Self { sender }, task)
    }

    /// Apply an action and wait until it has been applied.
    pub async fn commit(&self, action: Action) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Commit { action, reply })?;
        response.await.map_err(|_| SyncError::StoreClosed)??;
        Ok(())
    }

    /// Current state of one list.
    pub async fn list(&self, list_name: &str) -> Result<Option<ListState>> {
        let (reply, response) = oneshot::channel();
        self.send(Command::List {
            list_name: list_name.to_string(),
            reply,
        })?;
        response.await.map_err(|_| SyncError::StoreClosed)
    }

    /// A copy of the whole store.
    pub async fn snapshot(&self) -> Result<ListStore> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot { reply })?;
        response.await.map_err(|_| SyncError::StoreClosed)
    }

    fn send(&self, command: Command) -> Result<()> {
        self.sender
            .send(command)
            .map_err(|_| SyncError::StoreClosed)
    }
}

async fn run(mut store: ListStore, mut receiver: mpsc::UnboundedReceiver<Command>) -> ListStore {
    tracing::info!(lists = store.len(), "List store task started");

    while let Some(command) = receiver.recv().await {
        match command {
            Command::Commit { action, reply } => {
                let list_name = action.list_name().to_string();
                let result = store.commit(action);
                if let Err(e) = &result {
                    tracing::error!(list = %list_name, error = %e, "Commit rejected");
                }
                // The caller may have given up waiting; the commit stands.
                let _ = reply.send(result);
            }
            Command::List { list_name, reply } => {
                let _ = reply.send(store.get(&list_name).cloned());
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(store.clone());
            }
        }
    }

    tracing::info!(lists = store.len(), "List store task stopped");
    store
}
