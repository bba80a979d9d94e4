use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use crate::{
    book::{Book, BookQuery},
    core::store::{InventoryStore, StoreError, StoreSnapshotV1},
    types::{BookId, Quantity, Stock},
};

use super::events::InventoryEvent;

/// Failure of a request sent through [`InventoryHandle`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// The store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The runtime loop has stopped.
    #[error("inventory runtime is not running")]
    ChannelClosed,
}

/// Channel sizing for [`spawn_inventory`]. Zero values are raised to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Pending commands buffered before callers wait.
    pub command_queue_bound: usize,
    /// Events retained for slow subscribers before they lag.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

/// Cloneable front for a store owned by a single background task.
#[derive(Clone)]
pub struct InventoryHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<InventoryEvent>,
}

enum Command {
    Add {
        book: Book,
        resp: oneshot::Sender<Result<(), StoreError>>,
    },
    Books {
        resp: oneshot::Sender<Vec<Book>>,
    },
    Get {
        id: BookId,
        resp: oneshot::Sender<Option<Book>>,
    },
    Delete {
        id: BookId,
        resp: oneshot::Sender<Result<Book, StoreError>>,
    },
    Search {
        query: BookQuery,
        resp: oneshot::Sender<Vec<Book>>,
    },
    Purchase {
        id: BookId,
        quantity: Quantity,
        resp: oneshot::Sender<Result<Stock, StoreError>>,
    },
    Restock {
        id: BookId,
        quantity: Quantity,
        resp: oneshot::Sender<Result<Stock, StoreError>>,
    },
    Reset {
        resp: oneshot::Sender<()>,
    },
    Snapshot {
        resp: oneshot::Sender<StoreSnapshotV1>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Moves `store` into a background task and returns its handle.
///
/// Must be called from within a tokio runtime.
pub fn spawn_inventory(store: InventoryStore, config: RuntimeConfig) -> InventoryHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<InventoryEvent>(config.event_capacity.max(1));

    let events_tx_loop = events_tx.clone();
    info!(books = store.len(), "Starting inventory runtime");

    tokio::spawn(async move {
        let mut store = store;
        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &mut store, &events_tx_loop) {
                break;
            }
        }
        info!(books = store.len(), "Inventory runtime stopped");
    });

    InventoryHandle { cmd_tx, events_tx }
}

impl InventoryHandle {
    /// Subscribes to events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<InventoryEvent> {
        self.events_tx.subscribe()
    }

    /// See [`InventoryStore::add_book`].
    pub async fn add_book(&self, book: Book) -> Result<(), RuntimeError> {
        Ok(self.call(|resp| Command::Add { book, resp }).await??)
    }

    /// See [`InventoryStore::books`].
    pub async fn books(&self) -> Result<Vec<Book>, RuntimeError> {
        self.call(|resp| Command::Books { resp }).await
    }

    /// See [`InventoryStore::get`].
    pub async fn get(&self, id: BookId) -> Result<Option<Book>, RuntimeError> {
        self.call(|resp| Command::Get { id, resp }).await
    }

    /// See [`InventoryStore::delete_book`].
    pub async fn delete_book(&self, id: BookId) -> Result<Book, RuntimeError> {
        Ok(self.call(|resp| Command::Delete { id, resp }).await??)
    }

    /// See [`InventoryStore::search_books`].
    pub async fn search_books(&self, query: BookQuery) -> Result<Vec<Book>, RuntimeError> {
        self.call(|resp| Command::Search { query, resp }).await
    }

    /// See [`InventoryStore::purchase_book`].
    pub async fn purchase_book(
        &self,
        id: BookId,
        quantity: Quantity,
    ) -> Result<Stock, RuntimeError> {
        Ok(self
            .call(|resp| Command::Purchase { id, quantity, resp })
            .await??)
    }

    /// See [`InventoryStore::restock_book`].
    pub async fn restock_book(
        &self,
        id: BookId,
        quantity: Quantity,
    ) -> Result<Stock, RuntimeError> {
        Ok(self
            .call(|resp| Command::Restock { id, quantity, resp })
            .await??)
    }

    /// See [`InventoryStore::reset`].
    pub async fn reset(&self) -> Result<(), RuntimeError> {
        self.call(|resp| Command::Reset { resp }).await
    }

    /// See [`InventoryStore::export_snapshot`].
    pub async fn snapshot(&self) -> Result<StoreSnapshotV1, RuntimeError> {
        self.call(|resp| Command::Snapshot { resp }).await
    }

    /// Stops the loop after every earlier command has been applied.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.call(|resp| Command::Shutdown { resp }).await
    }

    async fn call<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

// Returns true when the loop should stop.
fn handle_command(
    cmd: Command,
    store: &mut InventoryStore,
    events_tx: &broadcast::Sender<InventoryEvent>,
) -> bool {
    match cmd {
        Command::Add { book, resp } => {
            let id = book.id;
            let res = store.add_book(book);
            if res.is_ok() {
                let _ = events_tx.send(InventoryEvent::BookAdded { id });
            }
            let _ = resp.send(res);
        }
        Command::Books { resp } => {
            let _ = resp.send(store.books());
        }
        Command::Get { id, resp } => {
            let _ = resp.send(store.get_cloned(id));
        }
        Command::Delete { id, resp } => {
            let res = store.delete_book(id);
            if res.is_ok() {
                let _ = events_tx.send(InventoryEvent::BookDeleted { id });
            }
            let _ = resp.send(res);
        }
        Command::Search { query, resp } => {
            let _ = resp.send(store.search_books(&query));
        }
        Command::Purchase { id, quantity, resp } => {
            let res = store.purchase_book(id, quantity);
            if let Ok(stock) = res {
                let _ = events_tx.send(InventoryEvent::StockChanged { id, stock });
            }
            let _ = resp.send(res);
        }
        Command::Restock { id, quantity, resp } => {
            let res = store.restock_book(id, quantity);
            if let Ok(stock) = res {
                let _ = events_tx.send(InventoryEvent::StockChanged { id, stock });
            }
            let _ = resp.send(res);
        }
        Command::Reset { resp } => {
            store.reset();
            let _ = events_tx.send(InventoryEvent::Cleared);
            let _ = resp.send(());
        }
        Command::Snapshot { resp } => {
            let _ = resp.send(store.export_snapshot());
        }
        Command::Shutdown { resp } => {
            debug!("Shutdown requested");
            let _ = resp.send(());
            return true;
        }
    }

    false
}
