use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    book::{Book, BookQuery},
    core::{
        indices::{self, PosIndex},
        validation::{self, ValidationError},
    },
    types::{BookId, Quantity, Stock},
};

/// Failure of a store operation. Each variant renders the caller-facing message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A field or quantity was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A book with this id is already stored.
    #[error("Book with this ID already exists")]
    AlreadyExists(BookId),
    /// No book with this id is stored.
    #[error("Book with this ID does not exist")]
    MissingBook(BookId),
    /// Purchase asked for more units than are on hand.
    #[error("Insufficient stock: available {available}, requested {requested}")]
    InsufficientStock {
        /// Book being purchased.
        id: BookId,
        /// Units on hand.
        available: Stock,
        /// Units requested.
        requested: Quantity,
    },
}

/// Result of a store operation.
pub type StoreResult<T> = Result<T, StoreError>;

/// Serializable copy of the store contents in insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreSnapshotV1 {
    /// Books in insertion order.
    pub books: Vec<Book>,
}

impl StoreSnapshotV1 {
    /// Encodes the snapshot as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decodes a snapshot from JSON. The books are not validated until
    /// passed to [`InventoryStore::from_snapshot`].
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Ordered in-memory book inventory.
///
/// Lookups by id go through `records`, listing goes through `order`, and
/// `pos` maps each id to its slot in `order`.
#[derive(Debug, Default)]
pub struct InventoryStore {
    records: HashMap<BookId, Book>,
    order: Vec<BookId>,
    pos: PosIndex,
}

impl InventoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store, running every book through [`Self::add_book`].
    pub fn from_snapshot(snapshot: StoreSnapshotV1) -> StoreResult<Self> {
        let mut store = Self::new();
        for book in snapshot.books {
            store.add_book(book)?;
        }
        Ok(store)
    }

    /// Copies the contents out in insertion order.
    pub fn export_snapshot(&self) -> StoreSnapshotV1 {
        StoreSnapshotV1 {
            books: self.books(),
        }
    }

    /// Validates and appends `book`. Nothing changes on failure.
    pub fn add_book(&mut self, book: Book) -> StoreResult<()> {
        if let Err(err) = validation::validate_book(&book) {
            debug!(id = book.id, error = %err, "Rejected book");
            return Err(err.into());
        }
        if self.records.contains_key(&book.id) {
            debug!(id = book.id, "Rejected duplicate book id");
            return Err(StoreError::AlreadyExists(book.id));
        }

        let id = book.id;
        debug!(id, title = %book.title, stock = book.stock, "Adding book");
        self.pos.insert(id, self.order.len());
        self.order.push(id);
        self.records.insert(id, book);
        Ok(())
    }

    /// Returns a copy of every book in insertion order.
    pub fn books(&self) -> Vec<Book> {
        self.iter().cloned().collect()
    }

    /// Iterates books in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Book> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Borrows the book with `id`.
    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.records.get(&id)
    }

    /// Copies the book with `id`.
    pub fn get_cloned(&self, id: BookId) -> Option<Book> {
        self.get(id).cloned()
    }

    /// Ids in insertion order.
    pub fn ordered_ids(&self) -> &[BookId] {
        &self.order
    }

    /// Number of stored books.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true when no books are stored.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Removes and returns the book with `id`, keeping the others in order.
    pub fn delete_book(&mut self, id: BookId) -> StoreResult<Book> {
        let Some(book) = self.records.remove(&id) else {
            debug!(id, "Delete of missing book");
            return Err(StoreError::MissingBook(id));
        };

        if let Some(idx) = self.pos.remove(&id) {
            self.order.remove(idx);
            indices::reindex_from(&mut self.pos, &self.order, idx);
        }
        debug!(id, remaining = self.order.len(), "Deleted book");
        Ok(book)
    }

    /// Returns the books matching every criterion in `query`, in insertion order.
    pub fn search_books(&self, query: &BookQuery) -> Vec<Book> {
        let out: Vec<Book> = self.iter().filter(|b| query.matches(b)).cloned().collect();
        debug!(?query, count = out.len(), "Search returned books");
        out
    }

    /// Deducts `quantity` units and returns the remaining stock.
    pub fn purchase_book(&mut self, id: BookId, quantity: Quantity) -> StoreResult<Stock> {
        let rec = self.records.get_mut(&id).ok_or(StoreError::MissingBook(id))?;
        validation::validate_quantity(quantity)?;
        if rec.stock < quantity {
            debug!(id, available = rec.stock, requested = quantity, "Insufficient stock");
            return Err(StoreError::InsufficientStock {
                id,
                available: rec.stock,
                requested: quantity,
            });
        }

        rec.stock -= quantity;
        debug!(id, quantity, stock = rec.stock, "Purchased book");
        Ok(rec.stock)
    }

    /// Adds `quantity` units and returns the new stock.
    pub fn restock_book(&mut self, id: BookId, quantity: Quantity) -> StoreResult<Stock> {
        let rec = self.records.get_mut(&id).ok_or(StoreError::MissingBook(id))?;
        validation::validate_quantity(quantity)?;
        let stock = rec
            .stock
            .checked_add(quantity)
            .ok_or(ValidationError::StockOverflow)?;

        rec.stock = stock;
        debug!(id, quantity, stock, "Restocked book");
        Ok(stock)
    }

    /// Drops every book.
    pub fn reset(&mut self) {
        debug!(cleared = self.order.len(), "Resetting store");
        self.records.clear();
        self.order.clear();
        self.pos.clear();
    }
}
