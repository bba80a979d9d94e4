//! Runtime event stream payloads.

use crate::types::{BookId, Stock};

/// Events emitted from the single-writer runtime loop after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryEvent {
    /// A new book was added.
    BookAdded {
        /// Added book id.
        id: BookId,
    },
    /// A book was removed.
    BookDeleted {
        /// Removed book id.
        id: BookId,
    },
    /// A purchase or restock changed stock.
    StockChanged {
        /// Affected book id.
        id: BookId,
        /// Stock after the change.
        stock: Stock,
    },
    /// The store was reset to empty.
    Cleared,
}
