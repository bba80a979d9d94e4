//! In-memory book inventory with validated inserts, stock adjustments and search.
//!
//! # Examples
//!
//! Direct usage with [`core::store::InventoryStore`]:
//! ```
//! use bookstock::{
//!     book::{Book, BookQuery},
//!     core::store::{InventoryStore, StoreError},
//! };
//!
//! let mut store = InventoryStore::new();
//! store.add_book(Book::new(1, "Dune", "Frank Herbert", 350.0, 5)).expect("add");
//!
//! assert_eq!(store.purchase_book(1, 3), Ok(2));
//! assert!(matches!(
//!     store.purchase_book(1, 10),
//!     Err(StoreError::InsufficientStock { available: 2, .. })
//! ));
//!
//! let hits = store.search_books(&BookQuery::default().title("dune"));
//! assert_eq!(hits.len(), 1);
//! ```
//!
//! Shared usage through the single-writer runtime:
//! ```
//! use bookstock::{
//!     book::Book,
//!     core::store::InventoryStore,
//!     runtime::handle::{spawn_inventory, RuntimeConfig},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let handle = spawn_inventory(InventoryStore::new(), RuntimeConfig::default());
//! handle
//!     .add_book(Book::new(1, "Atomic Habits", "James Clear", 250.0, 2))
//!     .await
//!     .expect("add");
//! assert_eq!(handle.restock_book(1, 5).await.expect("restock"), 7);
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Book record and search filter.
pub mod book;
/// Core in-memory store and validation.
pub mod core;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Tracing subscriber setup.
pub mod telemetry;
/// Shared primitive aliases.
pub mod types;
