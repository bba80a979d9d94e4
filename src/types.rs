//! Shared primitive aliases for book records.

/// Caller-supplied book identifier.
pub type BookId = u64;
/// Unit price. Must be strictly positive for stored books.
pub type Price = f64;
/// Units on hand. Signed so a negative candidate can be rejected.
pub type Stock = i64;
/// Requested change in units for purchase or restock.
pub type Quantity = i64;
