use thiserror::Error;

use crate::{book::Book, types::Quantity};

/// Field or quantity rejected before any state change.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title or author is empty.
    #[error("Title and Author are required")]
    MissingTitleOrAuthor,
    /// Price is zero, negative or NaN.
    #[error("Price must be a positive number")]
    NonPositivePrice,
    /// Initial stock is below zero.
    #[error("Stock cannot be negative")]
    NegativeStock,
    /// Purchase or restock quantity is zero or negative.
    #[error("quantity must be greater than zero")]
    NonPositiveQuantity,
    /// Restock would overflow the stock counter.
    #[error("Stock would exceed the maximum")]
    StockOverflow,
}

/// Result of a validation check.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks the per-field rules for a candidate book, first failure wins.
pub fn validate_book(book: &Book) -> ValidationResult<()> {
    if book.title.is_empty() || book.author.is_empty() {
        return Err(ValidationError::MissingTitleOrAuthor);
    }
    // NaN fails both comparisons, so test for it explicitly.
    if book.price.is_nan() || book.price <= 0.0 {
        return Err(ValidationError::NonPositivePrice);
    }
    if book.stock < 0 {
        return Err(ValidationError::NegativeStock);
    }
    Ok(())
}

/// Rejects zero and negative quantities.
pub fn validate_quantity(quantity: Quantity) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::NonPositiveQuantity);
    }
    Ok(())
}
