//! In-memory authoritative store and validation helpers.

/// Position index helpers.
pub mod indices;
/// Authoritative book store.
pub mod store;
/// Field and quantity validation rules.
pub mod validation;
