//! Book record and search filter types.

use serde::{Deserialize, Serialize};

use crate::types::{BookId, Price, Stock};

/// A single inventory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Caller-supplied unique identifier.
    pub id: BookId,
    /// Display title.
    pub title: String,
    /// Author name.
    pub author: String,
    /// Unit price.
    pub price: Price,
    /// Units on hand.
    pub stock: Stock,
}

impl Book {
    /// Builds a book from its parts. No validation happens here.
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        price: Price,
        stock: Stock,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            price,
            stock,
        }
    }
}

/// Search filter where every `Some` field must match.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookQuery {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Case-insensitive substring of the author.
    pub author: Option<String>,
    /// Inclusive lower price bound.
    pub price_min: Option<Price>,
    /// Inclusive upper price bound.
    pub price_max: Option<Price>,
}

impl BookQuery {
    /// Returns true when no criteria are set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Sets the title criterion.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the author criterion.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Sets the inclusive lower price bound.
    pub fn price_min(mut self, min: Price) -> Self {
        self.price_min = Some(min);
        self
    }

    /// Sets the inclusive upper price bound.
    pub fn price_max(mut self, max: Price) -> Self {
        self.price_max = Some(max);
        self
    }

    /// Tests `book` against all supplied criteria.
    pub fn matches(&self, book: &Book) -> bool {
        contains_folded(&book.title, self.title.as_deref())
            && contains_folded(&book.author, self.author.as_deref())
            && self.price_min.is_none_or(|min| book.price >= min)
            && self.price_max.is_none_or(|max| book.price <= max)
    }
}

// An empty needle counts as an omitted criterion.
fn contains_folded(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        None | Some("") => true,
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
    }
}
