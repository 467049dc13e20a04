//! Access to the remote lists.
//!
//! The store only knows untyped rows. Field aliasing and typing happen in
//! [`crate::lists`] and [`crate::service`].

pub mod filter;
#[cfg(test)]
pub mod memory;
pub mod sharepoint;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use filter::Filter;

/// One list item as the store returns it.
pub type Row = Map<String, Value>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("ACS Token failed: {0}")]
    Token(String),

    #[error("SP {method} {path}: {status} {body}")]
    Upstream {
        method: &'static str,
        path: String,
        status: u16,
        body: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read parameters for one list.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub select: Option<&'static str>,
    pub filter: Option<Filter>,
    pub order_by: Option<&'static str>,
}

impl ListQuery {
    pub fn new(select: &'static str) -> Self {
        ListQuery {
            select: Some(select),
            ..Default::default()
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn order_by(mut self, order_by: &'static str) -> Self {
        self.order_by = Some(order_by);
        self
    }
}

/// CRUD over named lists.
#[async_trait]
pub trait ListStore: Send + Sync {
    /// Every row matching `query`, across all pages.
    async fn get_all(&self, list: &str, query: &ListQuery) -> StoreResult<Vec<Row>>;

    /// Create a row and return it as stored.
    async fn create(&self, list: &str, row: Row) -> StoreResult<Row>;

    /// Overwrite the given fields of one row.
    async fn merge(&self, list: &str, id: u64, patch: Row) -> StoreResult<()>;

    async fn delete(&self, list: &str, id: u64) -> StoreResult<()>;

    /// Titles of the lists on the site (at most 50).
    async fn list_titles(&self) -> StoreResult<Vec<String>>;
}
