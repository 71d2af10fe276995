//! Notion module - queries the content database

mod client;
mod error;
pub mod types;

pub use client::NotionClient;
pub use error::NotionError;
pub use types::{PageObject, PropertyValue, QueryResult, RichText};

use async_trait::async_trait;

/// Source of published page records
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Published records, newest first, first result page only
    async fn fetch_published(&self) -> Result<Vec<QueryResult>, NotionError>;
}
