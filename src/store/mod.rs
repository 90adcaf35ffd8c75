pub mod sqlite;

use crate::app::Result;
use crate::domain::Document;

pub use sqlite::SqliteStore;

/// Destination for extracted documents.
pub trait DocumentSink: Send + Sync {
    /// Persists `docs` grouped by collection, skipping ids already stored.
    /// Returns how many documents were newly inserted.
    fn insert_documents(&self, docs: &[Document]) -> Result<usize>;
}

pub trait Store: DocumentSink {
    fn get_document(&self, id: &str) -> Result<Option<Document>>;
    fn list_collection(&self, collection: &str) -> Result<Vec<Document>>;
    fn count_in_collection(&self, collection: &str) -> Result<i64>;
    /// `(collection, count)` pairs, sorted by collection name.
    fn collection_counts(&self) -> Result<Vec<(String, i64)>>;
}
