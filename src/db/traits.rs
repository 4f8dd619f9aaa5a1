// Character store trait: the explicit handle every command receives.
//
// The store is a single named collection of character documents with
// category metadata and nearest-neighbour text search. Implementors:
// SqliteStore (wraps rusqlite). Methods are async so a networked vector
// database can sit behind the same interface.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Category, Character, CharacterRecord, SearchHit};

#[async_trait]
pub trait CharacterStore: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables backing the store.
    async fn table_count(&self) -> Result<i64>;

    /// Drop the collection and recreate it empty.
    async fn reset(&self) -> Result<()>;

    // --- Reads ---

    /// Free-text description recorded for the collection, if any.
    async fn collection_description(&self) -> Result<Option<String>>;

    /// Total number of stored characters.
    async fn count(&self) -> Result<usize>;

    /// Number of stored characters in one category.
    async fn count_in(&self, category: Category) -> Result<usize>;

    /// Up to `limit` characters, optionally filtered by category, in insertion order.
    async fn get(&self, filter: Option<Category>, limit: usize) -> Result<Vec<CharacterRecord>>;

    /// The `top_n` characters most similar to `text`, most similar first.
    async fn query(
        &self,
        text: &str,
        top_n: usize,
        filter: Option<Category>,
    ) -> Result<Vec<SearchHit>>;

    // --- Writes ---

    /// Add documents with their metadata under the given ids.
    /// All three slices must be the same length. Returns the number stored.
    async fn add(
        &self,
        documents: &[String],
        metadatas: &[Character],
        ids: &[String],
    ) -> Result<usize>;
}
