// SqliteStore: rusqlite backend implementing the CharacterStore trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// Search ranking happens after the lock is released.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;
use tracing::debug;

use super::models::{Category, Character, CharacterRecord, SearchHit};
use super::traits::CharacterStore;
use super::{queries, schema, search};
use crate::vectorize::tokenize::Tokenizer;

/// Shortest word indexed for search.
const SEARCH_MIN_TOKEN_LEN: usize = 3;

pub struct SqliteStore {
    conn: Mutex<Connection>,
    tokenizer: Tokenizer,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection whose tables exist.
    pub fn new(conn: Connection) -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(conn),
            tokenizer: Tokenizer::english(SEARCH_MIN_TOKEN_LEN)?,
        })
    }
}

#[async_trait]
impl CharacterStore for SqliteStore {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        schema::table_count(&conn)
    }

    async fn reset(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        schema::reset_collection(&conn)
    }

    async fn collection_description(&self) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        queries::get_meta(&conn, "description")
    }

    async fn count(&self) -> Result<usize> {
        let conn = self.conn.lock().await;
        queries::count_characters(&conn, None)
    }

    async fn count_in(&self, category: Category) -> Result<usize> {
        let conn = self.conn.lock().await;
        queries::count_characters(&conn, Some(category))
    }

    async fn get(&self, filter: Option<Category>, limit: usize) -> Result<Vec<CharacterRecord>> {
        let conn = self.conn.lock().await;
        queries::get_characters(&conn, filter, limit)
    }

    async fn query(
        &self,
        text: &str,
        top_n: usize,
        filter: Option<Category>,
    ) -> Result<Vec<SearchHit>> {
        let documents = {
            let conn = self.conn.lock().await;
            queries::get_documents(&conn, filter)?
        };
        debug!(candidates = documents.len(), top_n, "Ranking documents for query");
        Ok(search::rank_documents(&self.tokenizer, text, documents, top_n))
    }

    async fn add(
        &self,
        documents: &[String],
        metadatas: &[Character],
        ids: &[String],
    ) -> Result<usize> {
        let conn = self.conn.lock().await;
        queries::insert_characters(&conn, documents, metadatas, ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;

    async fn test_store() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        SqliteStore::new(conn).unwrap()
    }

    async fn seed(store: &SqliteStore, chars: Vec<Character>) {
        let docs: Vec<String> = chars.iter().map(Character::document).collect();
        let ids: Vec<String> = chars
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}_{i}", c.category))
            .collect();
        store.add(&docs, &chars, &ids).await.unwrap();
    }

    fn character(name: &str, description: &str, category: Category) -> Character {
        Character {
            name: name.to_string(),
            description: description.to_string(),
            category,
        }
    }

    #[tokio::test]
    async fn test_trait_add_get_count() {
        let store = test_store().await;
        assert_eq!(store.count().await.unwrap(), 0);
        seed(
            &store,
            vec![
                character("Zeus", "god of the sky", Category::Mythology),
                character("Bender", "bending unit", Category::Robot),
            ],
        )
        .await;
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(store.count_in(Category::Robot).await.unwrap(), 1);
        let robots = store.get(Some(Category::Robot), 10).await.unwrap();
        assert_eq!(robots[0].name, "Bender");
        assert_eq!(robots[0].id, "robot_1");
    }

    #[tokio::test]
    async fn test_trait_query_with_filter() {
        let store = test_store().await;
        seed(
            &store,
            vec![
                character("Zeus", "god of thunder", Category::Mythology),
                character("Thunderbot", "thunder machine", Category::Robot),
            ],
        )
        .await;
        let hits = store
            .query("thunder", 5, Some(Category::Mythology))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Zeus");
    }

    #[tokio::test]
    async fn test_trait_reset() {
        let store = test_store().await;
        seed(
            &store,
            vec![character("Zeus", "god", Category::Mythology)],
        )
        .await;
        store.reset().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        // ids are free again after a reset
        seed(
            &store,
            vec![character("Hera", "goddess", Category::Mythology)],
        )
        .await;
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
