// Database layer: the character collection behind the CharacterStore trait.
//
// We use rusqlite with the "bundled" feature so there's no system SQLite
// dependency. The database file lives wherever MYTHOSCIFI_DB_PATH points
// (defaults to ./mythoscifi.db).

pub mod models;
pub mod queries;
pub mod schema;
pub mod search;
pub mod sqlite;
pub mod traits;

pub use traits::CharacterStore;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

/// Open (or create) the database and run migrations.
///
/// Called by `mythoscifi init` and `mythoscifi populate`.
pub fn initialize_sqlite(db_path: &str) -> Result<Arc<dyn CharacterStore>> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for database: {}", db_path))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    schema::create_tables(&conn)?;

    Ok(Arc::new(sqlite::SqliteStore::new(conn)?))
}

/// Open an existing database (fails if it doesn't exist yet).
pub fn open_sqlite(db_path: &str) -> Result<Arc<dyn CharacterStore>> {
    if !Path::new(db_path).exists() {
        anyhow::bail!(
            "Database not found at {}. Run `mythoscifi init` and `mythoscifi populate` first.",
            db_path
        );
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;
    // Picks up migrations added since the file was created
    schema::create_tables(&conn)?;

    Ok(Arc::new(sqlite::SqliteStore::new(conn)?))
}

/// A fresh in-memory store, used by tests and dry runs.
pub fn open_in_memory() -> Result<Arc<dyn CharacterStore>> {
    let conn = Connection::open_in_memory()?;
    schema::create_tables(&conn)?;
    Ok(Arc::new(sqlite::SqliteStore::new(conn)?))
}
