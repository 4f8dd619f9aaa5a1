// Database schema: table creation and migrations.
//
// A `schema_version` table tracks which migrations have run, and each
// migration is a function that executes SQL statements.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Description recorded for the character collection.
pub const COLLECTION_DESCRIPTION: &str = "Fictional characters: Sci-fi robots and Greek mythology";

/// Create all tables if they don't exist yet.
///
/// This is idempotent and safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )
    .context("Failed to create schema_version table")?;

    create_collection(conn)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    // Migration v2: collection-level metadata (description)
    run_migration(conn, 2, |c| {
        c.execute_batch(
            "CREATE TABLE IF NOT EXISTS collection_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    })?;

    conn.execute(
        "INSERT OR IGNORE INTO collection_meta (key, value) VALUES ('description', ?1)",
        [COLLECTION_DESCRIPTION],
    )?;

    Ok(())
}

/// Create the character collection table and its indexes.
pub fn create_collection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- One row per stored character document.
        -- seq preserves insertion order for get() and similarity tie-breaks.
        CREATE TABLE IF NOT EXISTS characters (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,           -- e.g. 'mythology_12'
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,            -- 'robot' or 'mythology'
            document TEXT NOT NULL,            -- indexed search text
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_characters_category
            ON characters(category);

        CREATE INDEX IF NOT EXISTS idx_characters_name
            ON characters(name);
        ",
    )
    .context("Failed to create characters table")?;
    Ok(())
}

/// Drop the character collection and recreate it empty.
pub fn reset_collection(conn: &Connection) -> Result<()> {
    conn.execute_batch("DROP TABLE IF EXISTS characters;")
        .context("Failed to drop characters table")?;
    create_collection(conn)
}

/// Run a migration if it hasn't been applied yet.
/// The migration function receives the connection and should execute its SQL.
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();
    }

    #[test]
    fn test_table_count() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        // schema_version, characters, collection_meta
        assert_eq!(table_count(&conn).unwrap(), 3i64);
    }

    #[test]
    fn test_migrations_recorded_once() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();

        let versions: Vec<i64> = conn
            .prepare("SELECT version FROM schema_version ORDER BY version")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(versions, vec![1, 2]);
    }

    #[test]
    fn test_reset_collection_empties_characters() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn.execute(
            "INSERT INTO characters (id, name, description, category, document)
             VALUES ('robot_0', 'Robby', 'desc', 'robot', 'doc')",
            [],
        )
        .unwrap();

        reset_collection(&conn).unwrap();

        let n: i64 = conn
            .query_row("SELECT COUNT(*) FROM characters", [], |row| row.get(0))
            .unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn test_collection_description_recorded() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        let desc: String = conn
            .query_row(
                "SELECT value FROM collection_meta WHERE key = 'description'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(desc, COLLECTION_DESCRIPTION);
    }

    #[test]
    fn test_collection_meta_holds_only_description() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        let mut stmt = conn.prepare("SELECT key FROM collection_meta").unwrap();
        let keys: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(keys, vec!["description".to_string()]);
    }
}
