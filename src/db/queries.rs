// Database queries: CRUD operations for the character collection.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Category, Character, CharacterRecord};

type RawRow = (String, String, String, String);

fn into_record((id, name, description, category): RawRow) -> Result<CharacterRecord> {
    let category: Category = category
        .parse()
        .with_context(|| format!("Bad category stored for character {id}"))?;
    Ok(CharacterRecord {
        id,
        name,
        description,
        category,
    })
}

// --- Characters ---

/// Insert documents with their metadata inside one transaction.
pub fn insert_characters(
    conn: &Connection,
    documents: &[String],
    metadatas: &[Character],
    ids: &[String],
) -> Result<usize> {
    if documents.len() != metadatas.len() || documents.len() != ids.len() {
        anyhow::bail!(
            "add() needs matching lengths: {} documents, {} metadatas, {} ids",
            documents.len(),
            metadatas.len(),
            ids.len()
        );
    }

    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO characters (id, name, description, category, document)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for ((doc, meta), id) in documents.iter().zip(metadatas).zip(ids) {
            stmt.execute(params![
                id,
                meta.name,
                meta.description,
                meta.category.as_str(),
                doc
            ])
            .with_context(|| format!("Failed to insert character {id}"))?;
        }
    }
    tx.commit()?;
    Ok(documents.len())
}

/// Up to `limit` characters in insertion order, optionally filtered by category.
pub fn get_characters(
    conn: &Connection,
    filter: Option<Category>,
    limit: usize,
) -> Result<Vec<CharacterRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, category FROM characters
         WHERE (?1 IS NULL OR category = ?1)
         ORDER BY seq
         LIMIT ?2",
    )?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = stmt
        .query_map(params![filter.map(|c| c.as_str()), limit], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?
        .collect::<rusqlite::Result<Vec<RawRow>>>()?;

    rows.into_iter().map(into_record).collect()
}

/// Every character with its indexed document text, in insertion order.
pub fn get_documents(
    conn: &Connection,
    filter: Option<Category>,
) -> Result<Vec<(CharacterRecord, String)>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, category, document FROM characters
         WHERE (?1 IS NULL OR category = ?1)
         ORDER BY seq",
    )?;
    let rows = stmt
        .query_map(params![filter.map(|c| c.as_str())], |row| {
            Ok((
                (row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?),
                row.get::<_, String>(4)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<(RawRow, String)>>>()?;

    rows.into_iter()
        .map(|(raw, doc)| Ok((into_record(raw)?, doc)))
        .collect()
}

/// Count characters, optionally in one category.
pub fn count_characters(conn: &Connection, filter: Option<Category>) -> Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM characters WHERE (?1 IS NULL OR category = ?1)",
        params![filter.map(|c| c.as_str())],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

// --- Collection metadata ---

pub fn get_meta(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM collection_meta WHERE key = ?1")?;
    let result = stmt.query_row(params![key], |row| row.get(0)).optional()?;
    Ok(result)
}
