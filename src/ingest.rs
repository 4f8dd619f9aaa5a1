// Character ingestion: CSV import and store population.
//
// Source files need a `name` column and may carry a `description` column.
// Rows are cleaned the same way regardless of category: names are trimmed and
// single-character names dropped, blank descriptions fall back to the
// category default, and long descriptions are cut.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use serde::Deserialize;
use tracing::{info, warn};

use crate::db::models::{Category, Character};
use crate::db::traits::CharacterStore;

/// Longest description stored, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
struct CsvRow {
    name: Option<String>,
    description: Option<String>,
}

fn clean_row(row: CsvRow, category: Category) -> Option<Character> {
    let name = row.name?.trim().to_string();
    if name.chars().count() <= 1 {
        return None;
    }
    let description = match row.description.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() => d.chars().take(MAX_DESCRIPTION_CHARS).collect(),
        _ => category.default_description().to_string(),
    };
    Some(Character {
        name,
        description,
        category,
    })
}

/// Parse characters of one category from any CSV reader.
pub fn read_characters<R: Read>(reader: R, category: Category) -> Result<Vec<Character>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut characters = Vec::new();
    let mut skipped = 0usize;
    for (row_idx, result) in rdr.deserialize::<CsvRow>().enumerate() {
        match result {
            Ok(row) => match clean_row(row, category) {
                Some(c) => characters.push(c),
                None => skipped += 1,
            },
            Err(e) => {
                warn!(row = row_idx + 1, error = %e, "Skipping unreadable CSV row");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        info!(category = %category, skipped, "Dropped rows without a usable name");
    }
    Ok(characters)
}

/// Load characters of one category from a CSV file.
pub fn load_characters_csv(path: &Path, category: Category) -> Result<Vec<Character>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Could not open {} list at {}", category, path.display()))?;
    let characters = read_characters(file, category)?;
    info!(category = %category, count = characters.len(), path = %path.display(), "Loaded CSV");
    Ok(characters)
}

/// Replace the store's contents with `characters`.
///
/// When `num_samples` is smaller than the input, a random subset of that
/// size is stored instead. Ids are `{category}_{position}`.
pub async fn populate<R: Rng + ?Sized>(
    store: &dyn CharacterStore,
    characters: Vec<Character>,
    num_samples: Option<usize>,
    rng: &mut R,
) -> Result<usize> {
    let characters = match num_samples {
        Some(n) if n < characters.len() => {
            let picked = rand::seq::index::sample(rng, characters.len(), n).into_vec();
            picked.into_iter().map(|i| characters[i].clone()).collect()
        }
        _ => characters,
    };

    store.reset().await?;

    let documents: Vec<String> = characters.iter().map(Character::document).collect();
    let ids: Vec<String> = characters
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}_{}", c.category, i))
        .collect();

    let stored = store.add(&documents, &characters, &ids).await?;
    info!(stored, "Stored characters");
    Ok(stored)
}
