// CSV export of a document-term matrix.
//
// Layout: the header row is an empty cell followed by the vocabulary terms;
// each following row is a character name followed by that character's
// weights, for the first `rows` characters in load order.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::vectorize::analyzer::{CharacterAnalyzer, MatrixKind};

/// Write the chosen matrix to `path`. Returns (rows, columns) written,
/// not counting the header row and name column.
pub fn write_matrix_csv(
    path: &Path,
    analyzer: &CharacterAnalyzer,
    kind: MatrixKind,
    rows: usize,
) -> Result<(usize, usize)> {
    let vocabulary = analyzer.vocabulary(kind)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
        }
    }

    let mut writer = ::csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header = Vec::with_capacity(vocabulary.len() + 1);
    header.push(String::new());
    header.extend(vocabulary.terms().iter().cloned());
    writer.write_record(&header)?;

    let characters = analyzer.characters();
    let written = rows.min(characters.len());
    for (i, character) in characters.iter().take(written).enumerate() {
        let mut record = Vec::with_capacity(vocabulary.len() + 1);
        record.push(character.name.clone());
        record.extend(analyzer.dense_row(kind, i)?.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = written, cols = vocabulary.len(), kind = %kind, "Saved matrix CSV");
    Ok((written, vocabulary.len()))
}
