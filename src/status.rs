// Store status display: file size, collection description, category counts.

use anyhow::Result;
use std::path::Path;

use crate::db::models::Category;
use crate::db::CharacterStore;

/// Character totals, overall and per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub total: usize,
    pub robots: usize,
    pub mythology: usize,
}

pub async fn collect_stats(store: &dyn CharacterStore) -> Result<StoreStats> {
    Ok(StoreStats {
        total: store.count().await?,
        robots: store.count_in(Category::Robot).await?,
        mythology: store.count_in(Category::Mythology).await?,
    })
}

/// Display store status to the terminal.
pub async fn show(store: &dyn CharacterStore, db_display_path: &str) -> Result<()> {
    let file_size = std::fs::metadata(Path::new(db_display_path))
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_display_path, file_size);

    if let Some(description) = store.collection_description().await? {
        println!("Collection: {}", description);
    }

    let stats = collect_stats(store).await?;
    if stats.total == 0 {
        println!("Characters: none stored yet");
        println!("  Run `mythoscifi populate` to load character lists");
        return Ok(());
    }

    println!("Characters: {} total", stats.total);
    println!("  - Robots: {}", stats.robots);
    println!("  - Mythology: {}", stats.mythology);
    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
