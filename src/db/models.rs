// Data models: the character records that flow between the store, the
// vectorizer and the name generator. Kept apart from the queries so other
// modules can use them without depending on rusqlite directly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of character categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Robot,
    Mythology,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Robot, Category::Mythology];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Robot => "robot",
            Category::Mythology => "mythology",
        }
    }

    /// Description used when a source row has none.
    pub fn default_description(&self) -> &'static str {
        match self {
            Category::Robot => "Fictional robot",
            Category::Mythology => "Greek mythology character",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "robot" => Ok(Category::Robot),
            "mythology" => Ok(Category::Mythology),
            other => anyhow::bail!("Unknown category '{other}' (expected robot or mythology)"),
        }
    }
}

/// A character as ingested: the metadata stored next to each document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub description: String,
    pub category: Category,
}

impl Character {
    /// The text that gets indexed for similarity search.
    pub fn document(&self) -> String {
        format!(
            "Name: {}\nCategory: {}\nDescription: {}",
            self.name, self.category, self.description
        )
    }
}

/// A character as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
}

/// One hit from a similarity query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub name: String,
    pub category: Category,
    pub description: String,
    /// 1 − distance
    pub similarity: f64,
    pub distance: f64,
}
