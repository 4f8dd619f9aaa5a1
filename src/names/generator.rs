// NameGenerator: store-backed blend generation and ranking.
//
// Pipeline: sample names of both categories from the store, shuffle with the
// caller's RNG, pair index-wise, blend, keep the pronounceable results,
// dedupe by display name, score, attach semantic matches, rank.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use super::blend::{blend_names, BlendStyle};
use super::creativity::score_creativity;
use super::pronounce::is_pronounceable;
use crate::db::models::{Category, SearchHit};
use crate::db::traits::CharacterStore;

/// Source names outside this length range are never paired.
const MIN_SOURCE_LEN: usize = 3;
const MAX_SOURCE_LEN: usize = 20;
/// Semantic matches attached to each generated name.
const SEMANTIC_MATCHES: usize = 3;
/// Store hits consulted when marking query matches.
const QUERY_HITS: usize = 10;

/// A pronounceable blend with the pair it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlendCandidate {
    pub name: String,
    pub source_myth: String,
    pub source_robot: String,
}

/// A ranked, scored blend ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedName {
    pub name: String,
    pub source_myth: String,
    pub source_robot: String,
    pub creativity_score: f64,
    pub semantic_matches: Vec<SearchHit>,
    pub query_match: bool,
}

/// First character uppercased, the rest lowercased.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Blend each (myth, robot) pair and keep the pronounceable results.
pub fn collect_candidates(pairs: &[(String, String)], style: BlendStyle) -> Vec<BlendCandidate> {
    let in_range = |name: &str| (MIN_SOURCE_LEN..=MAX_SOURCE_LEN).contains(&name.chars().count());

    let mut candidates = Vec::new();
    for (myth, robot) in pairs {
        if !in_range(myth) || !in_range(robot) {
            continue;
        }
        for blend in blend_names(myth, robot, style) {
            if is_pronounceable(&blend) {
                candidates.push(BlendCandidate {
                    name: capitalize(&blend),
                    source_myth: myth.clone(),
                    source_robot: robot.clone(),
                });
            }
        }
    }
    candidates
}

/// One candidate per display name: position of its first occurrence, data of its last.
pub fn dedupe_by_name(candidates: Vec<BlendCandidate>) -> Vec<BlendCandidate> {
    let mut slot: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<BlendCandidate> = Vec::new();
    for candidate in candidates {
        match slot.get(&candidate.name) {
            Some(&i) => unique[i] = candidate,
            None => {
                slot.insert(candidate.name.clone(), unique.len());
                unique.push(candidate);
            }
        }
    }
    unique
}

/// Query matches first, then score descending. Equal keys keep their order.
pub fn rank(names: &mut [GeneratedName]) {
    names.sort_by(|a, b| {
        b.query_match.cmp(&a.query_match).then_with(|| {
            b.creativity_score
                .partial_cmp(&a.creativity_score)
                .unwrap_or(Ordering::Equal)
        })
    });
}

pub struct NameGenerator {
    store: Arc<dyn CharacterStore>,
    style: BlendStyle,
}

impl NameGenerator {
    pub fn new(store: Arc<dyn CharacterStore>) -> Self {
        Self {
            store,
            style: BlendStyle::default(),
        }
    }

    pub fn with_style(mut self, style: BlendStyle) -> Self {
        self.style = style;
        self
    }

    async fn sample_names(&self, category: Category, num_samples: usize) -> Result<Vec<String>> {
        Ok(self
            .store
            .get(Some(category), num_samples)
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    /// Generate up to `top_n` ranked names. With a query, blends built from
    /// a character among the store's top hits for it are marked and ranked first.
    pub async fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        query: Option<&str>,
        num_samples: usize,
        top_n: usize,
    ) -> Result<Vec<GeneratedName>> {
        let mut myths = self.sample_names(Category::Mythology, num_samples).await?;
        let mut robots = self.sample_names(Category::Robot, num_samples).await?;
        info!(
            mythology = myths.len(),
            robots = robots.len(),
            "Sampled source names"
        );

        myths.shuffle(rng);
        robots.shuffle(rng);
        let pairs: Vec<(String, String)> = myths.into_iter().zip(robots).collect();

        let candidates = collect_candidates(&pairs, self.style);
        let unique = dedupe_by_name(candidates);
        debug!(unique = unique.len(), "Pronounceable blends");

        let relevant: HashSet<String> = match query {
            Some(q) => self
                .store
                .query(q, QUERY_HITS, None)
                .await?
                .into_iter()
                .map(|hit| hit.name)
                .collect(),
            None => HashSet::new(),
        };

        let mut scored = Vec::with_capacity(unique.len());
        for candidate in unique {
            let creativity_score =
                score_creativity(&candidate.name, &candidate.source_myth, &candidate.source_robot);
            let semantic_matches = self
                .store
                .query(&candidate.name, SEMANTIC_MATCHES, None)
                .await?;
            let query_match = relevant.contains(&candidate.source_myth)
                || relevant.contains(&candidate.source_robot);
            scored.push(GeneratedName {
                name: candidate.name,
                source_myth: candidate.source_myth,
                source_robot: candidate.source_robot,
                creativity_score,
                semantic_matches,
                query_match,
            });
        }

        rank(&mut scored);
        scored.truncate(top_n);
        info!(returned = scored.len(), "Generated names");
        Ok(scored)
    }
}
