// Text similarity search over stored character documents.
//
// Query text and each document are reduced to unigram term counts with the
// same tokenizer; hits are ranked by cosine similarity, ties keeping
// insertion order. Distance is reported as 1 − similarity.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::models::{Category, CharacterRecord, SearchHit};
use crate::vectorize::similarity::cosine_from_weights;
use crate::vectorize::tokenize::Tokenizer;

/// Split an optional `robot:` / `mythology:` prefix off a search string.
pub fn parse_query_prefix(input: &str) -> (Option<Category>, &str) {
    let trimmed = input.trim();
    for category in Category::ALL {
        let prefix = format!("{}:", category.as_str());
        if let Some(head) = trimmed.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(&prefix) {
                return (Some(category), trimmed[prefix.len()..].trim());
            }
        }
    }
    (None, trimmed)
}

/// Term → count map for one piece of text.
pub fn term_weights(tokenizer: &Tokenizer, text: &str) -> HashMap<String, f64> {
    let mut weights = HashMap::new();
    for token in tokenizer.tokens(text) {
        *weights.entry(token).or_insert(0.0) += 1.0;
    }
    weights
}

/// Rank `documents` against `query` and keep the best `top_n`.
pub fn rank_documents(
    tokenizer: &Tokenizer,
    query: &str,
    documents: Vec<(CharacterRecord, String)>,
    top_n: usize,
) -> Vec<SearchHit> {
    let query_weights = term_weights(tokenizer, query);

    let mut scored: Vec<(usize, f64, CharacterRecord)> = documents
        .into_iter()
        .enumerate()
        .map(|(i, (record, doc))| {
            let sim = cosine_from_weights(&query_weights, &term_weights(tokenizer, &doc));
            (i, sim, record)
        })
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    scored
        .into_iter()
        .take(top_n)
        .map(|(_, similarity, record)| SearchHit {
            name: record.name,
            category: record.category,
            description: record.description,
            similarity,
            distance: 1.0 - similarity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Character;

    fn doc(name: &str, description: &str, category: Category) -> (CharacterRecord, String) {
        let c = Character {
            name: name.to_string(),
            description: description.to_string(),
            category,
        };
        let text = c.document();
        (
            CharacterRecord {
                id: format!("{category}_{name}"),
                name: c.name,
                description: c.description,
                category,
            },
            text,
        )
    }

    #[test]
    fn test_query_prefix() {
        assert_eq!(
            parse_query_prefix("robot: helpful android"),
            (Some(Category::Robot), "helpful android")
        );
        assert_eq!(
            parse_query_prefix("Mythology:god of war"),
            (Some(Category::Mythology), "god of war")
        );
        assert_eq!(parse_query_prefix("  sea god "), (None, "sea god"));
    }

    #[test]
    fn test_best_match_first() {
        let tokenizer = Tokenizer::english(3).unwrap();
        let docs = vec![
            doc("Athena", "goddess of wisdom", Category::Mythology),
            doc("Zeus", "god of thunder and lightning", Category::Mythology),
        ];
        let hits = rank_documents(&tokenizer, "thunder lightning", docs, 2);
        assert_eq!(hits[0].name, "Zeus");
        assert!(hits[0].similarity > hits[1].similarity);
        assert!((hits[0].similarity + hits[0].distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let tokenizer = Tokenizer::english(3).unwrap();
        let docs = vec![
            doc("Alpha", "unrelated", Category::Robot),
            doc("Beta", "unrelated", Category::Robot),
        ];
        let hits = rank_documents(&tokenizer, "zzzz", docs, 5);
        assert_eq!(hits[0].name, "Alpha");
        assert_eq!(hits[1].name, "Beta");
        assert_eq!(hits[0].similarity, 0.0);
    }

    #[test]
    fn test_top_n_truncates() {
        let tokenizer = Tokenizer::english(3).unwrap();
        let docs = vec![
            doc("Alpha", "one", Category::Robot),
            doc("Beta", "two", Category::Robot),
            doc("Gamma", "three", Category::Robot),
        ];
        assert_eq!(rank_documents(&tokenizer, "robot", docs, 2).len(), 2);
    }
}
