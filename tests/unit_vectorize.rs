// Unit tests for the vectorization core.
//
// Tests vocabulary selection (min_df, max_features, tie-breaks), count and
// TF-IDF matrix invariants, and cosine similarity edge cases, all through
// the public API.

use std::collections::{HashMap, HashSet};

use mythoscifi::vectorize::matrix::SparseMatrix;
use mythoscifi::vectorize::similarity::{cosine, cosine_from_weights, most_similar};
use mythoscifi::vectorize::tfidf::TfIdfMatrix;
use mythoscifi::vectorize::tokenize::NgramRange;
use mythoscifi::vectorize::vocabulary::{StopWords, Vectorizer, VectorizerParams};
use mythoscifi::vectorize::VectorizeError;

const GODS: [&str; 3] = [
    "Zeus god of thunder and sky",
    "Athena goddess of wisdom and war",
    "Ares god of war and thunder",
];

fn bigrams(min_token_len: usize, stop_words: StopWords) -> Vectorizer {
    Vectorizer::new(VectorizerParams {
        max_features: Some(20),
        ngram_range: NgramRange::exactly(2),
        min_df: 2,
        min_token_len,
        stop_words,
    })
    .unwrap()
}

fn unigrams(min_df: usize, max_features: Option<usize>) -> Vectorizer {
    Vectorizer::new(VectorizerParams {
        max_features,
        ngram_range: NgramRange::exactly(1),
        min_df,
        min_token_len: 3,
        stop_words: StopWords::None,
    })
    .unwrap()
}

fn norm(row: &[(usize, f64)]) -> f64 {
    row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
}

// ============================================================
// Vocabulary selection
// ============================================================

#[test]
fn shared_bigram_survives_min_df() {
    let (vocab, counts) = bigrams(2, StopWords::None).fit_transform(&GODS).unwrap();
    assert_eq!(vocab.terms(), &["god of".to_string()]);
    assert_eq!(counts.column_sums(), vec![2.0]);
}

#[test]
fn no_shared_bigram_gives_empty_vocabulary() {
    let (vocab, counts) = bigrams(3, StopWords::None).fit_transform(&GODS).unwrap();
    assert!(vocab.is_empty());
    assert_eq!(counts.shape(), (3, 0));
    assert_eq!(counts.sparsity(), 0.0);
}

#[test]
fn stop_words_removed_before_ngrams() {
    let docs = [
        "the storm god rules the sky",
        "a storm god of the sea",
        "storm god and thunder god",
    ];
    let stop: HashSet<String> = ["the", "and", "of"].iter().map(|s| s.to_string()).collect();
    let vocab = bigrams(3, StopWords::Custom(stop)).fit(&docs).unwrap();
    assert_eq!(vocab.terms(), &["storm god".to_string()]);
}

#[test]
fn empty_corpus_is_an_error() {
    let docs: [&str; 0] = [];
    assert_eq!(
        unigrams(1, None).fit(&docs),
        Err(VectorizeError::EmptyCorpus)
    );
}

#[test]
fn min_df_excludes_single_document_terms() {
    let docs = ["apple banana cherry", "apple banana", "apple durian"];
    let vocab = unigrams(2, None).fit(&docs).unwrap();
    assert_eq!(vocab.terms(), &["apple".to_string(), "banana".to_string()]);
    assert!(!vocab.contains("cherry"));
    assert!(!vocab.contains("durian"));
}

#[test]
fn max_features_ties_break_lexically() {
    let docs = ["gamma delta", "alpha beta", "gamma delta", "alpha beta"];
    let vocab = unigrams(1, Some(2)).fit(&docs).unwrap();
    assert_eq!(vocab.terms(), &["alpha".to_string(), "beta".to_string()]);
}

#[test]
fn max_features_keeps_highest_counts_then_sorts_columns() {
    let docs = ["zeta zeta zeta alpha", "zeta mu alpha", "mu"];
    let vocab = unigrams(1, Some(2)).fit(&docs).unwrap();
    // zeta=4, alpha=2, mu=2 → zeta plus the lexically first of the tie
    assert_eq!(vocab.terms(), &["alpha".to_string(), "zeta".to_string()]);
    assert_eq!(vocab.index_of("zeta"), Some(1));
}

#[test]
fn invalid_parameters_rejected() {
    let base = VectorizerParams::default();
    let bad = [
        VectorizerParams {
            min_df: 0,
            ..base.clone()
        },
        VectorizerParams {
            max_features: Some(0),
            ..base.clone()
        },
        VectorizerParams {
            ngram_range: NgramRange::new(3, 2),
            ..base.clone()
        },
    ];
    for params in bad {
        assert!(matches!(
            Vectorizer::new(params),
            Err(VectorizeError::InvalidParameter(_))
        ));
    }
}

#[test]
fn repeated_fits_agree() {
    let a = bigrams(2, StopWords::None).fit(&GODS).unwrap();
    let b = bigrams(2, StopWords::None).fit(&GODS).unwrap();
    assert_eq!(a, b);
}

// ============================================================
// Count and TF-IDF matrices
// ============================================================

#[test]
fn count_matrix_rows_follow_documents() {
    let docs = ["sun fire sun", "sun fire", "moon water", ""];
    let (vocab, counts) = unigrams(1, None).fit_transform(&docs).unwrap();
    assert_eq!(
        vocab.terms(),
        &["fire", "moon", "sun", "water"].map(String::from)
    );
    assert_eq!(counts.dense_row(0), vec![1.0, 0.0, 2.0, 0.0]);
    assert!(counts.row(3).unwrap().is_empty());
    assert_eq!(counts.nnz(), 6);
}

#[test]
fn transform_uses_fitted_vocabulary() {
    let v = unigrams(1, None);
    let vocab = v.fit(&["storm god"]).unwrap();
    let counts = v.transform(&vocab, &["storm storm sea", "nothing here"]);
    assert_eq!(counts.dense_row(0), vec![0.0, 2.0]);
    assert!(counts.row(1).unwrap().is_empty());
}

#[test]
fn tfidf_rows_have_unit_or_zero_norm() {
    let docs = ["sun fire sun", "sun fire", "moon water", ""];
    let (_, counts) = unigrams(1, None).fit_transform(&docs).unwrap();
    let tfidf = TfIdfMatrix::from_counts(&counts);
    for (i, row) in tfidf.matrix().rows().iter().enumerate() {
        let n = norm(row);
        if i == 3 {
            assert_eq!(n, 0.0);
        } else {
            assert!((n - 1.0).abs() < 1e-12, "row {i} has norm {n}");
        }
    }
    let half = 1.0 / 2f64.sqrt();
    let row1 = tfidf.matrix().row(1).unwrap();
    assert!((row1[0].1 - half).abs() < 1e-12);
    assert!((row1[1].1 - half).abs() < 1e-12);
}

#[test]
fn tfidf_idf_is_smoothed() {
    let docs = ["alpha beta", "alpha"];
    let (_, counts) = unigrams(1, None).fit_transform(&docs).unwrap();
    let tfidf = TfIdfMatrix::from_counts(&counts);
    // alpha in every document → idf exactly 1
    assert!((tfidf.idf()[0] - 1.0).abs() < 1e-12);
    assert!((tfidf.idf()[1] - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
}

// ============================================================
// Cosine similarity
// ============================================================

#[test]
fn cosine_matches_hand_computation() {
    let docs = ["sun fire sun", "sun fire", "moon water", ""];
    let (_, counts) = unigrams(1, None).fit_transform(&docs).unwrap();
    let sim = cosine(&counts.row_f64(0), &counts.row_f64(1));
    assert!((sim - 3.0 / 10f64.sqrt()).abs() < 1e-12);
}

#[test]
fn cosine_is_symmetric_and_self_one() {
    let a = vec![(0, 1.0), (2, 3.0)];
    let b = vec![(1, 2.0), (2, 1.0)];
    assert_eq!(cosine(&a, &b), cosine(&b, &a));
    assert!((cosine(&a, &a) - 1.0).abs() < 1e-12);
}

#[test]
fn cosine_zero_vector_is_zero_not_nan() {
    let zero: Vec<(usize, f64)> = Vec::new();
    let a = vec![(0, 1.0)];
    assert_eq!(cosine(&zero, &a), 0.0);
    assert_eq!(cosine(&zero, &zero), 0.0);
    assert_eq!(cosine_from_weights(&HashMap::new(), &HashMap::new()), 0.0);
}

#[test]
fn most_similar_excludes_self_and_breaks_ties_by_index() {
    let docs = ["sun fire sun", "sun fire", "moon water", ""];
    let (_, counts) = unigrams(1, None).fit_transform(&docs).unwrap();
    let ranked = most_similar(&counts, 0, 3);
    let order: Vec<usize> = ranked.iter().map(|(i, _)| *i).collect();
    assert_eq!(order, vec![1, 2, 3]);
    assert_eq!(ranked[1].1, 0.0);
    assert_eq!(ranked[2].1, 0.0);
}

#[test]
fn most_similar_out_of_range_row_is_empty() {
    let m: SparseMatrix<f64> = SparseMatrix::from_rows(vec![vec![(0, 1.0)]], 1);
    assert!(most_similar(&m, 5, 3).is_empty());
}
