// Vocabulary selection and count-matrix construction.
//
// A vocabulary is fitted once per run from the corpus: n-grams seen in fewer
// than `min_df` documents are dropped, the rest are ranked by total corpus
// count (ties broken lexically) and cut to `max_features`. Columns are then
// numbered in lexical order, so two fits over the same corpus and parameters
// always agree on column order.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use super::error::{VectorizeError, VectorizeResult};
use super::matrix::{CountMatrix, SparseMatrix};
use super::tokenize::{english_stop_words, NgramRange, Tokenizer};

/// Which stop-word set the tokenizer removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopWords {
    English,
    None,
    Custom(HashSet<String>),
}

impl StopWords {
    fn resolve(&self) -> HashSet<String> {
        match self {
            StopWords::English => english_stop_words(),
            StopWords::None => HashSet::new(),
            StopWords::Custom(words) => words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorizerParams {
    /// Keep at most this many features; `None` keeps every term passing `min_df`.
    pub max_features: Option<usize>,
    pub ngram_range: NgramRange,
    /// Minimum number of distinct documents a term must appear in.
    pub min_df: usize,
    /// Shortest word the tokenizer keeps.
    pub min_token_len: usize,
    pub stop_words: StopWords,
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            max_features: Some(20),
            ngram_range: NgramRange::exactly(2),
            min_df: 2,
            min_token_len: 3,
            stop_words: StopWords::English,
        }
    }
}

impl VectorizerParams {
    pub fn validate(&self) -> VectorizeResult<()> {
        self.ngram_range.validate()?;
        if self.min_df == 0 {
            return Err(VectorizeError::InvalidParameter(
                "min_df must be at least 1".to_string(),
            ));
        }
        if self.max_features == Some(0) {
            return Err(VectorizeError::InvalidParameter(
                "max_features must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Ordered feature vocabulary: term ↔ column index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build from terms already in column order.
    fn from_sorted_terms(terms: Vec<String>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { terms, index }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, column: usize) -> Option<&str> {
        self.terms.get(column).map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }
}

/// Fits vocabularies and produces count matrices with one fixed analyzer.
#[derive(Debug, Clone)]
pub struct Vectorizer {
    params: VectorizerParams,
    tokenizer: Tokenizer,
}

impl Vectorizer {
    pub fn new(params: VectorizerParams) -> VectorizeResult<Self> {
        params.validate()?;
        let tokenizer = Tokenizer::new(params.min_token_len, params.stop_words.resolve())?;
        Ok(Self { params, tokenizer })
    }

    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Select the vocabulary from `docs`.
    pub fn fit<S: AsRef<str>>(&self, docs: &[S]) -> VectorizeResult<Vocabulary> {
        let counts = self.count_terms(docs)?;
        Ok(self.select_vocabulary(&counts))
    }

    /// Count vocabulary terms per document. Documents with no matching term
    /// produce an empty row.
    pub fn transform<S: AsRef<str>>(&self, vocabulary: &Vocabulary, docs: &[S]) -> CountMatrix {
        let counts: Vec<HashMap<String, u32>> = docs
            .iter()
            .map(|d| self.term_counts(d.as_ref()))
            .collect();
        build_rows(vocabulary, &counts)
    }

    /// `fit` then `transform` over the same documents, analyzing each once.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        docs: &[S],
    ) -> VectorizeResult<(Vocabulary, CountMatrix)> {
        let counts = self.count_terms(docs)?;
        let vocabulary = self.select_vocabulary(&counts);
        let matrix = build_rows(&vocabulary, &counts);
        Ok((vocabulary, matrix))
    }

    fn term_counts(&self, doc: &str) -> HashMap<String, u32> {
        let mut counts = HashMap::new();
        for gram in self.tokenizer.analyze(doc, self.params.ngram_range) {
            *counts.entry(gram).or_insert(0) += 1;
        }
        counts
    }

    fn count_terms<S: AsRef<str>>(&self, docs: &[S]) -> VectorizeResult<Vec<HashMap<String, u32>>> {
        if docs.is_empty() {
            return Err(VectorizeError::EmptyCorpus);
        }
        Ok(docs.iter().map(|d| self.term_counts(d.as_ref())).collect())
    }

    fn select_vocabulary(&self, per_doc: &[HashMap<String, u32>]) -> Vocabulary {
        // term -> (document frequency, total count)
        let mut stats: HashMap<&str, (usize, u64)> = HashMap::new();
        for counts in per_doc {
            for (term, &n) in counts {
                let entry = stats.entry(term.as_str()).or_insert((0, 0));
                entry.0 += 1;
                entry.1 += n as u64;
            }
        }

        let candidate_count = stats.len();
        let mut kept: Vec<(&str, u64)> = stats
            .into_iter()
            .filter(|(_, (df, _))| *df >= self.params.min_df)
            .map(|(term, (_, total))| (term, total))
            .collect();

        if let Some(limit) = self.params.max_features {
            kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            kept.truncate(limit);
        }

        let mut terms: Vec<String> = kept.into_iter().map(|(t, _)| t.to_string()).collect();
        terms.sort();

        debug!(
            candidates = candidate_count,
            kept = terms.len(),
            min_df = self.params.min_df,
            "Selected vocabulary"
        );

        Vocabulary::from_sorted_terms(terms)
    }
}

fn build_rows(vocabulary: &Vocabulary, per_doc: &[HashMap<String, u32>]) -> CountMatrix {
    let rows = per_doc
        .iter()
        .map(|counts| {
            let row: BTreeMap<usize, u32> = counts
                .iter()
                .filter_map(|(term, &n)| vocabulary.index_of(term).map(|c| (c, n)))
                .collect();
            row.into_iter().collect()
        })
        .collect();
    SparseMatrix::from_rows(rows, vocabulary.len())
}
