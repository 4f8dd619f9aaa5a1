// CharacterAnalyzer: n-gram analysis over one category of stored characters.
//
// The analyzer owns the loaded characters plus whichever matrices have been
// built so far. Every query that needs a matrix checks for it first and
// returns NotInitialized instead of building one implicitly. Character
// lookups are by exact name; the first character with that name wins.

use std::fmt;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use super::error::{VectorizeError, VectorizeResult};
use super::matrix::{CountMatrix, SparseRow};
use super::similarity::{most_similar, top_columns, top_indices};
use super::tfidf::TfIdfMatrix;
use super::vocabulary::{Vectorizer, VectorizerParams, Vocabulary};
use crate::db::models::{Category, CharacterRecord};
use crate::db::traits::CharacterStore;

/// Most characters `load` pulls from the store.
pub const LOAD_LIMIT: usize = 10_000;

/// Description prefix kept in a `CharacterAnalysis`.
const ANALYSIS_DESCRIPTION_CHARS: usize = 200;
const ANALYSIS_TOP_N: usize = 5;
const COMPARE_TOP_N: usize = 10;

/// Which weighting a query reads from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum MatrixKind {
    #[default]
    Count,
    #[value(name = "tfidf")]
    TfIdf,
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixKind::Count => f.write_str("count"),
            MatrixKind::TfIdf => f.write_str("tfidf"),
        }
    }
}

/// Per-character summary: top terms and nearest neighbours by count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterAnalysis {
    pub name: String,
    pub description: String,
    pub top_terms: Vec<(String, f64)>,
    pub similar: Vec<(String, f64)>,
}

/// Side-by-side top terms for one character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermComparison {
    pub name: String,
    pub count_terms: Vec<(String, f64)>,
    pub tfidf_terms: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixStats {
    pub kind: MatrixKind,
    pub documents: usize,
    pub features: usize,
    pub non_zero: usize,
    pub sparsity: f64,
}

pub struct CharacterAnalyzer {
    characters: Vec<CharacterRecord>,
    counts: Option<(Vocabulary, CountMatrix)>,
    tfidf: Option<(Vocabulary, TfIdfMatrix)>,
}

impl CharacterAnalyzer {
    pub fn new(characters: Vec<CharacterRecord>) -> Self {
        Self {
            characters,
            counts: None,
            tfidf: None,
        }
    }

    /// Fetch the characters of one category from the store.
    pub async fn load(store: &dyn CharacterStore, category: Category) -> Result<Self> {
        let characters = store.get(Some(category), LOAD_LIMIT).await?;
        info!(category = %category, count = characters.len(), "Loaded characters");
        Ok(Self::new(characters))
    }

    pub fn characters(&self) -> &[CharacterRecord] {
        &self.characters
    }

    fn descriptions(&self) -> Vec<&str> {
        self.characters
            .iter()
            .map(|c| c.description.as_str())
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.characters.iter().position(|c| c.name == name)
    }

    /// Fit a vocabulary on the descriptions and count it.
    pub fn build_count_matrix(&mut self, params: VectorizerParams) -> VectorizeResult<()> {
        let vectorizer = Vectorizer::new(params)?;
        let (vocabulary, matrix) = vectorizer.fit_transform(&self.descriptions())?;
        let (rows, cols) = matrix.shape();
        info!(rows, cols, sparsity = matrix.sparsity(), "Built count matrix");
        self.counts = Some((vocabulary, matrix));
        Ok(())
    }

    /// Fit a separate vocabulary and weight it by TF-IDF.
    pub fn build_tfidf_matrix(&mut self, params: VectorizerParams) -> VectorizeResult<()> {
        let vectorizer = Vectorizer::new(params)?;
        let (vocabulary, counts) = vectorizer.fit_transform(&self.descriptions())?;
        let tfidf = TfIdfMatrix::from_counts(&counts);
        let (rows, cols) = tfidf.matrix().shape();
        info!(rows, cols, "Built TF-IDF matrix");
        self.tfidf = Some((vocabulary, tfidf));
        Ok(())
    }

    pub fn count_matrix(&self) -> VectorizeResult<(&Vocabulary, &CountMatrix)> {
        self.counts
            .as_ref()
            .map(|(v, m)| (v, m))
            .ok_or(VectorizeError::NotInitialized("count matrix"))
    }

    pub fn tfidf_matrix(&self) -> VectorizeResult<(&Vocabulary, &TfIdfMatrix)> {
        self.tfidf
            .as_ref()
            .map(|(v, m)| (v, m))
            .ok_or(VectorizeError::NotInitialized("TF-IDF matrix"))
    }

    pub fn vocabulary(&self, kind: MatrixKind) -> VectorizeResult<&Vocabulary> {
        match kind {
            MatrixKind::Count => self.count_matrix().map(|(v, _)| v),
            MatrixKind::TfIdf => self.tfidf_matrix().map(|(v, _)| v),
        }
    }

    /// Row `i` of the chosen matrix as dense f64 values.
    pub fn dense_row(&self, kind: MatrixKind, i: usize) -> VectorizeResult<Vec<f64>> {
        Ok(match kind {
            MatrixKind::Count => self.count_matrix()?.1.dense_row(i),
            MatrixKind::TfIdf => self.tfidf_matrix()?.1.matrix().dense_row(i),
        })
    }

    fn sparse_row(&self, kind: MatrixKind, i: usize) -> VectorizeResult<SparseRow<f64>> {
        Ok(match kind {
            MatrixKind::Count => self.count_matrix()?.1.row_f64(i),
            MatrixKind::TfIdf => self.tfidf_matrix()?.1.matrix().row_f64(i),
        })
    }

    fn column_sums(&self, kind: MatrixKind) -> VectorizeResult<Vec<f64>> {
        Ok(match kind {
            MatrixKind::Count => self.count_matrix()?.1.column_sums(),
            MatrixKind::TfIdf => self.tfidf_matrix()?.1.matrix().column_sums(),
        })
    }

    fn label(vocabulary: &Vocabulary, cells: Vec<(usize, f64)>) -> Vec<(String, f64)> {
        cells
            .into_iter()
            .filter_map(|(col, v)| vocabulary.term(col).map(|t| (t.to_string(), v)))
            .collect()
    }

    /// Highest total-count terms across the whole corpus.
    pub fn most_common_terms(&self, top_n: usize) -> VectorizeResult<Vec<(String, u64)>> {
        let (vocabulary, matrix) = self.count_matrix()?;
        let sums = matrix.column_sums();
        Ok(top_indices(&sums, top_n)
            .into_iter()
            .filter_map(|col| {
                vocabulary
                    .term(col)
                    .map(|t| (t.to_string(), sums[col].round() as u64))
            })
            .collect())
    }

    /// Column totals of the chosen matrix, largest first.
    pub fn feature_totals(
        &self,
        kind: MatrixKind,
        top_n: usize,
    ) -> VectorizeResult<Vec<(String, f64)>> {
        let vocabulary = self.vocabulary(kind)?;
        let sums = self.column_sums(kind)?;
        let cells = top_indices(&sums, top_n)
            .into_iter()
            .map(|col| (col, sums[col]))
            .collect();
        Ok(Self::label(vocabulary, cells))
    }

    /// Non-zero top terms for one character. Unknown name → empty.
    pub fn top_terms_for(
        &self,
        name: &str,
        kind: MatrixKind,
        top_n: usize,
    ) -> VectorizeResult<Vec<(String, f64)>> {
        let vocabulary = self.vocabulary(kind)?;
        let Some(i) = self.position(name) else {
            return Ok(Vec::new());
        };
        let row = self.sparse_row(kind, i)?;
        Ok(Self::label(vocabulary, top_columns(&row, top_n)))
    }

    /// Characters with the most similar rows, excluding the character itself.
    pub fn find_similar(
        &self,
        name: &str,
        kind: MatrixKind,
        top_n: usize,
    ) -> VectorizeResult<Vec<(String, f64)>> {
        let scored = match kind {
            MatrixKind::Count => {
                let (_, matrix) = self.count_matrix()?;
                self.position(name)
                    .map(|i| most_similar(matrix, i, top_n))
            }
            MatrixKind::TfIdf => {
                let (_, tfidf) = self.tfidf_matrix()?;
                self.position(name)
                    .map(|i| most_similar(tfidf.matrix(), i, top_n))
            }
        };
        Ok(scored
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(i, sim)| self.characters.get(i).map(|c| (c.name.clone(), sim)))
            .collect())
    }

    /// Description, top terms and neighbours from the count matrix.
    pub fn analyze(&self, name: &str) -> VectorizeResult<Option<CharacterAnalysis>> {
        self.count_matrix()?;
        let Some(i) = self.position(name) else {
            return Ok(None);
        };
        let description = self.characters[i]
            .description
            .chars()
            .take(ANALYSIS_DESCRIPTION_CHARS)
            .collect();
        Ok(Some(CharacterAnalysis {
            name: name.to_string(),
            description,
            top_terms: self.top_terms_for(name, MatrixKind::Count, ANALYSIS_TOP_N)?,
            similar: self.find_similar(name, MatrixKind::Count, ANALYSIS_TOP_N)?,
        }))
    }

    /// Top terms of one character under both weightings.
    pub fn compare_count_vs_tfidf(&self, name: &str) -> VectorizeResult<Option<TermComparison>> {
        self.count_matrix()?;
        self.tfidf_matrix()?;
        if self.position(name).is_none() {
            return Ok(None);
        }
        Ok(Some(TermComparison {
            name: name.to_string(),
            count_terms: self.top_terms_for(name, MatrixKind::Count, COMPARE_TOP_N)?,
            tfidf_terms: self.top_terms_for(name, MatrixKind::TfIdf, COMPARE_TOP_N)?,
        }))
    }

    /// Shape and sparsity of every matrix built so far.
    pub fn matrix_stats(&self) -> Vec<MatrixStats> {
        let mut stats = Vec::new();
        if let Some((_, m)) = &self.counts {
            stats.push(MatrixStats {
                kind: MatrixKind::Count,
                documents: m.n_rows(),
                features: m.n_cols(),
                non_zero: m.nnz(),
                sparsity: m.sparsity(),
            });
        }
        if let Some((_, t)) = &self.tfidf {
            let m = t.matrix();
            stats.push(MatrixStats {
                kind: MatrixKind::TfIdf,
                documents: m.n_rows(),
                features: m.n_cols(),
                non_zero: m.nnz(),
                sparsity: m.sparsity(),
            });
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorize::tokenize::NgramRange;
    use crate::vectorize::vocabulary::StopWords;

    fn record(name: &str, description: &str) -> CharacterRecord {
        CharacterRecord {
            id: format!("mythology_{name}"),
            name: name.to_string(),
            description: description.to_string(),
            category: Category::Mythology,
        }
    }

    fn unigram_params() -> VectorizerParams {
        VectorizerParams {
            max_features: None,
            ngram_range: NgramRange::exactly(1),
            min_df: 1,
            min_token_len: 3,
            stop_words: StopWords::None,
        }
    }

    fn analyzer() -> CharacterAnalyzer {
        CharacterAnalyzer::new(vec![
            record("Helios", "sun fire sun"),
            record("Hephaestus", "sun fire"),
            record("Selene", "moon water"),
            record("Chaos", ""),
        ])
    }

    #[test]
    fn test_queries_need_a_matrix() {
        let a = analyzer();
        assert_eq!(
            a.most_common_terms(3),
            Err(VectorizeError::NotInitialized("count matrix"))
        );
        assert!(a.analyze("Helios").is_err());
        assert!(a.find_similar("Helios", MatrixKind::TfIdf, 3).is_err());
    }

    #[test]
    fn test_empty_character_list_is_empty_corpus() {
        let mut a = CharacterAnalyzer::new(Vec::new());
        assert_eq!(
            a.build_count_matrix(unigram_params()),
            Err(VectorizeError::EmptyCorpus)
        );
    }

    #[test]
    fn test_most_common_terms() {
        let mut a = analyzer();
        a.build_count_matrix(unigram_params()).unwrap();
        let top = a.most_common_terms(2).unwrap();
        assert_eq!(
            top,
            vec![("sun".to_string(), 3), ("fire".to_string(), 2)]
        );
    }

    #[test]
    fn test_find_similar_excludes_self() {
        let mut a = analyzer();
        a.build_count_matrix(unigram_params()).unwrap();
        let similar = a.find_similar("Helios", MatrixKind::Count, 3).unwrap();
        let names: Vec<&str> = similar.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Hephaestus", "Selene", "Chaos"]);
        assert!((similar[0].1 - 3.0 / 10f64.sqrt()).abs() < 1e-12);
        assert_eq!(similar[1].1, 0.0);
    }

    #[test]
    fn test_unknown_name_is_empty_not_error() {
        let mut a = analyzer();
        a.build_count_matrix(unigram_params()).unwrap();
        assert!(a.top_terms_for("Kronos", MatrixKind::Count, 5).unwrap().is_empty());
        assert!(a.find_similar("Kronos", MatrixKind::Count, 5).unwrap().is_empty());
        assert_eq!(a.analyze("Kronos").unwrap(), None);
    }

    #[test]
    fn test_analyze_truncates_description() {
        let long = "sun ".repeat(100);
        let mut a = CharacterAnalyzer::new(vec![record("Helios", &long), record("Eos", "sun")]);
        a.build_count_matrix(unigram_params()).unwrap();
        let analysis = a.analyze("Helios").unwrap().unwrap();
        assert_eq!(analysis.description.chars().count(), 200);
        assert_eq!(analysis.top_terms[0].0, "sun");
        assert_eq!(analysis.similar[0].0, "Eos");
    }

    #[test]
    fn test_compare_needs_both_matrices() {
        let mut a = analyzer();
        a.build_count_matrix(unigram_params()).unwrap();
        assert_eq!(
            a.compare_count_vs_tfidf("Helios"),
            Err(VectorizeError::NotInitialized("TF-IDF matrix"))
        );
        a.build_tfidf_matrix(unigram_params()).unwrap();
        let cmp = a.compare_count_vs_tfidf("Helios").unwrap().unwrap();
        assert_eq!(cmp.count_terms[0], ("sun".to_string(), 2.0));
        assert_eq!(cmp.tfidf_terms[0].0, "sun");
    }

    #[test]
    fn test_empty_description_has_no_terms() {
        let mut a = analyzer();
        a.build_tfidf_matrix(unigram_params()).unwrap();
        assert!(a.top_terms_for("Chaos", MatrixKind::TfIdf, 5).unwrap().is_empty());
    }

    #[test]
    fn test_matrix_stats_lists_built_matrices() {
        let mut a = analyzer();
        assert!(a.matrix_stats().is_empty());
        a.build_count_matrix(unigram_params()).unwrap();
        let stats = a.matrix_stats();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].documents, 4);
        assert_eq!(stats[0].features, 4);
        assert_eq!(stats[0].non_zero, 6);
    }
}
