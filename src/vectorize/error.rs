// Typed failures for the vectorization core.
//
// The CLI wraps these in anyhow like everything else, but tests and library
// callers can match on the variant.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VectorizeError {
    /// The document list handed to a fit was empty.
    #[error("Cannot build a vocabulary from an empty corpus")]
    EmptyCorpus,

    /// An operation needed state that hasn't been built yet.
    #[error("{0} not built yet")]
    NotInitialized(&'static str),

    #[error("Invalid vectorizer parameter: {0}")]
    InvalidParameter(String),
}

pub type VectorizeResult<T> = Result<T, VectorizeError>;
