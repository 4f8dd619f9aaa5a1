// Text vectorization: n-gram vocabularies, count and TF-IDF matrices,
// cosine similarity, and the corpus-scoped character analyzer built on them.

pub mod analyzer;
pub mod error;
pub mod matrix;
pub mod similarity;
pub mod tfidf;
pub mod tokenize;
pub mod vocabulary;

pub use error::{VectorizeError, VectorizeResult};
