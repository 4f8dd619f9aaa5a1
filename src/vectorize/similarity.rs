// Cosine similarity and nearest-neighbour ranking.
//
// Similarity between a zero-norm vector and anything is defined as 0.0 so
// callers never see NaN. Rankings are deterministic: ties go to the lower
// row (or column) index.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::matrix::{SparseMatrix, SparseRow};

/// Cosine similarity between two sparse rows sorted by column.
pub fn cosine(a: &SparseRow<f64>, b: &SparseRow<f64>) -> f64 {
    let norm_a = a.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    // Merge the two column-sorted rows
    let mut dot = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }

    dot / (norm_a * norm_b)
}

/// Cosine similarity between two term → weight maps.
pub fn cosine_from_weights(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let norm_a = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.values().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    // Iterate the smaller map
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(k, v)| large.get(k).map(|w| v * w))
        .sum();

    dot / (norm_a * norm_b)
}

/// The `top_n` rows most similar to `row`, excluding `row` itself.
///
/// Sorted by similarity descending, then by row index ascending.
pub fn most_similar<T: Copy + Into<f64>>(
    matrix: &SparseMatrix<T>,
    row: usize,
    top_n: usize,
) -> Vec<(usize, f64)> {
    if row >= matrix.n_rows() {
        return Vec::new();
    }
    let target = matrix.row_f64(row);

    let mut scored: Vec<(usize, f64)> = (0..matrix.n_rows())
        .filter(|&i| i != row)
        .map(|i| (i, cosine(&target, &matrix.row_f64(i))))
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    scored.truncate(top_n);
    scored
}

/// The `top_n` largest non-zero cells of a row: value descending, column ascending.
pub fn top_columns(row: &SparseRow<f64>, top_n: usize) -> Vec<(usize, f64)> {
    let mut cells: Vec<(usize, f64)> = row.iter().copied().filter(|&(_, v)| v > 0.0).collect();
    cells.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    cells.truncate(top_n);
    cells
}

/// Indices of the `top_n` largest values in a dense vector: value descending,
/// index ascending.
pub fn top_indices(values: &[f64], top_n: usize) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });
    idx.truncate(top_n);
    idx
}
