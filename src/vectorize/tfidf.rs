// TF-IDF weighting over a count matrix.
//
//   idf(j)    = ln((1 + N) / (1 + df(j))) + 1
//   w(i, j)   = count(i, j) * idf(j)
//   row i     = w(i, ·) / ||w(i, ·)||₂
//
// The +1 smoothing keeps idf positive even when a term is in every document.
// Rows with no weight stay all-zero instead of dividing by zero.

use super::matrix::{CountMatrix, SparseMatrix, SparseRow};

#[derive(Debug, Clone, PartialEq)]
pub struct TfIdfMatrix {
    idf: Vec<f64>,
    matrix: SparseMatrix<f64>,
}

impl TfIdfMatrix {
    pub fn from_counts(counts: &CountMatrix) -> Self {
        let idf = smoothed_idf(counts);

        let rows: Vec<SparseRow<f64>> = counts
            .rows()
            .iter()
            .map(|row| {
                let weighted: SparseRow<f64> = row
                    .iter()
                    .map(|&(c, n)| (c, n as f64 * idf[c]))
                    .collect();
                l2_normalize(weighted)
            })
            .collect();

        Self {
            idf,
            matrix: SparseMatrix::from_rows(rows, counts.n_cols()),
        }
    }

    /// Inverse document frequency per column.
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn matrix(&self) -> &SparseMatrix<f64> {
        &self.matrix
    }
}

/// Smoothed idf for every column of `counts`.
pub fn smoothed_idf(counts: &CountMatrix) -> Vec<f64> {
    let n_docs = counts.n_rows() as f64;
    let mut df = vec![0usize; counts.n_cols()];
    for row in counts.rows() {
        for &(c, n) in row {
            if n > 0 {
                df[c] += 1;
            }
        }
    }
    df.into_iter()
        .map(|d| ((1.0 + n_docs) / (1.0 + d as f64)).ln() + 1.0)
        .collect()
}

fn l2_normalize(row: SparseRow<f64>) -> SparseRow<f64> {
    let norm = row.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt();
    if norm == 0.0 {
        return row;
    }
    row.into_iter().map(|(c, v)| (c, v / norm)).collect()
}
