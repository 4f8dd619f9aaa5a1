// Sparse document × feature matrices.
//
// Rows are documents in load order, columns are vocabulary indices. Each row
// holds only its non-zero cells as (column, value) pairs sorted by column.

/// A single sparse row: (column, value) pairs in ascending column order.
pub type SparseRow<T> = Vec<(usize, T)>;

#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<T> {
    rows: Vec<SparseRow<T>>,
    n_cols: usize,
}

/// Raw occurrence counts.
pub type CountMatrix = SparseMatrix<u32>;

impl<T: Copy + Into<f64>> SparseMatrix<T> {
    /// Build from rows. Callers guarantee every column index is `< n_cols`
    /// and that each row is sorted by column with no duplicates.
    pub fn from_rows(rows: Vec<SparseRow<T>>, n_cols: usize) -> Self {
        Self { rows, n_cols }
    }

    /// (documents, features)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.n_cols)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of stored non-zero cells.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Fraction of cells that are zero. An empty shape reports 0.
    pub fn sparsity(&self) -> f64 {
        let cells = self.rows.len() * self.n_cols;
        if cells == 0 {
            return 0.0;
        }
        1.0 - self.nnz() as f64 / cells as f64
    }

    pub fn rows(&self) -> &[SparseRow<T>] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> Option<&SparseRow<T>> {
        self.rows.get(i)
    }

    /// Row `i` widened to f64, still sparse.
    pub fn row_f64(&self, i: usize) -> SparseRow<f64> {
        self.rows
            .get(i)
            .map(|r| r.iter().map(|&(c, v)| (c, v.into())).collect())
            .unwrap_or_default()
    }

    /// Row `i` as a dense vector of length `n_cols`.
    pub fn dense_row(&self, i: usize) -> Vec<f64> {
        let mut dense = vec![0.0; self.n_cols];
        if let Some(row) = self.rows.get(i) {
            for &(c, v) in row {
                dense[c] = v.into();
            }
        }
        dense
    }

    /// Sum of each column across all rows.
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.n_cols];
        for row in &self.rows {
            for &(c, v) in row {
                sums[c] += v.into();
            }
        }
        sums
    }

    /// Euclidean norm of row `i` (0 for a missing or empty row).
    pub fn row_norm(&self, i: usize) -> f64 {
        self.rows
            .get(i)
            .map(|r| {
                r.iter()
                    .map(|&(_, v)| {
                        let x: f64 = v.into();
                        x * x
                    })
                    .sum::<f64>()
                    .sqrt()
            })
            .unwrap_or(0.0)
    }
}
