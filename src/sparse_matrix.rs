use std::collections::HashMap;

/// A square matrix of `f64` values, most of which are zero.
///
/// Implementations provide element access; the default multiplication reads
/// every element and is only suitable for small matrices.
pub trait SparseMatrix {
    /// Gets the number of rows (and columns).
    fn size(&self) -> usize;

    /// Gets an element.  Panics if an index is out of range.
    fn get(&self, i: usize, j: usize) -> f64;

    /// Sets an element.  Panics if an index is out of range.
    fn set(&mut self, i: usize, j: usize, value: f64);

    /// Adds `delta` to an element.
    fn add_to(&mut self, i: usize, j: usize, delta: f64) {
        let value = self.get(i, j);
        self.set(i, j, value + delta);
    }

    /// Computes `out = self * x`.  Panics if either vector's length differs
    /// from [`Self::size`].
    fn multiply_into(&self, x: &[f64], out: &mut [f64]) {
        let n = self.size();
        assert_eq!(x.len(), n, "input vector has the wrong length");
        assert_eq!(out.len(), n, "output vector has the wrong length");
        for (i, out_i) in out.iter_mut().enumerate() {
            *out_i = (0..n).map(|j| self.get(i, j) * x[j]).sum();
        }
    }

    /// Computes `self * x` into a new vector.
    fn multiply(&self, x: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.size()];
        self.multiply_into(x, &mut out);
        out
    }
}

/// A sparse matrix storing each row as a hash map from column to value.
/// Zero entries are never stored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HashSparseMatrix {
    rows: Vec<HashMap<usize, f64>>,
}

impl HashSparseMatrix {
    /// Creates a zero matrix of the given size.
    pub fn new(size: usize) -> Self {
        Self {
            rows: vec![HashMap::new(); size],
        }
    }

    /// Gets the number of stored (non-zero) elements.
    pub fn nonzeros(&self) -> usize {
        self.rows.iter().map(HashMap::len).sum()
    }

    /// Gets the non-zero elements of row `i` as `(column, value)` pairs in
    /// unspecified order.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.rows[i].iter().map(|(&j, &v)| (j, v))
    }

    /// The largest absolute row sum.  By Gershgorin's theorem every
    /// eigenvalue lies within this distance of zero.
    pub fn gershgorin_bound(&self) -> f64 {
        self.rows
            .iter()
            .map(|row| row.values().map(|v| v.abs()).sum::<f64>())
            .fold(0.0, f64::max)
    }

    /// Returns `c * I - self`.
    pub fn shifted_negation(&self, c: f64) -> Self {
        let mut result = Self::new(self.size());
        for (i, row) in self.rows.iter().enumerate() {
            for (&j, &v) in row {
                result.set(i, j, -v);
            }
            result.add_to(i, i, c);
        }
        result
    }
}

impl SparseMatrix for HashSparseMatrix {
    fn size(&self) -> usize {
        self.rows.len()
    }

    fn get(&self, i: usize, j: usize) -> f64 {
        assert!(j < self.size(), "column {j} out of range");
        self.rows[i].get(&j).copied().unwrap_or(0.0)
    }

    fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(j < self.size(), "column {j} out of range");
        if value == 0.0 {
            self.rows[i].remove(&j);
        } else {
            self.rows[i].insert(j, value);
        }
    }

    fn multiply_into(&self, x: &[f64], out: &mut [f64]) {
        let n = self.size();
        assert_eq!(x.len(), n, "input vector has the wrong length");
        assert_eq!(out.len(), n, "output vector has the wrong length");
        for (row, out_i) in self.rows.iter().zip(out.iter_mut()) {
            *out_i = row.iter().map(|(&j, &v)| v * x[j]).sum();
        }
    }
}
