//! Dense matrices over rational functions, with Gauss–Jordan elimination.
//!
//! The closure searches of [`HolonomicFunction`](crate::holonomic::HolonomicFunction) reduce to
//! finding a non-trivial kernel vector of a matrix whose entries are rational functions of `x`.
//! Since ℚ(x) is a field, exact Gauss–Jordan elimination is all that is needed.

use crate::poly::RationalFunction;
use std::ops::{Index, IndexMut};

/// A dense, row-major matrix of [`RationalFunction`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    data: Vec<RationalFunction>,
    num_rows: usize,
    num_cols: usize,
}

impl DenseMatrix {
    /// Creates a matrix of zeros.
    pub fn zeros(num_rows: usize, num_cols: usize) -> Self {
        Self {
            data: vec![RationalFunction::zero(); num_rows * num_cols],
            num_rows,
            num_cols,
        }
    }

    /// Creates a matrix from rows. Rows shorter than the longest row are padded with zeros.
    pub fn from_rows(rows: Vec<Vec<RationalFunction>>) -> Self {
        let num_rows = rows.len();
        let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut data = Vec::with_capacity(num_rows * num_cols);
        for mut row in rows {
            row.resize(num_cols, RationalFunction::zero());
            data.extend(row);
        }
        Self { data, num_rows, num_cols }
    }

    /// Creates a matrix from columns. Columns shorter than the longest column are padded with
    /// zeros.
    pub fn from_columns(columns: Vec<Vec<RationalFunction>>) -> Self {
        Self::from_rows(columns).transpose()
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// The entries of a row.
    pub fn row(&self, row: usize) -> &[RationalFunction] {
        &self.data[row * self.num_cols..(row + 1) * self.num_cols]
    }

    /// The transposed matrix.
    pub fn transpose(&self) -> Self {
        let mut result = Self::zeros(self.num_cols, self.num_rows);
        for i in 0..self.num_rows {
            for j in 0..self.num_cols {
                result[(j, i)] = self[(i, j)].clone();
            }
        }
        result
    }

    fn swap_rows(&mut self, i: usize, j: usize) {
        if i != j {
            for col in 0..self.num_cols {
                self.data.swap(i * self.num_cols + col, j * self.num_cols + col);
            }
        }
    }

    /// `row[target] -= factor * row[source]`
    fn sub_scaled_row(&mut self, target: usize, source: usize, factor: &RationalFunction) {
        for col in 0..self.num_cols {
            let delta = factor * &self[(source, col)];
            if !delta.is_zero() {
                self[(target, col)] = &self[(target, col)] - &delta;
            }
        }
    }

    fn scale_row(&mut self, row: usize, factor: &RationalFunction) {
        for col in 0..self.num_cols {
            self[(row, col)] = &self[(row, col)] * factor;
        }
    }

    /// Computes the reduced row echelon form with Gauss–Jordan elimination. Returns the reduced
    /// matrix and the pivot column of each non-zero row.
    pub fn rref(&self) -> (Self, Vec<usize>) {
        let mut m = self.clone();
        let mut pivots = Vec::new();
        let mut pivot_row = 0;

        for col in 0..m.num_cols {
            if pivot_row == m.num_rows {
                break;
            }

            let Some(found) = (pivot_row..m.num_rows).find(|&row| !m[(row, col)].is_zero()) else {
                continue;
            };
            let Some(inv) = m[(found, col)].recip() else {
                continue;
            };

            m.swap_rows(pivot_row, found);
            m.scale_row(pivot_row, &inv);

            for row in 0..m.num_rows {
                if row != pivot_row && !m[(row, col)].is_zero() {
                    let factor = m[(row, col)].clone();
                    m.sub_scaled_row(row, pivot_row, &factor);
                }
            }

            pivots.push(col);
            pivot_row += 1;
        }

        (m, pivots)
    }

    /// The rank of the matrix.
    pub fn rank(&self) -> usize {
        self.rref().1.len()
    }

    /// A basis of the null space `{ v : Mv = 0 }`.
    ///
    /// There is one basis vector per free (non-pivot) column, in column order. The vector of a
    /// free column has a `1` in that column, a `0` in every other free column, and
    /// `-R[r][free]` in the pivot column of row `r` of the reduced matrix `R`.
    pub fn null_space(&self) -> Vec<Vec<RationalFunction>> {
        let (rref, pivots) = self.rref();

        (0..self.num_cols)
            .filter(|col| !pivots.contains(col))
            .map(|free| {
                let mut vec = vec![RationalFunction::zero(); self.num_cols];
                vec[free] = RationalFunction::one();
                for (row, &pivot_col) in pivots.iter().enumerate() {
                    vec[pivot_col] = -&rref[(row, free)];
                }
                vec
            })
            .collect()
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = RationalFunction;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        &self.data[row * self.num_cols + col]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        &mut self.data[row * self.num_cols + col]
    }
}

#[cfg(test)]
mod tests {
    use crate::poly::Poly;
    use crate::primitive::rat;
    use pretty_assertions::assert_eq;
    use super::*;

    fn c(n: i64) -> RationalFunction {
        RationalFunction::from(n)
    }

    fn x() -> RationalFunction {
        RationalFunction::x()
    }

    /// Multiplies the matrix by a column vector.
    fn mul_vec(m: &DenseMatrix, v: &[RationalFunction]) -> Vec<RationalFunction> {
        (0..m.num_rows())
            .map(|i| m.row(i).iter().zip(v).fold(RationalFunction::zero(), |acc, (a, b)| &acc + &(a * b)))
            .collect()
    }

    fn ints(rows: &[&[i64]]) -> DenseMatrix {
        DenseMatrix::from_rows(rows.iter().map(|row| row.iter().map(|&n| c(n)).collect()).collect())
    }

    #[test]
    fn from_columns_pads() {
        let m = DenseMatrix::from_columns(vec![vec![c(1), c(2)], vec![c(3)]]);
        assert_eq!(m, ints(&[&[1, 3], &[2, 0]]));
    }

    #[test]
    fn rref_of_integer_matrix() {
        let m = ints(&[&[1, 2, 3], &[2, 4, 7], &[1, 2, 4]]);
        let (rref, pivots) = m.rref();
        assert_eq!(rref, ints(&[&[1, 2, 0], &[0, 0, 1], &[0, 0, 0]]));
        assert_eq!(pivots, vec![0, 2]);
        assert_eq!(m.rank(), 2);
    }

    #[test]
    fn null_space_of_integer_matrix() {
        let m = ints(&[&[1, 2, 3], &[2, 4, 6]]);
        let kernel = m.null_space();
        assert_eq!(kernel, vec![vec![c(-2), c(1), c(0)], vec![c(-3), c(0), c(1)]]);
        for v in &kernel {
            assert!(mul_vec(&m, v).iter().all(RationalFunction::is_zero));
        }
    }

    #[test]
    fn null_space_over_rational_functions() {
        // columns: [1, x], [x, x^2] are dependent: x * col0 - col1 = 0
        let m = DenseMatrix::from_columns(vec![
            vec![c(1), x()],
            vec![x(), RationalFunction::from(Poly::new(vec![rat(0), rat(0), rat(1)]))],
        ]);
        let kernel = m.null_space();
        assert_eq!(kernel, vec![vec![-x(), c(1)]]);
    }

    #[test]
    fn trivial_kernel() {
        assert!(ints(&[&[1, 0], &[0, 1]]).null_space().is_empty());
        // no rows: every column is free
        assert_eq!(DenseMatrix::zeros(0, 1).null_space(), vec![vec![c(1)]]);
    }
}
