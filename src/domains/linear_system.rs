//! Dense linear systems over a field.

use std::fmt::{Display, Write};
use std::ops::{Index, IndexMut};
use std::slice::Chunks;

use smallvec::SmallVec;

use super::Field;

/// A dense matrix in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<F: Field> {
    pub shape: (u32, u32),
    pub data: SmallVec<[F::Element; 25]>,
    pub field: F,
}

impl<F: Field> Matrix<F> {
    /// Create a zero matrix.
    pub fn new(rows: u32, cols: u32, field: F) -> Matrix<F> {
        Matrix {
            shape: (rows, cols),
            data: (0..rows as usize * cols as usize)
                .map(|_| field.zero())
                .collect(),
            field,
        }
    }

    /// Create a matrix from a row-major list of entries. Returns `None` if the
    /// length does not match the shape.
    pub fn from_linear(data: Vec<F::Element>, rows: u32, cols: u32, field: F) -> Option<Matrix<F>> {
        if data.len() != rows as usize * cols as usize {
            return None;
        }

        Some(Matrix {
            shape: (rows, cols),
            data: data.into(),
            field,
        })
    }

    /// Create a column vector.
    pub fn new_vec(data: Vec<F::Element>, field: F) -> Matrix<F> {
        Matrix {
            shape: (data.len() as u32, 1),
            data: data.into(),
            field,
        }
    }

    pub fn rows(&self) -> usize {
        self.shape.0 as usize
    }

    pub fn cols(&self) -> usize {
        self.shape.1 as usize
    }

    pub fn row_iter(&self) -> Chunks<'_, F::Element> {
        self.data.chunks(self.shape.1 as usize)
    }

    pub fn into_vec(self) -> Vec<F::Element> {
        self.data.into_vec()
    }

    fn swap_rows(&mut self, a: u32, b: u32) {
        if a == b {
            return;
        }

        let cols = self.shape.1;
        for l in 0..cols {
            self.data
                .swap((a * cols + l) as usize, (b * cols + l) as usize);
        }
    }
}

impl<F: Field> Index<(u32, u32)> for Matrix<F> {
    type Output = F::Element;

    fn index(&self, index: (u32, u32)) -> &Self::Output {
        &self.data[(index.0 * self.shape.1 + index.1) as usize]
    }
}

impl<F: Field> IndexMut<(u32, u32)> for Matrix<F> {
    fn index_mut(&mut self, index: (u32, u32)) -> &mut F::Element {
        &mut self.data[(index.0 * self.shape.1 + index.1) as usize]
    }
}

impl<F: Field> Display for Matrix<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('{')?;
        for (ri, r) in self.row_iter().enumerate() {
            f.write_char('{')?;
            for (ci, c) in r.iter().enumerate() {
                self.field.fmt_display(c, false, f)?;
                if ci + 1 < self.shape.1 as usize {
                    f.write_char(',')?;
                }
            }
            f.write_char('}')?;
            if ri + 1 < self.shape.0 as usize {
                f.write_char(',')?;
            }
        }
        f.write_char('}')
    }
}

/// Error from linear solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearSolverError {
    /// The system has more than one solution. `rank` is the rank of the matrix.
    Underdetermined { rank: u32 },
    Inconsistent,
    NotSquare,
}

impl Display for LinearSolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinearSolverError::Underdetermined { rank } => {
                write!(f, "Underdetermined system of rank {}", rank)
            }
            LinearSolverError::Inconsistent => f.write_str("Inconsistent system"),
            LinearSolverError::NotSquare => f.write_str("Matrix is not square"),
        }
    }
}

impl std::error::Error for LinearSolverError {}

impl<F: Field> Matrix<F> {
    /// Bring the first `max_col` columns into reduced row echelon form, applying
    /// the same operations to the remaining columns. Returns the pivot columns.
    pub fn row_reduce(&mut self, max_col: u32) -> Vec<u32> {
        let (nrows, ncols) = self.shape;
        let mut pivots = vec![];

        let mut i = 0;
        for j in 0..max_col {
            if i == nrows {
                break;
            }

            let Some(k) = (i..nrows).find(|k| !F::is_zero(&self[(*k, j)])) else {
                continue;
            };
            self.swap_rows(i, k);

            let inv_x = self.field.inv(&self[(i, j)]);
            for l in j..ncols {
                let v = self.field.mul(&self[(i, l)], &inv_x);
                self[(i, l)] = v;
            }

            for k in 0..nrows {
                if k == i || F::is_zero(&self[(k, j)]) {
                    continue;
                }

                let s = self[(k, j)].clone();
                for l in j..ncols {
                    let v = self.field.mul(&self[(i, l)], &s);
                    let v = self.field.sub(&self[(k, l)], &v);
                    self[(k, l)] = v;
                }
            }

            pivots.push(j);
            i += 1;
        }

        pivots
    }

    /// Compute the rank of the matrix.
    pub fn rank(&self) -> u32 {
        let mut m = self.clone();
        m.row_reduce(self.shape.1).len() as u32
    }

    /// Compute the determinant of the matrix.
    pub fn det(&self) -> Result<F::Element, LinearSolverError> {
        if self.shape.0 != self.shape.1 {
            Err(LinearSolverError::NotSquare)?;
        }

        // forward elimination only, keeping track of the pivots
        let mut m = self.clone();
        let n = self.shape.0;
        let mut det = self.field.one();
        for j in 0..n {
            let Some(k) = (j..n).find(|k| !F::is_zero(&m[(*k, j)])) else {
                return Ok(self.field.zero());
            };
            if k != j {
                m.swap_rows(j, k);
                det = self.field.neg(&det);
            }

            let pivot = m[(j, j)].clone();
            self.field.mul_assign(&mut det, &pivot);
            let inv = self.field.inv(&pivot);

            for r in j + 1..n {
                if F::is_zero(&m[(r, j)]) {
                    continue;
                }
                let s = self.field.mul(&m[(r, j)], &inv);
                for l in j..n {
                    let v = self.field.mul(&m[(j, l)], &s);
                    self.field.sub_assign(&mut m[(r, l)], &v);
                }
            }
        }

        Ok(det)
    }

    /// Solves `A * x = b` for `x`, where `A` is `self`. The solution must be unique.
    pub fn solve(&self, b: &Matrix<F>) -> Result<Matrix<F>, LinearSolverError> {
        assert!(
            self.shape.0 == b.shape.0 && b.shape.1 == 1 && self.field == b.field,
            "Right-hand side has the wrong shape"
        );

        let (neqs, nvars) = self.shape;

        // create the augmented matrix
        let mut m = Matrix::new(neqs, nvars + 1, self.field.clone());
        for r in 0..neqs {
            for c in 0..nvars {
                m[(r, c)] = self[(r, c)].clone();
            }
            m[(r, nvars)] = b.data[r as usize].clone();
        }

        let pivots = m.row_reduce(nvars);
        let rank = pivots.len() as u32;

        for k in rank..neqs {
            if !F::is_zero(&m[(k, nvars)]) {
                return Err(LinearSolverError::Inconsistent);
            }
        }

        if rank < nvars {
            return Err(LinearSolverError::Underdetermined { rank });
        }

        Ok(Matrix {
            shape: (nvars, 1),
            data: (0..nvars).map(|i| m[(i, nvars)].clone()).collect(),
            field: m.field,
        })
    }
}

#[cfg(test)]
mod test {
    use super::{LinearSolverError, Matrix};
    use crate::domains::finite_field::{FiniteFieldCore, Zp};
    use crate::domains::rational::{Rational, Q};

    fn zp_matrix(data: &[u32], rows: u32, cols: u32) -> Matrix<Zp> {
        let field = Zp::new(17);
        let data = data.iter().map(|n| field.to_element(*n)).collect();
        Matrix::from_linear(data, rows, cols, field).unwrap()
    }

    #[test]
    fn solve() {
        let a = zp_matrix(&[1, 1, 2, 3, 4, 3, 16, 5, 5], 3, 3);
        let b = zp_matrix(&[3, 15, 8], 3, 1);
        let r = a.solve(&b).unwrap();

        let res: Vec<_> = r.data.iter().map(|i| a.field.from_element(i)).collect();
        assert_eq!(&res, &[2, 3, 16]);
    }

    #[test]
    fn overdetermined() {
        let a = zp_matrix(&[1, 1, 2, 3, 4, 3, 9, 0, 11, 1, 1, 7, 2, 3, 8], 5, 3);
        let b = zp_matrix(&[3, 15, 7, 6, 6], 5, 1);
        let r = a.solve(&b).unwrap();

        let res: Vec<_> = r.data.iter().map(|i| a.field.from_element(i)).collect();
        assert_eq!(&res, &[11, 1, 4]);
    }

    #[test]
    fn underdetermined() {
        let a = zp_matrix(&[1, 1, 2, 3, 4, 3], 2, 3);
        let b = zp_matrix(&[3, 15], 2, 1);
        assert_eq!(
            a.solve(&b),
            Err(LinearSolverError::Underdetermined { rank: 2 })
        );

        let a = zp_matrix(&[1, 1, 2, 3, 4, 3, 10, 7, 12], 3, 3);
        let b = zp_matrix(&[3, 15, 12], 3, 1);
        assert_eq!(
            a.solve(&b),
            Err(LinearSolverError::Underdetermined { rank: 2 })
        );
        assert_eq!(a.rank(), 2);
    }

    #[test]
    fn inconsistent() {
        let a = zp_matrix(&[1, 1, 2, 3, 4, 3, 16, 5, 5, 14, 2, 4], 4, 3);
        let b = zp_matrix(&[3, 15, 8, 3], 4, 1);
        assert_eq!(a.solve(&b), Err(LinearSolverError::Inconsistent));
    }

    #[test]
    fn rational() {
        let data = [1i64, 1, 2, 3, 4, 3, 16, 5, 5]
            .into_iter()
            .map(Rational::from)
            .collect();
        let a = Matrix::from_linear(data, 3, 3, Q).unwrap();
        let b = Matrix::new_vec([3i64, 15, 8].into_iter().map(Rational::from).collect(), Q);
        let r = a.solve(&b).unwrap();

        assert_eq!(
            r.data.as_slice(),
            &[
                Rational::from((-5, 6)),
                Rational::from((47, 10)),
                Rational::from((-13, 30))
            ]
        );

        assert_eq!(a.det().unwrap(), Rational::from(-60i64));
    }
}
