//! 2x2 matrix operations used by the null model.
//!
//! The chain is fixed at two states so matrices are plain `[[f64; 2]; 2]` arrays.
//! `ndarray` views are accepted at the boundary and converted once.

use ndarray::ArrayView2;

use crate::errors::ModelError;

pub type Matrix2 = [[f64; 2]; 2];

pub const IDENTITY: Matrix2 = [[1.0, 0.0], [0.0, 1.0]];

pub fn matrix_multiply(a: &Matrix2, b: &Matrix2) -> Matrix2 {
    let mut result = [[0.0; 2]; 2];
    for (i, row) in result.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j];
        }
    }
    result
}

pub fn matrix_subtract(a: &Matrix2, b: &Matrix2) -> Matrix2 {
    [
        [a[0][0] - b[0][0], a[0][1] - b[0][1]],
        [a[1][0] - b[1][0], a[1][1] - b[1][1]],
    ]
}

/// Row vector times matrix.
pub fn row_multiply(row: &[f64; 2], m: &Matrix2) -> [f64; 2] {
    [
        row[0] * m[0][0] + row[1] * m[1][0],
        row[0] * m[0][1] + row[1] * m[1][1],
    ]
}

///
/// Raise `m` to the power `n` by binary exponentiation.
///
/// Gaps between reference intervals can span millions of bases, so this takes
/// `O(log n)` multiplications.
///
pub fn matrix_power(m: &Matrix2, mut n: u64) -> Matrix2 {
    let mut result = IDENTITY;
    let mut base = *m;

    while n > 0 {
        if n & 1 == 1 {
            result = matrix_multiply(&result, &base);
        }
        base = matrix_multiply(&base, &base);
        n >>= 1;
    }

    result
}

///
/// Convert a `ndarray` view into a [Matrix2], rejecting any other shape.
///
pub fn to_matrix2(view: ArrayView2<f64>) -> Result<Matrix2, ModelError> {
    let (rows, cols) = view.dim();
    if rows != 2 || cols != 2 {
        return Err(ModelError::MatrixShape { rows, cols });
    }

    Ok([
        [view[[0, 0]], view[[0, 1]]],
        [view[[1, 0]], view[[1, 1]]],
    ])
}
