//! Dense linear algebra support: GEMM, adjoints, Cholesky factorization
//! and triangular inversion for the correction step.
//!
//! Matrix multiplication goes through faer with row-major views; the
//! factorization routines are direct loops over the (small) square
//! marginal matrices.

use faer::linalg::matmul::matmul as faer_matmul;
use faer::{Accum, Par};
use mdarray::DTensor;
use num_complex::Complex64;

use crate::error::{Result, ScaleError};
use crate::types::{tensor_from_data, MatrixC64, TensorC64};

/// Pivot magnitude below which a triangular factor counts as singular
const SINGULARITY_TOL: f64 = 1e-300;

/// Matrix multiplication C = A * B via faer GEMM
///
/// # Panics
/// Panics if the inner dimensions don't match.
pub fn matmul(a: &MatrixC64, b: &MatrixC64) -> MatrixC64 {
    let (m, k) = *a.shape();
    let (k2, n) = *b.shape();
    assert_eq!(
        k, k2,
        "matrix dimension mismatch: A.cols ({}) != B.rows ({})",
        k, k2
    );

    // Row-major views: row_stride = number of columns, col_stride = 1
    let a_mat = unsafe { faer::MatRef::from_raw_parts(a.as_ptr(), m, k, k as isize, 1) };
    let b_mat = unsafe { faer::MatRef::from_raw_parts(b.as_ptr(), k, n, n as isize, 1) };

    let mut c = vec![Complex64::new(0.0, 0.0); m * n];
    let mut c_mat =
        unsafe { faer::MatMut::from_raw_parts_mut(c.as_mut_ptr(), m, n, n as isize, 1) };

    faer_matmul(
        &mut c_mat,
        Accum::Replace,
        a_mat,
        b_mat,
        Complex64::new(1.0, 0.0),
        Par::Seq,
    );

    DTensor::<Complex64, 2>::from_fn([m, n], |idx| c[idx[0] * n + idx[1]])
}

/// Conjugate transpose of a matrix
pub fn adjoint(a: &MatrixC64) -> MatrixC64 {
    let (m, n) = *a.shape();
    DTensor::<Complex64, 2>::from_fn([n, m], |idx| a[[idx[1], idx[0]]].conj())
}

/// Diagonal matrix with the entrywise square roots of a real spectrum
pub fn diag_sqrt(spec: &[f64]) -> MatrixC64 {
    let n = spec.len();
    DTensor::<Complex64, 2>::from_fn([n, n], |idx| {
        if idx[0] == idx[1] {
            Complex64::new(spec[idx[0]].sqrt(), 0.0)
        } else {
            Complex64::new(0.0, 0.0)
        }
    })
}

/// Euclidean norm of a tensor
pub fn tensor_norm(psi: &TensorC64) -> f64 {
    psi[..].iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

/// Return a unit-norm copy of a tensor
///
/// # Panics
/// Panics if the tensor has zero norm.
pub fn normalized(psi: &TensorC64) -> TensorC64 {
    let norm = tensor_norm(psi);
    assert!(norm > 0.0, "cannot normalize a zero tensor");
    let dims = crate::types::tensor_dims(psi);
    let data: Vec<Complex64> = psi[..].iter().map(|&z| z / norm).collect();
    tensor_from_data(data, &dims)
}

/// Frobenius distance between a matrix and the diagonal matrix built
/// from a real spectrum (in the order given)
pub fn frobenius_distance_to_diag(rho: &MatrixC64, spec: &[f64]) -> f64 {
    let (m, n) = *rho.shape();
    debug_assert_eq!(m, n);
    debug_assert_eq!(spec.len(), n);

    let mut sum = 0.0;
    for i in 0..m {
        for j in 0..n {
            let target = if i == j { spec[i] } else { 0.0 };
            let diff = rho[[i, j]] - Complex64::new(target, 0.0);
            sum += diff.norm_sqr();
        }
    }
    sum.sqrt()
}

/// Cholesky factorization of a Hermitian positive-definite matrix
///
/// Returns the lower-triangular L with `rho = L * L^H`.
///
/// # Errors
/// Returns [`ScaleError::NotPositiveDefinite`] if a pivot is not
/// strictly positive (the matrix is singular or indefinite to working
/// precision).
pub fn cholesky_lower(rho: &MatrixC64) -> Result<MatrixC64> {
    let (m, n) = *rho.shape();
    assert_eq!(m, n, "Cholesky factorization requires a square matrix");

    let mut l =
        DTensor::<Complex64, 2>::from_fn([n, n], |_| Complex64::new(0.0, 0.0));

    for j in 0..n {
        // Diagonal pivot: real for a Hermitian input
        let mut sum = 0.0;
        for k in 0..j {
            sum += l[[j, k]].norm_sqr();
        }
        let pivot = rho[[j, j]].re - sum;
        if !(pivot > 0.0) || !pivot.is_finite() {
            return Err(ScaleError::NotPositiveDefinite { row: j, pivot });
        }
        let diag = pivot.sqrt();
        l[[j, j]] = Complex64::new(diag, 0.0);

        for i in j + 1..n {
            let mut s = Complex64::new(0.0, 0.0);
            for k in 0..j {
                s += l[[i, k]] * l[[j, k]].conj();
            }
            l[[i, j]] = (rho[[i, j]] - s) / diag;
        }
    }

    Ok(l)
}

/// Invert a lower-triangular matrix by forward substitution
///
/// # Errors
/// Returns [`ScaleError::SingularMatrix`] if a diagonal entry vanishes
/// to working precision.
pub fn lower_triangular_inverse(l: &MatrixC64) -> Result<MatrixC64> {
    let (m, n) = *l.shape();
    assert_eq!(m, n, "triangular inversion requires a square matrix");

    for i in 0..n {
        if l[[i, i]].norm() <= SINGULARITY_TOL {
            return Err(ScaleError::SingularMatrix { row: i });
        }
    }

    let mut x =
        DTensor::<Complex64, 2>::from_fn([n, n], |_| Complex64::new(0.0, 0.0));

    // Solve L * X = I column by column; X is lower triangular as well
    for j in 0..n {
        for i in j..n {
            let mut s = if i == j {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            };
            for k in j..i {
                s -= l[[i, k]] * x[[k, j]];
            }
            x[[i, j]] = s / l[[i, i]];
        }
    }

    Ok(x)
}
