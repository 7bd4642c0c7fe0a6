//! Core types for tensor scaling operations

use mdarray::{DTensor, DynRank, Shape, Tensor};
use num_complex::Complex64;

/// A rank-d complex tensor with dynamic rank, row-major storage
pub type TensorC64 = Tensor<Complex64, DynRank>;

/// A complex matrix
pub type MatrixC64 = DTensor<Complex64, 2>;

/// Create a tensor from flat data (row-major order) with the given shape
///
/// # Panics
/// Panics if the product of `dims` doesn't match `data.len()`.
pub fn tensor_from_data(data: Vec<Complex64>, dims: &[usize]) -> TensorC64 {
    let expected: usize = dims.iter().product();
    assert_eq!(
        data.len(),
        expected,
        "data length {} doesn't match shape {:?} (product {})",
        data.len(),
        dims,
        expected
    );
    Tensor::from(data).into_shape(DynRank::from_dims(dims))
}

/// Create a matrix from flat data (row-major order)
///
/// # Panics
/// Panics if `data.len() != rows * cols`.
pub fn matrix_from_data(data: Vec<Complex64>, rows: usize, cols: usize) -> MatrixC64 {
    assert_eq!(data.len(), rows * cols);
    DTensor::<Complex64, 2>::from_fn([rows, cols], |idx| data[idx[0] * cols + idx[1]])
}

/// The n x n identity matrix
pub fn identity_matrix(n: usize) -> MatrixC64 {
    DTensor::<Complex64, 2>::from_fn([n, n], |idx| {
        if idx[0] == idx[1] {
            Complex64::new(1.0, 0.0)
        } else {
            Complex64::new(0.0, 0.0)
        }
    })
}

/// Get the shape of a tensor as a vector of dimensions
pub fn tensor_dims(psi: &TensorC64) -> Vec<usize> {
    psi.shape().with_dims(|d| d.to_vec())
}

/// Return the n x ... x n unit tensor with d factors
///
/// Entries are 1/sqrt(n) on the diagonal multi-index and 0 elsewhere, so
/// every marginal is the maximally mixed state diag(1/n, ..., 1/n).
pub fn unit_tensor(n: usize, d: usize) -> TensorC64 {
    let dims = vec![n; d];
    let total: usize = dims.iter().product();
    let mut data = vec![Complex64::new(0.0, 0.0); total];

    // The multi-index (i, ..., i) has linear index i * (1 + stride_1 + ...)
    let mut diag_stride = 0usize;
    let mut stride = 1usize;
    for _ in 0..d {
        diag_stride += stride;
        stride *= n;
    }
    let amp = Complex64::new(1.0 / (n as f64).sqrt(), 0.0);
    for i in 0..n {
        data[i * diag_stride] = amp;
    }

    tensor_from_data(data, &dims)
}
