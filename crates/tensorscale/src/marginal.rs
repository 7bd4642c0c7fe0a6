//! Quantum marginals: reduced density matrices and distances to targets

use std::collections::BTreeMap;

use crate::error::{Result, ScaleError};
use crate::linalg::{adjoint, frobenius_distance_to_diag, matmul};
use crate::types::{matrix_from_data, tensor_dims, MatrixC64, TensorC64};

/// Return the `factor`-th quantum marginal (reduced density matrix)
///
/// The tensor is unfolded with `factor` as rows and all remaining axes
/// flattened into columns, giving a matrix M; the marginal is `M * M^H`.
/// It is Hermitian, positive semidefinite, and its trace equals the
/// squared norm of the tensor.
///
/// # Errors
/// Returns [`ScaleError::FactorOutOfRange`] if `factor` is not a valid
/// axis of `psi`.
pub fn marginal(psi: &TensorC64, factor: usize) -> Result<MatrixC64> {
    let dims = tensor_dims(psi);
    let rank = dims.len();
    if factor >= rank {
        return Err(ScaleError::FactorOutOfRange { factor, rank });
    }
    let nk = dims[factor];
    let rest: usize = dims.iter().product::<usize>() / nk;

    let mut perm = Vec::with_capacity(rank);
    perm.push(factor);
    perm.extend((0..rank).filter(|&i| i != factor));
    let permuted = psi.permute(&perm[..]).to_tensor();

    let unfolded = matrix_from_data(permuted[..].to_vec(), nk, rest);
    Ok(matmul(&unfolded, &adjoint(&unfolded)))
}

/// Frobenius distances of a tensor's marginals to their diagonal targets
///
/// For each targeted factor k the distance is
/// `|| marginal(psi, k) - diag(spec_k) ||_F`, with the diagonal built
/// from the spectrum in the order given.
///
/// # Errors
/// Returns [`ScaleError::FactorOutOfRange`] if a target names an
/// invalid factor.
pub fn marginal_distances(
    psi: &TensorC64,
    targets: &BTreeMap<usize, Vec<f64>>,
) -> Result<BTreeMap<usize, f64>> {
    let mut distances = BTreeMap::new();
    for (&factor, spec) in targets {
        let rho = marginal(psi, factor)?;
        distances.insert(factor, frobenius_distance_to_diag(&rho, spec));
    }
    Ok(distances)
}
