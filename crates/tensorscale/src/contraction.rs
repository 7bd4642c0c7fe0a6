//! Mode contraction: applying a matrix to one factor of a tensor
//!
//! The contracted axis is permuted to the front, the remaining axes are
//! flattened, and the matrix is multiplied against the unfolding; the
//! result is reshaped and permuted back. Contractions on distinct
//! factors commute; repeated contractions on one factor compose.

use crate::action::GroupAction;
use crate::error::{Result, ScaleError};
use crate::linalg::matmul;
use crate::types::{matrix_from_data, tensor_dims, tensor_from_data, MatrixC64, TensorC64};

/// Apply `g` to the `factor`-th tensor factor of `psi`
///
/// # Errors
/// Returns [`ScaleError::FactorOutOfRange`] if `factor` is not a valid
/// axis, or [`ScaleError::ShapeMismatch`] if `g` is not square of the
/// factor's dimension.
pub fn apply(g: &MatrixC64, factor: usize, psi: &TensorC64) -> Result<TensorC64> {
    let dims = tensor_dims(psi);
    let rank = dims.len();
    if factor >= rank {
        return Err(ScaleError::FactorOutOfRange { factor, rank });
    }
    let nk = dims[factor];
    let (gm, gn) = *g.shape();
    if gm != nk || gn != nk {
        return Err(ScaleError::ShapeMismatch {
            message: format!(
                "group element is {}x{} but factor {} has dimension {}",
                gm, gn, factor, nk
            ),
        });
    }

    // Move the contracted axis to the front, everything else in order
    let mut perm = Vec::with_capacity(rank);
    perm.push(factor);
    perm.extend((0..rank).filter(|&i| i != factor));
    let permuted = psi.permute(&perm[..]).to_tensor();

    // Unfold to (n_k, rest) and combine rows by g
    let rest: usize = dims.iter().product::<usize>() / nk;
    let unfolded = matrix_from_data(permuted[..].to_vec(), nk, rest);
    let contracted = matmul(g, &unfolded);

    // Fold back and restore the original axis order
    let mut folded_data = Vec::with_capacity(nk * rest);
    for i in 0..nk {
        for j in 0..rest {
            folded_data.push(contracted[[i, j]]);
        }
    }
    let permuted_dims: Vec<usize> = perm.iter().map(|&i| dims[i]).collect();
    let folded = tensor_from_data(folded_data, &permuted_dims);

    let mut inverse = vec![0usize; rank];
    for (i, &p) in perm.iter().enumerate() {
        inverse[p] = i;
    }
    Ok(folded.permute(&inverse[..]).to_tensor())
}

/// Apply every matrix of a group action to its factor of `psi`
///
/// Factors without a matrix are left untouched. The result does not
/// depend on the order of application since the factors are distinct.
///
/// # Errors
/// Propagates the shape errors of [`apply`]; additionally fails with
/// [`ScaleError::ShapeMismatch`] if the action was built for a
/// different rank.
pub fn apply_all(action: &GroupAction, psi: &TensorC64) -> Result<TensorC64> {
    if action.rank() != psi.rank() {
        return Err(ScaleError::ShapeMismatch {
            message: format!(
                "group action has rank {} but tensor has rank {}",
                action.rank(),
                psi.rank()
            ),
        });
    }
    let mut result = psi.clone();
    for (factor, g) in action.iter() {
        result = apply(g, factor, &result)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{identity_matrix, unit_tensor};
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn assert_tensors_close(a: &TensorC64, b: &TensorC64) {
        assert_eq!(tensor_dims(a), tensor_dims(b));
        for (x, y) in a[..].iter().zip(b[..].iter()) {
            assert_relative_eq!(x.re, y.re, epsilon = 1e-12);
            assert_relative_eq!(x.im, y.im, epsilon = 1e-12);
        }
    }

    fn sample_tensor() -> TensorC64 {
        let data: Vec<Complex64> = (0..8)
            .map(|x| c(x as f64 + 1.0, 0.5 * x as f64))
            .collect();
        tensor_from_data(data, &[2, 2, 2])
    }

    fn sample_matrix(seed: f64) -> MatrixC64 {
        matrix_from_data(
            vec![
                c(seed, 0.0),
                c(1.0, seed),
                c(0.0, -1.0),
                c(2.0 * seed, 1.0),
            ],
            2,
            2,
        )
    }

    #[test]
    fn test_identity_contraction_is_noop() {
        let psi = sample_tensor();
        for factor in 0..3 {
            let out = apply(&identity_matrix(2), factor, &psi).unwrap();
            assert_tensors_close(&out, &psi);
        }
    }

    #[test]
    fn test_contraction_on_distinct_factors_commutes() {
        let psi = sample_tensor();
        let g1 = sample_matrix(1.5);
        let g2 = sample_matrix(-0.5);

        let forward = apply(&g2, 2, &apply(&g1, 0, &psi).unwrap()).unwrap();
        let backward = apply(&g1, 0, &apply(&g2, 2, &psi).unwrap()).unwrap();
        assert_tensors_close(&forward, &backward);
    }

    #[test]
    fn test_repeated_contraction_composes() {
        let psi = sample_tensor();
        let g = sample_matrix(2.0);
        let h = sample_matrix(0.25);

        let sequential = apply(&h, 1, &apply(&g, 1, &psi).unwrap()).unwrap();
        let composed = apply(&matmul(&h, &g), 1, &psi).unwrap();
        assert_tensors_close(&sequential, &composed);
    }

    #[test]
    fn test_apply_scales_first_factor() {
        // Doubling factor 0 of the unit tensor doubles every entry with
        // a 0 in the first slot staying zero
        let psi = unit_tensor(2, 2);
        let g = matrix_from_data(vec![c(2.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0)], 2, 2);
        let out = apply(&g, 0, &psi).unwrap();
        let amp = 1.0 / 2.0_f64.sqrt();
        assert_relative_eq!(out[&[0, 0][..]].re, 2.0 * amp, epsilon = 1e-12);
        assert_relative_eq!(out[&[1, 1][..]].re, amp, epsilon = 1e-12);
        assert_relative_eq!(out[&[0, 1][..]].re, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_apply_rejects_bad_factor() {
        let psi = sample_tensor();
        let err = apply(&identity_matrix(2), 3, &psi).unwrap_err();
        assert!(matches!(
            err,
            ScaleError::FactorOutOfRange { factor: 3, rank: 3 }
        ));
    }

    #[test]
    fn test_apply_rejects_wrong_size_matrix() {
        let psi = sample_tensor();
        let err = apply(&identity_matrix(3), 1, &psi).unwrap_err();
        assert!(matches!(err, ScaleError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_apply_all_identity_action() {
        let psi = sample_tensor();
        let action = GroupAction::identity(3);
        let out = apply_all(&action, &psi).unwrap();
        assert_tensors_close(&out, &psi);
    }

    #[test]
    fn test_apply_all_matches_sequential_application() {
        let psi = sample_tensor();
        let g0 = sample_matrix(0.5);
        let g2 = sample_matrix(3.0);

        let mut action = GroupAction::identity(3);
        action.set(0, g0.clone()).unwrap();
        action.set(2, g2.clone()).unwrap();

        let via_action = apply_all(&action, &psi).unwrap();
        let sequential = apply(&g2, 2, &apply(&g0, 0, &psi).unwrap()).unwrap();
        assert_tensors_close(&via_action, &sequential);
    }

    #[test]
    fn test_apply_all_rejects_rank_mismatch() {
        let psi = sample_tensor();
        let action = GroupAction::identity(2);
        let err = apply_all(&action, &psi).unwrap_err();
        assert!(matches!(err, ScaleError::ShapeMismatch { .. }));
    }
}
