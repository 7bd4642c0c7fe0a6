//! Random tensors, unitaries and spectra
//!
//! Everything here takes an explicit `rand::Rng`, so seeded generators
//! give reproducible fixtures and reproducible randomized scaling runs.

use mdarray::{DSlice, DTensor};
use mdarray_linalg::qr::QR;
use mdarray_linalg_faer::Faer;
use num_complex::Complex64;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::linalg::normalized;
use crate::targets::Spectrum;
use crate::types::{tensor_from_data, MatrixC64, TensorC64};

/// Random tensor drawn from the unitarily-invariant measure on the unit
/// sphere
///
/// Real and imaginary parts of every entry are standard normal; the
/// result is normalized to unit Euclidean norm.
pub fn random_tensor<R: Rng>(rng: &mut R, shape: &[usize]) -> TensorC64 {
    let size: usize = shape.iter().product();
    let data: Vec<Complex64> = (0..size)
        .map(|_| Complex64::new(StandardNormal.sample(rng), StandardNormal.sample(rng)))
        .collect();
    normalized(&tensor_from_data(data, shape))
}

/// Haar-random n x n unitary matrix
///
/// Built as the Q factor of the QR decomposition of a complex Gaussian
/// matrix.
pub fn random_unitary<R: Rng>(rng: &mut R, n: usize) -> MatrixC64 {
    let mut h = DTensor::<Complex64, 2>::from_fn([n, n], |_| {
        Complex64::new(StandardNormal.sample(rng), StandardNormal.sample(rng))
    });
    let slice: &mut DSlice<Complex64, 2> = h.as_mut();
    let (q, _r) = Faer.qr(slice);
    q
}

/// Random non-increasing probability distribution of length n
///
/// Spacings of sorted draws on a percent grid, re-drawn until the
/// smallest entry is non-zero, so the result is always usable as a
/// non-singular target spectrum.
pub fn random_spectrum<R: Rng>(rng: &mut R, n: usize) -> Spectrum {
    assert!(n >= 1, "a spectrum needs at least one entry");
    loop {
        let mut cuts: Vec<f64> = (0..n - 1)
            .map(|_| rng.random_range(0..100) as f64 / 100.0)
            .collect();
        cuts.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let mut spec = Vec::with_capacity(n);
        let mut prev = 0.0;
        for &cut in &cuts {
            spec.push(cut - prev);
            prev = cut;
        }
        spec.push(1.0 - prev);
        spec.sort_by(|a, b| b.partial_cmp(a).unwrap());

        if spec[n - 1] > 0.0 {
            return spec;
        }
    }
}

/// One random spectrum per tensor factor, in factor order
pub fn random_targets<R: Rng>(rng: &mut R, shape: &[usize]) -> Vec<Spectrum> {
    shape.iter().map(|&n| random_spectrum(rng, n)).collect()
}
