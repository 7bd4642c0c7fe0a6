#![warn(missing_docs)]
//! Tensor scaling library
//!
//! This crate iteratively scales a multipartite unit tensor by
//! invertible matrices acting on its factors ("a group action") until
//! every reduced density matrix ("marginal") is close, in Frobenius
//! norm, to a diagonal matrix with a prescribed non-increasing
//! spectrum — a numerical solution to the quantum marginal / tensor
//! scaling problem. It provides:
//! - `scale`: the Cholesky-correction fixed-point loop
//! - `apply` / `apply_all`: mode-wise tensor contraction
//! - `marginal` / `marginal_distances`: reduced density matrices
//! - `parse_targets`: validation of target spectra
//! - seeded random tensors, Haar unitaries and spectra for fixtures
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use tensorscale::{scale, unit_tensor, ScaleOptions};
//!
//! // The balanced two-qubit tensor already has maximally mixed
//! // marginals, so scaling to them converges without any correction.
//! let psi = unit_tensor(2, 2);
//! let mut rng = ChaCha8Rng::seed_from_u64(0);
//! let options = ScaleOptions {
//!     eps: 1e-6,
//!     randomize: false,
//!     ..ScaleOptions::default()
//! };
//! let result = scale(
//!     &mut rng,
//!     &psi,
//!     vec![vec![0.5, 0.5], vec![0.5, 0.5]],
//!     &options,
//! )
//! .unwrap();
//! assert!(result.is_success());
//! assert_eq!(result.iterations(), 0);
//! ```

pub mod action;
pub mod contraction;
pub mod error;
pub mod linalg;
pub mod marginal;
pub mod random;
pub mod scale;
pub mod targets;
pub mod types;

// Re-export main types
pub use action::GroupAction;
pub use contraction::{apply, apply_all};
pub use error::{Result, ScaleError};
pub use linalg::{normalized, tensor_norm};
pub use marginal::{marginal, marginal_distances};
pub use random::{random_spectrum, random_targets, random_tensor, random_unitary};
pub use scale::{scale, ScaleOptions, ScaleResult, NORM_TOL};
pub use targets::{parse_targets, Spectrum, TargetSpec, Targets, SPECTRUM_TOL};
pub use types::{unit_tensor, MatrixC64, TensorC64};
