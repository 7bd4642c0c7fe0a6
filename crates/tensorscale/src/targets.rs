//! Target spectra: input forms and eager validation
//!
//! Callers provide targets either as an ordered sequence of spectra
//! (assigned to the trailing tensor factors) or as an explicit mapping
//! from factor index to spectrum. [`parse_targets`] resolves both forms
//! into one canonical mapping and checks every invariant up front, so
//! the scaling loop never sees malformed targets.

use std::collections::BTreeMap;

use crate::error::{Result, ScaleError};

/// Absolute tolerance for the sum-to-one check on a spectrum
pub const SPECTRUM_TOL: f64 = 1e-8;

/// A prescribed marginal spectrum: non-negative reals, non-increasing,
/// summing to one
pub type Spectrum = Vec<f64>;

/// Canonical mapping from factor index to target spectrum
///
/// A `BTreeMap` keeps iteration in ascending factor order, which makes
/// worst-factor selection deterministic.
pub type Targets = BTreeMap<usize, Spectrum>;

/// Target spectra as supplied by the caller
#[derive(Debug, Clone)]
pub enum TargetSpec {
    /// Spectra assigned to the trailing factors of the tensor, in order
    Sequence(Vec<Spectrum>),
    /// Explicit assignment of spectra to factor indices
    Mapping(Targets),
}

impl From<Vec<Spectrum>> for TargetSpec {
    fn from(spectra: Vec<Spectrum>) -> Self {
        TargetSpec::Sequence(spectra)
    }
}

impl From<&[Spectrum]> for TargetSpec {
    fn from(spectra: &[Spectrum]) -> Self {
        TargetSpec::Sequence(spectra.to_vec())
    }
}

impl From<Targets> for TargetSpec {
    fn from(targets: Targets) -> Self {
        TargetSpec::Mapping(targets)
    }
}

/// Resolve and validate target spectra against a tensor shape
///
/// A sequence of `m` spectra is assigned to the last `m` factors of
/// `shape`. Validation is eager; each violated invariant reports its own
/// error variant:
/// - more spectra than factors ([`ScaleError::TooManySpectra`]),
/// - a mapping key outside the rank ([`ScaleError::FactorOutOfRange`]),
/// - an empty result ([`ScaleError::NoTargets`]),
/// - a spectrum whose length differs from its factor's dimension
///   ([`ScaleError::SpectrumDimensionMismatch`]),
/// - entries not summing to one ([`ScaleError::NotADistribution`]),
/// - entries not sorted non-increasingly
///   ([`ScaleError::UnorderedSpectrum`]).
pub fn parse_targets(spec: impl Into<TargetSpec>, shape: &[usize]) -> Result<Targets> {
    let rank = shape.len();

    let targets: Targets = match spec.into() {
        TargetSpec::Sequence(spectra) => {
            if spectra.len() > rank {
                return Err(ScaleError::TooManySpectra {
                    given: spectra.len(),
                    rank,
                });
            }
            let shift = rank - spectra.len();
            spectra
                .into_iter()
                .enumerate()
                .map(|(k, spec)| (shift + k, spec))
                .collect()
        }
        TargetSpec::Mapping(targets) => {
            if let Some(&factor) = targets.keys().find(|&&k| k >= rank) {
                return Err(ScaleError::FactorOutOfRange { factor, rank });
            }
            targets
        }
    };

    if targets.is_empty() {
        return Err(ScaleError::NoTargets);
    }

    for (&factor, spec) in &targets {
        let expected = shape[factor];
        if spec.len() != expected {
            return Err(ScaleError::SpectrumDimensionMismatch {
                factor,
                expected,
                got: spec.len(),
            });
        }

        let sum: f64 = spec.iter().sum();
        if (sum - 1.0).abs() > SPECTRUM_TOL {
            return Err(ScaleError::NotADistribution { factor, sum });
        }

        if spec.windows(2).any(|pair| pair[0] < pair[1]) {
            return Err(ScaleError::UnorderedSpectrum { factor });
        }
    }

    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_assigned_to_trailing_factors() {
        let targets = parse_targets(vec![vec![0.7, 0.3]], &[3, 2]).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[&1], vec![0.7, 0.3]);
    }

    #[test]
    fn test_full_sequence_covers_all_factors() {
        let targets =
            parse_targets(vec![vec![0.5, 0.5], vec![1.0 / 3.0; 3]], &[2, 3]).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[&0], vec![0.5, 0.5]);
    }

    #[test]
    fn test_mapping_form_passes_through() {
        let mut mapping = Targets::new();
        mapping.insert(0, vec![0.6, 0.4]);
        let targets = parse_targets(mapping, &[2, 2]).unwrap();
        assert_eq!(targets[&0], vec![0.6, 0.4]);
        assert!(!targets.contains_key(&1));
    }

    #[test]
    fn test_too_many_spectra() {
        let err = parse_targets(
            vec![vec![0.5, 0.5], vec![0.5, 0.5], vec![0.5, 0.5]],
            &[2, 2],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ScaleError::TooManySpectra { given: 3, rank: 2 }
        ));
    }

    #[test]
    fn test_mapping_key_out_of_range() {
        let mut mapping = Targets::new();
        mapping.insert(5, vec![0.5, 0.5]);
        let err = parse_targets(mapping, &[2, 2]).unwrap_err();
        assert!(matches!(
            err,
            ScaleError::FactorOutOfRange { factor: 5, rank: 2 }
        ));
    }

    #[test]
    fn test_empty_targets() {
        let err = parse_targets(Vec::<Spectrum>::new(), &[2, 2]).unwrap_err();
        assert!(matches!(err, ScaleError::NoTargets));
        let err = parse_targets(Targets::new(), &[2, 2]).unwrap_err();
        assert!(matches!(err, ScaleError::NoTargets));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = parse_targets(vec![vec![0.5, 0.3, 0.2]], &[2, 2]).unwrap_err();
        assert!(matches!(
            err,
            ScaleError::SpectrumDimensionMismatch {
                factor: 1,
                expected: 2,
                got: 3
            }
        ));
    }

    #[test]
    fn test_not_a_distribution() {
        let err = parse_targets(vec![vec![0.5, 0.4]], &[2, 2]).unwrap_err();
        match err {
            ScaleError::NotADistribution { factor, sum } => {
                assert_eq!(factor, 1);
                assert!((sum - 0.9).abs() < 1e-12);
            }
            other => panic!("expected NotADistribution, got {other:?}"),
        }
    }

    #[test]
    fn test_unordered_spectrum() {
        let err = parse_targets(vec![vec![0.3, 0.7]], &[2, 2]).unwrap_err();
        assert!(matches!(err, ScaleError::UnorderedSpectrum { factor: 1 }));
    }

    #[test]
    fn test_sum_within_tolerance_accepted() {
        let targets = parse_targets(vec![vec![0.5 + 4e-9, 0.5]], &[2, 2]).unwrap();
        assert_eq!(targets.len(), 1);
    }
}
