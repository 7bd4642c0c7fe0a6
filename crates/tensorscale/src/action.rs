//! Group actions: one invertible matrix per tensor factor
//!
//! A [`GroupAction`] holds one slot per tensor factor. An empty slot
//! acts as the identity, so only factors that are actually transformed
//! carry a matrix.

use crate::error::{Result, ScaleError};
use crate::linalg::matmul;
use crate::types::MatrixC64;

/// A collection of invertible matrices acting on the factors of a tensor
///
/// Slots are indexed by factor, sized to the tensor rank at construction.
/// Factors without a matrix are implicitly the identity.
#[derive(Debug, Clone)]
pub struct GroupAction {
    slots: Vec<Option<MatrixC64>>,
}

impl GroupAction {
    /// Create an action of the given rank with every factor set to the identity
    pub fn identity(rank: usize) -> Self {
        Self {
            slots: (0..rank).map(|_| None).collect(),
        }
    }

    /// Number of factors this action applies to
    pub fn rank(&self) -> usize {
        self.slots.len()
    }

    /// The matrix acting on `factor`, if one is set
    pub fn get(&self, factor: usize) -> Option<&MatrixC64> {
        self.slots.get(factor).and_then(|slot| slot.as_ref())
    }

    /// Set the matrix acting on `factor`, replacing any previous one
    ///
    /// # Errors
    /// Returns [`ScaleError::FactorOutOfRange`] if `factor` is not a
    /// valid slot, or [`ScaleError::ShapeMismatch`] if `g` is not square.
    pub fn set(&mut self, factor: usize, g: MatrixC64) -> Result<()> {
        let rank = self.rank();
        if factor >= rank {
            return Err(ScaleError::FactorOutOfRange { factor, rank });
        }
        let (m, n) = *g.shape();
        if m != n {
            return Err(ScaleError::ShapeMismatch {
                message: format!("group element must be square, got {}x{}", m, n),
            });
        }
        self.slots[factor] = Some(g);
        Ok(())
    }

    /// Compose `g` on top of the existing matrix for `factor`
    ///
    /// The slot becomes `g * current`; an empty slot becomes `g`.
    ///
    /// # Errors
    /// Same conditions as [`GroupAction::set`], plus a shape mismatch if
    /// `g` is incompatible with the matrix already in the slot.
    pub fn compose_left(&mut self, factor: usize, g: MatrixC64) -> Result<()> {
        let rank = self.rank();
        if factor >= rank {
            return Err(ScaleError::FactorOutOfRange { factor, rank });
        }
        let (m, n) = *g.shape();
        if m != n {
            return Err(ScaleError::ShapeMismatch {
                message: format!("group element must be square, got {}x{}", m, n),
            });
        }
        let composed = match self.slots[factor].take() {
            Some(current) => {
                let (cm, _) = *current.shape();
                if cm != n {
                    return Err(ScaleError::ShapeMismatch {
                        message: format!(
                            "cannot compose {}x{} onto existing {}x{} group element",
                            m, n, cm, cm
                        ),
                    });
                }
                matmul(&g, &current)
            }
            None => g,
        };
        self.slots[factor] = Some(composed);
        Ok(())
    }

    /// Iterate over occupied slots in ascending factor order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &MatrixC64)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(factor, slot)| slot.as_ref().map(|g| (factor, g)))
    }

    /// Number of factors with an explicit matrix
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// True if every factor is the implicit identity
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{identity_matrix, matrix_from_data};
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_identity_action_is_empty() {
        let action = GroupAction::identity(3);
        assert_eq!(action.rank(), 3);
        assert!(action.is_empty());
        assert_eq!(action.len(), 0);
        assert!(action.get(0).is_none());
        assert_eq!(action.iter().count(), 0);
    }

    #[test]
    fn test_set_and_get() {
        let mut action = GroupAction::identity(2);
        action.set(1, identity_matrix(3)).unwrap();
        assert!(action.get(0).is_none());
        assert!(action.get(1).is_some());
        assert_eq!(action.len(), 1);
    }

    #[test]
    fn test_set_out_of_range() {
        let mut action = GroupAction::identity(2);
        let err = action.set(2, identity_matrix(2)).unwrap_err();
        assert!(matches!(
            err,
            ScaleError::FactorOutOfRange { factor: 2, rank: 2 }
        ));
    }

    #[test]
    fn test_set_rejects_non_square() {
        let mut action = GroupAction::identity(1);
        let g = matrix_from_data(vec![c(1.0), c(2.0)], 1, 2);
        let err = action.set(0, g).unwrap_err();
        assert!(matches!(err, ScaleError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_compose_left_on_empty_slot() {
        let mut action = GroupAction::identity(1);
        let g = matrix_from_data(vec![c(1.0), c(2.0), c(3.0), c(4.0)], 2, 2);
        action.compose_left(0, g.clone()).unwrap();
        let stored = action.get(0).unwrap();
        assert_eq!(stored[[1, 0]], g[[1, 0]]);
    }

    #[test]
    fn test_compose_left_multiplies_on_the_left() {
        let mut action = GroupAction::identity(1);
        let first = matrix_from_data(vec![c(1.0), c(1.0), c(0.0), c(1.0)], 2, 2);
        let second = matrix_from_data(vec![c(2.0), c(0.0), c(0.0), c(2.0)], 2, 2);
        action.set(0, first.clone()).unwrap();
        action.compose_left(0, second.clone()).unwrap();

        // slot = second * first
        let expected = crate::linalg::matmul(&second, &first);
        let stored = action.get(0).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert_relative_eq!(stored[[i, j]].re, expected[[i, j]].re, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_iter_ascending_factor_order() {
        let mut action = GroupAction::identity(4);
        action.set(3, identity_matrix(2)).unwrap();
        action.set(1, identity_matrix(2)).unwrap();
        let factors: Vec<usize> = action.iter().map(|(k, _)| k).collect();
        assert_eq!(factors, vec![1, 3]);
    }
}
