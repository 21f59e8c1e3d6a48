//! Type-safe wrappers and core types for the vector layer.
//!
//! Newtypes here keep dimensions and cluster slots from being confused
//! with plain integers as they flow between the store, the clustering
//! engine and the ranker.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Positional label of a cluster within a single clustering call.
///
/// Cluster ids are slot indices in `[0, k)`. They carry no identity across
/// calls: re-running clustering with a different `k` or a different input
/// set may put entirely different entities in slot 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(u32);

impl ClusterId {
    /// Creates a new `ClusterId` for the given slot.
    #[must_use]
    pub const fn new(slot: u32) -> Self {
        Self(slot)
    }

    /// Returns the underlying slot number.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the slot as an index into per-cluster arrays.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for ClusterId {
    type Error = std::num::TryFromIntError;

    fn try_from(slot: usize) -> Result<Self, Self::Error> {
        u32::try_from(slot).map(Self)
    }
}

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type-safe wrapper for vector dimensions.
///
/// A store fixes its dimension once and validates every vector against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct VectorDimension(usize);

impl VectorDimension {
    /// Creates a new `VectorDimension` with validation.
    ///
    /// Returns an error if the dimension is zero.
    pub fn new(dim: usize) -> Result<Self, VectorError> {
        if dim == 0 {
            return Err(VectorError::InvalidDimension {
                dimension: 0,
                reason: "Vector dimension cannot be zero",
            });
        }
        Ok(Self(dim))
    }

    /// Returns the underlying dimension value.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }

    /// Validates that a vector has the expected dimension.
    pub fn validate_vector(&self, vector: &[f32]) -> Result<(), VectorError> {
        if vector.len() != self.0 {
            return Err(VectorError::DimensionMismatch {
                expected: self.0,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    /// A zero vector of this dimension.
    #[must_use]
    pub fn zero_vector(&self) -> Vec<f32> {
        vec![0.0; self.0]
    }
}

impl TryFrom<usize> for VectorDimension {
    type Error = VectorError;

    fn try_from(dim: usize) -> Result<Self, Self::Error> {
        Self::new(dim)
    }
}

impl From<VectorDimension> for usize {
    fn from(dim: VectorDimension) -> usize {
        dim.0
    }
}

impl std::fmt::Display for VectorDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Checks that every component of `vector` is a finite number.
pub fn validate_finite(vector: &[f32]) -> Result<(), VectorError> {
    match vector.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(VectorError::NonFiniteComponent {
            index,
            value: vector[index],
        }),
        None => Ok(()),
    }
}

/// Errors that can occur during vector operations.
///
/// All error messages include actionable suggestions for resolution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorError {
    #[error(
        "Vector dimension mismatch: expected {expected}, got {actual}\nSuggestion: Ensure all embeddings come from the same model"
    )]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid vector dimension: {dimension}\nReason: {reason}")]
    InvalidDimension {
        dimension: usize,
        reason: &'static str,
    },

    #[error(
        "Vector component {index} is not finite ({value})\nSuggestion: Check the upstream embedding producer for NaN or overflow"
    )]
    NonFiniteComponent { index: usize, value: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_id_construction() {
        let id = ClusterId::new(0);
        assert_eq!(id.get(), 0);
        assert_eq!(id.index(), 0);

        let id = ClusterId::try_from(7usize).unwrap();
        assert_eq!(id.get(), 7);
        assert_eq!(id.to_string(), "7");

        // Slots past u32 are refused rather than wrapped
        assert!(ClusterId::try_from(u32::MAX as usize).is_ok());
        #[cfg(target_pointer_width = "64")]
        assert!(ClusterId::try_from(u32::MAX as usize + 1).is_err());

        assert!(ClusterId::new(1) < ClusterId::new(2));
    }

    #[test]
    fn test_vector_dimension() {
        let dim = VectorDimension::new(384).unwrap();
        assert_eq!(dim.get(), 384);

        // Invalid dimension
        assert!(VectorDimension::new(0).is_err());

        // Validation
        let vec = vec![0.1; 384];
        assert!(dim.validate_vector(&vec).is_ok());

        let wrong_vec = vec![0.1; 100];
        assert_eq!(
            dim.validate_vector(&wrong_vec),
            Err(VectorError::DimensionMismatch {
                expected: 384,
                actual: 100
            })
        );
    }

    #[test]
    fn test_vector_dimension_serde() {
        let dim: VectorDimension = serde_json::from_str("3").unwrap();
        assert_eq!(dim.get(), 3);
        assert_eq!(serde_json::to_string(&dim).unwrap(), "3");

        assert!(serde_json::from_str::<VectorDimension>("0").is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite(&[0.0, -1.5, 3.0]).is_ok());
        assert!(validate_finite(&[]).is_ok());

        match validate_finite(&[1.0, f32::NAN]) {
            Err(VectorError::NonFiniteComponent { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected NonFiniteComponent, got {other:?}"),
        }
        assert!(validate_finite(&[f32::INFINITY]).is_err());
    }
}
