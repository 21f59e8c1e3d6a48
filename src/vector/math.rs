//! Dimension-agnostic vector primitives.
//!
//! Inputs are `f32` slices, but sums are carried in `f64`: squaring a
//! component near `f32::MAX` (or below its smallest normal) would otherwise
//! overflow to infinity or flush to zero before the ratio is taken.
//!
//! Callers are expected to have validated dimensions already (the store does
//! this on every upsert); a length mismatch here is a programming error and
//! fails fast.

/// Sum of elementwise products.
///
/// # Panics
/// Panics if `a` and `b` have different lengths.
#[must_use]
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    assert_eq!(a.len(), b.len(), "Vectors must have same dimension");
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| f64::from(x) * f64::from(y))
        .sum()
}

/// Euclidean norm.
#[must_use]
pub fn magnitude(a: &[f32]) -> f64 {
    dot(a, a).sqrt()
}

/// Cosine similarity in `[-1.0, 1.0]`.
///
/// A zero vector has no direction, so any pair involving one scores `0.0`
/// (including a zero vector against itself).
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product = dot(a, b);
    let norm_a = magnitude(a);
    let norm_b = magnitude(b);

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    // Rounding can push |cos| a hair past 1.0 for near-parallel vectors
    (dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0) as f32
}

/// Sum of squared elementwise differences.
///
/// Nearest-centroid assignment only needs relative ordering, so the square
/// root is skipped.
///
/// # Panics
/// Panics if `a` and `b` have different lengths.
#[must_use]
pub fn squared_distance(a: &[f32], b: &[f32]) -> f64 {
    assert_eq!(a.len(), b.len(), "Vectors must have same dimension");
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let diff = f64::from(x) - f64::from(y);
            diff * diff
        })
        .sum()
}

/// Componentwise mean of a non-empty set of equal-length vectors.
///
/// Returns `None` when `vectors` is empty.
pub fn mean_vector<'a, I>(vectors: I, dimension: usize) -> Option<Vec<f32>>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut sum = vec![0.0f64; dimension];
    let mut count = 0usize;

    for vector in vectors {
        assert_eq!(vector.len(), dimension, "Vectors must have same dimension");
        for (acc, &value) in sum.iter_mut().zip(vector) {
            *acc += f64::from(value);
        }
        count += 1;
    }

    if count == 0 {
        return None;
    }

    Some(sum.into_iter().map(|v| (v / count as f64) as f32).collect())
}
