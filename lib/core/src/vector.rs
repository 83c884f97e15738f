//! Vector math shared by the dense and lexical ranking paths.

use crate::{Error, Result};

#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[inline]
pub fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Sum of absolute values; zero means the vector carries no signal
#[inline]
pub fn abs_sum(v: &[f32]) -> f32 {
    v.iter().map(|x| x.abs()).sum()
}

/// Compute cosine similarity between two equal-length vectors.
///
/// Returns `0.0` when either side has zero norm, so the result is never NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product(a, b) / (norm_a * norm_b))
}

/// Normalize the vector to unit length in place
#[inline]
pub fn l2_normalize(v: &mut [f32]) {
    let n = norm(v);
    if n > f32::EPSILON {
        let inv_norm = 1.0 / n;
        for x in v.iter_mut() {
            *x *= inv_norm;
        }
    }
}
