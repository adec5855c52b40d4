//! Vector similarity scoring.

use crate::errors::AppError;

/// Guards against division by zero on near-zero vectors.
const EPSILON: f64 = 1e-10;

/// Raw cosine similarity in [-1, 1].
///
/// Vectors of different dimensionality are rejected as a validation error,
/// never truncated or padded.
pub fn cosine(a: &[f32], b: &[f32]) -> Result<f64, AppError> {
    if a.len() != b.len() {
        return Err(AppError::Validation(format!(
            "embedding dimensionality mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        dot += f64::from(x) * f64::from(y);
        norm_a += f64::from(x) * f64::from(x);
        norm_b += f64::from(y) * f64::from(y);
    }

    let denom = norm_a.sqrt() * norm_b.sqrt() + EPSILON;
    Ok(dot / denom)
}

/// Cosine similarity rescaled from [-1, 1] to [0, 1].
pub fn cosine_scaled(a: &[f32], b: &[f32]) -> Result<f64, AppError> {
    Ok((cosine(a, b)? + 1.0) / 2.0)
}
