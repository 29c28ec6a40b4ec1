//! Utility functions for single-qubit operations.
//!
//! This module contains helper functions for:
//! - Matrix operations (trace, outer product, conjugate transpose).
//! - Completeness checks for projective measurements.
//! - Cleaning probabilities coming out of floating-point amplitude arithmetic.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// Values below this are treated as numerical noise.
pub const PROBABILITY_EPSILON: f64 = 1e-12;

/// Computes the trace of a matrix (sum of diagonal elements).
pub fn trace(matrix: &Array2<Complex64>) -> Complex64 {
    matrix.diag().sum()
}

/// Conjugate transpose $M^\dagger$.
pub fn dagger(matrix: &Array2<Complex64>) -> Array2<Complex64> {
    matrix.t().mapv(|c| c.conj())
}

/// Computes the outer product of two vectors $|a\rangle\langle b|$.
pub fn outer_product(a: &Array1<Complex64>, b: &Array1<Complex64>) -> Array2<Complex64> {
    let n = a.len();
    let m = b.len();
    let mut res = Array2::zeros((n, m));

    for i in 0..n {
        for j in 0..m {
            res[[i, j]] = a[i] * b[j].conj();
        }
    }
    res
}

/// Checks completeness relation for measurement operators.
///
/// Verifies if $\sum M_k^\dagger M_k = I$.
pub fn check_completeness(ops: &[Array2<Complex64>], dim: usize) -> bool {
    let eye = Array2::<Complex64>::eye(dim);
    let sum = ops
        .iter()
        .fold(Array2::<Complex64>::zeros((dim, dim)), |acc, op| {
            acc + dagger(op).dot(op)
        });
    sum.iter()
        .zip(eye.iter())
        .all(|(a, b)| (a - b).norm() < 1e-9)
}

/// Turns raw outcome weights into a probability distribution.
///
/// Only the real part of each weight is kept; negative values and values below
/// [`PROBABILITY_EPSILON`] become zero. The result is renormalised to sum to one.
/// If every weight vanishes the distribution is uniform.
pub fn normalize_probabilities(weights: &[Complex64]) -> Vec<f64> {
    let mut probs: Vec<f64> = weights
        .iter()
        .map(|w| {
            let p = w.re;
            if p < PROBABILITY_EPSILON { 0.0 } else { p }
        })
        .collect();

    let total: f64 = probs.iter().sum();
    if total > 0.0 {
        for p in &mut probs {
            *p /= total;
        }
    } else if !probs.is_empty() {
        let uniform = 1.0 / probs.len() as f64;
        probs.iter_mut().for_each(|p| *p = uniform);
    }

    probs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_imaginary_and_negative_parts() {
        let probs = normalize_probabilities(&[
            Complex64::new(0.5, 1e-17),
            Complex64::new(0.5, -3.0),
            Complex64::new(-1e-17, 0.0),
        ]);
        assert_eq!(probs, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn numerical_dust_snaps_to_exact_certainty() {
        let probs = normalize_probabilities(&[
            Complex64::new(0.9999999999999998, 0.0),
            Complex64::new(2.2e-17, 0.0),
        ]);
        assert_eq!(probs, vec![1.0, 0.0]);
    }

    #[test]
    fn degenerate_weights_become_fair_coin() {
        let probs =
            normalize_probabilities(&[Complex64::new(0.0, 0.0), Complex64::new(-0.2, 0.0)]);
        assert_eq!(probs, vec![0.5, 0.5]);
    }

    #[test]
    fn trace_of_identity() {
        let eye = Array2::<Complex64>::eye(2);
        assert_eq!(trace(&eye), Complex64::new(2.0, 0.0));
    }
}
