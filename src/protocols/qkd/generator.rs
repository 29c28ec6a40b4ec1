//! Random bit and basis choices for one BB84 participant.

use crate::Basis;
use rand::Rng;

/// `n` independent, uniformly distributed bits.
pub fn generate_bits<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<bool> {
    (0..n).map(|_| rng.random_bool(0.5)).collect()
}

/// `n` independent, uniformly distributed bases.
pub fn generate_bases<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<Basis> {
    (0..n).map(|_| Basis::from_bit(rng.random_bool(0.5))).collect()
}
