//! Basis reconciliation over the public channel.

use crate::Basis;
use crate::core::errors::{ProtocolError, ensure_same_length};

/// Ascending indices at which both parties picked the same basis.
pub fn compare_bases(sender: &[Basis], receiver: &[Basis]) -> Result<Vec<usize>, ProtocolError> {
    ensure_same_length(sender, receiver)?;

    Ok(sender
        .iter()
        .zip(receiver)
        .enumerate()
        .filter_map(|(i, (a, b))| (a == b).then_some(i))
        .collect())
}

/// Keeps the bits at `indices`, in the order given.
///
/// # Panics
///
/// Panics if an index is out of bounds for `bits`.
pub fn sift(bits: &[bool], indices: &[usize]) -> Vec<bool> {
    indices.iter().map(|&i| bits[i]).collect()
}
