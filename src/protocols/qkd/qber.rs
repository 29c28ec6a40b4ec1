//! Quantum bit error rate between the two sifted keys.

use crate::core::errors::{ProtocolError, ensure_same_length};

/// Number of positions where the two keys disagree.
pub fn count_errors(sender_key: &[bool], receiver_key: &[bool]) -> Result<usize, ProtocolError> {
    ensure_same_length(sender_key, receiver_key)?;

    Ok(sender_key
        .iter()
        .zip(receiver_key)
        .filter(|(a, b)| a != b)
        .count())
}

/// Mismatch rate in percent.
///
/// An empty key has no usable material and is reported as 100%.
pub fn qber(sender_key: &[bool], receiver_key: &[bool]) -> Result<f64, ProtocolError> {
    let errors = count_errors(sender_key, receiver_key)?;
    let len = sender_key.len();

    Ok(if len > 0 {
        (errors as f64 / len as f64) * 100.0
    } else {
        100.0
    })
}
