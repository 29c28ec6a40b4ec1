use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum GateError {
    #[error("Matrix is not Unitary (U†U != I)")]
    NonUnitary,

    #[error("Gate must act on a single qubit (2x2 matrix), got {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },
}

#[derive(Error, Debug, Clone)]
pub enum MeasurementError {
    #[error("Number of projectors ({ops}) does not match number of outcomes ({vals})")]
    CountMismatch { ops: usize, vals: usize },

    #[error("Measurement operators do not sum to Identity (Completeness relation failed)")]
    NotComplete,

    #[error("Invalid operator dimensions")]
    InvalidDimensions,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("Key must contain at least one bit")]
    EmptyKey,

    #[error("Invalid bit character {found:?} at position {position}, expected '0' or '1'")]
    InvalidBitCharacter { position: usize, found: char },
}

#[derive(Error, Debug, Clone)]
pub enum ProtocolError {
    #[error("Length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cipher error: {0}")]
    Cipher(#[from] CipherError),
}

/// Fails with `LengthMismatch` unless both sequences have the same length.
pub(crate) fn ensure_same_length<A, B>(left: &[A], right: &[B]) -> Result<(), ProtocolError> {
    if left.len() != right.len() {
        return Err(ProtocolError::LengthMismatch {
            expected: left.len(),
            got: right.len(),
        });
    }
    Ok(())
}
