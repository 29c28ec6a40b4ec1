use crate::core::errors::ProtocolError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Qubits sent per transfer.
pub const DEFAULT_NUM_QUBITS: usize = 100;
/// QBER, in percent, at or above which the key is discarded.
pub const DEFAULT_QBER_THRESHOLD: f64 = 11.0;
/// Shortest sifted key that is still refined and used.
pub const DEFAULT_MIN_KEY_LENGTH: usize = 10;

/// Parameters of one key exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransferConfig {
    pub num_qubits: usize,
    /// Percentage in [0, 100].
    pub qber_threshold: f64,
    pub min_key_length: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            num_qubits: DEFAULT_NUM_QUBITS,
            qber_threshold: DEFAULT_QBER_THRESHOLD,
            min_key_length: DEFAULT_MIN_KEY_LENGTH,
        }
    }
}

impl TransferConfig {
    pub fn with_num_qubits(mut self, num_qubits: usize) -> Self {
        self.num_qubits = num_qubits;
        self
    }

    pub fn with_qber_threshold(mut self, qber_threshold: f64) -> Self {
        self.qber_threshold = qber_threshold;
        self
    }

    pub fn with_min_key_length(mut self, min_key_length: usize) -> Self {
        self.min_key_length = min_key_length;
        self
    }

    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ProtocolError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ProtocolError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ProtocolError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| ProtocolError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ProtocolError> {
        if !(0.0..=100.0).contains(&self.qber_threshold) {
            return Err(ProtocolError::InvalidConfig(format!(
                "qber_threshold must be between 0 and 100, got {}",
                self.qber_threshold
            )));
        }
        // Amplification halves the key, so a single sifted bit leaves nothing to encrypt with.
        if self.min_key_length < 2 {
            return Err(ProtocolError::InvalidConfig(format!(
                "min_key_length must be at least 2, got {}",
                self.min_key_length
            )));
        }
        Ok(())
    }
}
