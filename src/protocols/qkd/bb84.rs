//! BB84 key exchange followed by an encrypted document transfer.
//!
//! One call runs the whole exchange between a sender and a receiver:
//! `KeysGenerated -> QubitsPrepared -> Measured -> BasesCompared -> Sifted ->
//! QberComputed -> {RefinedAndEncrypted | Rejected}`. A rejected run is final; the
//! caller starts again with fresh randomness.

use crate::cipher::{self, BitString};
use crate::config::TransferConfig;
use crate::core::errors::{CipherError, ProtocolError};
use crate::protocols::qkd::{channel, generator, qber, refinement, sifting};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Stage reached by a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPhase {
    KeysGenerated,
    QubitsPrepared,
    Measured,
    BasesCompared,
    Sifted,
    QberComputed,
    RefinedAndEncrypted,
    Rejected,
}

impl fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferPhase::KeysGenerated => "keys generated",
            TransferPhase::QubitsPrepared => "qubits prepared",
            TransferPhase::Measured => "measured",
            TransferPhase::BasesCompared => "bases compared",
            TransferPhase::Sifted => "sifted",
            TransferPhase::QberComputed => "qber computed",
            TransferPhase::RefinedAndEncrypted => "refined and encrypted",
            TransferPhase::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Why a key exchange was abandoned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RejectionReason {
    /// Too few positions survived sifting.
    InsufficientKeyLength { length: usize, minimum: usize },
    /// Error rate at or above the threshold, in percent.
    QberExceeded { qber: f64, threshold: f64 },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::InsufficientKeyLength { .. } => write!(f, "insufficient key length"),
            RejectionReason::QberExceeded { .. } => write!(f, "QBER exceeds threshold"),
        }
    }
}

/// Counters of one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferStats {
    /// Qubits sent.
    pub raw_length: usize,
    /// Positions where both bases matched.
    pub sifted_length: usize,
    /// Disagreeing bits in the sifted keys.
    pub errors: usize,
    /// Zero when the exchange was rejected.
    pub final_key_length: usize,
}

/// Result of [`run_transfer`].
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    Rejected {
        reason: RejectionReason,
        qber: f64,
        stats: TransferStats,
    },
    Success {
        ciphertext: BitString,
        qber: f64,
        /// The receiver's final key, stored next to the ciphertext.
        recipient_key: Vec<bool>,
        stats: TransferStats,
    },
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success { .. })
    }

    pub fn qber(&self) -> f64 {
        match self {
            TransferOutcome::Rejected { qber, .. } | TransferOutcome::Success { qber, .. } => *qber,
        }
    }

    pub fn stats(&self) -> &TransferStats {
        match self {
            TransferOutcome::Rejected { stats, .. } | TransferOutcome::Success { stats, .. } => {
                stats
            }
        }
    }
}

/// Runs a full BB84 exchange and encrypts `plaintext` with the sender's final key.
///
/// Randomness is drawn from `rng` in a fixed order: sender bits, sender bases,
/// receiver bases, then one draw per qubit during measurement. The same seed always
/// gives the same outcome.
///
/// # Errors
///
/// Returns `ProtocolError::InvalidConfig` for an out-of-range threshold or a
/// `min_key_length` below 2. Rejections
/// are reported as [`TransferOutcome::Rejected`], not as errors.
#[instrument(skip_all, fields(num_qubits = config.num_qubits, plaintext_len = plaintext.len()))]
pub fn run_transfer<R: Rng + ?Sized>(
    rng: &mut R,
    plaintext: &[u8],
    config: &TransferConfig,
) -> Result<TransferOutcome, ProtocolError> {
    config.validate()?;
    let n = config.num_qubits;

    let sender_bits = generator::generate_bits(rng, n);
    let sender_bases = generator::generate_bases(rng, n);
    debug!(phase = %TransferPhase::KeysGenerated, n);

    let qubits = channel::prepare(&sender_bits, &sender_bases)?;
    debug!(phase = %TransferPhase::QubitsPrepared, qubits = qubits.len());

    let receiver_bases = generator::generate_bases(rng, n);
    let receiver_bits = channel::measure(rng, qubits, &receiver_bases)?;
    debug!(phase = %TransferPhase::Measured);

    let matching = sifting::compare_bases(&sender_bases, &receiver_bases)?;
    debug!(phase = %TransferPhase::BasesCompared, matching = matching.len());

    let sender_key = sifting::sift(&sender_bits, &matching);
    let receiver_key = sifting::sift(&receiver_bits, &matching);
    debug!(phase = %TransferPhase::Sifted, sifted_length = sender_key.len());

    let errors = qber::count_errors(&sender_key, &receiver_key)?;
    let qber = qber::qber(&sender_key, &receiver_key)?;
    debug!(phase = %TransferPhase::QberComputed, errors, qber);

    let mut stats = TransferStats {
        raw_length: n,
        sifted_length: sender_key.len(),
        errors,
        final_key_length: 0,
    };

    let rejection = if sender_key.len() < config.min_key_length {
        Some(RejectionReason::InsufficientKeyLength {
            length: sender_key.len(),
            minimum: config.min_key_length,
        })
    } else if qber >= config.qber_threshold {
        Some(RejectionReason::QberExceeded {
            qber,
            threshold: config.qber_threshold,
        })
    } else {
        None
    };

    if let Some(reason) = rejection {
        warn!(phase = %TransferPhase::Rejected, %reason, qber, sifted_length = stats.sifted_length);
        return Ok(TransferOutcome::Rejected {
            reason,
            qber,
            stats,
        });
    }

    let (sender_key, receiver_key) = refinement::correct(sender_key, receiver_key);
    let sender_final = refinement::amplify(&sender_key);
    let recipient_key = refinement::amplify(&receiver_key);
    stats.final_key_length = sender_final.len();

    let ciphertext = cipher::encrypt(plaintext, &sender_final)?;
    info!(
        phase = %TransferPhase::RefinedAndEncrypted,
        qber,
        final_key_length = stats.final_key_length,
        ciphertext_bits = ciphertext.len(),
        "transfer complete"
    );

    Ok(TransferOutcome::Success {
        ciphertext,
        qber,
        recipient_key,
        stats,
    })
}

/// Receiver side: decrypts stored ciphertext with the stored key.
pub fn decrypt_received(ciphertext: &BitString, key: &[bool]) -> Result<String, CipherError> {
    cipher::decrypt(ciphertext, key)
}

/// An independent pipeline with its own random stream.
///
/// Concurrent transfers should each use their own session.
#[derive(Debug, Clone)]
pub struct Bb84Session {
    rng: ChaCha20Rng,
    config: TransferConfig,
}

impl Bb84Session {
    /// Session seeded from the thread-local generator.
    pub fn new(config: TransferConfig) -> Self {
        Self {
            rng: ChaCha20Rng::from_rng(&mut rand::rng()),
            config,
        }
    }

    /// Reproducible session.
    pub fn with_seed(config: TransferConfig, seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            config,
        }
    }

    pub fn transfer(&mut self, plaintext: &[u8]) -> Result<TransferOutcome, ProtocolError> {
        run_transfer(&mut self.rng, plaintext, &self.config)
    }
}
