//! BB84 quantum key distribution simulation feeding a repeating-key stream cipher.
//!
//! A sender and a receiver agree on a key through a simulated BB84 exchange; the
//! sender then encrypts a document with it and the receiver decrypts with its own
//! copy. See [`run_transfer`] for the full pipeline.

pub mod cipher;
pub mod config;
mod core;
pub mod protocols;
mod sampler;
pub mod store;

pub use crate::cipher::BitString;
pub use crate::config::TransferConfig;
pub use crate::core::{
    Basis, Gate, Measurement, MeasurementResult, QuantumState, errors, utils,
};
pub use crate::protocols::bb84::{
    Bb84Session, RejectionReason, TransferOutcome, TransferPhase, TransferStats,
    decrypt_received, run_transfer,
};
pub use crate::sampler::{BasisStatistic, OutcomeCounts, Sampler};
pub use crate::store::{Envelope, TransferStore};
