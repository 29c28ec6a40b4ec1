//! Quantum Key Distribution (QKD).
//!
//! The BB84 exchange is split into its stages, leaves first:
//! - **generator**: random bits and bases for each participant.
//! - **channel**: qubit preparation and measurement.
//! - **sifting**: basis comparison and key sifting.
//! - **qber**: error rate between the sifted keys.
//! - **refinement**: error correction and privacy amplification.
//! - **bb84**: the end-to-end transfer driving all of the above.

pub mod bb84;
pub mod channel;
pub mod generator;
pub mod qber;
pub mod refinement;
pub mod sifting;
