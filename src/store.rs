//! Delivery store for completed transfers, keyed by recipient.
//!
//! Each envelope is written and read as one unit behind a lock, so a reader sees
//! either the previous delivery or the new one in full. Rejected transfers are never
//! stored.

use crate::cipher::{self, BitString};
use crate::core::errors::CipherError;
use crate::protocols::qkd::bb84::TransferOutcome;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// What the receiver needs to read a delivered document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub ciphertext: BitString,
    pub key: BitString,
    pub qber: f64,
}

impl Envelope {
    /// Builds an envelope from a successful outcome; `None` for a rejection.
    pub fn from_outcome(outcome: &TransferOutcome) -> Option<Self> {
        match outcome {
            TransferOutcome::Success {
                ciphertext,
                qber,
                recipient_key,
                ..
            } => Some(Self {
                ciphertext: ciphertext.clone(),
                key: BitString::new(recipient_key.clone()),
                qber: *qber,
            }),
            TransferOutcome::Rejected { .. } => None,
        }
    }

    /// Decrypts the contents with the stored key.
    pub fn open(&self) -> Result<String, CipherError> {
        cipher::decrypt(&self.ciphertext, self.key.bits())
    }
}

#[derive(Debug, Default)]
pub struct TransferStore {
    inbox: RwLock<HashMap<String, Envelope>>,
}

impl TransferStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the envelope of a successful outcome for `recipient`, replacing any
    /// earlier delivery. Returns `false` and stores nothing for a rejection.
    pub fn deliver(&self, recipient: &str, outcome: &TransferOutcome) -> bool {
        let Some(envelope) = Envelope::from_outcome(outcome) else {
            return false;
        };
        self.put(recipient, envelope);
        true
    }

    pub fn put(&self, recipient: &str, envelope: Envelope) {
        debug!(recipient, ciphertext_bits = envelope.ciphertext.len(), "envelope stored");
        self.inbox
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(recipient.to_owned(), envelope);
    }

    pub fn get(&self, recipient: &str) -> Option<Envelope> {
        self.inbox
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(recipient)
            .cloned()
    }

    /// Removes and returns the delivery for `recipient`.
    pub fn take(&self, recipient: &str) -> Option<Envelope> {
        self.inbox
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(recipient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransferConfig;
    use crate::protocols::qkd::bb84::Bb84Session;
    use std::sync::Arc;
    use std::thread;

    fn successful_outcome(seed: u64, text: &str) -> TransferOutcome {
        let outcome = Bb84Session::with_seed(TransferConfig::default(), seed)
            .transfer(text.as_bytes())
            .unwrap();
        assert!(outcome.is_success());
        outcome
    }

    #[test]
    fn delivered_envelope_opens_to_plaintext() {
        let store = TransferStore::new();
        assert!(store.deliver("hospital 2", &successful_outcome(4, "discharge summary")));
        let envelope = store.get("hospital 2").unwrap();
        assert_eq!(envelope.open().unwrap(), "discharge summary");
        assert_eq!(envelope.qber, 0.0);
    }

    #[test]
    fn rejected_outcome_stores_nothing() {
        let store = TransferStore::new();
        let rejected = Bb84Session::with_seed(TransferConfig::default().with_num_qubits(5), 1)
            .transfer(b"x")
            .unwrap();
        assert!(!store.deliver("hospital 2", &rejected));
        assert!(store.get("hospital 2").is_none());
    }

    #[test]
    fn take_empties_the_slot() {
        let store = TransferStore::new();
        store.deliver("bob", &successful_outcome(5, "hello"));
        assert!(store.take("bob").is_some());
        assert!(store.take("bob").is_none());
    }

    #[test]
    fn concurrent_sessions_do_not_mix_envelopes() {
        let store = Arc::new(TransferStore::new());
        let handles: Vec<_> = (0..4u64)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let text = format!("document {i}");
                    let mut session = Bb84Session::with_seed(TransferConfig::default(), 100 + i);
                    let outcome = session.transfer(text.as_bytes()).unwrap();
                    store.deliver(&format!("recipient {i}"), &outcome);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for i in 0..4u64 {
            let envelope = store.get(&format!("recipient {i}")).unwrap();
            assert_eq!(envelope.open().unwrap(), format!("document {i}"));
        }
    }
}
