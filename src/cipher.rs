//! Repeating-key XOR stream cipher over bit sequences.
//!
//! Plaintext bytes are expanded most-significant bit first, then XORed with the key
//! bits repeated cyclically to the plaintext length. This is a teaching cipher and
//! offers no real confidentiality once the key repeats.

use crate::core::errors::CipherError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A sequence of bits, stored and exchanged as a string of `'0'`/`'1'` characters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BitString(Vec<bool>);

impl BitString {
    pub fn new(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for BitString {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(CipherError::InvalidBitCharacter { position, found }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl TryFrom<String> for BitString {
    type Error = CipherError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BitString> for String {
    fn from(value: BitString) -> Self {
        value.to_string()
    }
}

/// Expands bytes into bits, most significant bit first.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
        .collect()
}

/// Packs bits into bytes, most significant bit first. A trailing group shorter than
/// eight bits is dropped.
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8))
        .collect()
}

/// XORs `bits` with `key` repeated to the same length.
fn apply_keystream(bits: &[bool], key: &[bool]) -> Result<Vec<bool>, CipherError> {
    if key.is_empty() {
        return Err(CipherError::EmptyKey);
    }

    Ok(bits
        .iter()
        .zip(key.iter().cycle())
        .map(|(&b, &k)| b ^ k)
        .collect())
}

/// Encrypts `plaintext` under `key`.
pub fn encrypt(plaintext: &[u8], key: &[bool]) -> Result<BitString, CipherError> {
    apply_keystream(&bytes_to_bits(plaintext), key).map(BitString)
}

/// Decrypts back to raw bytes. Trailing bits that do not fill a byte are dropped.
pub fn decrypt_bytes(ciphertext: &BitString, key: &[bool]) -> Result<Vec<u8>, CipherError> {
    let plain_bits = apply_keystream(ciphertext.bits(), key)?;
    Ok(bits_to_bytes(&plain_bits))
}

/// Decrypts to text. Byte sequences that are not valid UTF-8 are skipped, so a wrong
/// key yields garbled text rather than an error.
pub fn decrypt(ciphertext: &BitString, key: &[bool]) -> Result<String, CipherError> {
    let bytes = decrypt_bytes(ciphertext, key)?;

    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_msb_first() {
        assert_eq!(
            bytes_to_bits(&[0b1000_0001]),
            vec![true, false, false, false, false, false, false, true]
        );
        assert_eq!(bits_to_bytes(&bytes_to_bits(b"Az")), b"Az".to_vec());
    }

    #[test]
    fn encrypt_matches_hand_computed_stream() {
        // 'A' = 01000001, key 10 repeated -> 10101010
        let ct = encrypt(b"A", &[true, false]).unwrap();
        assert_eq!(ct.to_string(), "11101011");
    }

    #[test]
    fn ciphertext_length_equals_plaintext_bits() {
        let ct = encrypt(b"hello", &[true, true, false]).unwrap();
        assert_eq!(ct.len(), 40);
    }

    #[test]
    fn round_trip_with_short_and_long_keys() {
        let msg = "Patient record #42: all clear.";
        for key in [vec![true], vec![false, true, true], vec![true; 500]] {
            let ct = encrypt(msg.as_bytes(), &key).unwrap();
            assert_eq!(decrypt(&ct, &key).unwrap(), msg);
        }
    }

    #[test]
    fn empty_key_is_rejected() {
        assert_eq!(encrypt(b"x", &[]), Err(CipherError::EmptyKey));
        let ct = BitString::new(vec![true; 8]);
        assert_eq!(decrypt(&ct, &[]), Err(CipherError::EmptyKey));
    }

    #[test]
    fn trailing_partial_byte_is_dropped() {
        let mut bits = bytes_to_bits(b"ok");
        bits.extend([true, false, true]);
        let ct = BitString::new(bits);
        assert_eq!(decrypt(&ct, &[false]).unwrap(), "ok");
    }

    #[test]
    fn invalid_utf8_is_skipped() {
        let mut bytes = b"ab".to_vec();
        bytes.push(0xFF);
        bytes.extend_from_slice(b"cd");
        let ct = BitString::new(bytes_to_bits(&bytes));
        assert_eq!(decrypt(&ct, &[false]).unwrap(), "abcd");
    }

    #[test]
    fn bit_string_parse_and_display() {
        let bs: BitString = "0110".parse().unwrap();
        assert_eq!(bs.bits(), &[false, true, true, false]);
        assert_eq!(bs.to_string(), "0110");
        assert_eq!(
            "01x".parse::<BitString>(),
            Err(CipherError::InvalidBitCharacter {
                position: 2,
                found: 'x'
            })
        );
    }

    #[test]
    fn bit_string_serializes_as_string() {
        let bs = BitString::new(vec![true, false, true]);
        let json = serde_json::to_string(&bs).unwrap();
        assert_eq!(json, "\"101\"");
        let back: BitString = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bs);
        assert!(serde_json::from_str::<BitString>("\"102\"").is_err());
    }
}
