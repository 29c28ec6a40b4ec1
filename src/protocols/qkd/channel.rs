//! Qubit preparation on the sender side and measurement on the receiver side.

use crate::core::errors::{ProtocolError, ensure_same_length};
use crate::{Basis, Gate, Measurement, QuantumState};
use rand::Rng;

/// Encodes one bit: |0>, then X for a 1, then H for the diagonal basis.
///
/// (0,Z) -> |0>, (1,Z) -> |1>, (0,X) -> |+>, (1,X) -> |->
pub fn prepare_qubit(bit: bool, basis: Basis) -> QuantumState {
    let mut state = QuantumState::new();

    if bit {
        state.apply(&Gate::x());
    }
    if basis == Basis::Diagonal {
        state.apply(&Gate::h());
    }

    state
}

/// Prepares one qubit per (bit, basis) pair, in channel order.
pub fn prepare(bits: &[bool], bases: &[Basis]) -> Result<Vec<QuantumState>, ProtocolError> {
    ensure_same_length(bits, bases)?;

    Ok(bits
        .iter()
        .zip(bases)
        .map(|(&bit, &basis)| prepare_qubit(bit, basis))
        .collect())
}

/// Measures every qubit in the receiver's basis, consuming the states.
///
/// One random draw is taken per qubit, in channel order.
pub fn measure<R: Rng + ?Sized>(
    rng: &mut R,
    states: Vec<QuantumState>,
    bases: &[Basis],
) -> Result<Vec<bool>, ProtocolError> {
    ensure_same_length(&states, bases)?;

    let z = Measurement::z_basis();
    let x = Measurement::x_basis();

    Ok(states
        .into_iter()
        .zip(bases)
        .map(|(state, &basis)| {
            let measurement = match basis {
                Basis::Rectilinear => &z,
                Basis::Diagonal => &x,
            };
            state.measure(measurement, rng).value
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::qkd::generator::{generate_bases, generate_bits};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const BASES: [Basis; 2] = [Basis::Rectilinear, Basis::Diagonal];

    #[test]
    fn matched_basis_returns_original_bit_every_time() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        for _ in 0..500 {
            for bit in [false, true] {
                for basis in BASES {
                    let states = prepare(&[bit], &[basis]).unwrap();
                    let measured = measure(&mut rng, states, &[basis]).unwrap();
                    assert_eq!(measured, vec![bit], "bit {bit} basis {basis}");
                }
            }
        }
    }

    #[test]
    fn mismatched_basis_is_a_fair_coin() {
        let mut rng = ChaCha20Rng::seed_from_u64(2024);
        let trials = 10_000;

        let bits = generate_bits(&mut rng, trials);
        let bases = generate_bases(&mut rng, trials);
        let opposite: Vec<Basis> = bases.iter().map(|b| b.conjugate()).collect();

        let states = prepare(&bits, &bases).unwrap();
        let measured = measure(&mut rng, states, &opposite).unwrap();

        let agreeing = bits
            .iter()
            .zip(&measured)
            .filter(|(a, b)| a == b)
            .count();
        let fraction = agreeing as f64 / trials as f64;
        assert!((fraction - 0.5).abs() <= 0.02, "fraction = {fraction}");
    }

    #[test]
    fn output_keeps_channel_order() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let bits = vec![true, false, false, true, true, false];
        let bases = vec![
            Basis::Rectilinear,
            Basis::Diagonal,
            Basis::Diagonal,
            Basis::Rectilinear,
            Basis::Diagonal,
            Basis::Rectilinear,
        ];
        let states = prepare(&bits, &bases).unwrap();
        assert_eq!(measure(&mut rng, states, &bases).unwrap(), bits);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = prepare(&[true, false], &[Basis::Diagonal]).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::LengthMismatch {
                expected: 2,
                got: 1
            }
        ));

        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let states = prepare(&[true], &[Basis::Diagonal]).unwrap();
        assert!(measure(&mut rng, states, &[]).is_err());
    }
}
