use crate::protocols::qkd::channel::prepare_qubit;
use crate::{Basis, Measurement, QuantumState};
use rand::Rng;
use serde::Serialize;

/// Tally of measured bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub zeros: usize,
    pub ones: usize,
}

impl OutcomeCounts {
    pub fn total(&self) -> usize {
        self.zeros + self.ones
    }

    /// Share of shots that produced `bit`.
    pub fn fraction(&self, bit: bool) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let hits = if bit { self.ones } else { self.zeros };
        hits as f64 / total as f64
    }
}

/// Measurement statistics for one (prepared bit, preparation basis, measurement basis).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BasisStatistic {
    pub bit: bool,
    pub prepared_in: Basis,
    pub measured_in: Basis,
    pub counts: OutcomeCounts,
    /// Fraction of shots that returned the prepared bit.
    pub agreement: f64,
}

/// Repeats a measurement on identical copies of a state.
///
/// Useful to check the channel statistics: a matching basis must always return the
/// prepared bit, a mismatching one should agree about half the time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sampler;

impl Sampler {
    pub fn new() -> Self {
        Self
    }

    /// Measures `num_shots` fresh copies of `state`.
    ///
    /// # Arguments
    ///
    /// * `state` - The prepared qubit; it is copied, never consumed.
    /// * `measurement` - The projective measurement to apply.
    /// * `num_shots` - The number of copies to measure.
    /// * `rng` - Random source, one draw per shot.
    pub fn run<R: Rng + ?Sized>(
        &self,
        state: &QuantumState,
        measurement: &Measurement,
        num_shots: usize,
        rng: &mut R,
    ) -> OutcomeCounts {
        let probs = state.outcome_probabilities(measurement);

        // Pre-calculate Cumulative Distribution Function (CDF) once.
        let mut cdf = Vec::with_capacity(probs.len());
        let mut current_sum = 0.0;
        for &p in &probs {
            current_sum += p;
            cdf.push(current_sum);
        }

        let mut counts = OutcomeCounts::default();

        for _ in 0..num_shots {
            let r: f64 = rng.random();

            let outcome_idx = cdf
                .iter()
                .position(|&cumulative| r < cumulative)
                .unwrap_or(probs.len() - 1);

            if measurement.values[outcome_idx] {
                counts.ones += 1;
            } else {
                counts.zeros += 1;
            }
        }

        counts
    }

    /// Full table over every bit, preparation basis and measurement basis.
    pub fn basis_statistics<R: Rng + ?Sized>(
        &self,
        num_shots: usize,
        rng: &mut R,
    ) -> Vec<BasisStatistic> {
        let bases = [Basis::Rectilinear, Basis::Diagonal];
        let mut table = Vec::with_capacity(8);

        for bit in [false, true] {
            for prepared_in in bases {
                let state = prepare_qubit(bit, prepared_in);
                for measured_in in bases {
                    let counts =
                        self.run(&state, &Measurement::for_basis(measured_in), num_shots, rng);
                    table.push(BasisStatistic {
                        bit,
                        prepared_in,
                        measured_in,
                        counts,
                        agreement: counts.fraction(bit),
                    });
                }
            }
        }

        table
    }
}
