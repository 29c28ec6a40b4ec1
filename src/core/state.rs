use crate::core::Gate;
use crate::core::measurements::{Measurement, MeasurementResult};
use crate::core::utils::{self, trace};
use ndarray::Array2;
use num_complex::Complex64;
use rand::Rng;

/// Single-qubit state held as a 2x2 density matrix.
#[derive(Clone, Debug)]
pub struct QuantumState {
    pub density_matrix: Array2<Complex64>,
}

impl Default for QuantumState {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantumState {
    /// Creates a new qubit initialized to |0>.
    pub fn new() -> Self {
        let mut density_matrix = Array2::<Complex64>::zeros((2, 2));
        density_matrix[[0, 0]] = Complex64::new(1.0, 0.0);

        Self { density_matrix }
    }

    /// Applies a gate: rho -> U rho U†
    pub fn apply(&mut self, gate: &Gate) {
        let temp = gate.matrix.dot(&self.density_matrix);
        self.density_matrix = temp.dot(&gate.dagger());
    }

    /// Probability of each outcome of `measurement`, cleaned and renormalised.
    pub fn outcome_probabilities(&self, measurement: &Measurement) -> Vec<f64> {
        let weights: Vec<Complex64> = measurement
            .operators
            .iter()
            .map(|op| {
                let temp = op.dot(&self.density_matrix);
                trace(&temp.dot(&utils::dagger(op)))
            })
            .collect();

        utils::normalize_probabilities(&weights)
    }

    /// Physical measurement. The state is consumed: a qubit can be read only once.
    pub fn measure<R: Rng + ?Sized>(
        self,
        measurement: &Measurement,
        rng: &mut R,
    ) -> MeasurementResult {
        let probs = self.outcome_probabilities(measurement);
        let index = pick_outcome(&probs, rng);

        MeasurementResult {
            index,
            value: measurement.values[index],
        }
    }
}

/// Randomly selects an outcome index weighted by `probs`, one `f64` draw per call.
fn pick_outcome<R: Rng + ?Sized>(probs: &[f64], rng: &mut R) -> usize {
    let roll: f64 = rng.random();

    let mut cumulative = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumulative += p;
        if roll < cumulative {
            return i;
        }
    }
    probs.len().saturating_sub(1)
}
