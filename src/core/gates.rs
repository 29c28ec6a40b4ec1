use crate::core::errors::GateError;
use ndarray::{Array2, arr2};
use num_complex::Complex64;

/// Single-qubit unitary gate used to encode bits and bases into qubits.
#[derive(Clone, Debug)]
pub struct Gate {
    /// The 2x2 unitary matrix of the gate.
    pub matrix: Array2<Complex64>,
}

impl Gate {
    /// Creates a new `Gate` from a 2x2 unitary matrix.
    ///
    /// # Errors
    ///
    /// Returns a `GateError` if the matrix is not 2x2 or is not unitary.
    pub fn new(matrix: Array2<Complex64>) -> Result<Self, GateError> {
        let (rows, cols) = matrix.dim();

        if rows != 2 || cols != 2 {
            return Err(GateError::InvalidDimensions { rows, cols });
        }

        if !Self::check_unitary(&matrix) {
            return Err(GateError::NonUnitary);
        }

        Ok(Self { matrix })
    }

    /// Checks if a given matrix is unitary
    fn check_unitary(matrix: &Array2<Complex64>) -> bool {
        let (rows, _) = matrix.dim();
        let eye = Array2::<Complex64>::eye(rows);

        let u_dagger = matrix.t().mapv(|x| x.conj());
        let product = matrix.dot(&u_dagger);

        product
            .iter()
            .zip(eye.iter())
            .all(|(a, b)| (*a - *b).norm() < 1e-6)
    }

    /// Conjugate transpose of the gate matrix.
    pub fn dagger(&self) -> Array2<Complex64> {
        self.matrix.t().mapv(|x| x.conj())
    }

    /// Pauli-X gate (NOT), flips |0> and |1>.
    pub fn x() -> Gate {
        Gate::new(arr2(&[
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
            [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
        ]))
        .unwrap()
    }

    /// Hadamard gate, maps the rectilinear basis onto the diagonal one.
    pub fn h() -> Gate {
        let factor = 1.0 / 2.0_f64.sqrt();
        Gate::new(arr2(&[
            [Complex64::new(factor, 0.0), Complex64::new(factor, 0.0)],
            [Complex64::new(factor, 0.0), Complex64::new(-factor, 0.0)],
        ]))
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_unitary_matrix() {
        let m = arr2(&[
            [Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
        ]);
        assert!(matches!(Gate::new(m), Err(GateError::NonUnitary)));
    }

    #[test]
    fn rejects_wrong_dimensions() {
        let m = Array2::<Complex64>::eye(4);
        assert!(matches!(
            Gate::new(m),
            Err(GateError::InvalidDimensions { rows: 4, cols: 4 })
        ));
    }

    #[test]
    fn hadamard_is_self_inverse() {
        let h = Gate::h();
        let product = h.matrix.dot(&h.matrix);
        let eye = Array2::<Complex64>::eye(2);
        assert!(
            product
                .iter()
                .zip(eye.iter())
                .all(|(a, b)| (*a - *b).norm() < 1e-12)
        );
    }
}
