use crate::core::errors::MeasurementError;
use crate::core::utils;
use ndarray::{Array1, Array2, array};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoding / measurement basis of a single qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// Z basis {|0>, |1>}, encoded as 0.
    Rectilinear,
    /// X basis {|+>, |->}, encoded as 1.
    Diagonal,
}

impl Basis {
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Basis::Diagonal
        } else {
            Basis::Rectilinear
        }
    }

    /// The other basis.
    pub fn conjugate(self) -> Self {
        match self {
            Basis::Rectilinear => Basis::Diagonal,
            Basis::Diagonal => Basis::Rectilinear,
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::Rectilinear => write!(f, "Z"),
            Basis::Diagonal => write!(f, "X"),
        }
    }
}

/// Projective single-qubit measurement.
#[derive(Clone, Debug)]
pub struct Measurement {
    /// Projectors, one per outcome
    pub operators: Vec<Array2<Complex64>>,
    /// Bit reported for each outcome
    pub values: Vec<bool>,
}

impl Measurement {
    pub fn new(
        operators: Vec<Array2<Complex64>>,
        values: Vec<bool>,
    ) -> Result<Self, MeasurementError> {
        if operators.len() != values.len() {
            return Err(MeasurementError::CountMismatch {
                ops: operators.len(),
                vals: values.len(),
            });
        }

        if operators.is_empty() {
            return Err(MeasurementError::InvalidDimensions);
        }

        for op in &operators {
            if op.dim() != (2, 2) {
                return Err(MeasurementError::InvalidDimensions);
            }
        }

        if !utils::check_completeness(&operators, 2) {
            return Err(MeasurementError::NotComplete);
        }

        Ok(Self { operators, values })
    }

    /// Measurement in the given basis.
    pub fn for_basis(basis: Basis) -> Measurement {
        match basis {
            Basis::Rectilinear => Self::z_basis(),
            Basis::Diagonal => Self::x_basis(),
        }
    }

    /// Z basis (Computational) -> {|0>, |1>}.
    pub fn z_basis() -> Measurement {
        let v0: Array1<Complex64> = array![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)];
        let v1: Array1<Complex64> = array![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)];

        let p0 = utils::outer_product(&v0, &v0);
        let p1 = utils::outer_product(&v1, &v1);

        Measurement::new(vec![p0, p1], vec![false, true]).expect("Error in basis Z")
    }

    /// X basis (Hadamard) -> {|+>, |->}.
    pub fn x_basis() -> Measurement {
        let inv_sqrt2 = Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0);

        let v_plus: Array1<Complex64> = array![inv_sqrt2, inv_sqrt2];
        let v_minus: Array1<Complex64> = array![inv_sqrt2, -inv_sqrt2];

        let p_plus = utils::outer_product(&v_plus, &v_plus);
        let p_minus = utils::outer_product(&v_minus, &v_minus);

        Measurement::new(vec![p_plus, p_minus], vec![false, true]).expect("Error in basis X")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementResult {
    /// Index of the projector that fired
    pub index: usize,
    /// Measured bit
    pub value: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_bases_are_complete() {
        assert_eq!(Measurement::z_basis().operators.len(), 2);
        assert_eq!(Measurement::x_basis().operators.len(), 2);
    }

    #[test]
    fn incomplete_operators_are_rejected() {
        let v0: Array1<Complex64> = array![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)];
        let p0 = utils::outer_product(&v0, &v0);
        let err = Measurement::new(vec![p0], vec![false]).unwrap_err();
        assert!(matches!(err, MeasurementError::NotComplete));
    }

    #[test]
    fn count_mismatch_is_reported() {
        let err = Measurement::new(vec![Array2::eye(2)], vec![false, true]).unwrap_err();
        assert!(matches!(
            err,
            MeasurementError::CountMismatch { ops: 1, vals: 2 }
        ));
    }

    #[test]
    fn basis_bit_encoding() {
        assert_eq!(Basis::from_bit(false), Basis::Rectilinear);
        assert_eq!(Basis::from_bit(true), Basis::Diagonal);
        assert_eq!(Basis::Diagonal.conjugate(), Basis::Rectilinear);
    }
}
