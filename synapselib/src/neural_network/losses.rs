use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::prelude::*;

/// `mean((prediction - expected)^2)`
pub fn mean_squared_error(prediction: &[f64], expected: &[f64]) -> NetworkResult<f64> {
    if prediction.len() != expected.len() {
        return Err(NetworkError::ShapeMismatch {
            expected: prediction.len(),
            got: expected.len()
        });
    }

    let sum = prediction.iter()
        .zip(expected)
        .map(|(actual, expected)| (actual - expected).powi(2))
        .sum::<f64>();

    Ok(sum / prediction.len() as f64)
}

#[inline]
/// `2 / n * (prediction - expected)`
pub fn mean_squared_error_derivative(prediction: f64, expected: f64, n: usize) -> f64 {
    2.0 / n as f64 * (prediction - expected)
}

#[derive(Debug, Clone, Copy)]
/// Loss function with its per-element derivative.
pub struct LossPair {
    /// `(prediction, expected) -> loss`
    pub forward: fn(&[f64], &[f64]) -> NetworkResult<f64>,

    /// `(prediction_i, expected_i, outputs) -> gradient_i`
    pub derivative: fn(f64, f64, usize) -> f64
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Registered loss functions.
pub enum LossKind {
    #[default]
    #[serde(rename = "mse")]
    MeanSquaredError
}

impl LossKind {
    pub const ALL: [Self; 1] = [Self::MeanSquaredError];

    #[inline]
    pub fn pair(&self) -> LossPair {
        match self {
            Self::MeanSquaredError => LossPair {
                forward: mean_squared_error,
                derivative: mean_squared_error_derivative
            }
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MeanSquaredError => "mse"
        }
    }
}

impl fmt::Display for LossKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LossKind {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| NetworkError::UnknownKind {
                kind: s.to_string()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mse_forward() {
        let loss = mean_squared_error(&[1.0, 0.0, 0.5], &[0.0, 0.0, 1.0]).unwrap();

        assert!((loss - (1.0 + 0.25) / 3.0).abs() < 1e-12);
        assert_eq!(mean_squared_error(&[0.3, 0.3], &[0.3, 0.3]).unwrap(), 0.0);
    }

    #[test]
    fn mse_shape_mismatch() {
        assert!(matches!(
            mean_squared_error(&[1.0, 2.0], &[1.0]),
            Err(NetworkError::ShapeMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn mse_derivative_matches_forward() {
        let prediction = [0.2, 0.9];
        let expected = [1.0, 0.0];

        let h = 1e-6;

        for i in 0..2 {
            let mut plus = prediction;
            let mut minus = prediction;

            plus[i] += h;
            minus[i] -= h;

            let numeric = (mean_squared_error(&plus, &expected).unwrap() - mean_squared_error(&minus, &expected).unwrap()) / (2.0 * h);
            let analytic = mean_squared_error_derivative(prediction[i], expected[i], 2);

            assert!((numeric - analytic).abs() < 1e-6);
        }
    }

    #[test]
    fn parse_kinds() {
        assert_eq!("mse".parse::<LossKind>().unwrap(), LossKind::MeanSquaredError);
        assert!(matches!("cross_entropy".parse::<LossKind>(), Err(NetworkError::UnknownKind { .. })));
    }
}
