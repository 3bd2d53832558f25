use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::prelude::*;

#[inline]
pub fn linear(x: f64) -> f64 {
    x
}

#[inline]
pub fn linear_derivative(_: f64) -> f64 {
    1.0
}

#[inline]
/// `1 / (1 + e^-x)`
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[inline]
/// `y * (1 - y)` where `y = sigmoid(x)` is the already activated value.
pub fn sigmoid_derivative(y: f64) -> f64 {
    y * (1.0 - y)
}

#[inline]
/// `max(0, x)`
pub fn relu(x: f64) -> f64 {
    x.max(0.0)
}

#[inline]
/// `1` for positive activated values, `0` otherwise.
///
/// `relu(x) > 0` exactly when `x > 0`, so the activated value is enough.
pub fn relu_derivative(y: f64) -> f64 {
    if y > 0.0 { 1.0 } else { 0.0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Value which must be given to the derivative of an activation function.
pub enum DerivativeInput {
    /// Activated neuron value (`y`).
    Output,

    /// Weighted sum before activation (`z`).
    RawSum
}

#[derive(Debug, Clone, Copy)]
/// Activation function with its derivative.
pub struct ActivationPair {
    pub forward: fn(f64) -> f64,
    pub derivative: fn(f64) -> f64,

    /// What `derivative` expects as its argument.
    pub derivative_input: DerivativeInput
}

impl ActivationPair {
    #[inline]
    /// Calculate derivative of the activation function for
    /// a neuron with given activated value and raw sum.
    pub fn derivative_at(&self, value: f64, raw_sum: f64) -> f64 {
        match self.derivative_input {
            DerivativeInput::Output => (self.derivative)(value),
            DerivativeInput::RawSum => (self.derivative)(raw_sum)
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Registered activation functions.
pub enum ActivationKind {
    #[default]
    Identity,
    Sigmoid,
    Relu
}

impl ActivationKind {
    pub const ALL: [Self; 3] = [Self::Identity, Self::Sigmoid, Self::Relu];

    /// Resolve the activation function pair.
    ///
    /// All the currently registered derivatives are expressed
    /// through the activated value.
    pub fn pair(&self) -> ActivationPair {
        match self {
            Self::Identity => ActivationPair {
                forward: linear,
                derivative: linear_derivative,
                derivative_input: DerivativeInput::Output
            },

            Self::Sigmoid => ActivationPair {
                forward: sigmoid,
                derivative: sigmoid_derivative,
                derivative_input: DerivativeInput::Output
            },

            Self::Relu => ActivationPair {
                forward: relu,
                derivative: relu_derivative,
                derivative_input: DerivativeInput::Output
            }
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Sigmoid  => "sigmoid",
            Self::Relu     => "relu"
        }
    }
}

impl fmt::Display for ActivationKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActivationKind {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| NetworkError::UnknownKind {
                kind: s.to_string()
            })
    }
}
