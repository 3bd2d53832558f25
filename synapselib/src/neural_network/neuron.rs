use crate::prelude::*;

#[derive(Debug, Clone, PartialEq)]
/// Single neuron (unit) representation.
///
/// Neuron accumulates weighted values of the neurons from the previous layer,
/// adds a bias and uses activation function on the sum to produce its output.
/// Weights are owned by the network's [`Connections`] store, neuron
/// only remembers ids of its outgoing and incoming connections.
pub struct Neuron {
    /// Activated output (`y`).
    pub(crate) value: f64,

    /// Weighted sum before activation (`z`).
    pub(crate) raw_sum: f64,

    /// Gradient of the loss by the raw sum.
    pub(crate) delta: f64,

    /// Value added to the weighted input sum.
    /// Never used by the input layer neurons.
    pub(crate) bias: f64,

    pub(crate) activation: ActivationKind,

    /// Connections to the next layer neurons, in their order.
    pub(crate) next: Vec<ConnectionId>,

    /// Connections from the previous layer neurons, in their order.
    pub(crate) previous: Vec<ConnectionId>
}

impl Neuron {
    #[inline]
    pub fn new(bias: f64, activation: ActivationKind) -> Self {
        Self {
            value: 0.0,
            raw_sum: 0.0,
            delta: 0.0,
            bias,
            activation,
            next: Vec::new(),
            previous: Vec::new()
        }
    }

    #[inline]
    /// Create new neuron with random bias in `[-0.1, 0.1)` range.
    pub fn random(activation: ActivationKind) -> Self {
        Self::new(fastrand::f64() * 0.2 - 0.1, activation)
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn raw_sum(&self) -> f64 {
        self.raw_sum
    }

    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    #[inline]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    #[inline]
    pub fn activation(&self) -> ActivationKind {
        self.activation
    }

    #[inline]
    pub fn outgoing(&self) -> &[ConnectionId] {
        &self.next
    }

    #[inline]
    pub fn incoming(&self) -> &[ConnectionId] {
        &self.previous
    }

    /// Add bias to the accumulated value, remember the sum
    /// and replace the value by its activation.
    pub(crate) fn activate(&mut self) {
        self.value += self.bias;
        self.raw_sum = self.value;
        self.value = (self.activation.pair().forward)(self.raw_sum);
    }

    #[inline]
    /// Derivative of the activation function at the current state of the neuron.
    pub fn activation_derivative(&self) -> f64 {
        self.activation.pair().derivative_at(self.value, self.raw_sum)
    }
}

#[test]
fn test_neuron_activation() {
    let mut neuron = Neuron::new(0.5, ActivationKind::Sigmoid);

    neuron.value = -0.5;
    neuron.activate();

    assert_eq!(neuron.raw_sum(), 0.0);
    assert_eq!(neuron.value(), 0.5);
    assert_eq!(neuron.activation_derivative(), 0.25);

    let neuron = Neuron::random(ActivationKind::Identity);

    assert!((-0.1..0.1).contains(&neuron.bias()));
}
