use crate::prelude::*;

#[derive(Debug, Clone, PartialEq)]
/// Group of neurons representation.
///
/// Every neuron of a layer is connected to every neuron
/// of the next layer, and receives a connection from every
/// neuron of the previous one.
pub struct Layer {
    pub(crate) neurons: Vec<Neuron>
}

impl Layer {
    #[inline]
    /// Build neurons layer from provided neurons list.
    pub fn from_neurons(neurons: impl IntoIterator<Item = Neuron>) -> Self {
        Self {
            neurons: neurons.into_iter().collect()
        }
    }

    #[inline]
    /// Build layer of given size from randomly generated neurons
    /// with provided activation function.
    pub fn random(size: usize, activation: ActivationKind) -> Self {
        Self::from_neurons((0..size).map(|_| Neuron::random(activation)))
    }

    #[inline]
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    #[inline]
    /// Activated values of all the neurons.
    pub fn values(&self) -> Vec<f64> {
        self.neurons.iter()
            .map(Neuron::value)
            .collect()
    }

    /// Change activation function of all the layer neurons.
    pub fn set_activation(&mut self, activation: ActivationKind) {
        for neuron in &mut self.neurons {
            neuron.activation = activation;
        }
    }

    /// Zero accumulated values of the neurons.
    pub(crate) fn clear(&mut self) {
        for neuron in &mut self.neurons {
            neuron.value = 0.0;
        }
    }
}

#[test]
fn test_layer_configuration() {
    let mut layer = Layer::random(4, ActivationKind::Sigmoid);

    assert_eq!(layer.len(), 4);
    assert!(layer.neurons().iter().all(|neuron| neuron.activation() == ActivationKind::Sigmoid));

    layer.set_activation(ActivationKind::Relu);

    assert!(layer.neurons().iter().all(|neuron| neuron.activation() == ActivationKind::Relu));
    assert_eq!(layer.values(), vec![0.0; 4]);
}
