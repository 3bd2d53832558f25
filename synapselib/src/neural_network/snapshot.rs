use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::prelude::*;

use super::network::check_topology;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeuronSnapshot {
    pub bias: f64,
    pub activation: ActivationKind
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Persistent representation of the network parameters.
///
/// `weights[i]` contains weights of connections between layers `i` and `i + 1`
/// in the order `from_0 -> to_0, from_0 -> to_1, ..., from_1 -> to_0, ...`.
/// Every connection is stored exactly once.
pub struct NetworkSnapshot {
    pub learning_rate: f64,
    pub loss: LossKind,
    pub layers: Vec<Vec<NeuronSnapshot>>,
    pub weights: Vec<Vec<f64>>
}

impl NetworkSnapshot {
    /// Verify that the snapshot describes a valid network.
    pub fn validate(&self) -> NetworkResult<()> {
        let sizes = self.layers.iter()
            .map(Vec::len)
            .collect::<Vec<_>>();

        check_topology(&sizes)
            .map_err(|err| NetworkError::Format(err.to_string()))?;

        if !self.learning_rate.is_finite() {
            return Err(NetworkError::Format(String::from("learning rate must be a finite number")));
        }

        if self.weights.len() != sizes.len() - 1 {
            return Err(NetworkError::Format(format!(
                "expected {} groups of weights, got {}",
                sizes.len() - 1,
                self.weights.len()
            )));
        }

        for (i, weights) in self.weights.iter().enumerate() {
            let expected = sizes[i] * sizes[i + 1];

            if weights.len() != expected {
                return Err(NetworkError::Format(format!(
                    "expected {expected} weights between layers {i} and {}, got {}",
                    i + 1,
                    weights.len()
                )));
            }

            if weights.iter().any(|weight| !weight.is_finite()) {
                return Err(NetworkError::Format(format!("non-finite weight between layers {i} and {}", i + 1)));
            }
        }

        let finite_biases = self.layers.iter()
            .flatten()
            .all(|neuron| neuron.bias.is_finite());

        if !finite_biases {
            return Err(NetworkError::Format(String::from("non-finite neuron bias")));
        }

        Ok(())
    }
}

impl Network {
    /// Capture current parameters of the network.
    pub fn snapshot(&self) -> NetworkSnapshot {
        let layers = self.layers.iter()
            .map(|layer| {
                layer.neurons().iter()
                    .map(|neuron| NeuronSnapshot {
                        bias: neuron.bias(),
                        activation: neuron.activation()
                    })
                    .collect()
            })
            .collect();

        // Connections are created layer by layer in the persisted order.
        let all_weights = self.connections.weights();

        let mut offset = 0;

        let weights = self.layers.windows(2)
            .map(|pair| {
                let len = pair[0].len() * pair[1].len();
                let group = all_weights[offset..offset + len].to_vec();

                offset += len;

                group
            })
            .collect();

        NetworkSnapshot {
            learning_rate: self.learning_rate,
            loss: self.loss,
            layers,
            weights
        }
    }

    /// Rebuild the network from its snapshot.
    pub fn from_snapshot(snapshot: &NetworkSnapshot) -> NetworkResult<Self> {
        snapshot.validate()?;

        let layers = snapshot.layers.iter()
            .map(|neurons| {
                Layer::from_neurons(neurons.iter().map(|neuron| {
                    Neuron::new(neuron.bias, neuron.activation)
                }))
            })
            .collect::<Vec<_>>();

        let mut weights = snapshot.weights.iter().flatten().copied();

        let network = Self::from_layers(layers, snapshot.learning_rate, || weights.next().unwrap_or_default())
            .with_loss(snapshot.loss);

        Ok(network)
    }

    /// Serialize network parameters to a JSON document.
    ///
    /// Fails with `Format` if the parameters can't be loaded back,
    /// e.g. when some weight became NaN.
    pub fn to_json(&self) -> NetworkResult<String> {
        let snapshot = self.snapshot();

        snapshot.validate()?;

        serde_json::to_string_pretty(&snapshot)
            .map_err(|err| NetworkError::Format(err.to_string()))
    }

    /// Rebuild the network from a JSON document.
    pub fn from_json(json: &str) -> NetworkResult<Self> {
        let snapshot = serde_json::from_str::<NetworkSnapshot>(json)
            .map_err(|err| NetworkError::Format(err.to_string()))?;

        Self::from_snapshot(&snapshot)
    }

    /// Save network parameters to the given file.
    pub fn save(&self, path: impl AsRef<Path>) -> NetworkResult<()> {
        let path = path.as_ref();

        std::fs::write(path, self.to_json()?)
            .map_err(|err| NetworkError::io(path, err))?;

        log::debug!("saved network to {path:?}");

        Ok(())
    }

    /// Load network from the given file.
    pub fn load(path: impl AsRef<Path>) -> NetworkResult<Self> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path)
            .map_err(|err| NetworkError::io(path, err))?;

        let network = Self::from_json(&json)?;

        log::debug!("loaded network from {path:?}: layers = {:?}", network.layer_sizes());

        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_stores_every_weight_once() {
        let network = Network::new(3, 2, 0.1, &[4]).unwrap()
            .with_activation(ActivationKind::Relu, &[1]).unwrap();

        let snapshot = network.snapshot();

        assert_eq!(snapshot.layers.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 4, 2]);
        assert_eq!(snapshot.weights.iter().map(Vec::len).collect::<Vec<_>>(), vec![12, 8]);
        assert_eq!(snapshot.layers[1][0].activation, ActivationKind::Relu);

        let first_layer = network.layers()[0].neurons();

        // Weight from neuron 1 of the input layer to neuron 2 of the hidden one.
        let id = first_layer[1].outgoing()[2];

        assert_eq!(snapshot.weights[0][4 + 2], network.weight(id));
    }

    #[test]
    fn snapshot_round_trip() {
        let network = Network::new(2, 3, 0.25, &[5, 4]).unwrap();

        let restored = Network::from_snapshot(&network.snapshot()).unwrap();

        assert_eq!(restored, network);
    }

    #[test]
    fn invalid_snapshots() {
        let network = Network::new(2, 1, 0.1, &[2]).unwrap();

        let mut snapshot = network.snapshot();

        snapshot.weights[1].pop();

        assert!(matches!(Network::from_snapshot(&snapshot), Err(NetworkError::Format(_))));

        let mut snapshot = network.snapshot();

        snapshot.layers.truncate(1);
        snapshot.weights.clear();

        assert!(matches!(Network::from_snapshot(&snapshot), Err(NetworkError::Format(_))));

        let mut snapshot = network.snapshot();

        snapshot.weights.push(Vec::new());

        assert!(matches!(Network::from_snapshot(&snapshot), Err(NetworkError::Format(_))));
    }

    #[test]
    fn non_finite_parameters_are_not_serialized() {
        let mut network = Network::new(2, 1, 0.1, &[2]).unwrap();

        network.set_weight(3, f64::NAN);

        assert!(matches!(network.to_json(), Err(NetworkError::Format(_))));

        let mut network = Network::new(2, 1, 0.1, &[2]).unwrap();

        network.set_bias(NeuronId::new(2, 0), f64::INFINITY).unwrap();

        assert!(matches!(network.to_json(), Err(NetworkError::Format(_))));

        let mut network = Network::new(2, 1, 0.1, &[2]).unwrap();

        network.set_learning_rate(f64::NAN);

        assert!(matches!(network.to_json(), Err(NetworkError::Format(_))));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(Network::from_json("{"), Err(NetworkError::Format(_))));
        assert!(matches!(Network::from_json("[]"), Err(NetworkError::Format(_))));

        let json = Network::new(1, 1, 0.1, &[]).unwrap()
            .to_json().unwrap()
            .replace("sigmoid", "softmax");

        assert!(matches!(Network::from_json(&json), Err(NetworkError::Format(_))));
    }
}
