use crate::prelude::*;

#[derive(Debug, Default, Clone, PartialEq)]
/// Training state of the network.
///
/// `Network::backward` is only allowed in the `Evaluated` state,
/// and moves the network back to `Unevaluated`.
pub enum TrainingState {
    #[default]
    Unevaluated,

    /// Loss was calculated for the last forward pass and
    /// can be propagated back exactly once.
    Evaluated {
        loss: f64,
        target: Vec<f64>
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Fully connected feedforward neural network.
///
/// ```
/// use synapselib::prelude::*;
///
/// // 2 inputs, 1 output, single hidden layer of 4 neurons.
/// let mut network = Network::new(2, 1, 0.5, &[4]).unwrap();
///
/// for _ in 0..2000 {
///     network.evaluate(&[0.0, 1.0], &[1.0]).unwrap();
///     network.backward().unwrap();
///
///     network.evaluate(&[1.0, 0.0], &[0.0]).unwrap();
///     network.backward().unwrap();
/// }
///
/// assert!(network.predict(&[0.0, 1.0]).unwrap()[0] > 0.5);
/// assert!(network.predict(&[1.0, 0.0]).unwrap()[0] < 0.5);
/// ```
pub struct Network {
    pub(crate) layers: Vec<Layer>,
    pub(crate) connections: Connections,
    pub(crate) learning_rate: f64,
    pub(crate) loss: LossKind,
    pub(crate) state: TrainingState
}

impl Network {
    /// Build new network with `[input_size, hidden_sizes..., output_size]`
    /// layers, random biases in `[-0.1, 0.1)` and random weights in `[-1, 1)`.
    ///
    /// Input layer neurons use `Identity` activation function,
    /// all the other ones use `Sigmoid`.
    pub fn new(
        input_size: usize,
        output_size: usize,
        learning_rate: f64,
        hidden_sizes: &[usize]
    ) -> NetworkResult<Self> {
        let mut sizes = Vec::with_capacity(hidden_sizes.len() + 2);

        sizes.push(input_size);
        sizes.extend_from_slice(hidden_sizes);
        sizes.push(output_size);

        check_topology(&sizes)?;

        let layers = sizes.iter()
            .enumerate()
            .map(|(i, size)| {
                let activation = if i == 0 {
                    ActivationKind::Identity
                } else {
                    ActivationKind::Sigmoid
                };

                Layer::random(*size, activation)
            })
            .collect::<Vec<_>>();

        let network = Self::from_layers(layers, learning_rate, || fastrand::f64() * 2.0 - 1.0);

        log::debug!(
            "built network: layers = {:?}, params = {}",
            network.layer_sizes(),
            network.params()
        );

        Ok(network)
    }

    /// Fully connect given layers, taking weights from the provided
    /// closure in connection order.
    ///
    /// Layers must be freshly created (without connections)
    /// and pass `check_topology`.
    pub(crate) fn from_layers(
        mut layers: Vec<Layer>,
        learning_rate: f64,
        mut weight: impl FnMut() -> f64
    ) -> Self {
        let capacity = layers.windows(2)
            .map(|pair| pair[0].len() * pair[1].len())
            .sum();

        let mut connections = Connections::with_capacity(capacity);

        for i in 0..layers.len() - 1 {
            let (head, tail) = layers.split_at_mut(i + 1);

            let current = &mut head[i];
            let next = &mut tail[0];

            for (j, from) in current.neurons.iter_mut().enumerate() {
                for (k, to) in next.neurons.iter_mut().enumerate() {
                    let id = connections.push(
                        NeuronId::new(i, j),
                        NeuronId::new(i + 1, k),
                        weight()
                    );

                    from.next.push(id);
                    to.previous.push(id);
                }
            }
        }

        Self {
            layers,
            connections,
            learning_rate,
            loss: LossKind::default(),
            state: TrainingState::Unevaluated
        }
    }

    #[inline]
    /// Change loss function of the network.
    pub fn with_loss(mut self, loss: LossKind) -> Self {
        self.set_loss(loss);

        self
    }

    #[inline]
    /// Change activation function of all the neurons in the given layers.
    pub fn with_activation(mut self, activation: ActivationKind, layers: &[usize]) -> NetworkResult<Self> {
        self.set_activation(activation, layers)?;

        Ok(self)
    }

    /// Change activation function of all the neurons in the given layers.
    ///
    /// No layer is changed if any of the indexes is out of range.
    pub fn set_activation(&mut self, activation: ActivationKind, layers: &[usize]) -> NetworkResult<()> {
        let len = self.layers.len();

        if let Some(index) = layers.iter().copied().find(|index| *index >= len) {
            return Err(NetworkError::IndexOutOfRange {
                index,
                len
            });
        }

        for index in layers {
            self.layers[*index].set_activation(activation);
        }

        Ok(())
    }

    #[inline]
    pub fn set_loss(&mut self, loss: LossKind) {
        self.loss = loss;
    }

    #[inline]
    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter()
            .map(Layer::len)
            .collect()
    }

    #[inline]
    pub fn input_size(&self) -> usize {
        self.layers[0].len()
    }

    #[inline]
    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].len()
    }

    #[inline]
    pub fn connections(&self) -> &Connections {
        &self.connections
    }

    #[inline]
    /// Get weight of the connection.
    ///
    /// Panics if there's no connection with given id.
    pub fn weight(&self, id: ConnectionId) -> f64 {
        self.connections.weight(id)
    }

    #[inline]
    /// Overwrite weight of the connection.
    ///
    /// Panics if there's no connection with given id.
    pub fn set_weight(&mut self, id: ConnectionId, weight: f64) {
        *self.connections.weight_mut(id) = weight;
    }

    /// Overwrite bias of the neuron.
    pub fn set_bias(&mut self, neuron: NeuronId, bias: f64) -> NetworkResult<()> {
        let len = self.layers.len();

        let layer = self.layers.get_mut(neuron.layer)
            .ok_or(NetworkError::IndexOutOfRange {
                index: neuron.layer,
                len
            })?;

        let len = layer.len();

        let neuron = layer.neurons.get_mut(neuron.index)
            .ok_or(NetworkError::IndexOutOfRange {
                index: neuron.index,
                len
            })?;

        neuron.bias = bias;

        Ok(())
    }

    #[inline]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    #[inline]
    pub fn loss(&self) -> LossKind {
        self.loss
    }

    #[inline]
    pub fn state(&self) -> &TrainingState {
        &self.state
    }

    #[inline]
    /// Loss calculated by the last `evaluate` call,
    /// if it wasn't propagated back yet.
    pub fn last_loss(&self) -> Option<f64> {
        match &self.state {
            TrainingState::Evaluated { loss, .. } => Some(*loss),
            TrainingState::Unevaluated => None
        }
    }

    /// Amount of trainable parameters (weights and biases of non-input neurons).
    pub fn params(&self) -> usize {
        let biases = self.layers[1..].iter()
            .map(Layer::len)
            .sum::<usize>();

        self.connections.len() + biases
    }

    /// Zero values of all the non-input neurons.
    pub fn clear_transient_state(&mut self) {
        for layer in &mut self.layers[1..] {
            layer.clear();
        }
    }

    /// Add weighted values of the given layer's neurons
    /// to the neurons of the next layer.
    fn propagate(&mut self, layer: usize) {
        let (head, tail) = self.layers.split_at_mut(layer + 1);

        let next = &mut tail[0];

        for neuron in &head[layer].neurons {
            for id in &neuron.next {
                let to = self.connections[*id].to.index;

                next.neurons[to].value += neuron.value * self.connections.weight(*id);
            }
        }
    }

    /// Calculate output values from the given input (forward propagation).
    fn forward(&mut self, input: &[f64]) -> NetworkResult<Vec<f64>> {
        let input_size = self.input_size();

        if input.len() != input_size {
            return Err(NetworkError::ShapeMismatch {
                expected: input_size,
                got: input.len()
            });
        }

        self.clear_transient_state();

        for (neuron, value) in self.layers[0].neurons.iter_mut().zip(input) {
            neuron.value = *value;
        }

        self.propagate(0);

        let output = self.layers.len() - 1;

        for i in 1..=output {
            for neuron in &mut self.layers[i].neurons {
                neuron.activate();
            }

            if i != output {
                self.propagate(i);
            }
        }

        Ok(self.layers[output].values())
    }

    /// Calculate output values from the given input.
    ///
    /// Neither the training state nor the neuron values are changed,
    /// so it's safe to call between `evaluate` and `backward`.
    pub fn predict(&mut self, input: &[f64]) -> NetworkResult<Vec<f64>> {
        let transient = self.transient_state();
        let output = self.forward(input);

        self.restore_transient_state(transient);

        output
    }

    /// Values and raw sums of all the neurons.
    fn transient_state(&self) -> Vec<(f64, f64)> {
        self.layers.iter()
            .flat_map(|layer| &layer.neurons)
            .map(|neuron| (neuron.value, neuron.raw_sum))
            .collect()
    }

    fn restore_transient_state(&mut self, transient: Vec<(f64, f64)>) {
        let neurons = self.layers.iter_mut()
            .flat_map(|layer| &mut layer.neurons);

        for (neuron, (value, raw_sum)) in neurons.zip(transient) {
            neuron.value = value;
            neuron.raw_sum = raw_sum;
        }
    }

    /// Run forward pass and calculate loss between the output
    /// and the target values.
    ///
    /// On success network is moved into the `Evaluated` state,
    /// on failure - into the `Unevaluated` one.
    pub fn evaluate(&mut self, input: &[f64], target: &[f64]) -> NetworkResult<f64> {
        self.state = TrainingState::Unevaluated;

        let prediction = self.forward(input)?;
        let loss = (self.loss.pair().forward)(&prediction, target)?;

        self.state = TrainingState::Evaluated {
            loss,
            target: target.to_vec()
        };

        Ok(loss)
    }

    /// Propagate the evaluated loss back through the network
    /// and update its weights and biases.
    ///
    /// All the deltas are calculated before any parameter is updated.
    pub fn backward(&mut self) -> NetworkResult<()> {
        let TrainingState::Evaluated { target, .. } = std::mem::take(&mut self.state) else {
            return Err(NetworkError::StateViolation("must evaluate before backward"));
        };

        self.calculate_deltas(&target);
        self.update_parameters();

        Ok(())
    }

    fn calculate_deltas(&mut self, target: &[f64]) {
        let output = self.layers.len() - 1;
        let loss = self.loss.pair();

        let outputs = self.layers[output].len();

        for (neuron, expected) in self.layers[output].neurons.iter_mut().zip(target) {
            neuron.delta = (loss.derivative)(neuron.value, *expected, outputs)
                * neuron.activation_derivative();
        }

        for i in (1..output).rev() {
            let (head, tail) = self.layers.split_at_mut(i + 1);

            let next = &tail[0];

            for neuron in &mut head[i].neurons {
                let signal = neuron.next.iter()
                    .map(|id| {
                        let to = self.connections[*id].to.index;

                        next.neurons[to].delta * self.connections.weight(*id)
                    })
                    .sum::<f64>();

                neuron.delta = signal * neuron.activation_derivative();
            }
        }
    }

    fn update_parameters(&mut self) {
        let learning_rate = self.learning_rate;

        for i in 1..self.layers.len() {
            let (head, tail) = self.layers.split_at_mut(i);

            let previous = &head[i - 1];

            for neuron in &mut tail[0].neurons {
                neuron.bias -= learning_rate * neuron.delta;

                for id in &neuron.previous {
                    let from = self.connections[*id].from.index;

                    *self.connections.weight_mut(*id) -= learning_rate * neuron.delta * previous.neurons[from].value;
                }
            }
        }
    }
}

/// Verify that given layer sizes describe a valid network.
pub(crate) fn check_topology(sizes: &[usize]) -> NetworkResult<()> {
    if sizes.len() < 2 {
        return Err(NetworkError::InvalidTopology(format!(
            "network needs at least 2 layers, got {}",
            sizes.len()
        )));
    }

    if let Some(index) = sizes.iter().position(|size| *size == 0) {
        return Err(NetworkError::InvalidTopology(format!("layer {index} has no neurons")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2-2-1 network with hand-picked parameters.
    fn fixed_network() -> Network {
        let layers = vec![
            Layer::from_neurons([
                Neuron::new(0.0, ActivationKind::Identity),
                Neuron::new(0.0, ActivationKind::Identity)
            ]),
            Layer::from_neurons([
                Neuron::new(0.1, ActivationKind::Sigmoid),
                Neuron::new(-0.2, ActivationKind::Sigmoid)
            ]),
            Layer::from_neurons([
                Neuron::new(0.05, ActivationKind::Sigmoid)
            ])
        ];

        let mut weights = [0.15, -0.3, 0.25, 0.4, 0.5, -0.6].into_iter();

        Network::from_layers(layers, 0.5, || weights.next().unwrap())
    }

    #[test]
    fn construction_builds_full_connectivity() {
        let network = Network::new(3, 2, 0.1, &[4, 5]).unwrap();

        assert_eq!(network.layer_sizes(), vec![3, 4, 5, 2]);
        assert_eq!(network.connections().len(), 3 * 4 + 4 * 5 + 5 * 2);
        assert_eq!(network.params(), 3 * 4 + 4 * 5 + 5 * 2 + 4 + 5 + 2);

        for (i, layer) in network.layers().iter().enumerate() {
            let expected = if i == 0 { ActivationKind::Identity } else { ActivationKind::Sigmoid };

            for (j, neuron) in layer.neurons().iter().enumerate() {
                assert_eq!(neuron.activation(), expected);
                assert!((-0.1..0.1).contains(&neuron.bias()));

                let next = network.layers().get(i + 1).map(Layer::len).unwrap_or(0);
                let previous = if i == 0 { 0 } else { network.layers()[i - 1].len() };

                assert_eq!(neuron.outgoing().len(), next);
                assert_eq!(neuron.incoming().len(), previous);

                for (k, id) in neuron.outgoing().iter().enumerate() {
                    let connection = network.connections().get(*id).unwrap();

                    assert_eq!(connection.from, NeuronId::new(i, j));
                    assert_eq!(connection.to, NeuronId::new(i + 1, k));

                    // Same connection seen from the other end.
                    assert_eq!(network.layers()[i + 1].neurons()[k].incoming()[j], *id);
                    assert!((-1.0..1.0).contains(&network.weight(*id)));
                }
            }
        }
    }

    #[test]
    fn invalid_topology() {
        assert!(matches!(Network::new(0, 1, 0.1, &[]), Err(NetworkError::InvalidTopology(_))));
        assert!(matches!(Network::new(2, 1, 0.1, &[3, 0]), Err(NetworkError::InvalidTopology(_))));
        assert!(matches!(check_topology(&[]), Err(NetworkError::InvalidTopology(_))));
        assert!(matches!(check_topology(&[3]), Err(NetworkError::InvalidTopology(_))));
    }

    #[test]
    fn activation_override() {
        let mut network = Network::new(2, 1, 0.1, &[3, 3]).unwrap();

        network.set_activation(ActivationKind::Relu, &[1, 2]).unwrap();

        assert!(network.layers()[1].neurons().iter().all(|neuron| neuron.activation() == ActivationKind::Relu));
        assert!(network.layers()[2].neurons().iter().all(|neuron| neuron.activation() == ActivationKind::Relu));
        assert!(network.layers()[3].neurons().iter().all(|neuron| neuron.activation() == ActivationKind::Sigmoid));

        let before = network.clone();

        assert!(matches!(
            network.set_activation(ActivationKind::Identity, &[3, 4]),
            Err(NetworkError::IndexOutOfRange { index: 4, len: 4 })
        ));

        assert_eq!(network, before);
    }

    #[test]
    fn forward_matches_manual_calculation() {
        let mut network = fixed_network();

        let h1 = sigmoid(1.0 * 0.15 + 0.5 * 0.25 + 0.1);
        let h2 = sigmoid(1.0 * -0.3 + 0.5 * 0.4 - 0.2);
        let out = sigmoid(h1 * 0.5 + h2 * -0.6 + 0.05);

        let prediction = network.predict(&[1.0, 0.5]).unwrap();

        assert_eq!(prediction.len(), 1);
        assert!((prediction[0] - out).abs() < 1e-12);

        // No accumulation between passes.
        assert_eq!(network.predict(&[1.0, 0.5]).unwrap(), prediction);
    }

    #[test]
    fn forward_rejects_wrong_input() {
        let mut network = fixed_network();

        let expected = network.predict(&[0.3, 0.7]).unwrap();

        assert!(matches!(
            network.predict(&[0.3, 0.7, 0.1]),
            Err(NetworkError::ShapeMismatch { expected: 2, got: 3 })
        ));

        assert_eq!(network.predict(&[0.3, 0.7]).unwrap(), expected);
    }

    #[test]
    fn backward_requires_evaluation() {
        let mut network = fixed_network();

        assert!(matches!(network.backward(), Err(NetworkError::StateViolation(_))));

        let loss = network.evaluate(&[1.0, 0.5], &[1.0]).unwrap();

        assert_eq!(network.last_loss(), Some(loss));

        network.backward().unwrap();

        assert_eq!(network.state(), &TrainingState::Unevaluated);
        assert!(matches!(network.backward(), Err(NetworkError::StateViolation(_))));

        // Predict doesn't grant a backward pass.
        network.predict(&[1.0, 0.5]).unwrap();

        assert!(matches!(network.backward(), Err(NetworkError::StateViolation(_))));
    }

    #[test]
    fn predict_between_evaluate_and_backward() {
        let mut expected = fixed_network();

        expected.evaluate(&[1.0, 0.0], &[1.0]).unwrap();
        expected.backward().unwrap();

        let mut network = fixed_network();

        network.evaluate(&[1.0, 0.0], &[1.0]).unwrap();

        let evaluated = network.clone();
        let prediction = network.predict(&[0.0, 1.0]).unwrap();

        assert_eq!(network, evaluated);
        assert_eq!(prediction, fixed_network().predict(&[0.0, 1.0]).unwrap());

        network.backward().unwrap();

        assert_eq!(network.connections().weights(), expected.connections().weights());
        assert_eq!(network, expected);
    }

    #[test]
    fn failed_evaluation_resets_state() {
        let mut network = fixed_network();

        network.evaluate(&[1.0, 0.5], &[1.0]).unwrap();

        assert!(matches!(
            network.evaluate(&[1.0, 0.5], &[1.0, 0.0]),
            Err(NetworkError::ShapeMismatch { expected: 1, got: 2 })
        ));

        assert!(matches!(network.backward(), Err(NetworkError::StateViolation(_))));
    }

    #[test]
    fn deltas_use_weights_from_before_update() {
        let mut network = fixed_network();

        let before = network.clone();

        network.evaluate(&[1.0, 0.5], &[0.0]).unwrap();
        network.backward().unwrap();

        let output = &network.layers()[2].neurons()[0];

        let y = output.value();
        let output_delta = 2.0 * (y - 0.0) * y * (1.0 - y);

        assert!((output.delta() - output_delta).abs() < 1e-12);

        for (j, neuron) in network.layers()[1].neurons().iter().enumerate() {
            let id = neuron.outgoing()[0];

            let expected = output_delta * before.weight(id) * neuron.value() * (1.0 - neuron.value());

            assert!((neuron.delta() - expected).abs() < 1e-12, "hidden neuron {j}");

            // Weight was updated after the delta was calculated.
            let updated = before.weight(id) - 0.5 * output_delta * neuron.value();

            assert!((network.weight(id) - updated).abs() < 1e-12);
        }
    }

    #[test]
    fn weights_are_shared_between_directions() {
        let mut network = Network::new(3, 2, 0.3, &[4]).unwrap();

        network.evaluate(&[0.2, 0.4, 0.6], &[1.0, 0.0]).unwrap();
        network.backward().unwrap();

        for i in 0..network.layers().len() - 1 {
            for (j, neuron) in network.layers()[i].neurons().iter().enumerate() {
                for (k, outgoing) in neuron.outgoing().iter().enumerate() {
                    let incoming = network.layers()[i + 1].neurons()[k].incoming()[j];

                    assert_eq!(network.weight(*outgoing), network.weight(incoming));
                }
            }
        }
    }
}
