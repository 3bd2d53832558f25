use std::ops::Index;

/// Index of the connection and its weight in the network's [`Connections`] store.
pub type ConnectionId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Position of a neuron within the network.
pub struct NeuronId {
    pub layer: usize,
    pub index: usize
}

impl NeuronId {
    #[inline]
    pub const fn new(layer: usize, index: usize) -> Self {
        Self {
            layer,
            index
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Directed link between two neurons of adjacent layers.
pub struct Connection {
    pub from: NeuronId,
    pub to: NeuronId
}

#[derive(Debug, Default, Clone, PartialEq)]
/// Flat store of all the network connections.
///
/// Each weight is stored exactly once, at the same index as its connection.
/// Neurons keep `ConnectionId`s in their outgoing and incoming lists, so
/// both ends of a connection always observe the same weight.
pub struct Connections {
    connections: Vec<Connection>,
    weights: Vec<f64>
}

impl Connections {
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            connections: Vec::with_capacity(capacity),
            weights: Vec::with_capacity(capacity)
        }
    }

    /// Store new connection with given weight and return its id.
    pub fn push(&mut self, from: NeuronId, to: NeuronId, weight: f64) -> ConnectionId {
        self.connections.push(Connection { from, to });
        self.weights.push(weight);

        self.connections.len() - 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    #[inline]
    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    #[inline]
    /// Get weight of the connection.
    ///
    /// Panics if there's no connection with given id.
    pub fn weight(&self, id: ConnectionId) -> f64 {
        self.weights[id]
    }

    #[inline]
    /// Get mutable reference to the weight of the connection.
    ///
    /// Panics if there's no connection with given id.
    pub fn weight_mut(&mut self, id: ConnectionId) -> &mut f64 {
        &mut self.weights[id]
    }

    #[inline]
    /// All the weights in connection order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (ConnectionId, &Connection, f64)> + '_ {
        self.connections.iter()
            .zip(&self.weights)
            .enumerate()
            .map(|(id, (connection, weight))| (id, connection, *weight))
    }
}

impl Index<ConnectionId> for Connections {
    type Output = Connection;

    #[inline]
    /// Panics if there's no connection with given id.
    fn index(&self, id: ConnectionId) -> &Self::Output {
        &self.connections[id]
    }
}

#[test]
fn test_connections_store() {
    let mut connections = Connections::with_capacity(2);

    let a = connections.push(NeuronId::new(0, 0), NeuronId::new(1, 0), 0.5);
    let b = connections.push(NeuronId::new(0, 0), NeuronId::new(1, 1), -0.25);

    assert_eq!((a, b), (0, 1));
    assert_eq!(connections.len(), 2);

    *connections.weight_mut(b) += 1.0;

    assert_eq!(connections.weight(b), 0.75);
    assert_eq!(connections.weights(), &[0.5, 0.75]);
    assert_eq!(connections.get(a).map(|connection| connection.to), Some(NeuronId::new(1, 0)));
    assert_eq!(connections[b].to, NeuronId::new(1, 1));
    assert_eq!(connections.get(2), None);
}

#[test]
#[should_panic]
fn test_connections_missing_id() {
    let connections = Connections::with_capacity(0);

    let _connection = connections[0];
}
