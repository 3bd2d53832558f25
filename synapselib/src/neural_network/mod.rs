pub mod activations;
pub mod losses;
pub mod connection;
pub mod neuron;
pub mod layer;
pub mod network;
pub mod snapshot;

pub mod prelude {
    pub use super::activations::*;
    pub use super::losses::*;
    pub use super::connection::*;
    pub use super::neuron::*;
    pub use super::layer::*;
    pub use super::network::*;
    pub use super::snapshot::*;
}
