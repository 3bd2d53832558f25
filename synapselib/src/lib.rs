pub mod error;
pub mod neural_network;
pub mod dataset;
pub mod training;

pub mod prelude {
    pub use super::error::*;

    pub use super::neural_network::prelude::*;
    pub use super::dataset::*;
    pub use super::training::*;
}
