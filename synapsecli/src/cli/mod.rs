use std::path::PathBuf;

use clap::Parser;

use synapselib::prelude::*;

pub mod train;
pub mod model;

#[derive(Parser)]
#[command(name = "synapse", version, about)]
pub enum CLI {
    /// Create new network and train it on a dataset.
    Train(train::TrainCLI),

    /// Use already trained network.
    Model {
        #[arg(long, short)]
        /// Path to the network file.
        path: PathBuf,

        #[command(subcommand)]
        command: model::ModelCLI
    }
}

impl CLI {
    #[inline]
    pub fn execute(self) -> anyhow::Result<()> {
        match self {
            Self::Train(command) => command.execute(),
            Self::Model { path, command } => command.execute(path)
        }
    }
}

/// Read dataset from the given file or use built-in colors dataset.
pub fn open_dataset(path: Option<PathBuf>) -> NetworkResult<Dataset> {
    match path {
        Some(path) => {
            let path = path.canonicalize().unwrap_or(path);

            println!("⏳ Reading dataset from {path:?}...");

            Dataset::load(path)
        }

        None => {
            println!("⏳ Using built-in colors dataset...");

            Ok(Dataset::colors())
        }
    }
}
