use std::path::PathBuf;

use clap::Parser;
use colorful::Colorful;

use synapselib::prelude::*;

#[derive(Parser)]
pub enum ModelCLI {
    /// Calculate network output for the given input.
    Predict {
        #[arg(long, short, value_delimiter = ',', allow_negative_numbers = true, required = true)]
        /// Comma separated input values.
        input: Vec<f64>
    },

    /// Calculate mean loss of the network on a dataset.
    Evaluate {
        #[arg(long, short)]
        /// Path to the JSON dataset file.
        ///
        /// Built-in colors dataset is used if not specified.
        dataset: Option<PathBuf>
    },

    /// Print network structure.
    Inspect
}

impl ModelCLI {
    pub fn execute(self, path: PathBuf) -> anyhow::Result<()> {
        let path = path.canonicalize().unwrap_or(path);

        println!("⏳ Loading network from {path:?}...");

        let mut network = match Network::load(&path) {
            Ok(network) => network,
            Err(err) => {
                eprintln!("{}", format!("🧯 Failed to load network: {err}").red());

                return Ok(());
            }
        };

        match self {
            Self::Predict { input } => {
                match network.predict(&input) {
                    Ok(output) => {
                        let output = output.iter()
                            .map(|value| format!("{value:.6}"))
                            .collect::<Vec<_>>()
                            .join(", ");

                        println!("  Prediction: [{}]", output.yellow());
                    }

                    Err(err) => eprintln!("{}", format!("🧯 Failed to run network: {err}").red())
                }
            }

            Self::Evaluate { dataset } => {
                let dataset = match super::open_dataset(dataset) {
                    Ok(dataset) => dataset,
                    Err(err) => {
                        eprintln!("{}", format!("🧯 Failed to read dataset: {err}").red());

                        return Ok(());
                    }
                };

                match mean_loss(&mut network, &dataset) {
                    Ok(loss) => {
                        println!("     Samples: {}", format!("{}", dataset.len()).yellow());
                        println!("   Mean loss: {}", format!("{loss:.6}").yellow());
                    }

                    Err(err) => eprintln!("{}", format!("🧯 Failed to evaluate network: {err}").red())
                }
            }

            Self::Inspect => {
                println!("   Learn rate: {}", format!("{}", network.learning_rate()).yellow());
                println!("         Loss: {}", format!("{}", network.loss()).yellow());
                println!("   Parameters: {}", format!("{}", network.params()).yellow());

                for (i, layer) in network.layers().iter().enumerate() {
                    let activation = layer.neurons()
                        .first()
                        .map(Neuron::activation)
                        .unwrap_or_default();

                    println!(
                        "    Layer {i:>3}: {} neurons, {}",
                        format!("{:>4}", layer.len()).yellow(),
                        activation.to_string().blue()
                    );
                }
            }
        }

        Ok(())
    }
}
