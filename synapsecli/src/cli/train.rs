use std::path::PathBuf;

use clap::Args;
use colorful::Colorful;

use synapselib::prelude::*;

#[derive(Args)]
pub struct TrainCLI {
    #[arg(long, short)]
    /// Path to the file where trained network will be saved.
    model: PathBuf,

    #[arg(long, short)]
    /// Path to the JSON dataset file.
    ///
    /// Built-in colors dataset is used if not specified.
    dataset: Option<PathBuf>,

    #[arg(long, value_delimiter = ',', default_values_t = [8])]
    /// Sizes of the hidden layers.
    hidden: Vec<usize>,

    #[arg(long, default_value_t = 0.1)]
    /// Learn rate of the gradient descent.
    learn_rate: f64,

    #[arg(long, default_value_t = 10000)]
    /// Amount of passes over the whole dataset.
    epochs: usize,

    #[arg(long, default_value_t = 1000)]
    /// Amount of epochs between progress reports.
    ///
    /// If set to 0 then only the last epoch is reported.
    report_interval: usize,

    #[arg(long, default_value_t = ActivationKind::Sigmoid)]
    /// Activation function of the hidden layers.
    activation: ActivationKind,

    #[arg(long, default_value_t = ActivationKind::Sigmoid)]
    /// Activation function of the output layer.
    output_activation: ActivationKind,

    #[arg(long)]
    /// Seed of the random numbers generator.
    seed: Option<u64>,

    #[arg(long)]
    /// Keep samples order between epochs.
    no_shuffle: bool
}

impl TrainCLI {
    pub fn execute(self) -> anyhow::Result<()> {
        if let Some(seed) = self.seed {
            fastrand::seed(seed);
        }

        let mut dataset = match super::open_dataset(self.dataset) {
            Ok(dataset) => dataset,
            Err(err) => {
                eprintln!("{}", format!("🧯 Failed to read dataset: {err}").red());

                return Ok(());
            }
        };

        let Some(first) = dataset.samples().first() else {
            eprintln!("{}", "🧯 Dataset is empty".red());

            return Ok(());
        };

        let input_size = first.input.len();
        let output_size = first.target.len();

        let output_layer = self.hidden.len() + 1;
        let hidden_layers = (1..output_layer).collect::<Vec<_>>();

        let network = Network::new(input_size, output_size, self.learn_rate, &self.hidden)
            .and_then(|network| network.with_activation(self.activation, &hidden_layers))
            .and_then(|network| network.with_activation(self.output_activation, &[output_layer]));

        let mut network = match network {
            Ok(network) => network,
            Err(err) => {
                eprintln!("{}", format!("🧯 Failed to create network: {err}").red());

                return Ok(());
            }
        };

        println!("{}", "✅ Network created".green());
        println!("         Layers: {}", format!("{:?}", network.layer_sizes()).yellow());
        println!("     Parameters: {}", format!("{}", network.params()).yellow());
        println!("        Samples: {}", format!("{}", dataset.len()).yellow());

        let trainer = Trainer::new(TrainingConfig::default()
            .with_epochs(self.epochs)
            .with_report_interval(self.report_interval)
            .with_shuffle(!self.no_shuffle));

        println!("⏳ Training for {} epochs...", self.epochs);

        let result = trainer.fit(&mut network, &mut dataset, |report| {
            println!(
                "  epoch {}: mean loss = {}, elapsed = {}",
                format!("{:>6}", report.epoch).blue(),
                format!("{:.6}", report.mean_loss).yellow(),
                format!("{:.2?}", report.elapsed).yellow()
            );

            Ok(())
        });

        match result {
            Ok(report) => println!("{}", format!("✅ Training finished with mean loss {:.6}", report.mean_loss).green()),
            Err(err) => {
                eprintln!("{}", format!("🧯 Failed to train network: {err}").red());

                return Ok(());
            }
        }

        println!("⏳ Saving network to {:?}...", self.model);

        match network.save(&self.model) {
            Ok(()) => println!("{}", "🚀 Network saved".green()),
            Err(err) => eprintln!("{}", format!("🧯 Failed to save network: {err}").red())
        }

        Ok(())
    }
}
