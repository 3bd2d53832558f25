use std::time::{Duration, Instant};

use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Parameters of the training loop.
pub struct TrainingConfig {
    /// Amount of full passes over the dataset.
    pub epochs: usize,

    /// Report mean loss every `report_interval` epochs.
    /// The last epoch is always reported.
    ///
    /// If set to 0 then only the last epoch is reported.
    pub report_interval: usize,

    /// Shuffle dataset before every epoch.
    pub shuffle: bool
}

impl Default for TrainingConfig {
    #[inline]
    fn default() -> Self {
        Self {
            epochs: 10000,
            report_interval: 1000,
            shuffle: true
        }
    }
}

impl TrainingConfig {
    #[inline]
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;

        self
    }

    #[inline]
    pub fn with_report_interval(mut self, report_interval: usize) -> Self {
        self.report_interval = report_interval;

        self
    }

    #[inline]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;

        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    /// Index of the epoch, starting from 0.
    pub epoch: usize,

    /// Mean loss of all the samples during the epoch.
    pub mean_loss: f64,

    /// Time passed since the training start.
    pub elapsed: Duration
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
/// Per-example gradient descent training loop.
pub struct Trainer {
    config: TrainingConfig
}

impl Trainer {
    #[inline]
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config
        }
    }

    #[inline]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train the network on the dataset, calling `evaluate` and `backward`
    /// for every sample of every epoch.
    ///
    /// Return report of the last epoch.
    pub fn fit(
        &self,
        network: &mut Network,
        dataset: &mut Dataset,
        mut on_report: impl FnMut(&EpochReport) -> anyhow::Result<()>
    ) -> anyhow::Result<EpochReport> {
        if dataset.is_empty() {
            anyhow::bail!("can't train the network on an empty dataset");
        }

        let started = Instant::now();

        let mut report = EpochReport {
            epoch: 0,
            mean_loss: mean_loss(network, dataset)?,
            elapsed: Duration::ZERO
        };

        for epoch in 0..self.config.epochs {
            if self.config.shuffle {
                dataset.shuffle();
            }

            let mut total_loss = 0.0;

            for sample in dataset.iter() {
                total_loss += network.evaluate(&sample.input, &sample.target)?;

                network.backward()?;
            }

            report = EpochReport {
                epoch,
                mean_loss: total_loss / dataset.len() as f64,
                elapsed: started.elapsed()
            };

            let last = epoch + 1 == self.config.epochs;
            let scheduled = self.config.report_interval != 0 && epoch % self.config.report_interval == 0;

            if scheduled || last {
                log::info!(
                    "epoch {}/{}: mean loss = {:.6}, elapsed = {:.2?}",
                    epoch + 1,
                    self.config.epochs,
                    report.mean_loss,
                    report.elapsed
                );

                on_report(&report)?;
            }
        }

        Ok(report)
    }
}

/// Calculate mean loss of the network on the dataset
/// without changing its parameters or training state.
pub fn mean_loss(network: &mut Network, dataset: &Dataset) -> NetworkResult<f64> {
    if dataset.is_empty() {
        return Ok(0.0);
    }

    let loss = network.loss().pair();

    let mut total = 0.0;

    for sample in dataset {
        let prediction = network.predict(&sample.input)?;

        total += (loss.forward)(&prediction, &sample.target)?;
    }

    Ok(total / dataset.len() as f64)
}
