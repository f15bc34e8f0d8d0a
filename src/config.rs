use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::activation::ActivationFunction;
use crate::error::{PrnnError, Result};
use crate::graph::wiring::DEFAULT_CONNECTION_PROBABILITY;
use crate::graph::InputPolicy;
use crate::train::TrainConfig;

/// Everything needed to reproduce one experiment run.
///
/// Missing fields fall back to the defaults, so a config file only has to
/// name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub num_cells: usize,
    pub connection_probability: f64,
    pub activation: ActivationFunction,
    /// MNIST vectors have 784 values, far more than the default cell count,
    /// so the driver truncates unless told otherwise.
    pub input_policy: InputPolicy,
    pub epochs: usize,
    /// Reported only; nothing is updated.
    pub learning_rate: f64,
    pub train_limit: usize,
    pub test_limit: usize,
    pub log_every: usize,
    pub n_classes: usize,
    /// Seed for the wiring pass; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            num_cells: 100,
            connection_probability: DEFAULT_CONNECTION_PROBABILITY,
            activation: ActivationFunction::Tanh,
            input_policy: InputPolicy::Truncate,
            epochs: 10,
            learning_rate: 0.01,
            train_limit: 500,
            test_limit: 100,
            log_every: 1000,
            n_classes: 10,
            seed: None,
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.connection_probability) {
            return Err(PrnnError::invalid(format!(
                "connection_probability must lie in [0, 1], got {}",
                self.connection_probability
            )));
        }
        if self.log_every == 0 {
            return Err(PrnnError::invalid("log_every must be at least 1"));
        }
        if self.n_classes < 2 {
            return Err(PrnnError::invalid(format!("n_classes must be at least 2, got {}", self.n_classes)));
        }
        // Training builds one-hot targets over the cells, so every class
        // must name a cell.
        if self.num_cells < self.n_classes {
            return Err(PrnnError::invalid(format!(
                "num_cells ({}) must be at least n_classes ({})",
                self.num_cells, self.n_classes
            )));
        }
        Ok(())
    }

    pub fn train_config(&self) -> TrainConfig {
        TrainConfig {
            epochs: self.epochs,
            learning_rate: self.learning_rate,
            log_every: self.log_every,
        }
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a config from a JSON file and validates it.
    pub fn load_json(path: impl AsRef<Path>) -> Result<ExperimentConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: ExperimentConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
