use serde::{Serialize, Deserialize};

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`: full passes over the training data
/// - `learning_rate`: logged, never applied; the graph has no update rule
/// - `log_every`: a step's loss is logged when `step % log_every == 0`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub log_every: usize,
}

impl TrainConfig {
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig { epochs, learning_rate, ..TrainConfig::default() }
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig { epochs: 10, learning_rate: 0.01, log_every: 1000 }
    }
}
