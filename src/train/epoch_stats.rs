use serde::{Serialize, Deserialize};

/// Loss statistics for one completed pass of `train_loop`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Mean sum-of-squares loss over the epoch's steps.
    pub mean_loss: f64,
    /// Loss of the final step.
    pub last_loss: f64,
    pub steps: usize,
    /// Wall-clock duration of this epoch in milliseconds.
    pub elapsed_ms: u64,
}
