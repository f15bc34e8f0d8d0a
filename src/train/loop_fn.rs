use std::time::Instant;

use tracing::{debug, info};

use crate::data::Dataset;
use crate::error::{PrnnError, Result};
use crate::graph::PropagationGraph;
use crate::loss::{one_hot, SumSquaresLoss};
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

/// Runs `config.epochs` passes over `dataset`, calling `forward` on every
/// example in order and measuring the sum-of-squares loss against a one-hot
/// target as wide as the graph.
///
/// Nothing is learned: edge weights never change and the learning rate is
/// only reported.  The graph's cell state still evolves, since every forward
/// pass accumulates on top of the previous one.
///
/// # Errors
/// - `InvalidArgument` if `config.log_every` is zero
/// - `IndexOutOfRange` if a label is not a valid cell index
/// - anything `forward` rejects (e.g. over-long inputs under the strict policy)
pub fn train_loop(
    graph: &mut PropagationGraph,
    dataset: &Dataset,
    config: &TrainConfig,
) -> Result<Vec<EpochStats>> {
    if config.log_every == 0 {
        return Err(PrnnError::invalid("log_every must be at least 1"));
    }
    debug!(
        learning_rate = config.learning_rate,
        "learning rate accepted but not applied; the loss is never propagated"
    );

    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        info!("Epoch {}/{}", epoch, config.epochs);
        let t_start = Instant::now();
        let mut total_loss = 0.0;
        let mut last_loss = 0.0;

        for (step, (input, label)) in dataset.iter().enumerate() {
            let outputs = graph.forward(input)?;
            let target = one_hot(label, outputs.len())?;
            last_loss = SumSquaresLoss::loss(&outputs, &target);
            total_loss += last_loss;

            if step % config.log_every == 0 {
                info!("Step {}: Loss = {:.4}", step, last_loss);
            }
        }

        let steps = dataset.len();
        history.push(EpochStats {
            epoch,
            total_epochs: config.epochs,
            mean_loss: if steps == 0 { 0.0 } else { total_loss / steps as f64 },
            last_loss,
            steps,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        });
    }

    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;
    use crate::graph::Edge;

    fn chain() -> PropagationGraph {
        let edges = vec![Edge::new(0, 1, 0.5), Edge::new(1, 2, 0.25)];
        PropagationGraph::from_edges(3, ActivationFunction::Tanh, edges).unwrap()
    }

    #[test]
    fn reports_one_entry_per_epoch() {
        let mut graph = chain();
        let data = Dataset::new(vec![vec![0.2], vec![0.9]], vec![1, 2]).unwrap();
        let config = TrainConfig { epochs: 3, learning_rate: 0.5, log_every: 1 };
        let history = train_loop(&mut graph, &data, &config).unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.iter().all(|s| s.steps == 2 && s.total_epochs == 3));
        assert_eq!(history[2].epoch, 3);
        assert!(history[0].mean_loss > 0.0);
    }

    #[test]
    fn weights_are_never_touched() {
        let mut graph = chain();
        let before = graph.edges().to_vec();
        let data = Dataset::new(vec![vec![1.0, 0.0, 0.0]], vec![0]).unwrap();
        train_loop(&mut graph, &data, &TrainConfig::new(5, 1.0)).unwrap();
        assert_eq!(graph.edges(), &before[..]);
    }

    #[test]
    fn first_step_loss_matches_forward() {
        let mut reference = chain();
        let outputs = reference.forward(&[0.4]).unwrap();
        let expected = SumSquaresLoss::loss(&outputs, &[0.0, 1.0, 0.0]);

        let mut graph = chain();
        let data = Dataset::new(vec![vec![0.4]], vec![1]).unwrap();
        let history = train_loop(&mut graph, &data, &TrainConfig::new(1, 0.01)).unwrap();
        assert_eq!(history[0].last_loss, expected);
        assert_eq!(history[0].mean_loss, expected);
    }

    #[test]
    fn label_beyond_cells_is_an_error() {
        let mut graph = chain();
        let data = Dataset::new(vec![vec![0.1]], vec![3]).unwrap();
        assert!(matches!(
            train_loop(&mut graph, &data, &TrainConfig::default()),
            Err(PrnnError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn zero_log_interval_is_rejected() {
        let mut graph = chain();
        let config = TrainConfig { epochs: 1, learning_rate: 0.0, log_every: 0 };
        assert!(train_loop(&mut graph, &Dataset::default(), &config).is_err());
    }
}
