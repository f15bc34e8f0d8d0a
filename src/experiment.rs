use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::config::ExperimentConfig;
use crate::data::Dataset;
use crate::error::Result;
use crate::eval::{evaluate, EvalReport};
use crate::graph::{PropagationGraph, RngSource};
use crate::train::{train_loop, EpochStats};

/// Everything a run produced, ready to be written out as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub config: ExperimentConfig,
    pub edge_count: usize,
    pub epochs: Vec<EpochStats>,
    pub evaluation: EvalReport,
}

/// Wires a graph as configured, "trains" it on the first `train_limit`
/// examples of `train` and evaluates on the first `test_limit` of `test`.
///
/// The same graph instance carries its cell state from training into
/// evaluation.
pub fn run_experiment(config: &ExperimentConfig, train: &Dataset, test: &Dataset) -> Result<ExperimentReport> {
    config.validate()?;
    if !config.activation.is_bounded() {
        warn!(activation = ?config.activation, "unbounded activation; cell outputs may grow without limit");
    }

    let mut graph = PropagationGraph::new(config.num_cells, config.activation)
        .with_input_policy(config.input_policy);
    match config.seed {
        Some(seed) => graph.wire(config.connection_probability, &mut RngSource::seeded(seed))?,
        None => graph.wire(config.connection_probability, &mut RngSource::from_entropy())?,
    }
    info!(
        cells = graph.num_cells(),
        edges = graph.edge_count(),
        activation = ?graph.activation(),
        "built propagation graph"
    );

    let train = train.take(config.train_limit);
    let epochs = train_loop(&mut graph, &train, &config.train_config())?;

    let test = test.take(config.test_limit);
    let evaluation = evaluate(&mut graph, &test, config.n_classes)?;
    info!("Test Accuracy: {:.2}%", evaluation.accuracy * 100.0);

    Ok(ExperimentReport {
        config: config.clone(),
        edge_count: graph.edge_count(),
        epochs,
        evaluation,
    })
}

impl ExperimentReport {
    pub fn save_json(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
