use serde::{Serialize, Deserialize};
use tracing::info;

use crate::data::Dataset;
use crate::error::Result;
use crate::eval::metrics::ConfusionMatrix;
use crate::graph::PropagationGraph;

/// Outcome of running `predict` over a labelled dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    pub predictions: Vec<usize>,
    pub correct: usize,
    pub total: usize,
    /// Fraction in `[0, 1]`.
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
}

/// Predicts every example in order.  The graph keeps its state between
/// examples, exactly as it does during training.
///
/// A prediction at or beyond `n_classes` (possible whenever the graph has
/// more cells than there are classes) counts as wrong and is left out of the
/// confusion matrix, even when the label carries the same out-of-range
/// index.  `correct` therefore always equals the matrix diagonal.
pub fn evaluate(
    graph: &mut PropagationGraph,
    dataset: &Dataset,
    n_classes: usize,
) -> Result<EvalReport> {
    let mut confusion = ConfusionMatrix::new(n_classes);
    let mut predictions = Vec::with_capacity(dataset.len());
    let mut correct = 0usize;

    for (input, label) in dataset.iter() {
        let predicted = graph.predict(input)?;
        if predicted < n_classes && label < n_classes {
            if predicted == label {
                correct += 1;
            }
            confusion.record(label, predicted)?;
        }
        predictions.push(predicted);
    }

    let total = dataset.len();
    let accuracy = if total == 0 { 0.0 } else { correct as f64 / total as f64 };
    info!(correct, total, accuracy = %format!("{:.2}%", accuracy * 100.0), "evaluation finished");

    Ok(EvalReport { predictions, correct, total, accuracy, confusion })
}
