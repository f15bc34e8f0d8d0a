use serde::{Serialize, Deserialize};

use crate::error::{PrnnError, Result};

/// Index of the maximum element.  Ties resolve to the lowest index and NaN
/// never beats a number; a slice of only NaNs yields `Some(0)`.
pub fn argmax(values: &[f64]) -> Option<usize> {
    if values.is_empty() {
        return None;
    }
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    Some(best.map(|(i, _)| i).unwrap_or(0))
}

/// Fraction of predictions equal to their label, in `[0, 1]`.
pub fn accuracy(predictions: &[usize], labels: &[usize]) -> Result<f64> {
    if predictions.len() != labels.len() {
        return Err(PrnnError::invalid(format!(
            "{} predictions for {} labels",
            predictions.len(),
            labels.len()
        )));
    }
    if labels.is_empty() {
        return Ok(0.0);
    }
    let correct = predictions.iter().zip(labels).filter(|(p, l)| p == l).count();
    Ok(correct as f64 / labels.len() as f64)
}

/// Square table of counts, rows indexed by the true class and columns by the
/// predicted class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub n_classes: usize,
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn new(n_classes: usize) -> ConfusionMatrix {
        ConfusionMatrix { n_classes, counts: vec![vec![0; n_classes]; n_classes] }
    }

    pub fn record(&mut self, truth: usize, predicted: usize) -> Result<()> {
        for index in [truth, predicted] {
            if index >= self.n_classes {
                return Err(PrnnError::IndexOutOfRange { index, len: self.n_classes });
            }
        }
        self.counts[truth][predicted] += 1;
        Ok(())
    }

    pub fn count(&self, truth: usize, predicted: usize) -> usize {
        self.counts
            .get(truth)
            .and_then(|row| row.get(predicted))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Sum of the diagonal.
    pub fn correct(&self) -> usize {
        (0..self.n_classes).map(|i| self.counts[i][i]).sum()
    }
}
