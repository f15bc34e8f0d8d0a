use crate::error::{PrnnError, Result};

pub struct SumSquaresLoss;

impl SumSquaresLoss {
    /// Scalar loss: sum((predicted - expected)²).  Not averaged, so it grows
    /// with the number of cells.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
    }
}

/// Target vector of length `len` with a single 1.0 at `label`.
pub fn one_hot(label: usize, len: usize) -> Result<Vec<f64>> {
    if label >= len {
        return Err(PrnnError::IndexOutOfRange { index: label, len });
    }
    let mut target = vec![0.0; len];
    target[label] = 1.0;
    Ok(target)
}
