use serde::{Serialize, Deserialize};

use crate::activation::ActivationFunction;

/// One scalar processing unit of a `PropagationGraph`.
///
/// A cell remembers the last raw input it was fed and the activation of that
/// input, so `last_output == activation(last_input)` always holds.  The state
/// persists between forward passes; the graph only clears it on an explicit
/// `reset()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    index: usize,
    pub last_input: f64,
    pub last_output: f64,
}

impl Cell {
    /// A cell at rest: zero input, output `activation(0)`.
    pub fn new(index: usize, activation: &ActivationFunction) -> Cell {
        Cell { index, last_input: 0.0, last_output: activation.apply(0.0) }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Overwrites the stored input and recomputes the output.
    pub fn process(&mut self, input: f64, activation: &ActivationFunction) -> f64 {
        self.last_input = input;
        self.last_output = activation.apply(input);
        self.last_output
    }

    /// Returns the cell to rest.
    pub fn reset(&mut self, activation: &ActivationFunction) {
        self.process(0.0, activation);
    }
}
