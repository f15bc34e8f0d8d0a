use serde::{Serialize, Deserialize};

/// A directed, weighted connection `source -> target`.
///
/// Graph constructors only accept edges with `source < target`, so every
/// edge points from an older cell to a younger one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

impl Edge {
    pub fn new(source: usize, target: usize, weight: f64) -> Edge {
        Edge { source, target, weight }
    }

    /// Signal carried along this edge for a given source output.
    pub fn contribution(&self, source_output: f64) -> f64 {
        source_output * self.weight
    }
}

impl From<(usize, usize, f64)> for Edge {
    fn from((source, target, weight): (usize, usize, f64)) -> Self {
        Edge { source, target, weight }
    }
}
