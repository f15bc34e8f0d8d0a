use rand::prelude::*;
use rand::rngs::StdRng;

use crate::error::{PrnnError, Result};
use crate::graph::edge::Edge;

/// Probability with which each `(i, j)` pair gets an edge by default.
pub const DEFAULT_CONNECTION_PROBABILITY: f64 = 0.5;

/// Uniform random numbers on `[0, 1)` used by the wiring pass.
///
/// Both the connect/skip decision and the weight of a new edge are drawn from
/// the same source, in that order, so a scripted source pins the whole edge
/// list.
pub trait WiringSource {
    fn next_unit(&mut self) -> f64;
}

/// Adapts any `rand` generator.
pub struct RngSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource { rng }
    }
}

impl RngSource<StdRng> {
    pub fn from_entropy() -> Self {
        RngSource::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        RngSource::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> WiringSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed sequence of values, starting over when it runs out.
/// An empty script yields `0.0` forever.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    pos: usize,
}

impl ScriptedSource {
    /// Every value must lie in `[0, 1)`, like any other draw.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if let Some(bad) = values.iter().find(|v| !(0.0..1.0).contains(*v)) {
            return Err(PrnnError::invalid(format!(
                "scripted value {} is outside [0, 1)",
                bad
            )));
        }
        Ok(ScriptedSource { values, pos: 0 })
    }
}

impl WiringSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}

/// Tests every pair `0 <= i < j < num_cells` once, `i` outer and `j` inner.
/// A pair is connected when its draw falls below `probability`; the next draw
/// becomes the edge weight.
pub fn random_edges<S: WiringSource + ?Sized>(
    num_cells: usize,
    probability: f64,
    source: &mut S,
) -> Result<Vec<Edge>> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(PrnnError::invalid(format!(
            "connection probability must lie in [0, 1], got {}",
            probability
        )));
    }

    let mut edges = Vec::new();
    for i in 0..num_cells {
        for j in (i + 1)..num_cells {
            if source.next_unit() < probability {
                edges.push(Edge::new(i, j, source.next_unit()));
            }
        }
    }
    Ok(edges)
}

/// Number of candidate pairs the wiring pass examines.
pub fn candidate_pairs(num_cells: usize) -> usize {
    num_cells * num_cells.saturating_sub(1) / 2
}
