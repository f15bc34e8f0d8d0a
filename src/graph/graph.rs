use std::collections::HashSet;

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::activation::ActivationFunction;
use crate::cell::Cell;
use crate::error::{PrnnError, Result};
use crate::eval::argmax;
use crate::graph::edge::Edge;
use crate::graph::wiring::{random_edges, WiringSource, DEFAULT_CONNECTION_PROBABILITY};

/// What `forward` does with an input vector longer than the cell count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputPolicy {
    /// Reject the call with `InvalidArgument`; no cell is touched.
    #[default]
    Strict,
    /// Seed the first `num_cells` values and ignore the rest.
    Truncate,
}

/// A fixed set of cells wired by an ordered list of weighted edges.
///
/// Cell state survives between `forward` calls: cells that are not seeded by
/// the current input keep whatever they held, and every edge target
/// accumulates on top of its previous input.  Call `reset()` for a fresh
/// start.
#[derive(Debug, Clone)]
pub struct PropagationGraph {
    cells: Vec<Cell>,
    edges: Vec<Edge>,
    activation: ActivationFunction,
    input_policy: InputPolicy,
    /// Set once the edge list has been built, even if it came out empty.
    wired: bool,
}

impl PropagationGraph {
    /// `num_cells` unconnected cells.  Zero cells is allowed and gives a graph
    /// whose forward pass returns an empty vector.
    pub fn new(num_cells: usize, activation: ActivationFunction) -> PropagationGraph {
        PropagationGraph {
            cells: (0..num_cells).map(|i| Cell::new(i, &activation)).collect(),
            edges: Vec::new(),
            activation,
            input_policy: InputPolicy::default(),
            wired: false,
        }
    }

    /// `new` followed by `wire` with the default probability of 0.5.
    pub fn random<S: WiringSource + ?Sized>(
        num_cells: usize,
        activation: ActivationFunction,
        source: &mut S,
    ) -> Result<PropagationGraph> {
        let mut graph = PropagationGraph::new(num_cells, activation);
        graph.wire(DEFAULT_CONNECTION_PROBABILITY, source)?;
        Ok(graph)
    }

    /// Builds a graph from an explicit edge list, kept in the given order.
    /// The result counts as wired, so `wire` cannot add to it later.
    pub fn from_edges(
        num_cells: usize,
        activation: ActivationFunction,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<PropagationGraph> {
        let mut graph = PropagationGraph::new(num_cells, activation);
        let mut seen = HashSet::new();
        for edge in edges {
            graph.check_edge(&edge)?;
            if !seen.insert((edge.source, edge.target)) {
                return Err(PrnnError::invalid(format!(
                    "duplicate edge {} -> {}",
                    edge.source, edge.target
                )));
            }
            graph.edges.push(edge);
        }
        graph.wired = true;
        Ok(graph)
    }

    /// Runs the one-shot randomized wiring pass.  A graph is wired at most
    /// once, even when the pass produced no edges; a second call fails with
    /// `AlreadyWired`.  A rejected probability leaves the graph unwired.
    pub fn wire<S: WiringSource + ?Sized>(&mut self, probability: f64, source: &mut S) -> Result<()> {
        if self.wired {
            return Err(PrnnError::AlreadyWired);
        }
        self.edges = random_edges(self.cells.len(), probability, source)?;
        self.wired = true;
        debug!(
            cells = self.cells.len(),
            edges = self.edges.len(),
            probability,
            "wired propagation graph"
        );
        Ok(())
    }

    pub fn with_input_policy(mut self, policy: InputPolicy) -> Self {
        self.input_policy = policy;
        self
    }

    /// Seeds the leading cells with `inputs`, replays every edge once in
    /// order and returns the output of every cell.
    ///
    /// For each edge `u -> v` the target is re-processed with
    /// `last_input[v] + last_output[u] * weight`, so a target reached by
    /// several edges sees the contributions of the earlier ones, and a source
    /// that was itself updated earlier in the pass forwards its new output.
    /// The result therefore depends on edge order.
    pub fn forward(&mut self, inputs: &[f64]) -> Result<Vec<f64>> {
        let n = self.cells.len();
        let seeded = match self.input_policy {
            InputPolicy::Strict if inputs.len() > n => {
                return Err(PrnnError::invalid(format!(
                    "input has {} values but the graph has only {} cells",
                    inputs.len(),
                    n
                )));
            }
            InputPolicy::Strict => inputs,
            InputPolicy::Truncate => &inputs[..inputs.len().min(n)],
        };

        for (cell, &value) in self.cells.iter_mut().zip(seeded) {
            cell.process(value, &self.activation);
        }

        for edge in &self.edges {
            let upstream = self
                .cells
                .get(edge.source)
                .ok_or(PrnnError::IndexOutOfRange { index: edge.source, len: n })?
                .last_output;
            let target = self
                .cells
                .get_mut(edge.target)
                .ok_or(PrnnError::IndexOutOfRange { index: edge.target, len: n })?;
            let input = target.last_input + edge.contribution(upstream);
            target.process(input, &self.activation);
        }

        Ok(self.outputs())
    }

    /// Index of the strongest cell after a forward pass; ties go to the
    /// lowest index.
    pub fn predict(&mut self, inputs: &[f64]) -> Result<usize> {
        let outputs = self.forward(inputs)?;
        argmax(&outputs).ok_or_else(|| PrnnError::invalid("cannot predict with an empty graph"))
    }

    /// Returns every cell to rest: input zero, output `activation(0)`.
    pub fn reset(&mut self) {
        let activation = self.activation;
        self.cells.iter_mut().for_each(|cell| cell.reset(&activation));
    }

    pub fn is_wired(&self) -> bool {
        self.wired
    }

    pub fn outputs(&self) -> Vec<f64> {
        self.cells.iter().map(|c| c.last_output).collect()
    }

    pub fn cell(&self, index: usize) -> Result<&Cell> {
        self.cells
            .get(index)
            .ok_or(PrnnError::IndexOutOfRange { index, len: self.cells.len() })
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn input_policy(&self) -> InputPolicy {
        self.input_policy
    }

    fn check_edge(&self, edge: &Edge) -> Result<()> {
        let len = self.cells.len();
        for index in [edge.source, edge.target] {
            if index >= len {
                return Err(PrnnError::IndexOutOfRange { index, len });
            }
        }
        if edge.source >= edge.target {
            return Err(PrnnError::invalid(format!(
                "edge {} -> {} does not point to a higher index",
                edge.source, edge.target
            )));
        }
        if !edge.weight.is_finite() {
            return Err(PrnnError::invalid(format!(
                "edge {} -> {} has non-finite weight {}",
                edge.source, edge.target, edge.weight
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::wiring::{RngSource, ScriptedSource};

    fn edges(list: &[(usize, usize, f64)]) -> Vec<Edge> {
        list.iter().copied().map(Edge::from).collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn fresh_graph_has_no_edges() {
        let g = PropagationGraph::new(4, ActivationFunction::Tanh);
        assert_eq!(g.num_cells(), 4);
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.input_policy(), InputPolicy::Strict);
        assert_eq!(g.outputs(), vec![0.0; 4]);
    }

    #[test]
    fn wiring_twice_is_rejected() {
        let mut src = ScriptedSource::new(vec![0.0, 0.5]).unwrap();
        let mut g = PropagationGraph::new(3, ActivationFunction::Tanh);
        g.wire(0.5, &mut src).unwrap();
        assert_eq!(g.edge_count(), 3);
        assert!(matches!(g.wire(0.5, &mut src), Err(PrnnError::AlreadyWired)));
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn empty_wiring_pass_still_counts() {
        let mut g = PropagationGraph::new(5, ActivationFunction::Tanh);
        assert!(!g.is_wired());
        g.wire(0.0, &mut RngSource::seeded(1)).unwrap();
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_wired());
        assert!(matches!(
            g.wire(1.0, &mut RngSource::seeded(1)),
            Err(PrnnError::AlreadyWired)
        ));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn explicit_empty_edge_list_cannot_be_rewired() {
        let mut g = PropagationGraph::from_edges(4, ActivationFunction::Tanh, Vec::new()).unwrap();
        assert!(g.is_wired());
        assert!(matches!(
            g.wire(1.0, &mut RngSource::seeded(2)),
            Err(PrnnError::AlreadyWired)
        ));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn rejected_probability_leaves_graph_unwired() {
        let mut g = PropagationGraph::new(3, ActivationFunction::Tanh);
        assert!(g.wire(2.0, &mut RngSource::seeded(3)).is_err());
        assert!(!g.is_wired());
        g.wire(1.0, &mut RngSource::seeded(3)).unwrap();
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn resting_cells_emit_activation_of_zero() {
        let act = ActivationFunction::Sigmoid;
        let mut g = PropagationGraph::new(1, act);
        assert_eq!(g.outputs(), vec![0.5]);
        assert_eq!(g.forward(&[]).unwrap(), vec![act.apply(0.0)]);

        g.forward(&[3.0]).unwrap();
        g.reset();
        assert_eq!(g.cell(0).unwrap().last_input, 0.0);
        assert_eq!(g.outputs(), vec![0.5]);
    }

    #[test]
    fn from_edges_validates() {
        let act = ActivationFunction::Tanh;
        assert!(matches!(
            PropagationGraph::from_edges(3, act, edges(&[(0, 3, 0.1)])),
            Err(PrnnError::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert!(matches!(
            PropagationGraph::from_edges(3, act, edges(&[(2, 1, 0.1)])),
            Err(PrnnError::InvalidArgument(_))
        ));
        assert!(matches!(
            PropagationGraph::from_edges(3, act, edges(&[(1, 1, 0.1)])),
            Err(PrnnError::InvalidArgument(_))
        ));
        assert!(PropagationGraph::from_edges(3, act, edges(&[(0, 1, 0.1), (0, 1, 0.2)])).is_err());
        assert!(PropagationGraph::from_edges(3, act, edges(&[(0, 1, f64::INFINITY)])).is_err());
    }

    #[test]
    fn forward_seeds_and_replays() {
        let mut g = PropagationGraph::from_edges(
            3,
            ActivationFunction::Identity,
            edges(&[(0, 2, 0.5), (1, 2, 2.0)]),
        )
        .unwrap();
        let out = g.forward(&[1.0, 3.0]).unwrap();
        // cell 2: 0 + 1*0.5 = 0.5, then 0.5 + 3*2 = 6.5
        assert_eq!(out, vec![1.0, 3.0, 6.5]);
        assert_eq!(g.cell(2).unwrap().last_input, 6.5);
    }

    #[test]
    fn strict_policy_leaves_state_alone() {
        let mut g =
            PropagationGraph::from_edges(2, ActivationFunction::Tanh, edges(&[(0, 1, 0.5)])).unwrap();
        g.forward(&[0.3]).unwrap();
        let before = g.outputs();
        assert!(matches!(g.forward(&[1.0, 2.0, 3.0]), Err(PrnnError::InvalidArgument(_))));
        assert_eq!(g.outputs(), before);
    }

    #[test]
    fn truncate_policy_ignores_extra_values() {
        let mut g = PropagationGraph::new(2, ActivationFunction::Tanh)
            .with_input_policy(InputPolicy::Truncate);
        let out = g.forward(&[0.1, 0.2, 99.0]).unwrap();
        assert!(close(out[0], 0.1_f64.tanh()));
        assert!(close(out[1], 0.2_f64.tanh()));
    }

    #[test]
    fn short_input_keeps_stale_cells() {
        let mut g = PropagationGraph::new(3, ActivationFunction::Identity);
        g.forward(&[1.0, 2.0, 3.0]).unwrap();
        let out = g.forward(&[9.0]).unwrap();
        assert_eq!(out, vec![9.0, 2.0, 3.0]);
    }

    #[test]
    fn reset_restores_fresh_behaviour() {
        let wiring = edges(&[(0, 1, 0.7), (1, 2, 0.4), (0, 2, 0.9)]);
        let mut g = PropagationGraph::from_edges(3, ActivationFunction::Tanh, wiring).unwrap();
        let first = g.forward(&[0.5]).unwrap();
        let second = g.forward(&[0.5]).unwrap();
        assert_ne!(first, second);
        g.reset();
        assert_eq!(g.outputs(), vec![0.0; 3]);
        assert_eq!(g.forward(&[0.5]).unwrap(), first);
    }

    #[test]
    fn predict_on_empty_graph_fails() {
        let mut g = PropagationGraph::new(0, ActivationFunction::Tanh);
        assert_eq!(g.forward(&[]).unwrap(), Vec::<f64>::new());
        assert!(g.predict(&[]).is_err());
    }

    #[test]
    fn cell_lookup_out_of_range() {
        let g = PropagationGraph::new(2, ActivationFunction::Tanh);
        assert!(g.cell(1).is_ok());
        assert!(matches!(g.cell(2), Err(PrnnError::IndexOutOfRange { index: 2, len: 2 })));
    }
}
