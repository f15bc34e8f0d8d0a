pub mod edge;
pub mod graph;
pub mod wiring;

pub use edge::Edge;
pub use graph::{InputPolicy, PropagationGraph};
pub use wiring::{RngSource, ScriptedSource, WiringSource};
