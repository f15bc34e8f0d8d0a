pub mod evaluate;
pub mod metrics;

pub use evaluate::{evaluate, EvalReport};
pub use metrics::{accuracy, argmax, ConfusionMatrix};
