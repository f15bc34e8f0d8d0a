pub mod activation;
pub mod cell;
pub mod config;
pub mod data;
pub mod error;
pub mod eval;
pub mod experiment;
pub mod graph;
pub mod loss;
pub mod train;

// Convenience re-exports
pub use activation::ActivationFunction;
pub use cell::Cell;
pub use config::ExperimentConfig;
pub use data::Dataset;
pub use error::{PrnnError, Result};
pub use eval::{accuracy, argmax, evaluate, ConfusionMatrix, EvalReport};
pub use experiment::{run_experiment, ExperimentReport};
pub use graph::{Edge, InputPolicy, PropagationGraph, RngSource, ScriptedSource, WiringSource};
pub use loss::SumSquaresLoss;
pub use train::{train_loop, EpochStats, TrainConfig};
