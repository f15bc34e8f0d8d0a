use serde::{Serialize, Deserialize};
use std::f64::consts::{E, PI};

/// The nonlinearity shared by every cell of a graph.
///
/// A graph owns exactly one `ActivationFunction` and hands it to each
/// `Cell::process` call, so all cells apply the same function.  `Tanh` is the
/// default: bounded and odd, which keeps accumulated cell inputs from blowing
/// up the outputs used as class scores.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ActivationFunction {
    #[default]
    Tanh,
    Sigmoid,
    /// `x / (1 + |x|)`; bounded and odd like `Tanh`, cheaper to evaluate.
    Softsign,
    Identity,
    ReLU,
    LeakyReLU { alpha: f64 },
    Elu { alpha: f64 },
    Gelu,
    Swish,
}

impl ActivationFunction {
    /// Applies the activation to one scalar.
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::Softsign => x / (1.0 + x.abs()),
            ActivationFunction::Identity => x,
            ActivationFunction::ReLU => x.max(0.0),
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { x } else { alpha * x },
            ActivationFunction::Elu { alpha } => {
                if x > 0.0 { x } else { alpha * (E.powf(x) - 1.0) }
            }
            ActivationFunction::Gelu => {
                let c = (2.0_f64 / PI).sqrt();
                0.5 * x * (1.0 + (c * (x + 0.044715 * x.powi(3))).tanh())
            }
            ActivationFunction::Swish => x / (1.0 + E.powf(-x)),
        }
    }

    /// True for the variants whose output stays inside a fixed interval no
    /// matter how much input a cell accumulates.
    pub fn is_bounded(&self) -> bool {
        matches!(
            self,
            ActivationFunction::Tanh | ActivationFunction::Sigmoid | ActivationFunction::Softsign
        )
    }
}
