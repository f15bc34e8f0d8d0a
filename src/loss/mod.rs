pub mod sum_squares;

pub use sum_squares::{one_hot, SumSquaresLoss};
