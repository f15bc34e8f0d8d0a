pub mod dataset;
pub mod idx;

pub use dataset::Dataset;
pub use idx::{load_idx_pair, load_mnist, parse_idx_pair};
