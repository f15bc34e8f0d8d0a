use thiserror::Error;

/// Errors raised by graph construction, propagation and the experiment glue
/// around it.
#[derive(Debug, Error)]
pub enum PrnnError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A cell index at or beyond the cell count.  Public constructors reject
    /// such edges up front, so hitting this during propagation means an
    /// invariant was broken.
    #[error("cell index {index} out of range for {len} cells")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("graph is already wired; the edge list is built only once")]
    AlreadyWired,

    #[error("idx format error: {0}")]
    Idx(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PrnnError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        PrnnError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PrnnError>;
