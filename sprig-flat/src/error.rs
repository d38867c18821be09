use thiserror::Error;

/// Errors originating from the `sprig-flat` engine.
#[derive(Debug, Error)]
pub enum FlatTreeError {
    #[error("expansion store is borrowed elsewhere")]
    StoreBorrowed,

    #[error("load for generation {loaded} finished after generation {current}")]
    StaleLoad { loaded: u64, current: u64 },

    #[error("node at level {level} exceeds depth limit {limit}")]
    DepthLimitExceeded { level: usize, limit: usize },

    #[error("child source was dropped before children were emitted")]
    ChildSourceDropped,

    #[error("view change receiver closed")]
    ViewClosed,

    #[error("settings JSON failed: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FlatTreeError>;
