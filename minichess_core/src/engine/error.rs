//! Error types for the search engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The search deadline passed. The driver recovers from this by keeping
    /// the last completed iteration.
    #[error("search deadline exceeded")]
    Timeout,

    /// The position refused a move it had listed as legal.
    #[error("position rejected move {mv}")]
    MoveRejected {
        mv: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("invalid engine configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub(crate) fn rejected<M, E>(mv: &M, source: E) -> Self
    where
        M: std::fmt::Debug,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::MoveRejected {
            mv: format!("{mv:?}"),
            source: Box::new(source),
        }
    }
}
