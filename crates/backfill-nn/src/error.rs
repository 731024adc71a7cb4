//! Error types for backfill-nn.

use thiserror::Error;

/// Imputation error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Candle tensor error.
    #[error("tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    /// Imputation was requested without a neighbour mapping.
    #[error("neighbours must be provided for imputation in earlier snapshots")]
    MissingNeighbourInput,

    /// No embedding table for a node type in the target snapshot.
    #[error("no embedding table for node type {0:?}")]
    MissingEmbeddingTable(String),

    /// Neighbour type with no registered weight.
    #[error("no weight registered for relation {0:?}")]
    UnknownRelation(String),

    /// `self` is reserved for the topic-vector weight.
    #[error("relation name \"self\" is reserved")]
    ReservedRelation,

    /// Snapshot index outside the embedding history.
    #[error("snapshot index {index} out of range for {len} snapshots")]
    SnapshotOutOfRange { index: usize, len: usize },

    /// Invalid configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Config (de)serialization error.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
