//! Snapshot graph primitives for embedding backfill.
//!
//! `backfill-core` holds the structure layer: heterogeneous snapshots with
//! typed COO edge lists, and the collection of a paper's typed neighbours
//! (authors, venue, references) in its publication-year snapshot. It has no
//! tensor dependency; the numeric side lives in `backfill-nn`.
//!
//! # Modules
//!
//! - [`snapshot`]: node/edge types and per-period edge storage
//! - [`neighbours`]: typed neighbour collection

pub mod neighbours;
pub mod snapshot;

pub use neighbours::{Direction, NeighbourCollector, Neighbours, Relation};
pub use snapshot::{EdgeStore, EdgeType, NodeType, Snapshot, TypedNodeIndex};

/// Error types for snapshot operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("edge list arity mismatch: {src} sources, {dst} destinations")]
    EdgeArity { src: usize, dst: usize },

    #[error("neighbour type {0:?} is produced by more than one relation")]
    DuplicateNeighbourType(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
