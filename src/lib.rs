//! `backfill` computes substitute embeddings for papers that are missing from
//! earlier snapshots of a temporal heterogeneous citation graph.
//!
//! The workflow per paper is two calls:
//!
//! 1. [`NeighbourCollector::collect`] on the paper's publication-year
//!    snapshot, giving its authors, venue and references;
//! 2. [`WeightedImputer::forward`] (or [`WeightedImputer::aggregate`]) on the
//!    embedding tables of the earlier snapshot, giving one `[D]` vector.
//!
//! This crate only re-exports the two layers: snapshots and neighbour
//! collection from `backfill-core`, learned weights and the imputer from
//! `backfill-nn`.

pub use backfill_core::{
    Direction, EdgeStore, EdgeType, NeighbourCollector, Neighbours, NodeType, Relation, Snapshot,
    TypedNodeIndex,
};
pub use backfill_nn::{
    Error, ImputerConfig, RelationWeights, Result, SnapshotEmbeddings, WeightKey, WeightedImputer,
};
