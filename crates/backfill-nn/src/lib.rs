//! Learned imputation of missing snapshot embeddings.
//!
//! `backfill-nn` sits between the structure layer (`backfill-core`) and the
//! training driver. Given the neighbours a paper has in its publication
//! snapshot, it builds a substitute embedding for the paper in earlier
//! snapshots, where the encoder produced no row for it.
//!
//! # Modules
//!
//! - [`imputer`]: weighted neighbour-mean aggregation ([`WeightedImputer`])
//! - [`weights`]: learnable per-relation scalars, registered in a `VarMap`
//! - [`embeddings`]: per-snapshot embedding tables
//! - [`config`]: imputer configuration
//!
//! # Example: imputing into an earlier year
//!
//! ```rust,ignore
//! use backfill_core::NeighbourCollector;
//! use backfill_nn::{ImputerConfig, WeightedImputer};
//!
//! let imputer = WeightedImputer::new(&ImputerConfig::default(), vb.pp("imputer"))?;
//! let neigh = NeighbourCollector::default().collect(&snapshots[t], paper_id);
//! let v_prev = imputer.forward(t - 1, &embeddings, Some(&neigh), Some(&topic))?;
//! ```

pub mod config;
pub mod embeddings;
pub mod error;
pub mod imputer;
pub mod weights;

pub use config::ImputerConfig;
pub use embeddings::SnapshotEmbeddings;
pub use error::{Error, Result};
pub use imputer::WeightedImputer;
pub use weights::{RelationWeights, WeightKey, SELF_KEY};
