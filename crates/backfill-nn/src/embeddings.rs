//! Per-snapshot embedding tables.

use crate::error::{Error, Result};
use backfill_core::NodeType;
use candle_core::Tensor;
use std::collections::HashMap;

/// Encoder output for one snapshot: a `[rows, D]` tensor per node type.
///
/// Row `i` of the `t` table is the embedding of node `i` of type `t` in that
/// snapshot. Tables are read, never written, and never moved off the device
/// they were produced on.
#[derive(Debug, Clone, Default)]
pub struct SnapshotEmbeddings {
    tables: HashMap<NodeType, Tensor>,
}

impl SnapshotEmbeddings {
    /// Create an empty set of tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table of a node type.
    pub fn insert(&mut self, node_type: impl Into<NodeType>, table: Tensor) {
        self.tables.insert(node_type.into(), table);
    }

    /// Builder form of [`SnapshotEmbeddings::insert`].
    pub fn with(mut self, node_type: impl Into<NodeType>, table: Tensor) -> Self {
        self.insert(node_type, table);
        self
    }

    /// Table of a node type, if present.
    pub fn get(&self, node_type: &NodeType) -> Option<&Tensor> {
        self.tables.get(node_type)
    }

    /// Table of a node type, or `MissingEmbeddingTable`.
    pub fn table(&self, node_type: &NodeType) -> Result<&Tensor> {
        self.tables
            .get(node_type)
            .ok_or_else(|| Error::MissingEmbeddingTable(node_type.as_str().to_string()))
    }

    /// Number of rows (known nodes) of a type in this snapshot.
    pub fn num_rows(&self, node_type: &NodeType) -> Result<usize> {
        Ok(self.table(node_type)?.dim(0)?)
    }
}

impl FromIterator<(NodeType, Tensor)> for SnapshotEmbeddings {
    fn from_iter<I: IntoIterator<Item = (NodeType, Tensor)>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}
