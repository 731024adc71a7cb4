//! Heterogeneous graph snapshots.
//!
//! A [`Snapshot`] is the state of a heterogeneous graph for a single time
//! period: typed node counts plus typed edge lists in COO form, the same
//! layout PyTorch Geometric's `HeteroData` uses for `edge_index`.
//!
//! # Example
//!
//! ```rust
//! use backfill_core::snapshot::{EdgeType, NodeType, Snapshot};
//!
//! let mut snap = Snapshot::new();
//! snap.set_num_nodes(NodeType::new("author"), 2);
//! snap.set_num_nodes(NodeType::new("paper"), 1);
//!
//! let writes = EdgeType::writes();
//! snap.add_edge(&writes, 0, 0);
//! snap.add_edge(&writes, 1, 0);
//!
//! assert_eq!(snap.num_edges(&writes), 2);
//! assert_eq!(snap.incoming_neighbors(&writes, 0), vec![0, 1]);
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A node type identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeType(pub String);

impl NodeType {
    /// Create a new node type.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Authors of papers.
    pub fn author() -> Self {
        Self::new("author")
    }

    /// Publication venues.
    pub fn venue() -> Self {
        Self::new("venue")
    }

    /// Papers.
    pub fn paper() -> Self {
        Self::new("paper")
    }

    /// Get the type name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S: Into<String>> From<S> for NodeType {
    fn from(s: S) -> Self {
        Self(s.into())
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An edge type identifier, represented as (src_type, relation, dst_type).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeType {
    /// Source node type.
    pub src_type: NodeType,
    /// Relation name.
    pub relation: String,
    /// Destination node type.
    pub dst_type: NodeType,
}

impl EdgeType {
    /// Create a new edge type.
    pub fn new(
        src_type: impl Into<NodeType>,
        relation: impl Into<String>,
        dst_type: impl Into<NodeType>,
    ) -> Self {
        Self {
            src_type: src_type.into(),
            relation: relation.into(),
            dst_type: dst_type.into(),
        }
    }

    /// `author -writes-> paper`.
    pub fn writes() -> Self {
        Self::new("author", "writes", "paper")
    }

    /// `paper -published_in-> venue`.
    pub fn published_in() -> Self {
        Self::new("paper", "published_in", "venue")
    }

    /// `paper -cites-> paper`.
    pub fn cites() -> Self {
        Self::new("paper", "cites", "paper")
    }
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}->{}", self.src_type, self.relation, self.dst_type)
    }
}

/// Node index within a specific node type.
pub type TypedNodeIndex = usize;

/// Edge storage for a specific edge type (COO format).
///
/// Stores edges as (source_idx, target_idx) pairs where indices
/// are local to their respective node types. Both lists always have the
/// same length; deserialization rejects input where they do not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEdgeStore")]
pub struct EdgeStore {
    /// Source node indices (local to src_type).
    src: Vec<TypedNodeIndex>,
    /// Target node indices (local to dst_type).
    dst: Vec<TypedNodeIndex>,
}

#[derive(Deserialize)]
struct RawEdgeStore {
    src: Vec<TypedNodeIndex>,
    dst: Vec<TypedNodeIndex>,
}

impl TryFrom<RawEdgeStore> for EdgeStore {
    type Error = Error;

    fn try_from(raw: RawEdgeStore) -> Result<Self> {
        Self::from_edges(raw.src, raw.dst)
    }
}

impl EdgeStore {
    /// Create an empty edge store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from edge index vectors, which must have equal length.
    pub fn from_edges(src: Vec<TypedNodeIndex>, dst: Vec<TypedNodeIndex>) -> Result<Self> {
        if src.len() != dst.len() {
            return Err(Error::EdgeArity {
                src: src.len(),
                dst: dst.len(),
            });
        }
        Ok(Self { src, dst })
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.src.len()
    }

    /// Source node indices, one per edge.
    pub fn src(&self) -> &[TypedNodeIndex] {
        &self.src
    }

    /// Destination node indices, one per edge.
    pub fn dst(&self) -> &[TypedNodeIndex] {
        &self.dst
    }

    /// Add an edge.
    pub fn add_edge(&mut self, src: TypedNodeIndex, dst: TypedNodeIndex) {
        self.src.push(src);
        self.dst.push(dst);
    }

    /// Iterate over (src, dst) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (TypedNodeIndex, TypedNodeIndex)> + '_ {
        self.src.iter().copied().zip(self.dst.iter().copied())
    }
}

/// One time period of a heterogeneous graph.
///
/// Node identity is positional: a node of type `t` is the index
/// `0..num_nodes(t)` in this snapshot. The same entity may have a different
/// index (or none) in another snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Node counts by type.
    num_nodes: HashMap<NodeType, usize>,
    /// Edges by type.
    #[serde(with = "edge_map")]
    edge_stores: HashMap<EdgeType, EdgeStore>,
}

// JSON object keys must be strings, so edge stores travel as a list of pairs.
mod edge_map {
    use super::{EdgeStore, EdgeType};
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::HashMap;

    pub fn serialize<S: Serializer>(
        map: &HashMap<EdgeType, EdgeStore>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<HashMap<EdgeType, EdgeStore>, D::Error> {
        let pairs = Vec::<(EdgeType, EdgeStore)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of nodes of a type.
    pub fn set_num_nodes(&mut self, node_type: NodeType, count: usize) {
        self.num_nodes.insert(node_type, count);
    }

    /// Number of nodes of a given type (0 for unknown types).
    pub fn num_nodes(&self, node_type: &NodeType) -> usize {
        self.num_nodes.get(node_type).copied().unwrap_or(0)
    }

    /// Add a single edge of the given type.
    pub fn add_edge(&mut self, edge_type: &EdgeType, src: TypedNodeIndex, dst: TypedNodeIndex) {
        self.edge_stores
            .entry(edge_type.clone())
            .or_default()
            .add_edge(src, dst);
    }

    /// Install a full edge list for a type, replacing any existing one.
    pub fn set_edges(
        &mut self,
        edge_type: EdgeType,
        src: Vec<TypedNodeIndex>,
        dst: Vec<TypedNodeIndex>,
    ) -> Result<()> {
        let store = EdgeStore::from_edges(src, dst)?;
        self.edge_stores.insert(edge_type, store);
        Ok(())
    }

    /// Builder form of [`Snapshot::set_edges`].
    pub fn with_edges(
        mut self,
        edge_type: EdgeType,
        src: Vec<TypedNodeIndex>,
        dst: Vec<TypedNodeIndex>,
    ) -> Result<Self> {
        self.set_edges(edge_type, src, dst)?;
        Ok(self)
    }

    /// Get edge store for a type.
    pub fn edge_store(&self, edge_type: &EdgeType) -> Option<&EdgeStore> {
        self.edge_stores.get(edge_type)
    }

    /// Number of edges of a given type.
    pub fn num_edges(&self, edge_type: &EdgeType) -> usize {
        self.edge_stores
            .get(edge_type)
            .map(|s| s.num_edges())
            .unwrap_or(0)
    }

    /// Destinations of every edge of `edge_type` leaving `src_idx`.
    ///
    /// Parallel edges are returned once per edge, in edge-list order.
    pub fn neighbors(&self, edge_type: &EdgeType, src_idx: TypedNodeIndex) -> Vec<TypedNodeIndex> {
        self.edge_stores
            .get(edge_type)
            .map(|store| {
                store
                    .iter()
                    .filter_map(|(s, d)| if s == src_idx { Some(d) } else { None })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Sources of every edge of `edge_type` entering `dst_idx`.
    pub fn incoming_neighbors(
        &self,
        edge_type: &EdgeType,
        dst_idx: TypedNodeIndex,
    ) -> Vec<TypedNodeIndex> {
        self.edge_stores
            .get(edge_type)
            .map(|store| {
                store
                    .iter()
                    .filter_map(|(s, d)| if d == dst_idx { Some(s) } else { None })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_edges() {
        let mut snap = Snapshot::new();

        let writes = EdgeType::writes();
        snap.add_edge(&writes, 0, 3);
        snap.add_edge(&writes, 1, 3);
        snap.add_edge(&writes, 0, 4);

        assert_eq!(snap.num_edges(&writes), 3);
        assert_eq!(snap.neighbors(&writes, 0), vec![3, 4]);
        assert_eq!(snap.incoming_neighbors(&writes, 3), vec![0, 1]);
    }

    #[test]
    fn test_edge_arity_mismatch() {
        let err = Snapshot::new()
            .with_edges(EdgeType::cites(), vec![0, 1], vec![2])
            .unwrap_err();
        assert!(matches!(err, Error::EdgeArity { src: 2, dst: 1 }));
    }

    #[test]
    fn test_set_edges_replaces() {
        let mut snap = Snapshot::new();
        let cites = EdgeType::cites();
        snap.add_edge(&cites, 0, 1);
        snap.set_edges(cites.clone(), vec![5, 6], vec![7, 8]).unwrap();

        assert_eq!(snap.num_edges(&cites), 2);
        assert!(snap.neighbors(&cites, 0).is_empty());
        assert_eq!(snap.edge_store(&cites).unwrap().src(), &[5, 6]);
    }

    #[test]
    fn test_parallel_edges_kept() {
        let snap = Snapshot::new()
            .with_edges(EdgeType::cites(), vec![0, 0, 0], vec![2, 2, 1])
            .unwrap();
        assert_eq!(snap.neighbors(&EdgeType::cites(), 0), vec![2, 2, 1]);
    }

    #[test]
    fn test_node_counts() {
        let mut snap = Snapshot::new();
        snap.set_num_nodes(NodeType::paper(), 10);
        assert_eq!(snap.num_nodes(&NodeType::paper()), 10);
        assert_eq!(snap.num_nodes(&NodeType::venue()), 0);
    }

    #[test]
    fn test_edge_type_display() {
        assert_eq!(EdgeType::published_in().to_string(), "paper-published_in->venue");
    }

    #[test]
    fn test_snapshot_serde() {
        let snap = Snapshot::new()
            .with_edges(EdgeType::writes(), vec![0, 1], vec![0, 0])
            .unwrap();
        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.edge_store(&EdgeType::writes()), snap.edge_store(&EdgeType::writes()));
    }

    #[test]
    fn test_edge_store_rejects_uneven_json() {
        let err = serde_json::from_str::<EdgeStore>(r#"{"src":[0,1,2],"dst":[5]}"#).unwrap_err();
        assert!(err.to_string().contains("arity mismatch"), "{err}");

        let store: EdgeStore = serde_json::from_str(r#"{"src":[0,1],"dst":[5,5]}"#).unwrap();
        assert_eq!(store.num_edges(), 2);
    }

    #[test]
    fn test_snapshot_rejects_uneven_edge_list() {
        let json = r#"{"num_nodes":{},"edge_stores":[[
            {"src_type":"paper","relation":"cites","dst_type":"paper"},
            {"src":[0,1],"dst":[1]}
        ]]}"#;
        assert!(serde_json::from_str::<Snapshot>(json).is_err());
    }
}
