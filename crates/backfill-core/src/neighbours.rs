//! Typed neighbour collection for a paper in its publication snapshot.
//!
//! A paper that appears for the first time in year `t` has no row in the
//! embedding tables of years `t-1, t-2, ...`. Its authors, venue and
//! references usually do, so the neighbour ids gathered here (in the
//! publication-year snapshot) are what an imputer averages over in earlier
//! snapshots.
//!
//! ```rust
//! use backfill_core::neighbours::NeighbourCollector;
//! use backfill_core::snapshot::{EdgeType, NodeType, Snapshot};
//!
//! let snap = Snapshot::new()
//!     .with_edges(EdgeType::writes(), vec![4, 7, 2], vec![0, 0, 1])?
//!     .with_edges(EdgeType::cites(), vec![0], vec![3])?;
//!
//! let neigh = NeighbourCollector::default().collect(&snap, 0);
//! assert_eq!(neigh.get(&NodeType::author()), Some(&[4, 7][..]));
//! assert_eq!(neigh.get(&NodeType::paper()), Some(&[3][..]));
//! assert!(neigh.get(&NodeType::venue()).is_none());
//! # Ok::<(), backfill_core::Error>(())
//! ```

use crate::snapshot::{EdgeType, NodeType, Snapshot, TypedNodeIndex};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Which endpoint of an edge the target paper sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Paper is the destination; neighbours are the edge sources.
    Incoming,
    /// Paper is the source; neighbours are the edge destinations.
    Outgoing,
}

/// A neighbour category and where its ids come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Node type of the neighbours; also the key of their embedding table.
    pub neighbour_type: NodeType,
    /// Edge list the neighbours are read from.
    pub edge_type: EdgeType,
    /// Endpoint the paper occupies.
    pub direction: Direction,
}

impl Relation {
    /// Create a relation yielding `neighbour_type` ids from `edge_type`.
    pub fn new(
        neighbour_type: impl Into<NodeType>,
        edge_type: EdgeType,
        direction: Direction,
    ) -> Self {
        Self {
            neighbour_type: neighbour_type.into(),
            edge_type,
            direction,
        }
    }

    /// Authors: sources of `writes` edges ending at the paper.
    pub fn authors() -> Self {
        Self::new(NodeType::author(), EdgeType::writes(), Direction::Incoming)
    }

    /// Venue: destinations of `published_in` edges leaving the paper.
    pub fn venue() -> Self {
        Self::new(NodeType::venue(), EdgeType::published_in(), Direction::Outgoing)
    }

    /// References: papers cited by the paper.
    pub fn references() -> Self {
        Self::new(NodeType::paper(), EdgeType::cites(), Direction::Outgoing)
    }

    fn ids(&self, snapshot: &Snapshot, paper_id: TypedNodeIndex) -> Vec<TypedNodeIndex> {
        match self.direction {
            Direction::Incoming => snapshot.incoming_neighbors(&self.edge_type, paper_id),
            Direction::Outgoing => snapshot.neighbors(&self.edge_type, paper_id),
        }
    }
}

/// Neighbour ids keyed by neighbour type, in collection order.
///
/// Types with no neighbours are absent rather than mapped to an empty list.
/// Ids keep the multiplicity of the edge list they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<NodeType, Vec<TypedNodeIndex>>")]
pub struct Neighbours(IndexMap<NodeType, Vec<TypedNodeIndex>>);

impl Neighbours {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the ids for a type. An empty list removes the type.
    pub fn insert(&mut self, neighbour_type: NodeType, ids: Vec<TypedNodeIndex>) {
        if ids.is_empty() {
            self.0.shift_remove(&neighbour_type);
        } else {
            self.0.insert(neighbour_type, ids);
        }
    }

    /// Builder form of [`Neighbours::insert`].
    pub fn with(mut self, neighbour_type: impl Into<NodeType>, ids: Vec<TypedNodeIndex>) -> Self {
        self.insert(neighbour_type.into(), ids);
        self
    }

    /// Ids of one neighbour type, if present.
    pub fn get(&self, neighbour_type: &NodeType) -> Option<&[TypedNodeIndex]> {
        self.0.get(neighbour_type).map(Vec::as_slice)
    }

    /// Whether a neighbour type is present.
    pub fn contains(&self, neighbour_type: &NodeType) -> bool {
        self.0.contains_key(neighbour_type)
    }

    /// Number of neighbour types present.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no neighbour type is present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeType, &[TypedNodeIndex])> {
        self.0.iter().map(|(t, ids)| (t, ids.as_slice()))
    }
}

impl FromIterator<(NodeType, Vec<TypedNodeIndex>)> for Neighbours {
    fn from_iter<I: IntoIterator<Item = (NodeType, Vec<TypedNodeIndex>)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (t, ids) in iter {
            out.insert(t, ids);
        }
        out
    }
}

impl From<IndexMap<NodeType, Vec<TypedNodeIndex>>> for Neighbours {
    fn from(map: IndexMap<NodeType, Vec<TypedNodeIndex>>) -> Self {
        map.into_iter().collect()
    }
}

/// Gathers the neighbour ids of a paper from one snapshot.
///
/// Each relation owns its neighbour type: two relations never write to the
/// same key of the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNeighbourCollector")]
pub struct NeighbourCollector {
    relations: Vec<Relation>,
}

#[derive(Deserialize)]
struct RawNeighbourCollector {
    relations: Vec<Relation>,
}

impl TryFrom<RawNeighbourCollector> for NeighbourCollector {
    type Error = Error;

    fn try_from(raw: RawNeighbourCollector) -> Result<Self> {
        Self::new(raw.relations)
    }
}

impl Default for NeighbourCollector {
    /// Authors, then venue, then references.
    fn default() -> Self {
        Self {
            relations: vec![Relation::authors(), Relation::venue(), Relation::references()],
        }
    }
}

impl NeighbourCollector {
    /// Create a collector over `relations`, which must have distinct
    /// neighbour types.
    pub fn new(relations: Vec<Relation>) -> Result<Self> {
        for (i, relation) in relations.iter().enumerate() {
            let t = &relation.neighbour_type;
            if relations[..i].iter().any(|r| &r.neighbour_type == t) {
                return Err(Error::DuplicateNeighbourType(t.as_str().to_string()));
            }
        }
        Ok(Self { relations })
    }

    /// Configured relations, in collection order.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Collect the neighbours of `paper_id` in `snapshot`.
    ///
    /// Relations whose edge type is missing from the snapshot, or that have
    /// no edge touching the paper, are left out of the result.
    pub fn collect(&self, snapshot: &Snapshot, paper_id: TypedNodeIndex) -> Neighbours {
        let mut out = Neighbours::new();
        for relation in &self.relations {
            let ids = relation.ids(snapshot, paper_id);
            tracing::trace!(
                paper_id,
                relation = %relation.edge_type,
                count = ids.len(),
                "collected neighbours"
            );
            out.insert(relation.neighbour_type.clone(), ids);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot::new()
            .with_edges(EdgeType::writes(), vec![0, 1, 2, 1], vec![5, 5, 6, 7])
            .unwrap()
            .with_edges(EdgeType::published_in(), vec![5, 6], vec![2, 0])
            .unwrap()
            .with_edges(EdgeType::cites(), vec![5, 5, 6, 5], vec![1, 2, 5, 1])
            .unwrap()
    }

    #[test]
    fn test_collect_all_relations() {
        let neigh = NeighbourCollector::default().collect(&sample(), 5);

        assert_eq!(neigh.len(), 3);
        assert_eq!(neigh.get(&NodeType::author()), Some(&[0, 1][..]));
        assert_eq!(neigh.get(&NodeType::venue()), Some(&[2][..]));
        // repeated citation stays repeated
        assert_eq!(neigh.get(&NodeType::paper()), Some(&[1, 2, 1][..]));
    }

    #[test]
    fn test_collect_order_follows_relations() {
        let neigh = NeighbourCollector::default().collect(&sample(), 5);
        let order: Vec<&str> = neigh.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(order, vec!["author", "venue", "paper"]);
    }

    #[test]
    fn test_missing_relation_omitted() {
        // paper 7 has an author but no venue and cites nothing
        let neigh = NeighbourCollector::default().collect(&sample(), 7);
        assert_eq!(neigh.len(), 1);
        assert!(neigh.contains(&NodeType::author()));
        assert!(!neigh.contains(&NodeType::venue()));
        assert!(!neigh.contains(&NodeType::paper()));
    }

    #[test]
    fn test_direction_matters_for_cites() {
        // 6 cites 5, but being cited is not a reference
        let neigh = NeighbourCollector::default().collect(&sample(), 6);
        assert_eq!(neigh.get(&NodeType::paper()), Some(&[5][..]));
    }

    #[test]
    fn test_unknown_paper_is_empty() {
        let neigh = NeighbourCollector::default().collect(&sample(), 99);
        assert!(neigh.is_empty());
    }

    #[test]
    fn test_absent_edge_type_is_empty() {
        let neigh = NeighbourCollector::default().collect(&Snapshot::new(), 0);
        assert!(neigh.is_empty());
    }

    #[test]
    fn test_custom_relations() {
        let collector = NeighbourCollector::new(vec![Relation::new(
            "paper",
            EdgeType::cites(),
            Direction::Incoming,
        )])
        .unwrap();
        let neigh = collector.collect(&sample(), 5);
        assert_eq!(neigh.get(&NodeType::paper()), Some(&[6][..]));
    }

    #[test]
    fn test_neighbours_insert_empty_removes() {
        let mut neigh = Neighbours::new().with("author", vec![1]);
        neigh.insert(NodeType::author(), vec![]);
        assert!(neigh.is_empty());
    }

    #[test]
    fn test_neighbours_from_iter_drops_empty() {
        let neigh: Neighbours = vec![
            (NodeType::venue(), vec![]),
            (NodeType::author(), vec![3, 3]),
        ]
        .into_iter()
        .collect();
        assert_eq!(neigh.len(), 1);
        assert_eq!(neigh.get(&NodeType::author()), Some(&[3, 3][..]));
    }

    #[test]
    fn test_shared_neighbour_type_rejected() {
        // references and citing papers would both land under "paper"
        let err = NeighbourCollector::new(vec![
            Relation::references(),
            Relation::new("paper", EdgeType::cites(), Direction::Incoming),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateNeighbourType(name) if name == "paper"));
    }

    #[test]
    fn test_collector_serde_checks_neighbour_types() {
        let json = serde_json::to_string(&NeighbourCollector::default()).unwrap();
        let back: NeighbourCollector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NeighbourCollector::default());

        let dup = serde_json::json!({
            "relations": [Relation::references(), Relation::references()]
        });
        assert!(serde_json::from_value::<NeighbourCollector>(dup).is_err());
    }

    #[test]
    fn test_neighbours_serde_drops_empty() {
        let neigh: Neighbours =
            serde_json::from_str(r#"{"author":[1,1],"venue":[]}"#).unwrap();
        assert_eq!(neigh.len(), 1);
        assert!(!neigh.contains(&NodeType::venue()));
    }
}
