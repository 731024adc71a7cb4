//! Weighted neighbour-mean imputation.
//!
//! A paper first published in year `t` has no learned embedding in earlier
//! snapshots. Its substitute embedding in snapshot `s < t` is
//!
//! ```text
//! v_{p,s} = sum_m w_m * mean_{i in N_p^m} u_{i,s}  +  w_self * topic_p
//! ```
//!
//! where `N_p^m` are the paper's neighbours of type `m` collected in year `t`
//! (see [`backfill_core::NeighbourCollector`]), `u_{i,s}` is neighbour `i`'s
//! row in snapshot `s`, and `w_m` are learned scalars.
//!
//! # Example
//!
//! ```rust
//! use backfill_core::Neighbours;
//! use backfill_nn::{ImputerConfig, SnapshotEmbeddings, WeightedImputer};
//! use candle_core::{DType, Device, Tensor};
//! use candle_nn::{VarBuilder, VarMap};
//!
//! let dev = Device::Cpu;
//! let varmap = VarMap::new();
//! let vb = VarBuilder::from_varmap(&varmap, DType::F32, &dev);
//! let imputer = WeightedImputer::new(&ImputerConfig::default(), vb)?;
//!
//! let embs = SnapshotEmbeddings::new()
//!     .with("paper", Tensor::zeros((3, 2), DType::F32, &dev)?)
//!     .with("author", Tensor::new(&[[1f32, 2.], [3., 4.]], &dev)?);
//! let neigh = Neighbours::new().with("author", vec![0, 1]);
//!
//! let v = imputer.aggregate(&neigh, &embs, None)?;
//! assert_eq!(v.to_vec1::<f32>()?, vec![2., 3.]);
//! # Ok::<(), backfill_nn::Error>(())
//! ```

use crate::config::ImputerConfig;
use crate::embeddings::SnapshotEmbeddings;
use crate::error::{Error, Result};
use crate::weights::RelationWeights;
use backfill_core::{NodeType, Neighbours};
use candle_core::{Tensor, D};
use candle_nn::VarBuilder;

/// Imputes missing embeddings from typed neighbour means.
#[derive(Debug, Clone)]
pub struct WeightedImputer {
    weights: RelationWeights,
    paper_type: NodeType,
}

impl WeightedImputer {
    /// Create an imputer, registering its weights under
    /// `config.weight_prefix` in the variable builder.
    pub fn new(config: &ImputerConfig, vb: VarBuilder) -> Result<Self> {
        config.validate()?;
        let weights = RelationWeights::new(
            config.relation_types.iter().map(NodeType::new),
            vb.pp(config.weight_prefix.as_str()),
        )?;
        Ok(Self::from_weights(weights, NodeType::new(config.paper_type.as_str())))
    }

    /// Wrap an existing weight set.
    pub fn from_weights(weights: RelationWeights, paper_type: NodeType) -> Self {
        Self {
            weights,
            paper_type,
        }
    }

    /// Learned weights.
    pub fn weights(&self) -> &RelationWeights {
        &self.weights
    }

    /// Node type whose table fixes the hidden dimension.
    pub fn paper_type(&self) -> &NodeType {
        &self.paper_type
    }

    /// Impute into snapshot `year_idx` of `history`.
    ///
    /// # Arguments
    /// - `year_idx`: snapshot being imputed into (t-1, t-2, ...)
    /// - `history`: encoder output for every snapshot
    /// - `neighbours`: neighbours collected in the publication snapshot;
    ///   required, since the paper has no adjacency in earlier snapshots
    /// - `topic_vec`: optional `[D]` topic vector of the paper
    ///
    /// # Returns
    /// - Imputed embedding `[D]`
    pub fn forward(
        &self,
        year_idx: usize,
        history: &[SnapshotEmbeddings],
        neighbours: Option<&Neighbours>,
        topic_vec: Option<&Tensor>,
    ) -> Result<Tensor> {
        let neighbours = neighbours.ok_or(Error::MissingNeighbourInput)?;
        let embs = history.get(year_idx).ok_or(Error::SnapshotOutOfRange {
            index: year_idx,
            len: history.len(),
        })?;
        self.aggregate(neighbours, embs, topic_vec)
    }

    /// Weighted sum of per-type neighbour means, plus the weighted topic
    /// vector when given.
    ///
    /// Ids at or beyond a table's row count do not exist yet in this
    /// snapshot and are dropped; a type left with no ids contributes
    /// nothing. An empty neighbour mapping yields zeros even when a topic
    /// vector is supplied.
    pub fn aggregate(
        &self,
        neighbours: &Neighbours,
        embs: &SnapshotEmbeddings,
        topic_vec: Option<&Tensor>,
    ) -> Result<Tensor> {
        let paper = embs.table(&self.paper_type)?;
        let hidden = paper.dim(D::Minus1)?;

        if neighbours.is_empty() {
            tracing::debug!("no neighbours, imputing zeros");
            return Ok(Tensor::zeros(hidden, paper.dtype(), paper.device())?);
        }

        let mut parts = Vec::with_capacity(neighbours.len() + 1);
        for (ntype, ids) in neighbours.iter() {
            let table = embs.table(ntype)?;
            let rows = table.dim(0)?;
            let kept: Vec<u32> = ids
                .iter()
                .filter(|&&i| i < rows)
                .map(|&i| i as u32)
                .collect();
            if kept.is_empty() {
                tracing::debug!(
                    relation = ntype.as_str(),
                    dropped = ids.len(),
                    rows,
                    "all neighbour ids absent from snapshot"
                );
                continue;
            }
            let n = kept.len();
            let index = Tensor::from_vec(kept, n, table.device())?;
            let mean = table.index_select(&index, 0)?.mean(0)?;
            let w = self.weights.relation(ntype)?.to_dtype(mean.dtype())?;
            parts.push(mean.broadcast_mul(&w)?);
        }

        if let Some(topic) = topic_vec {
            let w = self.weights.self_weight().to_dtype(topic.dtype())?;
            parts.push(topic.broadcast_mul(&w)?);
        }

        if parts.is_empty() {
            tracing::debug!("every neighbour type filtered out, imputing zeros");
            return Ok(Tensor::zeros(hidden, paper.dtype(), paper.device())?);
        }

        Ok(Tensor::stack(&parts, 0)?.sum(0)?)
    }
}
