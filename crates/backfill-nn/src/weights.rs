//! Learnable per-relation scalar weights.
//!
//! One rank-0 parameter per neighbour type plus one for the reserved `self`
//! key (the paper's own topic vector). All of them start at 1.0 and live in
//! the caller's `VarMap`, so an optimizer built from `varmap.all_vars()`
//! updates them and `varmap.save` checkpoints them under
//! `<prefix>.<relation>` / `<prefix>.self`.

use crate::error::{Error, Result};
use backfill_core::NodeType;
use candle_core::{DType, Tensor};
use candle_nn::{Init, VarBuilder};
use indexmap::IndexMap;

/// Name of the topic-vector weight.
pub const SELF_KEY: &str = "self";

/// Key of a single weight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WeightKey {
    /// Weight applied to the mean embedding of one neighbour type.
    Relation(NodeType),
    /// Weight applied to the topic vector.
    SelfTopic,
}

impl WeightKey {
    /// Parameter name inside the VarMap prefix.
    pub fn name(&self) -> &str {
        match self {
            WeightKey::Relation(t) => t.as_str(),
            WeightKey::SelfTopic => SELF_KEY,
        }
    }
}

impl From<NodeType> for WeightKey {
    fn from(t: NodeType) -> Self {
        WeightKey::Relation(t)
    }
}

/// The weight set of one imputer.
#[derive(Debug, Clone)]
pub struct RelationWeights {
    relations: IndexMap<NodeType, Tensor>,
    self_weight: Tensor,
}

impl RelationWeights {
    /// Register a weight for every relation type and for `self`.
    ///
    /// # Arguments
    /// - `relation_types`: neighbour types; `"self"` is rejected, duplicates
    ///   are rejected
    /// - `vb`: variable builder, usually already prefixed (`vb.pp("w")`)
    pub fn new<I, T>(relation_types: I, vb: VarBuilder) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeType>,
    {
        let mut relations = IndexMap::new();
        for t in relation_types {
            let t: NodeType = t.into();
            if t.as_str() == SELF_KEY {
                return Err(Error::ReservedRelation);
            }
            if relations.contains_key(&t) {
                let msg = format!("duplicate relation type {:?}", t.as_str());
                return Err(Error::InvalidConfig(msg));
            }
            let w = vb.get_with_hints((), t.as_str(), Init::Const(1.0))?;
            relations.insert(t, w);
        }
        let self_weight = vb.get_with_hints((), SELF_KEY, Init::Const(1.0))?;
        Ok(Self {
            relations,
            self_weight,
        })
    }

    /// Weight for a key, if registered.
    pub fn get(&self, key: &WeightKey) -> Option<&Tensor> {
        match key {
            WeightKey::Relation(t) => self.relations.get(t),
            WeightKey::SelfTopic => Some(&self.self_weight),
        }
    }

    /// Weight of a neighbour type.
    pub fn relation(&self, t: &NodeType) -> Result<&Tensor> {
        self.relations
            .get(t)
            .ok_or_else(|| Error::UnknownRelation(t.as_str().to_string()))
    }

    /// Weight of the topic vector.
    pub fn self_weight(&self) -> &Tensor {
        &self.self_weight
    }

    /// Current value of a weight.
    pub fn value(&self, key: &WeightKey) -> Result<f32> {
        let w = self
            .get(key)
            .ok_or_else(|| Error::UnknownRelation(key.name().to_string()))?;
        Ok(w.to_dtype(DType::F32)?.to_scalar::<f32>()?)
    }

    /// Registered neighbour types, in registration order.
    pub fn relation_types(&self) -> impl Iterator<Item = &NodeType> {
        self.relations.keys()
    }

    /// Number of weights, including `self`.
    pub fn num_weights(&self) -> usize {
        self.relations.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;
    use candle_nn::VarMap;

    #[test]
    fn test_registers_self_and_relations() {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let weights = RelationWeights::new(["author", "venue"], vb.pp("w")).unwrap();

        assert_eq!(weights.num_weights(), 3);
        assert_eq!(varmap.all_vars().len(), 3);
        let names: Vec<&str> = weights.relation_types().map(|t| t.as_str()).collect();
        assert_eq!(names, vec!["author", "venue"]);
    }

    #[test]
    fn test_initialized_to_one() {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let weights = RelationWeights::new(["author"], vb).unwrap();

        assert_eq!(weights.value(&WeightKey::Relation(NodeType::author())).unwrap(), 1.0);
        assert_eq!(weights.value(&WeightKey::SelfTopic).unwrap(), 1.0);
        assert!(weights.self_weight().dims().is_empty());
    }

    #[test]
    fn test_self_is_reserved() {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let err = RelationWeights::new(["author", "self"], vb).unwrap_err();
        assert!(matches!(err, Error::ReservedRelation));
    }

    #[test]
    fn test_unknown_relation() {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let weights = RelationWeights::new(["author"], vb).unwrap();

        let err = weights.relation(&NodeType::venue()).unwrap_err();
        assert!(matches!(err, Error::UnknownRelation(name) if name == "venue"));
        assert!(weights.get(&WeightKey::Relation(NodeType::venue())).is_none());
    }

    #[test]
    fn test_varmap_updates_are_visible() {
        let mut varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let weights = RelationWeights::new(["venue"], vb.pp("w")).unwrap();

        varmap
            .set_one("w.venue", Tensor::new(0.25f32, &Device::Cpu).unwrap())
            .unwrap();
        assert_eq!(weights.value(&NodeType::venue().into()).unwrap(), 0.25);
    }
}
