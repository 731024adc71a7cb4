//! Imputer configuration.

use crate::error::{Error, Result};
use crate::weights::SELF_KEY;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Imputer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImputerConfig {
    /// Neighbour types that get a learned weight (default: author, venue, paper).
    pub relation_types: Vec<String>,
    /// Node type whose table fixes the hidden dimension (default: "paper").
    pub paper_type: String,
    /// VarMap prefix for the weights (default: "w").
    pub weight_prefix: String,
}

impl Default for ImputerConfig {
    fn default() -> Self {
        Self {
            relation_types: vec!["author".into(), "venue".into(), "paper".into()],
            paper_type: "paper".into(),
            weight_prefix: "w".into(),
        }
    }
}

impl ImputerConfig {
    /// Replace the relation types.
    pub fn with_relation_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relation_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the node type that fixes the hidden dimension.
    pub fn with_paper_type(mut self, paper_type: impl Into<String>) -> Self {
        self.paper_type = paper_type.into();
        self
    }

    /// Set the VarMap prefix of the weights.
    pub fn with_weight_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.weight_prefix = prefix.into();
        self
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check names are non-empty, distinct and do not claim `self`.
    pub fn validate(&self) -> Result<()> {
        if self.paper_type.is_empty() {
            return Err(Error::InvalidConfig("paper_type is empty".into()));
        }
        if self.weight_prefix.is_empty() {
            return Err(Error::InvalidConfig("weight_prefix is empty".into()));
        }
        let mut seen = HashSet::new();
        for name in &self.relation_types {
            if name == SELF_KEY {
                return Err(Error::ReservedRelation);
            }
            if name.is_empty() {
                return Err(Error::InvalidConfig("empty relation type".into()));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::InvalidConfig(format!("duplicate relation type {name:?}")));
            }
        }
        Ok(())
    }
}
