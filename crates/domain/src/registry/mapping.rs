use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of raw signal a [`TagMapping`] matches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MappingValueType {
    /// Engineering product ID reported by RHSM
    EngId,
    /// CPU architecture string, e.g. `x86_64`
    Arch,
    /// System role claim, e.g. `osd`
    Role,
    /// Offering product name
    ProductName,
}

/// Associates a raw value of a given type with canonical tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagMapping {
    pub value: String,
    pub value_type: MappingValueType,
    pub tags: BTreeSet<String>,
}

impl TagMapping {
    pub fn new<I, S>(value: impl Into<String>, value_type: MappingValueType, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            value: value.into(),
            value_type,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}
