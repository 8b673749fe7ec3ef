use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Typed capacity record produced by [`super::FactNormalizer`]
///
/// `cores`/`sockets` are `Some(0)` for an eligible host that did not report
/// them and `None` for a host excluded by the staleness check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedFacts {
    pub products: BTreeSet<String>,
    pub cores: Option<u32>,
    pub sockets: Option<u32>,
}

impl NormalizedFacts {
    /// Facts for a host that must not be counted
    pub fn excluded() -> Self {
        Self::default()
    }

    pub fn is_excluded(&self) -> bool {
        self.cores.is_none() && self.sockets.is_none() && self.products.is_empty()
    }

    pub fn has_product(&self, tag: &str) -> bool {
        self.products.contains(tag)
    }
}
