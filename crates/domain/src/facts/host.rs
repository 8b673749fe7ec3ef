use serde::{Deserialize, Serialize};

/// Raw host facts as reported by inventory
///
/// Every capacity field is a loosely-typed string whose presence depends on
/// the collector (RHSM or QPC) that reported the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryHostFacts {
    pub account: String,
    pub org_id: String,
    pub system_name: String,
    #[serde(default)]
    pub cores: Option<String>,
    #[serde(default)]
    pub sockets: Option<String>,
    /// QPC tri-state flag: "true", "false" or absent
    #[serde(default)]
    pub is_rhel: Option<String>,
    /// RHSM comma-delimited engineering product IDs
    #[serde(default)]
    pub products: Option<String>,
    pub sync_timestamp: String,
}

impl InventoryHostFacts {
    pub fn new(
        account: impl Into<String>,
        org_id: impl Into<String>,
        system_name: impl Into<String>,
        sync_timestamp: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            org_id: org_id.into(),
            system_name: system_name.into(),
            sync_timestamp: sync_timestamp.into(),
            ..Self::default()
        }
    }

    pub fn with_cores(mut self, cores: impl Into<String>) -> Self {
        self.cores = Some(cores.into());
        self
    }

    pub fn with_sockets(mut self, sockets: impl Into<String>) -> Self {
        self.sockets = Some(sockets.into());
        self
    }

    pub fn with_is_rhel(mut self, is_rhel: impl Into<String>) -> Self {
        self.is_rhel = Some(is_rhel.into());
        self
    }

    pub fn with_products(mut self, products: impl Into<String>) -> Self {
        self.products = Some(products.into());
        self
    }

    /// Engineering product IDs from the RHSM product list, blanks dropped
    pub fn product_ids(&self) -> impl Iterator<Item = &str> {
        self.products
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
