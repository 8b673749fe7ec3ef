use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Granularity, ServiceLevel, TallySnapshot, Usage};
use crate::DomainError;

/// Filter for a snapshot range query
///
/// `ServiceLevel::Any` / `Usage::Any` disable the respective filter.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotQuery {
    pub account_number: String,
    pub product_id: String,
    pub granularity: Granularity,
    pub service_level: ServiceLevel,
    pub usage: Usage,
    pub beginning: DateTime<Utc>,
    pub ending: DateTime<Utc>,
}

impl SnapshotQuery {
    /// True when `snapshot` satisfies every filter of this query
    pub fn matches(&self, snapshot: &TallySnapshot) -> bool {
        snapshot.account_number == self.account_number
            && snapshot.product_id == self.product_id
            && snapshot.granularity == self.granularity
            && (self.service_level == ServiceLevel::Any
                || snapshot.service_level == self.service_level)
            && (self.usage == Usage::Any || snapshot.usage == self.usage)
            && snapshot.snapshot_date >= self.beginning
            && snapshot.snapshot_date <= self.ending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u32,
    pub limit: u32,
}

/// Snapshots ordered by date, plus the unpaged total
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnapshotPage {
    pub items: Vec<TallySnapshot>,
    pub total: u64,
}

/// Read side of the snapshot store
///
/// Implementations live in the infrastructure layer.
#[async_trait]
pub trait TallySnapshotRepository: Send + Sync {
    /// Snapshots matching `query`, ascending by snapshot date; all of them when `page` is `None`
    async fn find_snapshots(
        &self,
        query: &SnapshotQuery,
        page: Option<PageRequest>,
    ) -> Result<SnapshotPage, DomainError>;

    /// Insert or replace a snapshot by id
    async fn save(&self, snapshot: &TallySnapshot) -> Result<(), DomainError>;
}
