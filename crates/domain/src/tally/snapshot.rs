use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::{Granularity, ServiceLevel, SnapshotEntry, Usage};
use crate::registry::Uom;

/// Stored usage snapshot for one account/product/bucket
///
/// Written by the aggregation process; this crate only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallySnapshot {
    pub id: Uuid,
    pub account_number: String,
    pub product_id: String,
    pub granularity: Granularity,
    pub service_level: ServiceLevel,
    pub usage: Usage,
    pub snapshot_date: DateTime<Utc>,
    #[serde(default)]
    pub measurements: BTreeMap<Uom, f64>,
}

impl TallySnapshot {
    pub fn new(
        account_number: impl Into<String>,
        product_id: impl Into<String>,
        granularity: Granularity,
        snapshot_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_number: account_number.into(),
            product_id: product_id.into(),
            granularity,
            service_level: ServiceLevel::Unspecified,
            usage: Usage::Unspecified,
            snapshot_date,
            measurements: BTreeMap::new(),
        }
    }

    pub fn with_service_level(mut self, service_level: ServiceLevel) -> Self {
        self.service_level = service_level;
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    pub fn with_measurement(mut self, uom: Uom, value: f64) -> Self {
        self.measurements.insert(uom, value);
        self
    }

    pub fn as_report_entry(&self) -> SnapshotEntry {
        SnapshotEntry {
            id: Some(self.id),
            date: self.snapshot_date,
            measurements: self.measurements.clone(),
            has_data: true,
        }
    }
}
