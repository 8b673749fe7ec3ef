use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::{Granularity, ServiceLevel, Usage};
use crate::registry::Uom;

/// One point of a tally report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub measurements: BTreeMap<Uom, f64>,
    /// False for entries synthesized to fill a gap
    pub has_data: bool,
}

impl SnapshotEntry {
    /// Zero-valued placeholder for a bucket with no stored snapshot
    pub fn empty(date: DateTime<Utc>) -> Self {
        Self {
            id: None,
            date,
            measurements: BTreeMap::new(),
            has_data: false,
        }
    }

    pub fn measurement(&self, uom: Uom) -> f64 {
        self.measurements.get(&uom).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyReportMeta {
    pub count: usize,
    pub product: String,
    pub granularity: Granularity,
    /// Unset when the request did not filter on service level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_level: Option<ServiceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Links between pages of a paged report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    pub first: String,
    pub last: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyReport {
    pub data: Vec<SnapshotEntry>,
    pub meta: TallyReportMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<PageLinks>,
}

impl TallyReport {
    pub fn new(product: impl Into<String>, granularity: Granularity, data: Vec<SnapshotEntry>) -> Self {
        Self {
            meta: TallyReportMeta {
                count: data.len(),
                product: product.into(),
                granularity,
                service_level: None,
                usage: None,
            },
            data,
            links: None,
        }
    }
}
