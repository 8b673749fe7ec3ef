use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::DomainError;

/// Unit of measure a metric counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Uom {
    #[serde(rename = "Cores")]
    Cores,
    #[serde(rename = "Sockets")]
    Sockets,
    #[serde(rename = "Instance-hours")]
    InstanceHours,
    #[serde(rename = "Storage-gibibytes")]
    StorageGibibytes,
    #[serde(rename = "Transfer-gibibytes")]
    TransferGibibytes,
}

impl Uom {
    pub const ALL: [Uom; 5] = [
        Uom::Cores,
        Uom::Sockets,
        Uom::InstanceHours,
        Uom::StorageGibibytes,
        Uom::TransferGibibytes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cores => "Cores",
            Self::Sockets => "Sockets",
            Self::InstanceHours => "Instance-hours",
            Self::StorageGibibytes => "Storage-gibibytes",
            Self::TransferGibibytes => "Transfer-gibibytes",
        }
    }
}

impl FromStr for Uom {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|uom| uom.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| DomainError::InvalidUom(s.to_string()))
    }
}

impl std::fmt::Display for Uom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A measurable unit of usage for a tag
///
/// `query_params` are handed to the metrics provider verbatim
/// (e.g. the prometheus metric name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagMetric {
    pub tag: String,
    pub uom: Uom,
    pub metric_id: String,
    #[serde(default)]
    pub query_params: BTreeMap<String, String>,
}

impl TagMetric {
    pub fn new(tag: impl Into<String>, uom: Uom, metric_id: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            uom,
            metric_id: metric_id.into(),
            query_params: BTreeMap::new(),
        }
    }

    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uom_parse() {
        assert_eq!("cores".parse::<Uom>().unwrap(), Uom::Cores);
        assert_eq!("INSTANCE_HOURS".parse::<Uom>().unwrap(), Uom::InstanceHours);
        assert_eq!("Instance-hours".parse::<Uom>().unwrap(), Uom::InstanceHours);
        assert!("watts".parse::<Uom>().is_err());
    }

    #[test]
    fn test_metric_deserializes_camel_case() {
        let json = r#"{
            "tag": "OpenShift-metrics",
            "uom": "Cores",
            "metricId": "m_cores",
            "queryParams": { "prometheusMetadataMetric": "subscription_labels" }
        }"#;
        let metric: TagMetric = serde_json::from_str(json).unwrap();
        assert_eq!(metric.uom, Uom::Cores);
        assert_eq!(metric.metric_id, "m_cores");
        assert_eq!(
            metric.query_params.get("prometheusMetadataMetric").map(String::as_str),
            Some("subscription_labels")
        );
    }
}
