use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::tally::{Granularity, ServiceLevel, Usage};

/// Descriptive record for a group of tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagMetaData {
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub service_type: Option<String>,
    /// Finest time granularity usage can be measured at
    #[serde(default)]
    pub finest_granularity: Granularity,
    #[serde(default)]
    pub default_sla: ServiceLevel,
    #[serde(default)]
    pub default_usage: Usage,
}

impl TagMetaData {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            service_type: None,
            finest_granularity: Granularity::default(),
            default_sla: ServiceLevel::default(),
            default_usage: Usage::default(),
        }
    }

    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = Some(service_type.into());
        self
    }

    pub fn with_finest_granularity(mut self, granularity: Granularity) -> Self {
        self.finest_granularity = granularity;
        self
    }

    pub fn with_defaults(mut self, sla: ServiceLevel, usage: Usage) -> Self {
        self.default_sla = sla;
        self.default_usage = usage;
        self
    }

    /// Whether usage for these tags can be reported at `granularity`
    pub fn supports_granularity(&self, granularity: Granularity) -> bool {
        granularity >= self.finest_granularity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let md: TagMetaData = serde_json::from_str(r#"{"tags":["RHEL"]}"#).unwrap();
        assert_eq!(md.service_type, None);
        assert_eq!(md.finest_granularity, Granularity::Daily);
        assert_eq!(md.default_sla, ServiceLevel::Unspecified);
        assert_eq!(md.default_usage, Usage::Unspecified);
    }

    #[test]
    fn test_supports_granularity() {
        let md = TagMetaData::new(["OpenShift-metrics"]).with_finest_granularity(Granularity::Hourly);
        assert!(md.supports_granularity(Granularity::Hourly));
        assert!(md.supports_granularity(Granularity::Monthly));

        let daily = TagMetaData::new(["RHEL"]);
        assert!(!daily.supports_granularity(Granularity::Hourly));
    }
}
