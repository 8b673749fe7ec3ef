use domain::{DomainError, TagProfile, TagProfileBuilder};
use std::path::Path;

/// Read a YAML tag profile and build the registry from it
pub fn load_tag_profile(path: impl AsRef<Path>) -> Result<TagProfile, DomainError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        DomainError::InvalidConfiguration(format!(
            "Unable to read tag profile {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_tag_profile(&contents)
}

pub fn parse_tag_profile(contents: &str) -> Result<TagProfile, DomainError> {
    let builder: TagProfileBuilder = serde_yaml::from_str(contents)
        .map_err(|e| DomainError::InvalidConfiguration(format!("Invalid tag profile: {}", e)))?;
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Granularity, Uom};

    const PROFILE: &str = r#"
tagMappings:
  - value: "69"
    valueType: engId
    tags: [RHEL]
  - value: x86_64
    valueType: arch
    tags: [RHEL for x86]
tagMetrics:
  - tag: OpenShift-metrics
    uom: Cores
    metricId: redhat.com:openshift_container_platform:cpu_hour
    queryParams:
      product: ocp
tagMetaData:
  - tags: [OpenShift-metrics]
    serviceType: OpenShift Cluster
    finestGranularity: HOURLY
"#;

    #[test]
    fn test_parses_camel_case_profile() {
        let profile = parse_tag_profile(PROFILE).unwrap();

        assert!(profile.tags_by_eng_product("69").contains("RHEL"));
        assert!(profile.tags_by_arch("x86_64").contains("RHEL for x86"));
        let metric = profile.tag_metric("OpenShift-metrics", Uom::Cores).unwrap();
        assert_eq!(metric.query_params.get("product").map(String::as_str), Some("ocp"));
        assert_eq!(
            profile
                .primary_tag_metadata("OpenShift-metrics")
                .map(|md| md.finest_granularity),
            Some(Granularity::Hourly)
        );
    }

    #[test]
    fn test_duplicate_metric_fails_to_load() {
        let yaml = r#"
tagMetrics:
  - { tag: OpenShift-metrics, uom: Cores, metricId: a }
  - { tag: OpenShift-metrics, uom: Cores, metricId: b }
"#;
        let err = parse_tag_profile(yaml).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateTagMetric { .. }));
    }

    #[test]
    fn test_malformed_yaml_is_configuration_error() {
        let err = parse_tag_profile("tagMappings: [{ value: 69 }]").unwrap_err();
        assert!(matches!(err, DomainError::InvalidConfiguration(_)));
    }
}
