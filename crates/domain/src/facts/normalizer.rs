use chrono::{DateTime, TimeDelta, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{InventoryHostFacts, NormalizedFacts, RhelProductList};
use crate::clock::Clock;
use crate::registry::TagProfile;

/// Canonical tag contributed by RHEL detection
pub const RHEL_TAG: &str = "RHEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizerConfig {
    /// Hosts whose last sync is older than start-of-today minus this are ignored
    pub host_last_sync_threshold: TimeDelta,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            host_last_sync_threshold: TimeDelta::hours(24),
        }
    }
}

/// Converts raw inventory host facts into [`NormalizedFacts`].
///
/// Steps:
/// 1. Staleness: hosts that stopped reporting are excluded entirely
/// 2. Products: RHSM engineering product IDs and the QPC `is_rhel` flag
/// 3. Capacity: cores and sockets, defaulting to zero
pub struct FactNormalizer {
    config: NormalizerConfig,
    rhel_products: Arc<dyn RhelProductList>,
    clock: Arc<dyn Clock>,
    tag_profile: Option<Arc<TagProfile>>,
}

impl FactNormalizer {
    pub fn new(
        config: NormalizerConfig,
        rhel_products: Arc<dyn RhelProductList>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            rhel_products,
            clock,
            tag_profile: None,
        }
    }

    /// Also resolve engineering product IDs through the tag registry
    pub fn with_tag_profile(mut self, tag_profile: Arc<TagProfile>) -> Self {
        self.tag_profile = Some(tag_profile);
        self
    }

    pub fn normalize(&self, host: &InventoryHostFacts) -> NormalizedFacts {
        if self.is_stale(host) {
            return NormalizedFacts::excluded();
        }

        let mut products = BTreeSet::new();
        self.detect_rhsm_products(host, &mut products);
        if is_rhel_flag_set(host.is_rhel.as_deref()) {
            products.insert(RHEL_TAG.to_string());
        }

        NormalizedFacts {
            products,
            cores: Some(parse_count(host.cores.as_deref(), "cores", host)),
            sockets: Some(parse_count(host.sockets.as_deref(), "sockets", host)),
        }
    }

    fn sync_cutoff(&self) -> DateTime<Utc> {
        self.clock.start_of_today() - self.config.host_last_sync_threshold
    }

    fn is_stale(&self, host: &InventoryHostFacts) -> bool {
        let raw = host.sync_timestamp.trim();
        let last_sync = match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(e) => {
                warn!(
                    account = %host.account,
                    system = %host.system_name,
                    sync_timestamp = %raw,
                    error = %e,
                    "Unreadable sync timestamp, ignoring host"
                );
                return true;
            }
        };

        let cutoff = self.sync_cutoff();
        if last_sync < cutoff {
            debug!(
                account = %host.account,
                system = %host.system_name,
                last_sync = %last_sync,
                cutoff = %cutoff,
                "Host has not synced within the configured threshold"
            );
            return true;
        }
        false
    }

    fn detect_rhsm_products(&self, host: &InventoryHostFacts, products: &mut BTreeSet<String>) {
        for id in host.product_ids() {
            if self.rhel_products.contains(id) {
                products.insert(RHEL_TAG.to_string());
            }
            if let Some(profile) = &self.tag_profile {
                products.extend(profile.tags_by_eng_product(id).iter().cloned());
            }
        }
    }
}

fn is_rhel_flag_set(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
}

fn parse_count(raw: Option<&str>, field: &str, host: &InventoryHostFacts) -> u32 {
    let value = raw.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return 0;
    }
    value.parse().unwrap_or_else(|_| {
        debug!(
            system = %host.system_name,
            field,
            value,
            "Unparseable capacity fact, defaulting to 0"
        );
        0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::facts::MockRhelProductList;
    use crate::registry::{MappingValueType, TagMapping};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 5, 24, 12, 30, 0).unwrap()
    }

    fn rhel_list() -> Arc<MockRhelProductList> {
        let mut list = MockRhelProductList::new();
        list.expect_contains().returning(|id| id == "69");
        list.expect_len().return_const(1usize);
        Arc::new(list)
    }

    fn normalizer() -> FactNormalizer {
        FactNormalizer::new(
            NormalizerConfig::default(),
            rhel_list(),
            Arc::new(FixedClock::new(now())),
        )
    }

    fn rhsm_host(products: Option<&str>, cores: Option<&str>, sockets: Option<&str>) -> InventoryHostFacts {
        InventoryHostFacts {
            products: products.map(str::to_string),
            cores: cores.map(str::to_string),
            sockets: sockets.map(str::to_string),
            ..InventoryHostFacts::new("Account", "test_org", "Test System", now().to_rfc3339())
        }
    }

    fn qpc_host(is_rhel: Option<&str>) -> InventoryHostFacts {
        InventoryHostFacts {
            is_rhel: is_rhel.map(str::to_string),
            ..InventoryHostFacts::new("Account", "test_org", "Test System", now().to_rfc3339())
        }
    }

    #[test]
    fn test_rhsm_normalization() {
        let normalized = normalizer().normalize(&rhsm_host(Some("69"), Some("12"), Some("2")));
        assert!(normalized.has_product(RHEL_TAG));
        assert_eq!(normalized.cores, Some(12));
        assert_eq!(normalized.sockets, Some(2));
    }

    #[test]
    fn test_qpc_normalization() {
        let normalized = normalizer().normalize(&qpc_host(Some("true")));
        assert!(normalized.has_product(RHEL_TAG));
        assert_eq!(normalized.cores, Some(0));
        assert_eq!(normalized.sockets, Some(0));
    }

    #[test]
    fn test_normalize_non_rhel_product() {
        let normalized = normalizer().normalize(&rhsm_host(Some("NonRHEL"), Some("4"), Some("8")));
        assert!(normalized.products.is_empty());
        assert_eq!(normalized.cores, Some(4));
        assert_eq!(normalized.sockets, Some(8));
    }

    #[test]
    fn test_products_missing_and_only_cores_set() {
        let normalized = normalizer().normalize(&rhsm_host(None, Some("4"), Some("null")));
        assert!(normalized.products.is_empty());
        assert_eq!(normalized.cores, Some(4));
        assert_eq!(normalized.sockets, Some(0));
    }

    #[test]
    fn test_products_missing_and_only_sockets_set() {
        let normalized = normalizer().normalize(&rhsm_host(Some(""), None, Some("8")));
        assert!(normalized.products.is_empty());
        assert_eq!(normalized.cores, Some(0));
        assert_eq!(normalized.sockets, Some(8));
    }

    #[test]
    fn test_cores_and_sockets_missing() {
        let normalized = normalizer().normalize(&rhsm_host(Some("69"), None, None));
        assert!(normalized.has_product(RHEL_TAG));
        assert_eq!(normalized.cores, Some(0));
        assert_eq!(normalized.sockets, Some(0));
    }

    #[test]
    fn test_ignores_host_when_last_sync_outside_threshold() {
        let mut host = rhsm_host(Some("69"), Some("4"), Some("8"));
        host.sync_timestamp = (now() - TimeDelta::days(2)).to_rfc3339();

        let normalized = normalizer().normalize(&host);
        assert!(normalized.products.is_empty());
        assert_eq!(normalized.cores, None);
        assert_eq!(normalized.sockets, None);
        assert!(normalized.is_excluded());
    }

    #[test]
    fn test_includes_host_when_last_sync_within_threshold() {
        let mut host = rhsm_host(Some("69"), Some("4"), Some("8"));
        host.sync_timestamp = (now() - TimeDelta::days(1)).to_rfc3339();

        let normalized = normalizer().normalize(&host);
        assert!(normalized.has_product(RHEL_TAG));
        assert_eq!(normalized.cores, Some(4));
        assert!(!normalized.is_excluded());
    }

    #[test]
    fn test_cutoff_is_measured_from_start_of_today() {
        let mut host = rhsm_host(Some("69"), Some("4"), Some("8"));
        host.sync_timestamp = "2019-05-23T00:00:00Z".to_string();
        assert_eq!(normalizer().normalize(&host).cores, Some(4));

        host.sync_timestamp = "2019-05-22T23:59:59Z".to_string();
        assert_eq!(normalizer().normalize(&host).cores, None);
    }

    #[test]
    fn test_unreadable_sync_timestamp_excludes_host() {
        let mut host = rhsm_host(Some("69"), Some("4"), Some("8"));
        host.sync_timestamp = "yesterday".to_string();
        assert!(normalizer().normalize(&host).is_excluded());
    }

    #[test]
    fn test_rhel_from_qpc_facts_is_case_insensitive() {
        assert!(normalizer().normalize(&qpc_host(Some("TRUE"))).has_product(RHEL_TAG));
    }

    #[test]
    fn test_empty_product_list_when_is_rhel_false() {
        let normalized = normalizer().normalize(&qpc_host(Some("false")));
        assert!(normalized.products.is_empty());
        assert_eq!(normalized.cores, Some(0));
    }

    #[test]
    fn test_empty_product_list_when_is_rhel_not_set() {
        let normalized = normalizer().normalize(&qpc_host(None));
        assert!(normalized.products.is_empty());
        assert_eq!(normalized.sockets, Some(0));
    }

    #[test]
    fn test_tag_profile_contributes_eng_product_tags() {
        let profile = TagProfile::builder()
            .tag_mapping(TagMapping::new(
                "69",
                MappingValueType::EngId,
                ["RHEL", "RHEL for Desktop"],
            ))
            .tag_mapping(TagMapping::new("290", MappingValueType::EngId, ["OpenShift Container Platform"]))
            .build()
            .unwrap();

        let normalized = normalizer()
            .with_tag_profile(Arc::new(profile))
            .normalize(&rhsm_host(Some("69,290"), Some("2"), Some("1")));

        let expected: BTreeSet<String> = ["OpenShift Container Platform", "RHEL", "RHEL for Desktop"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(normalized.products, expected);
    }
}
