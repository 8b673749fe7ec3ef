use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

use super::{MappingValueType, TagMapping, TagMetaData, TagMetric, Uom};
use crate::error::{DomainError, Result};

static NO_TAGS: BTreeSet<String> = BTreeSet::new();

/// Raw tag profile definition, as loaded from configuration
///
/// Nothing is indexed or validated until [`TagProfileBuilder::build`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagProfileBuilder {
    #[serde(default)]
    tag_mappings: Vec<TagMapping>,
    #[serde(default)]
    tag_metrics: Vec<TagMetric>,
    #[serde(default, rename = "tagMetaData")]
    tag_metadata: Vec<TagMetaData>,
}

impl TagProfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag_mapping(mut self, mapping: TagMapping) -> Self {
        self.tag_mappings.push(mapping);
        self
    }

    pub fn tag_mappings(mut self, mappings: impl IntoIterator<Item = TagMapping>) -> Self {
        self.tag_mappings.extend(mappings);
        self
    }

    pub fn tag_metric(mut self, metric: TagMetric) -> Self {
        self.tag_metrics.push(metric);
        self
    }

    pub fn tag_metrics(mut self, metrics: impl IntoIterator<Item = TagMetric>) -> Self {
        self.tag_metrics.extend(metrics);
        self
    }

    pub fn tag_metadata(mut self, metadata: TagMetaData) -> Self {
        self.tag_metadata.push(metadata);
        self
    }

    pub fn tag_metadata_list(mut self, metadata: impl IntoIterator<Item = TagMetaData>) -> Self {
        self.tag_metadata.extend(metadata);
        self
    }

    /// Index every list once and freeze the result.
    ///
    /// Fails on a service type claimed by two metadata records, or on a
    /// second metric for the same `(tag, uom)` pair.
    pub fn build(self) -> Result<TagProfile> {
        let mut tags_by_eng_product: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut tags_by_arch: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut tags_by_role: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut tags_by_product_name: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut product_names_by_tag: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut known_tags: HashSet<String> = HashSet::new();

        for mapping in &self.tag_mappings {
            let index = match mapping.value_type {
                MappingValueType::EngId => &mut tags_by_eng_product,
                MappingValueType::Arch => &mut tags_by_arch,
                MappingValueType::Role => &mut tags_by_role,
                MappingValueType::ProductName => {
                    for tag in &mapping.tags {
                        product_names_by_tag
                            .entry(tag.clone())
                            .or_default()
                            .insert(mapping.value.clone());
                    }
                    &mut tags_by_product_name
                }
            };
            index
                .entry(mapping.value.clone())
                .or_default()
                .extend(mapping.tags.iter().cloned());
            known_tags.extend(mapping.tags.iter().cloned());
        }

        let mut metrics_by_tag: HashMap<String, BTreeMap<Uom, usize>> = HashMap::new();
        let mut uoms_by_tag: HashMap<String, Vec<Uom>> = HashMap::new();
        for (position, metric) in self.tag_metrics.iter().enumerate() {
            match metrics_by_tag
                .entry(metric.tag.clone())
                .or_default()
                .entry(metric.uom)
            {
                Entry::Occupied(_) => {
                    return Err(DomainError::DuplicateTagMetric {
                        tag: metric.tag.clone(),
                        uom: metric.uom,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
            }
            uoms_by_tag
                .entry(metric.tag.clone())
                .or_default()
                .push(metric.uom);
            known_tags.insert(metric.tag.clone());
        }

        let mut metadata_by_tag: HashMap<String, Vec<usize>> = HashMap::new();
        let mut metadata_by_service_type: HashMap<String, usize> = HashMap::new();
        for (position, metadata) in self.tag_metadata.iter().enumerate() {
            for tag in &metadata.tags {
                let records = metadata_by_tag.entry(tag.clone()).or_default();
                if !records.is_empty() {
                    debug!(tag = %tag, "Tag claimed by more than one metadata record; first registered wins");
                }
                records.push(position);
            }
            known_tags.extend(metadata.tags.iter().cloned());

            if let Some(service_type) = &metadata.service_type {
                if metadata_by_service_type
                    .insert(service_type.clone(), position)
                    .is_some()
                {
                    return Err(DomainError::DuplicateServiceType(service_type.clone()));
                }
            }
        }

        let service_types = metadata_by_service_type.keys().cloned().collect();

        info!(
            mappings = self.tag_mappings.len(),
            metrics = self.tag_metrics.len(),
            metadata = self.tag_metadata.len(),
            "Tag profile initialized"
        );

        Ok(TagProfile {
            definition: self,
            tags_by_eng_product,
            tags_by_arch,
            tags_by_role,
            tags_by_product_name,
            product_names_by_tag,
            metrics_by_tag,
            uoms_by_tag,
            metadata_by_tag,
            metadata_by_service_type,
            service_types,
            known_tags,
        })
    }
}

/// Frozen tag registry
///
/// Only obtainable through [`TagProfileBuilder::build`] and exposes no
/// mutating methods, so it can be shared across threads behind an `Arc`.
#[derive(Debug)]
pub struct TagProfile {
    definition: TagProfileBuilder,
    tags_by_eng_product: HashMap<String, BTreeSet<String>>,
    tags_by_arch: HashMap<String, BTreeSet<String>>,
    tags_by_role: HashMap<String, BTreeSet<String>>,
    tags_by_product_name: HashMap<String, BTreeSet<String>>,
    product_names_by_tag: HashMap<String, BTreeSet<String>>,
    metrics_by_tag: HashMap<String, BTreeMap<Uom, usize>>,
    uoms_by_tag: HashMap<String, Vec<Uom>>,
    metadata_by_tag: HashMap<String, Vec<usize>>,
    metadata_by_service_type: HashMap<String, usize>,
    service_types: BTreeSet<String>,
    known_tags: HashSet<String>,
}

impl TagProfile {
    pub fn builder() -> TagProfileBuilder {
        TagProfileBuilder::new()
    }

    /// Copy of the definition this profile was built from, for deriving a new profile
    pub fn to_builder(&self) -> TagProfileBuilder {
        self.definition.clone()
    }

    pub fn tag_mappings(&self) -> &[TagMapping] {
        &self.definition.tag_mappings
    }

    pub fn tag_metrics(&self) -> &[TagMetric] {
        &self.definition.tag_metrics
    }

    pub fn tag_metadata(&self) -> &[TagMetaData] {
        &self.definition.tag_metadata
    }

    /// True when the tag appears in any mapping, metric or metadata record
    pub fn is_known_tag(&self, tag: &str) -> bool {
        self.known_tags.contains(tag)
    }

    /// All metadata records claiming `tag`, in registration order
    pub fn tag_metadata_by_tag(&self, tag: &str) -> Vec<&TagMetaData> {
        self.metadata_by_tag
            .get(tag)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&position| &self.definition.tag_metadata[position])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The first registered metadata record claiming `tag`
    pub fn primary_tag_metadata(&self, tag: &str) -> Option<&TagMetaData> {
        self.metadata_by_tag
            .get(tag)
            .and_then(|positions| positions.first())
            .map(|&position| &self.definition.tag_metadata[position])
    }

    pub fn tag_metric(&self, tag: &str, uom: Uom) -> Option<&TagMetric> {
        self.metrics_by_tag
            .get(tag)
            .and_then(|by_uom| by_uom.get(&uom))
            .map(|&position| &self.definition.tag_metrics[position])
    }

    pub fn uoms_for_tag(&self, tag: &str) -> Vec<Uom> {
        self.uoms_by_tag.get(tag).cloned().unwrap_or_default()
    }

    /// Units of measure for a tag the registry knows about.
    ///
    /// A known tag without metrics yields an empty set; an unknown tag is an error.
    pub fn supported_metrics_for_product(&self, tag: &str) -> Result<BTreeSet<Uom>> {
        if !self.is_known_tag(tag) {
            return Err(DomainError::UnsupportedProduct(tag.to_string()));
        }
        Ok(self.uoms_for_tag(tag).into_iter().collect())
    }

    pub fn tags_by_eng_product(&self, eng_product_id: &str) -> &BTreeSet<String> {
        self.tags_by_eng_product
            .get(eng_product_id)
            .unwrap_or(&NO_TAGS)
    }

    pub fn tags_by_arch(&self, arch: &str) -> &BTreeSet<String> {
        self.tags_by_arch.get(arch).unwrap_or(&NO_TAGS)
    }

    pub fn tags_by_role(&self, role: &str) -> &BTreeSet<String> {
        self.tags_by_role.get(role).unwrap_or(&NO_TAGS)
    }

    pub fn tags_by_product_name(&self, product_name: &str) -> &BTreeSet<String> {
        self.tags_by_product_name
            .get(product_name)
            .unwrap_or(&NO_TAGS)
    }

    pub fn tag_metadata_by_service_type(&self, service_type: &str) -> Option<&TagMetaData> {
        self.metadata_by_service_type
            .get(service_type)
            .map(|&position| &self.definition.tag_metadata[position])
    }

    pub fn tags_for_service_type(&self, service_type: &str) -> &BTreeSet<String> {
        self.tag_metadata_by_service_type(service_type)
            .map(|metadata| &metadata.tags)
            .unwrap_or(&NO_TAGS)
    }

    pub fn service_types(&self) -> &BTreeSet<String> {
        &self.service_types
    }

    /// Offering product names mapped onto `tag`
    pub fn offering_product_names_for_tag(&self, tag: &str) -> &BTreeSet<String> {
        self.product_names_by_tag.get(tag).unwrap_or(&NO_TAGS)
    }
}
