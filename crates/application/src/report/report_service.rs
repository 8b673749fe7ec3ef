use chrono::{DateTime, Utc};
use domain::tally::{
    PageRequest, ReportFiller, SnapshotQuery, TallySnapshotRepository,
};
use domain::{
    Calendar, DomainError, Granularity, Result, ServiceLevel, TagProfile, TallyReport,
    TallySnapshot, Usage,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use super::PageLinkCreator;

/// Page size used when only `offset` is given
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Raw report request parameters, as received from the API
#[derive(Debug, Clone, Deserialize)]
pub struct TallyReportQuery {
    pub granularity: String,
    pub beginning: DateTime<Utc>,
    pub ending: DateTime<Utc>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub sla: Option<String>,
    #[serde(default)]
    pub usage: Option<String>,
}

impl TallyReportQuery {
    pub fn new(granularity: impl Into<String>, beginning: DateTime<Utc>, ending: DateTime<Utc>) -> Self {
        Self {
            granularity: granularity.into(),
            beginning,
            ending,
            offset: None,
            limit: None,
            sla: None,
            usage: None,
        }
    }

    pub fn with_page(mut self, offset: Option<u32>, limit: Option<u32>) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    pub fn with_sla(mut self, sla: impl Into<String>) -> Self {
        self.sla = Some(sla.into());
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    fn is_paged(&self) -> bool {
        self.offset.is_some() || self.limit.is_some()
    }
}

/// Assembles tally reports from stored snapshots
///
/// Unpaged requests get one entry per bucket of the requested range;
/// paged requests get the stored snapshots only, plus page links.
pub struct TallyReportService {
    repository: Arc<dyn TallySnapshotRepository>,
    calendar: Calendar,
    tag_profile: Option<Arc<TagProfile>>,
}

impl TallyReportService {
    pub fn new(repository: Arc<dyn TallySnapshotRepository>, calendar: Calendar) -> Self {
        Self {
            repository,
            calendar,
            tag_profile: None,
        }
    }

    /// Reject granularities finer than the product's registered finest granularity
    pub fn with_tag_profile(mut self, tag_profile: Arc<TagProfile>) -> Self {
        self.tag_profile = Some(tag_profile);
        self
    }

    /// Build the report for `product_id` in `account_number`.
    ///
    /// `request_uri` is the path and query the links of a paged report point back to.
    pub async fn get_tally_report(
        &self,
        account_number: &str,
        product_id: &str,
        query: &TallyReportQuery,
        request_uri: &str,
    ) -> Result<TallyReport> {
        let granularity: Granularity = query.granularity.parse()?;
        let service_level = ServiceLevel::from_query_param(query.sla.as_deref())?;
        let usage = Usage::from_query_param(query.usage.as_deref())?;
        if query.ending < query.beginning {
            return Err(DomainError::InvalidDateRange {
                beginning: query.beginning,
                ending: query.ending,
            });
        }
        self.check_granularity(product_id, granularity)?;
        let page = page_request(query)?;

        debug!(
            account = %account_number,
            product = %product_id,
            granularity = %granularity,
            sla = %service_level,
            usage = %usage,
            ?page,
            "Fetching tally snapshots"
        );

        let snapshot_query = SnapshotQuery {
            account_number: account_number.to_string(),
            product_id: product_id.to_string(),
            granularity,
            service_level,
            usage,
            beginning: query.beginning,
            ending: query.ending,
        };
        let snapshots = self.repository.find_snapshots(&snapshot_query, page).await?;

        let data = snapshots
            .items
            .iter()
            .map(TallySnapshot::as_report_entry)
            .collect();
        let mut report = TallyReport::new(product_id, granularity, data);
        report.meta.service_level = query.sla.as_ref().map(|_| service_level);
        report.meta.usage = query.usage.as_ref().map(|_| usage);

        match page {
            Some(page) => {
                report.links = Some(PageLinkCreator::links(request_uri, page, snapshots.total));
            }
            None => {
                ReportFiller::new(granularity, self.calendar).fill_gaps(
                    &mut report,
                    query.beginning,
                    query.ending,
                )?;
            }
        }

        report.meta.count = report.data.len();
        info!(
            product = %product_id,
            granularity = %granularity,
            count = report.meta.count,
            paged = page.is_some(),
            "Tally report built"
        );
        Ok(report)
    }

    fn check_granularity(&self, product_id: &str, granularity: Granularity) -> Result<()> {
        let Some(metadata) = self
            .tag_profile
            .as_ref()
            .and_then(|profile| profile.primary_tag_metadata(product_id))
        else {
            return Ok(());
        };
        if metadata.supports_granularity(granularity) {
            Ok(())
        } else {
            Err(DomainError::InvalidGranularity(format!(
                "{granularity} granularity is not supported for {product_id}; finest is {}",
                metadata.finest_granularity
            )))
        }
    }
}

fn page_request(query: &TallyReportQuery) -> Result<Option<PageRequest>> {
    if !query.is_paged() {
        return Ok(None);
    }
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
    if limit == 0 {
        return Err(DomainError::InvalidPageRequest(
            "limit must be at least 1".to_string(),
        ));
    }
    let offset = query.offset.unwrap_or(0);
    if offset % limit != 0 {
        return Err(DomainError::InvalidPageRequest(format!(
            "offset {offset} must be a multiple of limit {limit}"
        )));
    }
    Ok(Some(PageRequest { offset, limit }))
}
