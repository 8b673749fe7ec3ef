use application::TallyReportService;
use domain::tally::TallySnapshotRepository;
use domain::{Clock, FactNormalizer, RhelProductList, TagProfile};
use infrastructure::Settings;
use std::sync::Arc;

/// Shared, read-only services behind the router
pub struct AppState {
    pub report_service: TallyReportService,
    pub tag_profile: Arc<TagProfile>,
    pub normalizer: FactNormalizer,
}

impl AppState {
    pub fn new(
        settings: &Settings,
        tag_profile: Arc<TagProfile>,
        rhel_products: Arc<dyn RhelProductList>,
        repository: Arc<dyn TallySnapshotRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let report_service = TallyReportService::new(repository, settings.calendar())
            .with_tag_profile(tag_profile.clone());
        let normalizer = FactNormalizer::new(settings.normalizer_config(), rhel_products, clock)
            .with_tag_profile(tag_profile.clone());

        Self {
            report_service,
            tag_profile,
            normalizer,
        }
    }
}
