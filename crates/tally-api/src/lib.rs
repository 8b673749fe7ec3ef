pub mod api;
pub mod error;
pub mod state;

use domain::tally::TallySnapshotRepository;
use domain::{DomainError, RhelProductList, SystemClock};
use infrastructure::{FileRhelProductList, Settings, load_tag_profile};
use state::AppState;
use std::sync::Arc;
use tracing::info;

/// Load the registry sources named in `settings` and wire the services.
///
/// A missing or invalid tag profile or RHEL product list is an error.
pub fn setup_app_state(
    settings: &Settings,
    repository: Arc<dyn TallySnapshotRepository>,
) -> Result<Arc<AppState>, DomainError> {
    let tag_profile = Arc::new(load_tag_profile(&settings.registry.tag_profile_path)?);
    let rhel_products = Arc::new(FileRhelProductList::load(
        &settings.registry.rhel_product_list_path,
    )?);
    info!(
        service_types = tag_profile.service_types().len(),
        rhel_products = rhel_products.len(),
        "✅ Registry loaded"
    );

    Ok(Arc::new(AppState::new(
        settings,
        tag_profile,
        rhel_products,
        repository,
        Arc::new(SystemClock),
    )))
}
