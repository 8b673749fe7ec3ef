mod page_links;
mod report_service;

pub use page_links::PageLinkCreator;
pub use report_service::{DEFAULT_PAGE_LIMIT, TallyReportQuery, TallyReportService};
