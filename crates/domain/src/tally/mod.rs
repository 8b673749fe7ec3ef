mod filler;
mod granularity;
mod report;
mod repository;
mod service_level;
mod snapshot;

pub use filler::{FillStrategy, ReportFiller};
pub use granularity::Granularity;
pub use report::{PageLinks, SnapshotEntry, TallyReport, TallyReportMeta};
pub use repository::{PageRequest, SnapshotPage, SnapshotQuery, TallySnapshotRepository};
pub use service_level::{ServiceLevel, Usage};
pub use snapshot::TallySnapshot;
