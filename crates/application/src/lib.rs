//! Application layer - Report assembly use cases

pub mod report;

pub use report::{TallyReportQuery, TallyReportService};
