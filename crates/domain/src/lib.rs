//! Domain layer - Pure usage tally logic with no I/O
//!
//! This crate contains:
//! - Tag registry (product signals -> canonical tags, metrics, metadata)
//! - Fact normalization (raw host facts -> capacity record)
//! - Tally model and gap filling for time-series reports
//! - Ports (traits) for the snapshot store, product list and clock
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Registry is built once and frozen
//! - Normalization and filling are pure, per-call functions

pub mod clock;
pub mod error;
pub mod facts;
pub mod registry;
pub mod tally;

// Re-export commonly used types
pub use clock::{Calendar, Clock, FixedClock, SystemClock};
pub use error::{DomainError, Result};
pub use facts::{FactNormalizer, InventoryHostFacts, NormalizedFacts, RhelProductList};
pub use registry::{TagMapping, TagMetaData, TagMetric, TagProfile, TagProfileBuilder, Uom};
pub use tally::{Granularity, ServiceLevel, TallyReport, TallySnapshot, Usage};
