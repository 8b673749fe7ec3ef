mod mapping;
mod metadata;
mod metric;
mod profile;

pub use mapping::{MappingValueType, TagMapping};
pub use metadata::TagMetaData;
pub use metric::{TagMetric, Uom};
pub use profile::{TagProfile, TagProfileBuilder};
