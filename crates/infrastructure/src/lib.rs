//! Infrastructure layer - External integrations
//!
//! Configuration, file-backed registry sources and snapshot stores.

pub mod config;
pub mod database;
pub mod product_list;
pub mod tag_profile;

pub use config::Settings;
pub use database::{InMemoryTallySnapshotRepository, PostgresTallySnapshotRepository};
pub use product_list::FileRhelProductList;
pub use tag_profile::{load_tag_profile, parse_tag_profile};
