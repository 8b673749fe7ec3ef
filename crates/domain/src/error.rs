use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::registry::Uom;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Duplicate service type defined in tag profile: {0}")]
    DuplicateServiceType(String),

    #[error("Duplicate tag metric defined for tag {tag} and uom {uom}")]
    DuplicateTagMetric { tag: String, uom: Uom },

    #[error("Tag {0} not supported")]
    UnsupportedProduct(String),

    #[error("Invalid sla parameter specified: {0}")]
    InvalidServiceLevel(String),

    #[error("Invalid usage parameter specified: {0}")]
    InvalidUsage(String),

    #[error("Invalid granularity: {0}")]
    InvalidGranularity(String),

    #[error("Invalid uom: {0}")]
    InvalidUom(String),

    #[error("Invalid date range: ending {ending} is before beginning {beginning}")]
    InvalidDateRange {
        beginning: DateTime<Utc>,
        ending: DateTime<Utc>,
    },

    #[error("Invalid page request: {0}")]
    InvalidPageRequest(String),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl DomainError {
    /// True for errors the caller can fix by changing the request
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidServiceLevel(_)
                | Self::InvalidUsage(_)
                | Self::InvalidGranularity(_)
                | Self::InvalidUom(_)
                | Self::InvalidDateRange { .. }
                | Self::InvalidPageRequest(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
