use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

/// Subscription service level of a snapshot
///
/// `Any` is a query sentinel meaning "do not filter on service level".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceLevel {
    #[serde(rename = "Premium")]
    Premium,
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "Self-Support")]
    SelfSupport,
    #[serde(rename = "")]
    Unspecified,
    #[serde(rename = "_ANY")]
    Any,
}

impl ServiceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Premium => "Premium",
            Self::Standard => "Standard",
            Self::SelfSupport => "Self-Support",
            Self::Unspecified => "",
            Self::Any => "_ANY",
        }
    }

    /// Case-insensitive lookup; anything unrecognized is `Unspecified`
    pub fn from_lenient(value: &str) -> Self {
        [
            Self::Premium,
            Self::Standard,
            Self::SelfSupport,
            Self::Any,
        ]
        .into_iter()
        .find(|level| level.as_str().eq_ignore_ascii_case(value.trim()))
        .unwrap_or(Self::Unspecified)
    }

    /// Interpret the `sla` query parameter.
    ///
    /// Absent means any service level, an empty string means unspecified, and
    /// an unknown non-empty value is rejected.
    pub fn from_query_param(value: Option<&str>) -> Result<Self> {
        match value {
            None => Ok(Self::Any),
            Some(raw) => {
                let level = Self::from_lenient(raw);
                if !raw.is_empty() && level == Self::Unspecified {
                    return Err(DomainError::InvalidServiceLevel(raw.to_string()));
                }
                Ok(level)
            }
        }
    }
}

impl Default for ServiceLevel {
    fn default() -> Self {
        Self::Unspecified
    }
}

impl std::fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Intended usage of the tallied systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Usage {
    #[serde(rename = "Production")]
    Production,
    #[serde(rename = "Development/Test")]
    DevelopmentTest,
    #[serde(rename = "Disaster Recovery")]
    DisasterRecovery,
    #[serde(rename = "")]
    Unspecified,
    #[serde(rename = "_ANY")]
    Any,
}

impl Usage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "Production",
            Self::DevelopmentTest => "Development/Test",
            Self::DisasterRecovery => "Disaster Recovery",
            Self::Unspecified => "",
            Self::Any => "_ANY",
        }
    }

    pub fn from_lenient(value: &str) -> Self {
        [
            Self::Production,
            Self::DevelopmentTest,
            Self::DisasterRecovery,
            Self::Any,
        ]
        .into_iter()
        .find(|usage| usage.as_str().eq_ignore_ascii_case(value.trim()))
        .unwrap_or(Self::Unspecified)
    }

    /// Same contract as [`ServiceLevel::from_query_param`], for the `usage` parameter
    pub fn from_query_param(value: Option<&str>) -> Result<Self> {
        match value {
            None => Ok(Self::Any),
            Some(raw) => {
                let usage = Self::from_lenient(raw);
                if !raw.is_empty() && usage == Self::Unspecified {
                    return Err(DomainError::InvalidUsage(raw.to_string()));
                }
                Ok(usage)
            }
        }
    }
}

impl Default for Usage {
    fn default() -> Self {
        Self::Unspecified
    }
}

impl std::fmt::Display for Usage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
