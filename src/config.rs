//! Aggregation settings.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do with a SELL larger than the open quantity being tracked for its symbol.
///
/// Every policy records an `OversoldPosition` warning; they differ in what happens to the numbers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OversoldPolicy {
    /// Apply the full sale and let the position go negative.  Matches the numbers older portfolio
    /// summaries produced.
    #[default]
    Permissive,
    /// Realize only the shares that were held; the position stops at zero.
    Clamp,
    /// Abort the aggregation with `PortfolioError::Oversold`.
    Reject,
}

impl FromStr for OversoldPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" | "legacy" => Ok(OversoldPolicy::Permissive),
            "clamp" => Ok(OversoldPolicy::Clamp),
            "reject" | "strict" => Ok(OversoldPolicy::Reject),
            _ => Err(ConfigError::UnknownPolicy(s.trim().to_owned())),
        }
    }
}

impl fmt::Display for OversoldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OversoldPolicy::Permissive => write!(f, "permissive"),
            OversoldPolicy::Clamp => write!(f, "clamp"),
            OversoldPolicy::Reject => write!(f, "reject"),
        }
    }
}

/// Configuration for an `Aggregator`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Response to a sale that exceeds the tracked position.
    pub oversold: OversoldPolicy,
}

impl AggregatorConfig {
    #[must_use]
    pub fn new(oversold: OversoldPolicy) -> Self {
        Self { oversold }
    }

    /// Reads a JSON configuration object; missing fields keep their defaults.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }
}
