//! Shared primitive types used across the tuning pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The canonical run identifier.
pub type RunId = String;

/// Identifier of a historical alert. Only unique per dataset.
pub type AlertId = String;

/// Which alert population the metrics are computed over.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Above the line: full deduplicated alert population.
    Atl,
    /// Below the line: sampled and decisioned alert population.
    Btl,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Atl => "atl",
            Variant::Btl => "btl",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "atl" => Ok(Variant::Atl),
            "btl" => Ok(Variant::Btl),
            other => Err(format!("unknown variant '{other}' (expected atl or btl)")),
        }
    }
}

/// Manual or automated disposition label on a historical alert.
///
/// Labels are matched exactly; anything else (including blank) is `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Disposition {
    SarFiled,
    Interesting,
    NotInteresting,
    DataQuality,
    Other(String),
}

impl Disposition {
    pub fn parse(label: &str) -> Self {
        match label {
            "SAR Filed" => Disposition::SarFiled,
            "Interesting" => Disposition::Interesting,
            "Not Interesting" => Disposition::NotInteresting,
            "Data Quality" => Disposition::DataQuality,
            other => Disposition::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Disposition::SarFiled => "SAR Filed",
            Disposition::Interesting => "Interesting",
            Disposition::NotInteresting => "Not Interesting",
            Disposition::DataQuality => "Data Quality",
            Disposition::Other(raw) => raw,
        }
    }
}
