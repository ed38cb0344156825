//! Regions of the game-data service and the namespaces resources live in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CpcError;

/// Top-level market partition of the game service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Americas and Oceania.
    Us,
    /// Europe.
    Eu,
    /// Korea.
    Kr,
    /// Taiwan.
    Tw,
}

impl Region {
    /// Every supported region.
    pub const ALL: [Self; 4] = [Self::Us, Self::Eu, Self::Kr, Self::Tw];

    /// Lowercase region code as used in hostnames and namespaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Eu => "eu",
            Self::Kr => "kr",
            Self::Tw => "tw",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = CpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(Self::Us),
            "eu" => Ok(Self::Eu),
            "kr" => Ok(Self::Kr),
            "tw" => Ok(Self::Tw),
            _ => Err(CpcError::invalid_arg(format!(
                "{s} is invalid. Valid regions include 'us', 'eu', 'kr', and 'tw'"
            ))),
        }
    }
}

/// Data namespace a resource is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Slow-changing reference data (items, recipes, professions).
    Static,
    /// Live data (realms, auctions).
    Dynamic,
}

impl Namespace {
    /// Namespace parameter value for a region, e.g. `static-us`.
    #[must_use]
    pub fn qualified(self, region: Region) -> String {
        let kind = match self {
            Self::Static => "static",
            Self::Dynamic => "dynamic",
        };
        format!("{kind}-{region}")
    }
}
