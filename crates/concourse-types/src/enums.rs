//! Closed category sets for POIs and presence status.
//!
//! Both sets are closed by design: external data carrying an unknown
//! category name is a configuration error and must fail loudly at the
//! parse boundary, never be silently coerced to a default.

use serde::{Deserialize, Serialize};

/// Errors raised when parsing category names from external data.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// The POI type name does not match any known category.
    #[error("unknown POI type: {0}")]
    UnknownPoiType(String),

    /// The presence status name does not match any known status.
    #[error("unknown presence status: {0}")]
    UnknownStatus(String),
}

/// The closed set of point-of-interest categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiType {
    /// A scheduled session or talk.
    Session,
    /// A sponsor booth.
    Sponsor,
    /// A food or drink station.
    Food,
    /// A social or networking space.
    Social,
    /// An information desk or signage point.
    Info,
    /// A structural landmark used for orientation.
    Landmark,
}

impl PoiType {
    /// Return the lowercase wire name of this category.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Sponsor => "sponsor",
            Self::Food => "food",
            Self::Social => "social",
            Self::Info => "info",
            Self::Landmark => "landmark",
        }
    }
}

impl core::str::FromStr for PoiType {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "session" => Ok(Self::Session),
            "sponsor" => Ok(Self::Sponsor),
            "food" => Ok(Self::Food),
            "social" => Ok(Self::Social),
            "info" => Ok(Self::Info),
            "landmark" => Ok(Self::Landmark),
            other => Err(CategoryError::UnknownPoiType(other.to_owned())),
        }
    }
}

impl core::fmt::Display for PoiType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Live status of a remote user, as reported by the presence feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    /// Actively using the client.
    Active,
    /// Connected but inactive for a short while.
    Idle,
    /// Connected but away.
    Away,
}

impl PresenceStatus {
    /// Return the lowercase wire name of this status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Idle => "idle",
            Self::Away => "away",
        }
    }
}

impl core::str::FromStr for PresenceStatus {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "idle" => Ok(Self::Idle),
            "away" => Ok(Self::Away),
            other => Err(CategoryError::UnknownStatus(other.to_owned())),
        }
    }
}

impl core::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
