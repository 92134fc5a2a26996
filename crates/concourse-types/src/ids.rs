//! Typed identifier wrappers.
//!
//! POI and user identities originate outside this process (the map-layer
//! loader and the presence feed), so they are opaque strings rather than
//! UUIDs. Wrapping them in newtypes prevents accidental mixing of
//! identifier kinds at compile time.
//!
//! [`ClusterId`] is the one internally-generated identity: clusters are
//! transient (recomputed from scratch on every presence update), so each
//! gets a fresh UUID v7 per recompute and no identity survives across
//! updates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_str_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// View the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner [`String`].
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Check whether the identifier is the empty string.
            ///
            /// Empty identifiers are never valid; registration paths
            /// reject them loudly.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

define_str_id! {
    /// Unique identifier for a point of interest.
    PoiId
}

define_str_id! {
    /// Unique identifier for a connected user in the presence feed.
    Uid
}

/// Transient identifier for a presence cluster.
///
/// Valid only until the next presence update recomputes the cluster set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClusterId(pub Uuid);

impl ClusterId {
    /// Create a new cluster identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ClusterId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn str_ids_roundtrip() {
        let id = PoiId::new("booth-42");
        assert_eq!(id.as_str(), "booth-42");
        assert_eq!(id.to_string(), "booth-42");
        assert_eq!(PoiId::from("booth-42"), id);
        assert_eq!(id.clone().into_inner(), "booth-42".to_owned());
    }

    #[test]
    fn str_ids_do_not_cross_kinds() {
        let poi = PoiId::new("x");
        let uid = Uid::new("x");
        // Same inner string, distinct types; equality is per-type only.
        assert_eq!(poi.as_str(), uid.as_str());
    }

    #[test]
    fn empty_id_detected() {
        assert!(PoiId::new("").is_empty());
        assert!(!Uid::new("u1").is_empty());
    }

    #[test]
    fn cluster_ids_are_unique() {
        let a = ClusterId::new();
        let b = ClusterId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = Uid::new("attendee-7");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"attendee-7\"");
        let back: Uid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
