//! Plain-data entity records.
//!
//! Everything here is inert structured data: records cross the event bus
//! and component boundaries by value, never as live references. Runtime
//! state that wraps these records (registration stamps, marker
//! visibility, animation phase) lives in the owning component crates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{PoiType, PresenceStatus};
use crate::geometry::Point;
use crate::ids::{PoiId, Uid};

/// Position of a POI in venue space.
///
/// `floor` and `zone` are optional because single-floor venues omit them;
/// queries treat a missing value as "matches nothing" when filtered on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoiPosition {
    /// Horizontal world coordinate.
    pub x: f32,
    /// Vertical world coordinate (y-down).
    pub y: f32,
    /// Floor number, if the venue has more than one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    /// Named zone within the floor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

impl PoiPosition {
    /// Return the 2D point of this position, discarding floor and zone.
    pub const fn point(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }
}

/// A point of interest on the venue map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    /// Unique, stable identifier.
    pub id: PoiId,
    /// Category from the closed set.
    #[serde(rename = "type")]
    pub poi_type: PoiType,
    /// Display name.
    pub name: String,
    /// Longer description, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Where the POI sits in venue space.
    pub position: PoiPosition,
    /// Whether the POI is currently visible and interactable.
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    /// Whether the POI carries visual emphasis, independent of activity.
    #[serde(rename = "isPulsing", default)]
    pub is_pulsing: bool,
    /// Free-form metadata carried through untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Serde default for flags that start enabled.
const fn default_true() -> bool {
    true
}

impl Poi {
    /// Create an active, non-pulsing POI with no description or metadata.
    pub fn new(id: impl Into<PoiId>, poi_type: PoiType, name: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            poi_type,
            name: name.into(),
            description: None,
            position: PoiPosition {
                x,
                y,
                floor: None,
                zone: None,
            },
            is_active: true,
            is_pulsing: false,
            metadata: BTreeMap::new(),
        }
    }

    /// Euclidean distance from this POI to a point.
    pub fn distance_to(&self, point: Point) -> f32 {
        self.position.point().distance_to(point)
    }
}

/// A remote user's live status record from the presence feed.
///
/// Positions are deliberately absent: the feed carries status only, and
/// marker positions are derived deterministically from the uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRecord {
    /// Unique identifier of the connected user.
    pub uid: Uid,
    /// Name shown on the marker label.
    #[serde(rename = "displayName")]
    pub display_name: String,
    /// Zone the user reported themselves in.
    pub zone: String,
    /// Live status.
    pub status: PresenceStatus,
}

/// The current way-finding destination.
///
/// At most one target is active per navigation engine; setting a new one
/// replaces (never queues behind) the previous target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavTarget {
    /// POI the target was resolved from, when navigation started from a
    /// POI selection rather than a raw position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poi_id: Option<PoiId>,
    /// Destination in world space.
    pub position: Point,
    /// Display name for progress UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn poi_constructor_defaults() {
        let poi = Poi::new("booth-1", PoiType::Sponsor, "Acme", 10.0, 20.0);
        assert!(poi.is_active);
        assert!(!poi.is_pulsing);
        assert!(poi.description.is_none());
        assert!(poi.metadata.is_empty());
        assert_eq!(poi.position.point(), Point::new(10.0, 20.0));
    }

    #[test]
    fn poi_distance() {
        let poi = Poi::new("p", PoiType::Info, "Desk", 3.0, 4.0);
        assert_eq!(poi.distance_to(Point::new(0.0, 0.0)), 5.0);
    }

    #[test]
    fn poi_json_uses_wire_field_names() {
        let poi = Poi::new("p1", PoiType::Food, "Coffee", 1.0, 2.0);
        let json = serde_json::to_value(&poi).unwrap();
        assert_eq!(json.get("type").unwrap(), "food");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn poi_missing_activity_flag_defaults_active() {
        let json = serde_json::json!({
            "id": "p1",
            "type": "session",
            "name": "Keynote",
            "position": {"x": 0.0, "y": 0.0}
        });
        let poi: Poi = serde_json::from_value(json).unwrap();
        assert!(poi.is_active);
    }

    #[test]
    fn presence_record_roundtrip() {
        let record = PresenceRecord {
            uid: Uid::new("u1"),
            display_name: "Ada".to_owned(),
            zone: "hall-a".to_owned(),
            status: PresenceStatus::Active,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json.get("displayName").unwrap(), "Ada");
        let back: PresenceRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
