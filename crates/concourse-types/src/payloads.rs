//! Topic names and typed payload shapes for the event bus.
//!
//! The bus itself carries untyped [`serde_json::Value`] payloads; this
//! module is the typed vocabulary both ends use. Publishers build a
//! payload struct and encode it with [`to_payload`]; subscribers decode
//! with [`from_payload`]. A payload that fails to decode is a stale or
//! malformed external event and is handled as a logged no-op, never a
//! panic.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::geometry::Compass;
use crate::ids::{ClusterId, PoiId, Uid};
use crate::records::{NavTarget, Poi, PresenceRecord};

/// Well-known topic names.
///
/// Topics need no pre-declaration on the bus; these constants exist so
/// publishers and subscribers cannot drift apart on spelling.
pub mod topics {
    /// Player position feed (external collaborator, level signal).
    pub const PLAYER_MOVED: &str = "player-moved";
    /// Full presence snapshot feed (external collaborator).
    pub const PRESENCE_UPDATE: &str = "presence-update";
    /// A POI was selected.
    pub const POI_SELECTED: &str = "poi-selected";
    /// Pointer began hovering a POI.
    pub const POI_HOVER_START: &str = "poi-hover-start";
    /// Pointer stopped hovering a POI.
    pub const POI_HOVER_END: &str = "poi-hover-end";
    /// A POI is within the proximity radius (level signal, one per scan tick).
    pub const POI_PROXIMITY: &str = "poi-proximity";
    /// Way-finding started toward a new target.
    pub const NAVIGATION_STARTED: &str = "navigation-started";
    /// Way-finding progress (level signal, one per progress tick).
    pub const NAVIGATION_UPDATE: &str = "navigation-update";
    /// Arrival detected (edge signal, exactly once per target).
    pub const NAVIGATION_ARRIVED: &str = "navigation-arrived";
    /// Way-finding ended without or after arrival.
    pub const NAVIGATION_CANCELLED: &str = "navigation-cancelled";
    /// An attendee marker was selected.
    pub const ATTENDEE_SELECTED: &str = "attendee-selected";
    /// An attendee marker was hovered.
    pub const ATTENDEE_HOVERED: &str = "attendee-hovered";
    /// The viewport was asked to focus an attendee marker.
    pub const ATTENDEE_FOCUSED: &str = "attendee-focused";
    /// A presence cluster was expanded back into its members.
    pub const CLUSTER_EXPANDED: &str = "cluster-expanded";
    /// Virtual joystick state changed.
    pub const JOYSTICK_STATE: &str = "joystick-state";
}

/// Errors raised when bridging typed payloads to and from JSON.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// A payload struct failed to serialize (programming error).
    #[error("failed to encode payload: {source}")]
    Encode {
        /// The underlying serialization error.
        source: serde_json::Error,
    },

    /// An incoming payload did not match the expected shape.
    #[error("failed to decode payload: {source}")]
    Decode {
        /// The underlying deserialization error.
        source: serde_json::Error,
    },
}

/// Encode a typed payload into the untyped form the bus carries.
///
/// # Errors
///
/// Returns [`PayloadError::Encode`] if serialization fails.
pub fn to_payload<T: Serialize>(value: &T) -> Result<Value, PayloadError> {
    serde_json::to_value(value).map_err(|source| PayloadError::Encode { source })
}

/// Decode an untyped bus payload into its expected shape.
///
/// # Errors
///
/// Returns [`PayloadError::Decode`] if the payload does not match.
pub fn from_payload<T: DeserializeOwned>(value: &Value) -> Result<T, PayloadError> {
    serde_json::from_value(value.clone()).map_err(|source| PayloadError::Decode { source })
}

/// Payload of [`topics::PLAYER_MOVED`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMoved {
    /// World x coordinate.
    pub x: f32,
    /// World y coordinate.
    pub y: f32,
    /// Zone the player is in, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

/// Payload of [`topics::PRESENCE_UPDATE`]: the *entire* current user set.
///
/// Users absent from the snapshot are gone; the tracker derives its
/// marker set from this, it never accumulates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceSnapshot {
    /// All currently-connected users.
    pub users: Vec<PresenceRecord>,
}

/// Payload of [`topics::POI_SELECTED`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiSelected {
    /// Snapshot of the selected POI.
    pub poi: Poi,
}

/// Payload of [`topics::POI_HOVER_START`] and [`topics::POI_HOVER_END`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiHover {
    /// The hovered POI.
    pub poi_id: PoiId,
    /// Its display name, for tooltip rendering without a registry lookup.
    pub name: String,
}

/// Payload of [`topics::POI_PROXIMITY`].
///
/// Emitted every scan tick for every POI inside the radius -- a level
/// signal. Consumers that want enter/exit edges must deduplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiProximity {
    /// The nearby POI.
    pub poi_id: PoiId,
    /// Distance from the player at scan time.
    pub distance: f32,
}

/// Payload of [`topics::NAVIGATION_STARTED`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationStarted {
    /// The new target.
    pub target: NavTarget,
}

/// Payload of [`topics::NAVIGATION_UPDATE`] -- one per progress tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationUpdate {
    /// Straight-line distance to the target.
    pub distance: f32,
    /// Bearing to the target in degrees, `[0, 360)`, y-down convention.
    pub bearing_deg: f32,
    /// Coarse 8-point direction label.
    pub compass: Compass,
}

/// Payload of [`topics::NAVIGATION_ARRIVED`] -- exactly once per target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationArrived {
    /// The reached target.
    pub target: NavTarget,
}

/// Payload of [`topics::NAVIGATION_CANCELLED`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationCancelled {
    /// The abandoned target.
    pub target: NavTarget,
    /// True when the cancel was the automatic post-arrival reset rather
    /// than an explicit request.
    pub auto: bool,
}

/// Payload of [`topics::ATTENDEE_SELECTED`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeSelected {
    /// The selected attendee.
    pub uid: Uid,
}

/// Payload of [`topics::ATTENDEE_HOVERED`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeHovered {
    /// The hovered attendee.
    pub uid: Uid,
}

/// Payload of [`topics::ATTENDEE_FOCUSED`].
///
/// Carries the marker position so the viewport can pan without reaching
/// into the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendeeFocused {
    /// The focused attendee.
    pub uid: Uid,
    /// Marker world x.
    pub x: f32,
    /// Marker world y.
    pub y: f32,
}

/// Payload of [`topics::CLUSTER_EXPANDED`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterExpanded {
    /// The expanded (and now discarded) cluster.
    pub cluster_id: ClusterId,
    /// Members restored to individual visibility.
    pub members: Vec<Uid>,
}

/// Payload of [`topics::JOYSTICK_STATE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoystickState {
    /// Whether a pointer is currently driving the joystick.
    pub active: bool,
    /// Normalized horizontal deflection in `[-1, 1]`.
    pub dx: f32,
    /// Normalized vertical deflection in `[-1, 1]`.
    pub dy: f32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use crate::geometry::Point;

    use super::*;

    #[test]
    fn payload_bridging_roundtrip() {
        let update = NavigationUpdate {
            distance: 42.5,
            bearing_deg: 90.0,
            compass: Compass::S,
        };
        let value = to_payload(&update).unwrap();
        assert_eq!(value.get("compass").unwrap(), "S");
        let back: NavigationUpdate = from_payload(&value).unwrap();
        assert_eq!(back, update);
    }

    #[test]
    fn malformed_payload_fails_decode() {
        let value = serde_json::json!({"distance": "not-a-number"});
        let result: Result<NavigationUpdate, _> = from_payload(&value);
        assert!(result.is_err());
    }

    #[test]
    fn cancelled_payload_distinguishes_auto() {
        let target = NavTarget {
            poi_id: Some(PoiId::new("p1")),
            position: Point::new(5.0, 5.0),
            name: None,
        };
        let cancelled = NavigationCancelled {
            target,
            auto: true,
        };
        let value = to_payload(&cancelled).unwrap();
        assert_eq!(value.get("auto").unwrap(), true);
    }
}
