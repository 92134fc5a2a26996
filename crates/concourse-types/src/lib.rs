//! Shared type definitions for the Concourse spatial-interaction engine.
//!
//! This crate is the single source of truth for the types used across the
//! Concourse workspace: identifiers, 2D geometry, the closed POI and
//! presence category sets, plain-data records, bus payload shapes, and the
//! virtual-clock timer primitives that drive every periodic behaviour.
//!
//! # Modules
//!
//! - [`ids`] -- Typed wrappers for external string identifiers and
//!   internally-generated transient identifiers
//! - [`enums`] -- Closed category sets ([`PoiType`], [`PresenceStatus`])
//! - [`geometry`] -- Points, rectangles, distance, bearing, and the
//!   8-point compass bucketing
//! - [`records`] -- Plain-data entity records ([`Poi`], [`PresenceRecord`],
//!   [`NavTarget`])
//! - [`payloads`] -- Topic names and typed event payload shapes for the bus
//! - [`schedule`] -- [`Interval`] and [`OneShot`] virtual-clock timers

pub mod enums;
pub mod geometry;
pub mod ids;
pub mod payloads;
pub mod records;
pub mod schedule;

// Re-export primary types at crate root for convenience.
pub use enums::{CategoryError, PoiType, PresenceStatus};
pub use geometry::{Compass, Point, Rect, bearing_deg, distance, lerp};
pub use ids::{ClusterId, PoiId, Uid};
pub use payloads::{
    AttendeeFocused, AttendeeHovered, AttendeeSelected, ClusterExpanded, JoystickState,
    NavigationArrived, NavigationCancelled, NavigationStarted, NavigationUpdate, PayloadError,
    PlayerMoved, PoiHover, PoiProximity, PoiSelected, PresenceSnapshot, from_payload, to_payload,
    topics,
};
pub use records::{NavTarget, Poi, PoiPosition, PresenceRecord};
pub use schedule::{Interval, OneShot};
