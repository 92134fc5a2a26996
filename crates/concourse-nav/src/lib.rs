//! Way-finding for the Concourse engine.
//!
//! The navigation engine holds at most one destination at a time and
//! walks a three-state machine: Idle (no target), Navigating (target
//! set, progress ticks running), Arrived (within the arrival threshold,
//! waiting out the grace delay before resetting to Idle).
//!
//! Progress is a level signal: one `navigation-update` per progress tick
//! carrying distance, bearing, and the coarse compass direction, emitted
//! whenever a target and a known player position exist -- including
//! during the post-arrival grace window. Arrival is an edge signal:
//! exactly one `navigation-arrived` per target.
//!
//! # Modules
//!
//! - [`engine`] -- [`NavEngine`], the bus-connected component.
//! - [`error`] -- [`NavError`].
//! - [`state`] -- [`NavState`], the three-state machine value.

pub mod engine;
pub mod error;
pub mod state;

pub use engine::{NavEngine, NavEngineConfig};
pub use error::NavError;
pub use state::NavState;
