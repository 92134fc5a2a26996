//! Multi-user presence tracking for the Concourse engine.
//!
//! The tracker consumes full presence snapshots from the `presence-update`
//! feed and maintains a derived marker set: markers are created for new
//! uids, removed for vanished uids, and status-updated in place for
//! survivors. Positions are never transmitted -- they are derived
//! deterministically from each uid behind the [`PositionSource`] seam.
//!
//! After every snapshot the tracker reclusters: groups of three or more
//! markers within the clustering distance of a seed marker collapse into
//! a single "+N" cluster label, hiding (not destroying) the members so
//! the cluster can be expanded back.
//!
//! # Modules
//!
//! - [`cluster`] -- [`Cluster`] and the single-linkage grouping pass.
//! - [`error`] -- [`PresenceError`].
//! - [`marker`] -- [`Marker`] runtime state.
//! - [`position`] -- [`PositionSource`] and the deterministic
//!   [`HashPositionSource`].
//! - [`tracker`] -- [`PresenceTracker`], the bus-connected component.

pub mod cluster;
pub mod error;
pub mod marker;
pub mod position;
pub mod tracker;

pub use cluster::Cluster;
pub use error::PresenceError;
pub use marker::Marker;
pub use position::{HashPositionSource, PositionSource};
pub use tracker::{PresenceTracker, PresenceTrackerConfig};
