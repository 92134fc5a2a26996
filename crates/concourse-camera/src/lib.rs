//! Viewport camera control for the Concourse engine.
//!
//! The camera is a pure component: a world-space centre and a zoom
//! factor, with no bus wiring of its own (the engine feeds it player
//! positions and focus requests). It offers discrete zoom steps, panning,
//! smoothed follow with an optional rectangular dead-zone, two-finger
//! pinch recognition, and an eased zoom-to-point tween that keeps the
//! zoomed-at world point stationary on screen.
//!
//! # Modules
//!
//! - [`camera`] -- [`CameraController`] and its configuration.
//! - [`error`] -- [`CameraError`].
//! - [`pinch`] -- [`PinchTracker`], the two-pointer gesture recognizer.
//! - [`tween`] -- [`ZoomTween`], the eased zoom-and-centre animation.

pub mod camera;
pub mod error;
pub mod pinch;
pub mod tween;

pub use camera::{CameraConfig, CameraController, DeadZone};
pub use error::CameraError;
pub use pinch::PinchTracker;
pub use tween::ZoomTween;
