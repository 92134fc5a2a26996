//! Orchestration for the Concourse spatial-interaction engine.
//!
//! This crate owns no domain logic of its own: it loads the YAML
//! configuration, constructs the event bus and every component, wires
//! the cross-component reactions that components must not hard-code
//! (focus requests pan the camera, pointer input routes to the joystick
//! or the camera), and fans the host's per-frame `update` out to each
//! component in a fixed order.
//!
//! # Modules
//!
//! - [`config`] -- [`EngineConfig`] and YAML loading.
//! - [`engine`] -- [`Engine`], the component container.
//! - [`error`] -- [`EngineError`].
//! - [`joystick`] -- [`VirtualJoystick`], the on-screen movement control.
//! - [`preferences`] -- [`Preferences`], the startup key-value lookup.

pub mod config;
pub mod engine;
pub mod error;
pub mod joystick;
pub mod preferences;

pub use config::{ConfigError, EngineConfig};
pub use engine::Engine;
pub use error::EngineError;
pub use joystick::VirtualJoystick;
pub use preferences::Preferences;
