//! Error types for the `concourse-engine` crate.

use crate::config::ConfigError;

/// Errors that can occur when constructing or configuring the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration failed to load or parse.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The POI registry rejected its configuration.
    #[error(transparent)]
    Registry(#[from] concourse_poi::RegistryError),

    /// The presence tracker rejected its configuration.
    #[error(transparent)]
    Presence(#[from] concourse_presence::PresenceError),

    /// The navigation engine rejected its configuration.
    #[error(transparent)]
    Nav(#[from] concourse_nav::NavError),

    /// The camera controller rejected its configuration.
    #[error(transparent)]
    Camera(#[from] concourse_camera::CameraError),
}
