//! Error types for the `concourse-camera` crate.

/// Errors that can occur when constructing the camera controller.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    /// Invalid camera configuration.
    #[error("invalid camera configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong.
        reason: String,
    },
}
