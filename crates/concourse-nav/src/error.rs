//! Error types for the `concourse-nav` crate.

/// Errors that can occur when constructing the navigation engine.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// Invalid navigation configuration.
    #[error("invalid navigation configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong.
        reason: String,
    },
}
