//! Error types for the `concourse-presence` crate.

/// Errors that can occur when constructing the tracker.
///
/// Runtime misses (focusing a uid with no marker, expanding an unknown
/// cluster) are *not* errors: they come from stale external events and
/// are handled as logged no-ops.
#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    /// Invalid tracker configuration.
    #[error("invalid presence configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong.
        reason: String,
    },
}
