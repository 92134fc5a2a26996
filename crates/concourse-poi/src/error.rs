//! Error types for the `concourse-poi` crate.

use concourse_types::PoiId;

/// Errors that can occur during registry operations.
///
/// These fail loudly at the call site. Transient lookup misses
/// (selecting or mutating a POI that was already removed) are
/// deliberately *not* errors -- they are logged no-ops, since they
/// originate from stale external events.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A required field was missing or empty on registration.
    #[error("POI {id} is missing required field: {field}")]
    MissingField {
        /// The offending POI (best-effort; may itself be empty).
        id: PoiId,
        /// Name of the missing field.
        field: &'static str,
    },

    /// Invalid registry configuration.
    #[error("invalid registry configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong.
        reason: String,
    },
}
