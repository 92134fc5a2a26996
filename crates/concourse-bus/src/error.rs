//! Error types for subscriber handlers.

/// Errors a subscriber handler may return.
///
/// Handler errors never stop delivery; the bus logs them and moves on to
/// the next subscriber. They exist so a consumer of a stale or malformed
/// external event can decline it loudly without breaking its peers.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The payload did not have the shape the handler expected.
    #[error("malformed payload: {source}")]
    Payload {
        /// The underlying deserialization error.
        #[from]
        source: serde_json::Error,
    },

    /// The handler failed for a domain reason.
    #[error("handler failed: {reason}")]
    Failed {
        /// Explanation of the failure.
        reason: String,
    },
}

impl HandlerError {
    /// Build a domain failure from any displayable reason.
    pub fn failed(reason: impl core::fmt::Display) -> Self {
        Self::Failed {
            reason: reason.to_string(),
        }
    }
}
