//! The way-finding state machine value.

use serde::{Deserialize, Serialize};

use concourse_types::NavTarget;

/// Current way-finding state.
///
/// Transitions:
///
/// - `Idle -> Navigating`: a target was set.
/// - `Navigating -> Navigating`: a new target replaced the old one
///   (replacement, never queuing).
/// - `Navigating -> Arrived`: the first progress tick found the player
///   within the arrival threshold.
/// - `Arrived -> Idle`: the grace delay elapsed (automatic cancel).
/// - `Navigating | Arrived -> Idle`: explicit cancel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum NavState {
    /// No destination set; progress ticks emit nothing.
    Idle,
    /// En route to a destination.
    Navigating {
        /// The current destination.
        target: NavTarget,
    },
    /// Within the arrival threshold, waiting out the grace delay.
    Arrived {
        /// The reached destination.
        target: NavTarget,
    },
}

impl NavState {
    /// The current target, if any state holds one.
    pub const fn target(&self) -> Option<&NavTarget> {
        match self {
            Self::Idle => None,
            Self::Navigating { target } | Self::Arrived { target } => Some(target),
        }
    }

    /// Whether no destination is set.
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether the player is en route (arrival not yet detected).
    pub const fn is_navigating(&self) -> bool {
        matches!(self, Self::Navigating { .. })
    }

    /// Whether arrival was detected and the grace delay is running.
    pub const fn is_arrived(&self) -> bool {
        matches!(self, Self::Arrived { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use concourse_types::Point;

    use super::*;

    #[test]
    fn target_accessor_covers_all_states() {
        let target = NavTarget {
            poi_id: None,
            position: Point::new(1.0, 2.0),
            name: None,
        };
        assert!(NavState::Idle.target().is_none());
        let navigating = NavState::Navigating {
            target: target.clone(),
        };
        assert_eq!(navigating.target().unwrap(), &target);
        let arrived = NavState::Arrived { target };
        assert!(arrived.is_arrived());
        assert!(arrived.target().is_some());
    }

    #[test]
    fn state_serializes_with_tag() {
        let json = serde_json::to_value(NavState::Idle).unwrap();
        assert_eq!(json.get("state").unwrap(), "idle");
    }
}
