//! Runtime state for one presence marker.

use chrono::{DateTime, Utc};

use concourse_types::{Point, PresenceRecord, PresenceStatus, Uid};

/// A materialized presence marker.
///
/// Wraps the latest [`PresenceRecord`] for a uid with the runtime state
/// the tracker owns: derived position, visibility (clusters hide their
/// members without destroying them), label reveal, and the pulse
/// animation phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Latest presence record for this uid.
    pub record: PresenceRecord,
    /// Derived world position (stable per uid).
    pub position: Point,
    /// False while the marker is absorbed into a cluster.
    pub visible: bool,
    /// True while the name label is revealed (focus or hover).
    pub label_shown: bool,
    /// Pulse animation phase in `[0, 1)`, advanced on the animation tick.
    pub pulse_phase: f32,
    /// When the marker was first materialized.
    pub created_at: DateTime<Utc>,
}

impl Marker {
    /// Materialize a marker for a record at a derived position.
    pub fn new(record: PresenceRecord, position: Point) -> Self {
        Self {
            record,
            position,
            visible: true,
            label_shown: false,
            pulse_phase: 0.0,
            created_at: Utc::now(),
        }
    }

    /// The marker's uid.
    pub const fn uid(&self) -> &Uid {
        &self.record.uid
    }

    /// Update the status-bearing fields in place, preserving runtime
    /// state (position, visibility, animation phase).
    pub fn apply(&mut self, record: PresenceRecord) {
        self.record = record;
    }

    /// Current status shorthand.
    pub const fn status(&self) -> PresenceStatus {
        self.record.status
    }

    /// Advance the pulse animation by a phase step, wrapping at 1.
    pub fn advance_pulse(&mut self, step: f32) {
        self.pulse_phase = (self.pulse_phase + step).fract();
    }
}
