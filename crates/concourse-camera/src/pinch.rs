//! Two-pointer pinch gesture recognition.
//!
//! A pinch exists only while *exactly two* pointers are down. When the
//! pointer count reaches two, the tracker baselines the inter-pointer
//! distance and the zoom at that instant; subsequent moves propose
//! `baseline_zoom * (distance / baseline_distance)`. Distance changes
//! within the dead-zone propose nothing, which keeps two resting fingers
//! from jittering the zoom. A third pointer, or lifting down to one,
//! ends the gesture; a later return to two pointers re-baselines.

use concourse_types::{Point, distance};

/// Baseline captured the instant a pinch begins.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Baseline {
    /// Inter-pointer distance at gesture start.
    distance: f32,
    /// Zoom factor at gesture start.
    zoom: f32,
}

/// Tracks active pointers and recognizes the pinch gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct PinchTracker {
    /// Active pointers by external id, in press order.
    pointers: Vec<(u64, Point)>,
    /// Present only while exactly two pointers are down.
    baseline: Option<Baseline>,
    /// Distance delta below which moves propose no zoom change.
    dead_zone: f32,
}

impl PinchTracker {
    /// Create a tracker with the given pinch dead-zone (non-negative).
    pub fn new(dead_zone: f32) -> Self {
        Self {
            pointers: Vec::new(),
            baseline: None,
            dead_zone: dead_zone.max(0.0),
        }
    }

    /// Record a pointer press. `current_zoom` baselines the gesture if
    /// this press makes the pointer count exactly two.
    pub fn pointer_down(&mut self, id: u64, position: Point, current_zoom: f32) {
        match self.pointers.iter_mut().find(|(p, _)| *p == id) {
            Some(entry) => entry.1 = position,
            None => self.pointers.push((id, position)),
        }
        self.rebaseline(current_zoom);
    }

    /// Record a pointer move. Returns the proposed (unclamped) zoom when
    /// a pinch is active and the distance delta clears the dead-zone.
    pub fn pointer_move(&mut self, id: u64, position: Point) -> Option<f32> {
        let entry = self.pointers.iter_mut().find(|(p, _)| *p == id)?;
        entry.1 = position;

        let baseline = self.baseline?;
        let current = self.span()?;
        if (current - baseline.distance).abs() <= self.dead_zone {
            return None;
        }
        if baseline.distance <= f32::EPSILON {
            return None;
        }
        Some(baseline.zoom * (current / baseline.distance))
    }

    /// Record a pointer release. `current_zoom` re-baselines if the
    /// release brings the count back down to exactly two.
    pub fn pointer_up(&mut self, id: u64, current_zoom: f32) {
        self.pointers.retain(|(p, _)| *p != id);
        self.rebaseline(current_zoom);
    }

    /// Whether a pinch gesture is currently active.
    pub const fn is_pinching(&self) -> bool {
        self.baseline.is_some()
    }

    /// Number of tracked pointers.
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Drop all pointers and any active gesture.
    pub fn reset(&mut self) {
        self.pointers.clear();
        self.baseline = None;
    }

    /// Re-evaluate the baseline after the pointer set changed.
    fn rebaseline(&mut self, current_zoom: f32) {
        self.baseline = if self.pointers.len() == 2 {
            self.span().map(|d| Baseline {
                distance: d,
                zoom: current_zoom,
            })
        } else {
            None
        };
    }

    /// Distance between the two active pointers, if exactly two.
    fn span(&self) -> Option<f32> {
        match self.pointers.as_slice() {
            [(_, a), (_, b)] => Some(distance(*a, *b)),
            _ => None,
        }
    }
}
