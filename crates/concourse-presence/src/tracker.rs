//! The bus-connected presence tracker component.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use concourse_bus::{EventBus, HandlerError, Subscription};
use concourse_types::payloads::{
    AttendeeFocused, AttendeeHovered, AttendeeSelected, ClusterExpanded, PresenceSnapshot, topics,
};
use concourse_types::{ClusterId, Interval, OneShot, Point, Uid, from_payload};

use crate::cluster::{Cluster, build_clusters};
use crate::error::PresenceError;
use crate::marker::Marker;
use crate::position::{HashPositionSource, PositionSource};

/// Fraction of a pulse cycle advanced per animation tick.
const PULSE_STEP: f32 = 0.05;

/// Tunables for the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceTrackerConfig {
    /// Hard cap on simultaneously materialized markers. Snapshots longer
    /// than this are truncated in snapshot order (truncation, not
    /// reordering, is the tracker's responsibility; upstream pre-ranks).
    pub max_markers: usize,
    /// Pairwise distance below which markers group around a seed.
    pub cluster_distance: f32,
    /// Period of the marker animation tick (wall-clock, not per-frame).
    pub anim_interval_ms: f64,
    /// How long a focused marker's label stays revealed.
    pub focus_label_ms: f64,
    /// Centre of the derived-placement ring.
    pub ring_center: Point,
    /// Inner radius of the placement ring.
    pub ring_min_radius: f32,
    /// Outer radius of the placement ring.
    pub ring_max_radius: f32,
}

impl Default for PresenceTrackerConfig {
    fn default() -> Self {
        Self {
            max_markers: 50,
            cluster_distance: 40.0,
            anim_interval_ms: 250.0,
            focus_label_ms: 2000.0,
            ring_center: Point::new(512.0, 384.0),
            ring_min_radius: 60.0,
            ring_max_radius: 280.0,
        }
    }
}

/// Mutable tracker state shared with the presence-update subscription.
struct State {
    /// Markers, oldest-first (existing order preserved across snapshots,
    /// new markers appended).
    markers: Vec<Marker>,
    /// Clusters from the last recompute.
    clusters: Vec<Cluster>,
    /// Identity-to-position derivation seam.
    source: Box<dyn PositionSource>,
    /// See [`PresenceTrackerConfig::max_markers`].
    max_markers: usize,
    /// See [`PresenceTrackerConfig::cluster_distance`].
    cluster_distance: f32,
}

impl State {
    /// Reconcile the marker set against a full snapshot, then recluster.
    fn apply_snapshot(&mut self, mut snapshot: PresenceSnapshot) {
        snapshot.users.truncate(self.max_markers);

        let before = self.markers.len();
        self.markers
            .retain(|m| snapshot.users.iter().any(|u| u.uid == m.record.uid));
        let removed = before.saturating_sub(self.markers.len());

        let mut created = 0_usize;
        for record in snapshot.users {
            match self.markers.iter_mut().find(|m| m.record.uid == record.uid) {
                Some(marker) => marker.apply(record),
                None => {
                    let position = self.source.position_for(&record.uid);
                    self.markers.push(Marker::new(record, position));
                    created = created.saturating_add(1);
                }
            }
        }
        debug!(
            created,
            removed,
            live = self.markers.len(),
            "presence snapshot applied"
        );

        self.recluster();
    }

    /// Recompute clusters from scratch and hide their members.
    fn recluster(&mut self) {
        for marker in &mut self.markers {
            marker.visible = true;
        }
        self.clusters = build_clusters(&self.markers, self.cluster_distance);
        for cluster in &self.clusters {
            for uid in &cluster.members {
                if let Some(marker) = self.markers.iter_mut().find(|m| m.record.uid == *uid) {
                    marker.visible = false;
                }
            }
        }
    }
}

/// The presence tracker component.
///
/// Owns the marker set derived from the `presence-update` feed and the
/// transient cluster set derived from the markers. Communicates with
/// the rest of the engine exclusively over the injected [`EventBus`].
pub struct PresenceTracker {
    bus: EventBus,
    state: Rc<RefCell<State>>,
    presence_sub: Option<Subscription>,
    anim: Interval,
    focus_hide: OneShot,
    focused_uid: Option<Uid>,
    focus_label_ms: f64,
    destroyed: bool,
}

impl PresenceTracker {
    /// Create a tracker using the deterministic hash placement source.
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::InvalidConfig`] on a zero marker cap or
    /// non-positive distances/intervals.
    pub fn new(bus: EventBus, config: &PresenceTrackerConfig) -> Result<Self, PresenceError> {
        let source = HashPositionSource::new(
            config.ring_center,
            config.ring_min_radius,
            config.ring_max_radius,
        );
        Self::with_position_source(bus, config, Box::new(source))
    }

    /// Create a tracker with an explicit placement source (the seam for
    /// replacing the hash derivation with real position data).
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::InvalidConfig`] on a zero marker cap or
    /// non-positive distances/intervals.
    pub fn with_position_source(
        bus: EventBus,
        config: &PresenceTrackerConfig,
        source: Box<dyn PositionSource>,
    ) -> Result<Self, PresenceError> {
        if config.max_markers == 0 {
            return Err(PresenceError::InvalidConfig {
                reason: "max_markers must be at least 1".to_owned(),
            });
        }
        if !(config.cluster_distance.is_finite() && config.cluster_distance > 0.0) {
            return Err(PresenceError::InvalidConfig {
                reason: "cluster_distance must be positive and finite".to_owned(),
            });
        }
        if !(config.anim_interval_ms.is_finite() && config.anim_interval_ms > 0.0)
            || !(config.focus_label_ms.is_finite() && config.focus_label_ms > 0.0)
        {
            return Err(PresenceError::InvalidConfig {
                reason: "intervals must be positive and finite".to_owned(),
            });
        }

        let state = Rc::new(RefCell::new(State {
            markers: Vec::new(),
            clusters: Vec::new(),
            source,
            max_markers: config.max_markers,
            cluster_distance: config.cluster_distance,
        }));

        let weak = Rc::downgrade(&state);
        let presence_sub = bus.subscribe(topics::PRESENCE_UPDATE, move |payload| {
            let Some(state) = weak.upgrade() else {
                return Ok(());
            };
            let snapshot: PresenceSnapshot = from_payload(payload).map_err(HandlerError::failed)?;
            state.borrow_mut().apply_snapshot(snapshot);
            Ok(())
        });

        Ok(Self {
            bus,
            state,
            presence_sub: Some(presence_sub),
            anim: Interval::new(config.anim_interval_ms),
            focus_hide: OneShot::new(),
            focused_uid: None,
            focus_label_ms: config.focus_label_ms,
            destroyed: false,
        })
    }

    // -------------------------------------------------------------------
    // Accessors (snapshots, no live references)
    // -------------------------------------------------------------------

    /// Number of materialized markers (visible or hidden).
    pub fn marker_count(&self) -> usize {
        self.state.borrow().markers.len()
    }

    /// Number of individually visible markers.
    pub fn visible_count(&self) -> usize {
        self.state
            .borrow()
            .markers
            .iter()
            .filter(|m| m.visible)
            .count()
    }

    /// Snapshot of one marker by uid.
    pub fn marker(&self, uid: &Uid) -> Option<Marker> {
        self.state
            .borrow()
            .markers
            .iter()
            .find(|m| &m.record.uid == uid)
            .cloned()
    }

    /// Snapshot of all markers, oldest-first.
    pub fn markers(&self) -> Vec<Marker> {
        self.state.borrow().markers.clone()
    }

    /// Snapshot of the current cluster set.
    pub fn clusters(&self) -> Vec<Cluster> {
        self.state.borrow().clusters.clone()
    }

    // -------------------------------------------------------------------
    // Interaction
    // -------------------------------------------------------------------

    /// Expand a cluster: re-show its members, discard the label, and
    /// emit `cluster-expanded`. Unknown ids (stale after a recompute)
    /// are logged no-ops. Returns whether the cluster existed.
    pub fn expand_cluster(&self, id: &ClusterId) -> bool {
        let expanded = {
            let mut state = self.state.borrow_mut();
            let Some(pos) = state.clusters.iter().position(|c| &c.id == id) else {
                warn!(%id, "expand: unknown cluster id, ignoring");
                return false;
            };
            let cluster = state.clusters.remove(pos);
            for uid in &cluster.members {
                if let Some(marker) = state.markers.iter_mut().find(|m| m.record.uid == *uid) {
                    marker.visible = true;
                }
            }
            cluster
        };
        let _ = self.bus.publish_typed(
            topics::CLUSTER_EXPANDED,
            &ClusterExpanded {
                cluster_id: expanded.id,
                members: expanded.members,
            },
        );
        true
    }

    /// Focus a marker: emit `attendee-focused` (the engine pans the
    /// viewport from it) and reveal the label for the configured
    /// duration via a cancellable delayed hide. Focusing a uid with no
    /// marker is a logged no-op. Returns whether the marker existed.
    pub fn focus_on(&mut self, now_ms: f64, uid: &Uid) -> bool {
        let position = {
            let mut state = self.state.borrow_mut();
            // Re-focus moves the label; hide the previous one first.
            if let Some(prev) = self.focused_uid.take() {
                if let Some(marker) = state.markers.iter_mut().find(|m| m.record.uid == prev) {
                    marker.label_shown = false;
                }
            }
            let Some(marker) = state.markers.iter_mut().find(|m| &m.record.uid == uid) else {
                warn!(%uid, "focus: no marker for uid, ignoring");
                return false;
            };
            marker.label_shown = true;
            marker.position
        };

        self.focused_uid = Some(uid.clone());
        self.focus_hide.schedule(now_ms, self.focus_label_ms);
        let _ = self.bus.publish_typed(
            topics::ATTENDEE_FOCUSED,
            &AttendeeFocused {
                uid: uid.clone(),
                x: position.x,
                y: position.y,
            },
        );
        true
    }

    /// Emit `attendee-selected` for a marker. Unknown uids are logged
    /// no-ops. Returns whether the marker existed.
    pub fn select(&self, uid: &Uid) -> bool {
        if self.marker(uid).is_none() {
            warn!(%uid, "select: no marker for uid, ignoring");
            return false;
        }
        let _ = self
            .bus
            .publish_typed(topics::ATTENDEE_SELECTED, &AttendeeSelected { uid: uid.clone() });
        true
    }

    /// Emit `attendee-hovered` for a marker. Unknown uids are logged
    /// no-ops. Returns whether the marker existed.
    pub fn hover(&self, uid: &Uid) -> bool {
        if self.marker(uid).is_none() {
            warn!(%uid, "hover: no marker for uid, ignoring");
            return false;
        }
        let _ = self
            .bus
            .publish_typed(topics::ATTENDEE_HOVERED, &AttendeeHovered { uid: uid.clone() });
        true
    }

    // -------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------

    /// Advance marker animation (throttled to the animation interval,
    /// not per-frame) and the delayed focus-label hide.
    pub fn update(&mut self, now_ms: f64) {
        if self.destroyed {
            return;
        }
        if self.anim.poll(now_ms) {
            let mut state = self.state.borrow_mut();
            for marker in state.markers.iter_mut().filter(|m| m.visible) {
                marker.advance_pulse(PULSE_STEP);
            }
        }
        if self.focus_hide.poll(now_ms) {
            if let Some(uid) = self.focused_uid.take() {
                let mut state = self.state.borrow_mut();
                if let Some(marker) = state.markers.iter_mut().find(|m| m.record.uid == uid) {
                    marker.label_shown = false;
                }
            }
        }
    }

    /// Tear the tracker down: cancel timers, drop the subscription,
    /// free markers and clusters. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.anim.cancel();
        self.focus_hide.cancel();
        self.focused_uid = None;
        if let Some(mut sub) = self.presence_sub.take() {
            sub.unsubscribe();
        }
        let mut state = self.state.borrow_mut();
        state.markers.clear();
        state.clusters.clear();
        debug!("presence tracker destroyed");
    }
}

impl core::fmt::Debug for PresenceTracker {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PresenceTracker")
            .field("markers", &self.marker_count())
            .field("clusters", &self.state.borrow().clusters.len())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}
