//! The bus-connected POI registry component.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use concourse_bus::{EventBus, HandlerError, Subscription};
use concourse_types::payloads::{PlayerMoved, PoiHover, PoiProximity, PoiSelected, topics};
use concourse_types::{Interval, Point, Poi, PoiId, from_payload};

use crate::error::RegistryError;
use crate::filter::PoiFilter;

/// Tunables for the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiRegistryConfig {
    /// Radius around the player inside which `poi-proximity` fires.
    pub proximity_radius: f32,
    /// Period of the proximity scan, independent of the render loop.
    pub scan_interval_ms: f64,
}

impl Default for PoiRegistryConfig {
    fn default() -> Self {
        Self {
            proximity_radius: 120.0,
            scan_interval_ms: 1000.0,
        }
    }
}

/// One registered POI plus its registry bookkeeping.
#[derive(Debug, Clone)]
struct Entry {
    poi: Poi,
    registered_at: DateTime<Utc>,
}

/// Mutable registry state shared with the player-position subscription.
#[derive(Debug, Default)]
struct State {
    /// Entries in registration order. Order is load-bearing: it is the
    /// documented tie-break for [`PoiRegistry::closest_to`].
    entries: Vec<Entry>,
    /// Last known player position from the `player-moved` feed.
    player: Option<Point>,
}

/// The POI registry component.
///
/// Owns the POI set, answers queries, and emits proximity events on its
/// own timer. Communicates with the rest of the engine exclusively over
/// the injected [`EventBus`].
pub struct PoiRegistry {
    bus: EventBus,
    state: Rc<RefCell<State>>,
    player_sub: Option<Subscription>,
    scan: Interval,
    proximity_radius: f32,
    destroyed: bool,
}

impl PoiRegistry {
    /// Create a registry and subscribe it to the player-position feed.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidConfig`] if the proximity radius
    /// or scan interval is not a positive finite number.
    pub fn new(bus: EventBus, config: &PoiRegistryConfig) -> Result<Self, RegistryError> {
        if !(config.proximity_radius.is_finite() && config.proximity_radius > 0.0) {
            return Err(RegistryError::InvalidConfig {
                reason: "proximity_radius must be positive and finite".to_owned(),
            });
        }
        if !(config.scan_interval_ms.is_finite() && config.scan_interval_ms > 0.0) {
            return Err(RegistryError::InvalidConfig {
                reason: "scan_interval_ms must be positive and finite".to_owned(),
            });
        }

        let state = Rc::new(RefCell::new(State::default()));

        let weak = Rc::downgrade(&state);
        let player_sub = bus.subscribe(topics::PLAYER_MOVED, move |payload| {
            let Some(state) = weak.upgrade() else {
                return Ok(());
            };
            let moved: PlayerMoved = from_payload(payload).map_err(HandlerError::failed)?;
            state.borrow_mut().player = Some(Point::new(moved.x, moved.y));
            Ok(())
        });

        Ok(Self {
            bus,
            state,
            player_sub: Some(player_sub),
            scan: Interval::new(config.scan_interval_ms),
            proximity_radius: config.proximity_radius,
            destroyed: false,
        })
    }

    // -------------------------------------------------------------------
    // Registration lifecycle
    // -------------------------------------------------------------------

    /// Register a POI, replacing any prior entry with the same id.
    ///
    /// Replacement is destroy-then-recreate: the old entry is removed
    /// and the new one appended, so a replaced POI moves to the end of
    /// registration order (and of the `closest_to` tie-break).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingField`] if the id or name is
    /// empty. Rejection is loud by design; nothing is coerced.
    pub fn register(&self, poi: Poi) -> Result<(), RegistryError> {
        if poi.id.is_empty() {
            return Err(RegistryError::MissingField {
                id: poi.id,
                field: "id",
            });
        }
        if poi.name.is_empty() {
            return Err(RegistryError::MissingField {
                id: poi.id,
                field: "name",
            });
        }

        let mut state = self.state.borrow_mut();
        let before = state.entries.len();
        state.entries.retain(|e| e.poi.id != poi.id);
        let replaced = state.entries.len() < before;
        debug!(id = %poi.id, replaced, "registering POI");
        state.entries.push(Entry {
            poi,
            registered_at: Utc::now(),
        });
        Ok(())
    }

    /// Remove a POI. Removal is synchronous; all per-POI state is freed
    /// immediately. Removing an unknown id is a logged no-op.
    pub fn unregister(&self, id: &PoiId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.entries.len();
        state.entries.retain(|e| &e.poi.id != id);
        let removed = state.entries.len() < before;
        if removed {
            debug!(%id, "unregistered POI");
        } else {
            debug!(%id, "unregister: unknown id, ignoring");
        }
        removed
    }

    /// Remove every POI. Returns the number removed.
    pub fn clear_all(&self) -> usize {
        let mut state = self.state.borrow_mut();
        let removed = state.entries.len();
        state.entries.clear();
        debug!(removed, "cleared all POIs");
        removed
    }

    /// Remove every POI on a given floor (used on floor change).
    /// Returns the number removed.
    pub fn clear_floor(&self, floor: i32) -> usize {
        let mut state = self.state.borrow_mut();
        let before = state.entries.len();
        state.entries.retain(|e| e.poi.position.floor != Some(floor));
        let removed = before.saturating_sub(state.entries.len());
        debug!(floor, removed, "cleared floor");
        removed
    }

    // -------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------

    /// Set the visible/interactable flag. Unknown ids are stale events
    /// and are ignored with a log line. Returns whether the POI existed.
    pub fn set_active(&self, id: &PoiId, is_active: bool) -> bool {
        self.mutate(id, "set_active", |poi| poi.is_active = is_active)
    }

    /// Turn on visual emphasis (independent of activity).
    pub fn highlight(&self, id: &PoiId) -> bool {
        self.mutate(id, "highlight", |poi| poi.is_pulsing = true)
    }

    /// Turn off visual emphasis.
    pub fn unhighlight(&self, id: &PoiId) -> bool {
        self.mutate(id, "unhighlight", |poi| poi.is_pulsing = false)
    }

    fn mutate(&self, id: &PoiId, op: &'static str, apply: impl FnOnce(&mut Poi)) -> bool {
        let mut state = self.state.borrow_mut();
        match state.entries.iter_mut().find(|e| &e.poi.id == id) {
            Some(entry) => {
                apply(&mut entry.poi);
                true
            }
            None => {
                warn!(%id, op, "unknown POI id, ignoring");
                false
            }
        }
    }

    // -------------------------------------------------------------------
    // Selection and hover (UI pass-through)
    // -------------------------------------------------------------------

    /// Emit `poi-selected` with a snapshot of the POI. Unknown ids are
    /// logged no-ops. Returns whether the POI existed.
    pub fn select(&self, id: &PoiId) -> bool {
        let snapshot = self.get(id);
        match snapshot {
            Some(poi) => {
                let _ = self
                    .bus
                    .publish_typed(topics::POI_SELECTED, &PoiSelected { poi });
                true
            }
            None => {
                warn!(%id, "select: unknown POI id, ignoring");
                false
            }
        }
    }

    /// Emit `poi-hover-start`. Returns whether the POI existed.
    pub fn hover_start(&self, id: &PoiId) -> bool {
        self.emit_hover(id, topics::POI_HOVER_START)
    }

    /// Emit `poi-hover-end`. Returns whether the POI existed.
    pub fn hover_end(&self, id: &PoiId) -> bool {
        self.emit_hover(id, topics::POI_HOVER_END)
    }

    fn emit_hover(&self, id: &PoiId, topic: &str) -> bool {
        let name = {
            let state = self.state.borrow();
            state
                .entries
                .iter()
                .find(|e| &e.poi.id == id)
                .map(|e| e.poi.name.clone())
        };
        match name {
            Some(name) => {
                let _ = self.bus.publish_typed(
                    topic,
                    &PoiHover {
                        poi_id: id.clone(),
                        name,
                    },
                );
                true
            }
            None => {
                warn!(%id, topic, "hover: unknown POI id, ignoring");
                false
            }
        }
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// Snapshot of one POI by id.
    pub fn get(&self, id: &PoiId) -> Option<Poi> {
        self.state
            .borrow()
            .entries
            .iter()
            .find(|e| &e.poi.id == id)
            .map(|e| e.poi.clone())
    }

    /// When the POI was (last) registered.
    pub fn registered_at(&self, id: &PoiId) -> Option<DateTime<Utc>> {
        self.state
            .borrow()
            .entries
            .iter()
            .find(|e| &e.poi.id == id)
            .map(|e| e.registered_at)
    }

    /// All POIs matching a filter, in registration order.
    pub fn query(&self, filter: &PoiFilter) -> Vec<Poi> {
        self.state
            .borrow()
            .entries
            .iter()
            .filter(|e| filter.matches(&e.poi))
            .map(|e| e.poi.clone())
            .collect()
    }

    /// The POI closest to a point, optionally restricted by a filter.
    ///
    /// Linear scan over all entries. Ties are broken by registration
    /// order (first-encountered wins) -- this is an explicit contract,
    /// not an accident of iteration.
    pub fn closest_to(&self, x: f32, y: f32, filter: Option<&PoiFilter>) -> Option<Poi> {
        let from = Point::new(x, y);
        let state = self.state.borrow();
        let mut best: Option<(f32, &Entry)> = None;
        for entry in &state.entries {
            if filter.is_some_and(|f| !f.matches(&entry.poi)) {
                continue;
            }
            let dist = entry.poi.distance_to(from);
            // Strict comparison keeps the earlier-registered entry on ties.
            if best.is_none_or(|(best_dist, _)| dist < best_dist) {
                best = Some((dist, entry));
            }
        }
        best.map(|(_, entry)| entry.poi.clone())
    }

    /// Number of registered POIs.
    pub fn count(&self) -> usize {
        self.state.borrow().entries.len()
    }

    /// All POI ids in registration order.
    pub fn ids(&self) -> Vec<PoiId> {
        self.state
            .borrow()
            .entries
            .iter()
            .map(|e| e.poi.id.clone())
            .collect()
    }

    /// Last known player position, if any `player-moved` event arrived.
    pub fn player_position(&self) -> Option<Point> {
        self.state.borrow().player
    }

    // -------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------

    /// Advance the proximity scan.
    ///
    /// When the scan interval elapses and a player position is known,
    /// emits one `poi-proximity` event for *every* active POI within the
    /// radius -- a level signal, repeated every scan while the POI stays
    /// inside.
    pub fn update(&mut self, now_ms: f64) {
        if self.destroyed || !self.scan.poll(now_ms) {
            return;
        }
        let nearby: Vec<PoiProximity> = {
            let state = self.state.borrow();
            let Some(player) = state.player else {
                return;
            };
            state
                .entries
                .iter()
                .filter(|e| e.poi.is_active)
                .filter_map(|e| {
                    let distance = e.poi.distance_to(player);
                    (distance <= self.proximity_radius).then(|| PoiProximity {
                        poi_id: e.poi.id.clone(),
                        distance,
                    })
                })
                .collect()
        };
        for proximity in &nearby {
            let _ = self.bus.publish_typed(topics::POI_PROXIMITY, proximity);
        }
    }

    /// Tear the registry down: cancel the scan timer, drop the bus
    /// subscription, and free all entries. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.scan.cancel();
        if let Some(mut sub) = self.player_sub.take() {
            sub.unsubscribe();
        }
        self.state.borrow_mut().entries.clear();
        debug!("POI registry destroyed");
    }
}

impl core::fmt::Debug for PoiRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PoiRegistry")
            .field("count", &self.count())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}
