//! The engine: component construction, wiring, and frame fan-out.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use concourse_bus::{EventBus, HandlerError, Subscription};
use concourse_camera::CameraController;
use concourse_nav::NavEngine;
use concourse_poi::PoiRegistry;
use concourse_presence::PresenceTracker;
use concourse_types::payloads::{AttendeeFocused, PlayerMoved, topics};
use concourse_types::{NavTarget, Point, PoiId, Uid, from_payload};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::joystick::VirtualJoystick;
use crate::preferences::Preferences;

/// The component container.
///
/// Owns the bus and every component, and carries the only cross-component
/// wiring in the system: `attendee-focused` events pan the camera, and
/// pointer input routes to the joystick inside its reserved region and to
/// the camera everywhere else. Components themselves never reference one
/// another; everything they share crosses the bus as plain data.
pub struct Engine {
    bus: EventBus,
    registry: PoiRegistry,
    presence: PresenceTracker,
    nav: NavEngine,
    camera: CameraController,
    joystick: Option<VirtualJoystick>,
    preferences: Preferences,
    /// Pan requests queued by the focus subscription, applied on update.
    focus_queue: Rc<RefCell<Vec<Point>>>,
    focus_sub: Option<Subscription>,
    share_location: bool,
    destroyed: bool,
}

impl Engine {
    /// Construct the bus and all components from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when any component rejects its section of
    /// the configuration.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let bus = EventBus::new();

        let joystick = config.joystick.enabled.then(|| {
            VirtualJoystick::new(
                bus.clone(),
                config.joystick.region(),
                config.joystick.max_radius,
            )
        });
        let reserved = joystick.as_ref().map(VirtualJoystick::region);

        let registry = PoiRegistry::new(bus.clone(), &config.poi.to_registry_config())?;
        let presence = PresenceTracker::new(bus.clone(), &config.presence.to_tracker_config())?;
        let nav = NavEngine::new(bus.clone(), &config.navigation.to_engine_config())?;
        let camera = CameraController::new(&config.camera.to_controller_config(reserved))?;

        let preferences = Preferences::from_map(config.preferences.clone());
        let share_location = preferences.share_location();

        // Focus requests land in a queue; the camera pan is applied on
        // the next update so no component is borrowed during dispatch.
        let focus_queue: Rc<RefCell<Vec<Point>>> = Rc::new(RefCell::new(Vec::new()));
        let queue = Rc::downgrade(&focus_queue);
        let focus_sub = bus.subscribe(topics::ATTENDEE_FOCUSED, move |payload| {
            let Some(queue) = queue.upgrade() else {
                return Ok(());
            };
            let focused: AttendeeFocused = from_payload(payload).map_err(HandlerError::failed)?;
            queue.borrow_mut().push(Point::new(focused.x, focused.y));
            Ok(())
        });

        info!(share_location, "engine ready");
        Ok(Self {
            bus,
            registry,
            presence,
            nav,
            camera,
            joystick,
            preferences,
            focus_queue,
            focus_sub: Some(focus_sub),
            share_location,
            destroyed: false,
        })
    }

    // -------------------------------------------------------------------
    // Component access
    // -------------------------------------------------------------------

    /// The shared event bus (external feeds publish into it).
    pub const fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The POI registry.
    pub const fn poi(&self) -> &PoiRegistry {
        &self.registry
    }

    /// The presence tracker.
    pub const fn presence(&self) -> &PresenceTracker {
        &self.presence
    }

    /// The presence tracker, mutably (focus needs the virtual clock).
    pub const fn presence_mut(&mut self) -> &mut PresenceTracker {
        &mut self.presence
    }

    /// The navigation engine.
    pub const fn navigation(&self) -> &NavEngine {
        &self.nav
    }

    /// The camera controller.
    pub const fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// The camera controller, mutably (direct manipulation).
    pub const fn camera_mut(&mut self) -> &mut CameraController {
        &mut self.camera
    }

    /// The virtual joystick, when enabled.
    pub const fn joystick(&self) -> Option<&VirtualJoystick> {
        self.joystick.as_ref()
    }

    /// Startup preferences.
    pub const fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// The `share_location` preference read at startup.
    pub const fn share_location(&self) -> bool {
        self.share_location
    }

    // -------------------------------------------------------------------
    // High-level operations
    // -------------------------------------------------------------------

    /// Report the local player's movement: publishes `player-moved` and
    /// points the camera follow at the new position.
    pub fn player_moved(&mut self, x: f32, y: f32, zone: Option<String>) {
        if self.destroyed {
            return;
        }
        let _ = self
            .bus
            .publish_typed(topics::PLAYER_MOVED, &PlayerMoved { x, y, zone });
        self.camera.set_follow_target(Some(Point::new(x, y)));
    }

    /// Start navigating to a POI by id, resolving it through the
    /// registry. A stale id (selection raced a removal) is a logged
    /// no-op. Returns whether navigation started.
    pub fn navigate_to_poi(&mut self, id: &PoiId) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(poi) = self.registry.get(id) else {
            warn!(%id, "navigate: POI no longer registered, ignoring");
            return false;
        };
        self.nav.navigate_to(NavTarget {
            poi_id: Some(poi.id),
            position: poi.position.point(),
            name: Some(poi.name),
        });
        true
    }

    /// Start navigating to a raw world position.
    pub fn navigate_to_point(&mut self, position: Point) {
        if self.destroyed {
            return;
        }
        self.nav.navigate_to(NavTarget {
            poi_id: None,
            position,
            name: None,
        });
    }

    /// Cancel the active navigation, if any.
    pub fn cancel_navigation(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.nav.cancel()
    }

    /// Focus an attendee marker: the tracker reveals the label and the
    /// resulting `attendee-focused` event pans the camera on the next
    /// update. Returns whether the marker existed.
    pub fn focus_attendee(&mut self, now_ms: f64, uid: &Uid) -> bool {
        if self.destroyed {
            return false;
        }
        self.presence.focus_on(now_ms, uid)
    }

    // -------------------------------------------------------------------
    // Pointer routing
    // -------------------------------------------------------------------

    /// Route a pointer press: the joystick claims presses inside its
    /// reserved region, everything else goes to the camera.
    pub fn pointer_down(&mut self, id: u64, position: Point) {
        if self.destroyed {
            return;
        }
        if let Some(stick) = self.joystick.as_mut() {
            if stick.try_pointer_down(id, position) {
                return;
            }
        }
        let _ = self.camera.pointer_down(id, position);
    }

    /// Route a pointer move to whichever control owns the pointer.
    pub fn pointer_move(&mut self, id: u64, position: Point) {
        if self.destroyed {
            return;
        }
        if let Some(stick) = self.joystick.as_mut() {
            if stick.pointer_move(id, position) {
                return;
            }
        }
        self.camera.pointer_move(id, position);
    }

    /// Route a pointer release.
    pub fn pointer_up(&mut self, id: u64) {
        if self.destroyed {
            return;
        }
        if let Some(stick) = self.joystick.as_mut() {
            if stick.pointer_up(id) {
                return;
            }
        }
        self.camera.pointer_up(id);
    }

    // -------------------------------------------------------------------
    // Frame fan-out
    // -------------------------------------------------------------------

    /// Per-frame update from the host render loop.
    ///
    /// `delta_ms` is part of the host contract but unused: every
    /// periodic behaviour anchors on the absolute virtual clock.
    pub fn update(&mut self, now_ms: f64, _delta_ms: f64) {
        if self.destroyed {
            return;
        }

        // Apply queued focus pans before the camera's own update.
        let pans = core::mem::take(&mut *self.focus_queue.borrow_mut());
        if let Some(point) = pans.last() {
            self.camera.pan_to(*point);
        }

        self.registry.update(now_ms);
        self.presence.update(now_ms);
        self.nav.update(now_ms);
        self.camera.update(now_ms);
    }

    /// Tear everything down: components first, then the engine's own
    /// subscription. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.registry.destroy();
        self.presence.destroy();
        self.nav.destroy();
        self.camera.destroy();
        if let Some(stick) = self.joystick.as_mut() {
            stick.reset();
        }
        if let Some(mut sub) = self.focus_sub.take() {
            sub.unsubscribe();
        }
        self.focus_queue.borrow_mut().clear();
        debug!("engine destroyed");
    }
}

impl core::fmt::Debug for Engine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("share_location", &self.share_location)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use concourse_types::payloads::PresenceSnapshot;
    use concourse_types::{Poi, PoiType, PresenceRecord, PresenceStatus, to_payload};

    use super::*;

    fn engine() -> Engine {
        Engine::new(&EngineConfig::default()).unwrap()
    }

    fn push_presence(bus: &EventBus, uids: &[&str]) {
        let users = uids
            .iter()
            .map(|uid| PresenceRecord {
                uid: Uid::new(*uid),
                display_name: (*uid).to_owned(),
                zone: "hall".to_owned(),
                status: PresenceStatus::Active,
            })
            .collect();
        let payload = to_payload(&PresenceSnapshot { users }).unwrap();
        let _ = bus.publish(topics::PRESENCE_UPDATE, &payload);
    }

    #[test]
    fn construction_from_defaults_succeeds() {
        let engine = engine();
        assert!(engine.share_location());
        assert!(engine.joystick().is_some());
        assert_eq!(engine.poi().count(), 0);
    }

    #[test]
    fn share_location_preference_is_read_once_at_startup() {
        let mut config = EngineConfig::default();
        let _ = config
            .preferences
            .insert("share_location".to_owned(), "false".to_owned());
        let engine = Engine::new(&config).unwrap();
        assert!(!engine.share_location());
    }

    #[test]
    fn focus_pans_the_camera_on_the_next_update() {
        let mut engine = engine();
        push_presence(&engine.bus().clone(), &["ada"]);
        let marker = engine.presence().marker(&Uid::new("ada")).unwrap();

        assert!(engine.focus_attendee(0.0, &Uid::new("ada")));
        engine.update(16.0, 16.0);
        assert_eq!(engine.camera().center(), marker.position);
    }

    #[test]
    fn navigate_to_poi_resolves_through_the_registry() {
        let mut engine = engine();
        engine
            .poi()
            .register(Poi::new("cafe", PoiType::Food, "Cafe", 40.0, 60.0))
            .unwrap();

        assert!(engine.navigate_to_poi(&PoiId::new("cafe")));
        let target = engine.navigation().target().unwrap();
        assert_eq!(target.position, Point::new(40.0, 60.0));
        assert_eq!(target.name.as_deref(), Some("Cafe"));
    }

    #[test]
    fn navigate_to_stale_poi_is_a_noop() {
        let mut engine = engine();
        assert!(!engine.navigate_to_poi(&PoiId::new("gone")));
        assert!(engine.navigation().state().is_idle());
    }

    #[test]
    fn player_moved_feeds_the_bus_and_the_follow_target() {
        let mut engine = engine();
        engine.navigate_to_point(Point::new(500.0, 0.0));
        engine.player_moved(10.0, 20.0, None);

        // The navigation engine saw the position through the bus.
        assert_eq!(
            engine.navigation().player_position(),
            Some(Point::new(10.0, 20.0))
        );
        assert_eq!(
            engine.camera().follow_target(),
            Some(Point::new(10.0, 20.0))
        );
    }

    #[test]
    fn pointer_in_joystick_region_never_reaches_the_camera() {
        let mut engine = engine();
        // Default joystick region starts at (20, 520).
        engine.pointer_down(1, Point::new(50.0, 600.0));
        assert!(engine.joystick().unwrap().is_active());
        assert!(!engine.camera().is_pinching());

        engine.pointer_down(2, Point::new(400.0, 100.0));
        engine.pointer_up(1);
        assert!(!engine.joystick().unwrap().is_active());
    }

    #[test]
    fn two_free_pointers_pinch_the_camera() {
        let mut engine = engine();
        engine.pointer_down(1, Point::new(300.0, 100.0));
        engine.pointer_down(2, Point::new(400.0, 100.0));
        assert!(engine.camera().is_pinching());

        engine.pointer_move(2, Point::new(500.0, 100.0));
        assert!(engine.camera().zoom() > 1.0);
    }

    #[test]
    fn destroy_is_idempotent_and_clears_all_subscriptions() {
        let mut engine = engine();
        let bus = engine.bus().clone();
        engine.destroy();
        engine.destroy();

        assert_eq!(bus.subscriber_count(topics::PLAYER_MOVED), 0);
        assert_eq!(bus.subscriber_count(topics::PRESENCE_UPDATE), 0);
        assert_eq!(bus.subscriber_count(topics::ATTENDEE_FOCUSED), 0);

        // Post-destroy operations are inert.
        assert!(!engine.navigate_to_poi(&PoiId::new("x")));
        engine.player_moved(1.0, 1.0, None);
        engine.update(100.0, 16.0);
    }
}
