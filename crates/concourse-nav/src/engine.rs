//! The bus-connected navigation engine component.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use concourse_bus::{EventBus, HandlerError, Subscription};
use concourse_types::payloads::{
    NavigationArrived, NavigationCancelled, NavigationStarted, NavigationUpdate, PlayerMoved,
    topics,
};
use concourse_types::{Compass, Interval, NavTarget, OneShot, Point, bearing_deg, distance, from_payload};

use crate::error::NavError;
use crate::state::NavState;

/// Tunables for the navigation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct NavEngineConfig {
    /// Distance at or below which the player counts as arrived.
    pub arrival_threshold: f32,
    /// Period of the progress tick emitting `navigation-update`.
    pub progress_interval_ms: f64,
    /// Delay after arrival before the automatic reset to Idle.
    pub arrival_grace_ms: f64,
}

impl Default for NavEngineConfig {
    fn default() -> Self {
        Self {
            arrival_threshold: 30.0,
            progress_interval_ms: 100.0,
            arrival_grace_ms: 5000.0,
        }
    }
}

/// The navigation engine component.
///
/// Holds at most one destination; setting a new one replaces the old
/// without a cancel event. All events are emitted from the progress
/// tick or from explicit method calls, never from inside the
/// `player-moved` subscription.
pub struct NavEngine {
    bus: EventBus,
    /// Latest player position, written by the `player-moved` subscription.
    player: Rc<RefCell<Option<Point>>>,
    player_sub: Option<Subscription>,
    state: NavState,
    progress: Interval,
    grace: OneShot,
    arrival_threshold: f32,
    arrival_grace_ms: f64,
    destroyed: bool,
}

impl NavEngine {
    /// Create a navigation engine subscribed to the player feed.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::InvalidConfig`] on a non-positive threshold,
    /// progress interval, or grace delay.
    pub fn new(bus: EventBus, config: &NavEngineConfig) -> Result<Self, NavError> {
        if !(config.arrival_threshold.is_finite() && config.arrival_threshold > 0.0) {
            return Err(NavError::InvalidConfig {
                reason: "arrival_threshold must be positive and finite".to_owned(),
            });
        }
        if !(config.progress_interval_ms.is_finite() && config.progress_interval_ms > 0.0)
            || !(config.arrival_grace_ms.is_finite() && config.arrival_grace_ms > 0.0)
        {
            return Err(NavError::InvalidConfig {
                reason: "progress interval and grace delay must be positive and finite".to_owned(),
            });
        }

        let player = Rc::new(RefCell::new(None));
        let slot = Rc::downgrade(&player);
        let player_sub = bus.subscribe(topics::PLAYER_MOVED, move |payload| {
            let Some(slot) = slot.upgrade() else {
                return Ok(());
            };
            let moved: PlayerMoved = from_payload(payload).map_err(HandlerError::failed)?;
            *slot.borrow_mut() = Some(Point::new(moved.x, moved.y));
            Ok(())
        });

        Ok(Self {
            bus,
            player,
            player_sub: Some(player_sub),
            state: NavState::Idle,
            progress: Interval::new(config.progress_interval_ms),
            grace: OneShot::new(),
            arrival_threshold: config.arrival_threshold,
            arrival_grace_ms: config.arrival_grace_ms,
            destroyed: false,
        })
    }

    /// Current state of the machine.
    pub const fn state(&self) -> &NavState {
        &self.state
    }

    /// The active target, if any.
    pub const fn target(&self) -> Option<&NavTarget> {
        self.state.target()
    }

    /// Latest known player position.
    pub fn player_position(&self) -> Option<Point> {
        *self.player.borrow()
    }

    /// Start navigating toward a target, replacing any current one.
    ///
    /// Replacement is silent: no `navigation-cancelled` is emitted for
    /// the displaced target, only `navigation-started` for the new one.
    /// A pending post-arrival reset is abandoned.
    pub fn navigate_to(&mut self, target: NavTarget) {
        if self.destroyed {
            return;
        }
        self.grace.cancel();
        info!(target = %describe(&target), "navigation started");
        self.state = NavState::Navigating {
            target: target.clone(),
        };
        let _ = self
            .bus
            .publish_typed(topics::NAVIGATION_STARTED, &NavigationStarted { target });
    }

    /// Cancel the current navigation, if any.
    ///
    /// Emits `navigation-cancelled` with `auto: false` and returns to
    /// Idle. A cancel from Idle is a silent no-op. Returns whether a
    /// target was actually cancelled.
    pub fn cancel(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        let previous = core::mem::replace(&mut self.state, NavState::Idle);
        let Some(target) = previous.target().cloned() else {
            return false;
        };
        self.grace.cancel();
        info!(target = %describe(&target), "navigation cancelled");
        let _ = self.bus.publish_typed(
            topics::NAVIGATION_CANCELLED,
            &NavigationCancelled {
                target,
                auto: false,
            },
        );
        true
    }

    /// Drive the progress tick and the post-arrival grace delay.
    pub fn update(&mut self, now_ms: f64) {
        if self.destroyed {
            return;
        }

        if self.progress.poll(now_ms) {
            self.progress_tick(now_ms);
        }

        if self.grace.poll(now_ms) {
            let previous = core::mem::replace(&mut self.state, NavState::Idle);
            if let NavState::Arrived { target } = previous {
                debug!(target = %describe(&target), "arrival grace elapsed, resetting");
                let _ = self.bus.publish_typed(
                    topics::NAVIGATION_CANCELLED,
                    &NavigationCancelled { target, auto: true },
                );
            }
        }
    }

    /// One progress tick: emit the level signal and detect arrival.
    fn progress_tick(&mut self, now_ms: f64) {
        let Some(target) = self.state.target().cloned() else {
            return;
        };
        // Guidance needs both endpoints; without a player fix, stay quiet.
        let Some(player) = *self.player.borrow() else {
            return;
        };

        let dist = distance(player, target.position);
        let bearing = bearing_deg(player, target.position);
        let _ = self.bus.publish_typed(
            topics::NAVIGATION_UPDATE,
            &NavigationUpdate {
                distance: dist,
                bearing_deg: bearing,
                compass: Compass::from_bearing_deg(bearing),
            },
        );

        // Edge-triggered: only the Navigating -> Arrived transition emits.
        if self.state.is_navigating() && dist <= self.arrival_threshold {
            info!(target = %describe(&target), distance = dist, "arrived");
            self.state = NavState::Arrived {
                target: target.clone(),
            };
            self.grace.schedule(now_ms, self.arrival_grace_ms);
            let _ = self
                .bus
                .publish_typed(topics::NAVIGATION_ARRIVED, &NavigationArrived { target });
        }
    }

    /// Tear the engine down: cancel timers, drop the subscription,
    /// return to Idle without emitting. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.progress.cancel();
        self.grace.cancel();
        self.state = NavState::Idle;
        if let Some(mut sub) = self.player_sub.take() {
            sub.unsubscribe();
        }
        debug!("navigation engine destroyed");
    }
}

impl core::fmt::Debug for NavEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NavEngine")
            .field("state", &self.state)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

/// Short display form of a target for log lines.
fn describe(target: &NavTarget) -> String {
    match (&target.poi_id, &target.name) {
        (Some(id), _) => id.to_string(),
        (None, Some(name)) => name.clone(),
        (None, None) => format!("({}, {})", target.position.x, target.position.y),
    }
}
