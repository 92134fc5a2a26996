//! The virtual joystick control.

use tracing::debug;

use concourse_bus::EventBus;
use concourse_types::payloads::{JoystickState, topics};
use concourse_types::{Point, Rect};

/// On-screen movement control occupying a reserved screen region.
///
/// The joystick captures the first pointer that presses inside its
/// region and owns that pointer until release; all other pointers pass
/// through to the camera. Deflection is the pointer's offset from the
/// press origin, normalized by the travel radius and clamped to the
/// unit disc, published as `joystick-state` on every change. The host
/// turns deflection into player movement; the engine never does.
#[derive(Debug, Clone)]
pub struct VirtualJoystick {
    bus: EventBus,
    region: Rect,
    max_radius: f32,
    /// Pointer currently driving the stick, with its press origin.
    captured: Option<(u64, Point)>,
    deflection: (f32, f32),
}

impl VirtualJoystick {
    /// Create a joystick over a reserved screen region.
    ///
    /// Non-positive travel radii are clamped to 1 so deflection math
    /// stays finite.
    pub fn new(bus: EventBus, region: Rect, max_radius: f32) -> Self {
        Self {
            bus,
            region,
            max_radius: max_radius.max(1.0),
            captured: None,
            deflection: (0.0, 0.0),
        }
    }

    /// The reserved screen region.
    pub const fn region(&self) -> Rect {
        self.region
    }

    /// Whether a pointer is currently driving the stick.
    pub const fn is_active(&self) -> bool {
        self.captured.is_some()
    }

    /// Current published state.
    pub const fn state(&self) -> JoystickState {
        JoystickState {
            active: self.captured.is_some(),
            dx: self.deflection.0,
            dy: self.deflection.1,
        }
    }

    /// Offer a pointer press. Returns whether the joystick captured it
    /// (pressed inside the region while the stick is free).
    pub fn try_pointer_down(&mut self, id: u64, position: Point) -> bool {
        if self.captured.is_some() || !self.region.contains(position) {
            return false;
        }
        debug!(id, "joystick captured pointer");
        self.captured = Some((id, position));
        self.deflection = (0.0, 0.0);
        self.emit();
        true
    }

    /// Feed a pointer move. Returns whether the joystick owns this
    /// pointer and consumed the move.
    pub fn pointer_move(&mut self, id: u64, position: Point) -> bool {
        let Some((owner, origin)) = self.captured else {
            return false;
        };
        if owner != id {
            return false;
        }
        let dx = (position.x - origin.x) / self.max_radius;
        let dy = (position.y - origin.y) / self.max_radius;
        let magnitude = dx.hypot(dy);
        self.deflection = if magnitude > 1.0 {
            (dx / magnitude, dy / magnitude)
        } else {
            (dx, dy)
        };
        self.emit();
        true
    }

    /// Feed a pointer release. Returns whether the joystick owned it;
    /// releasing recentres the stick and emits the inactive state.
    pub fn pointer_up(&mut self, id: u64) -> bool {
        match self.captured {
            Some((owner, _)) if owner == id => {
                self.captured = None;
                self.deflection = (0.0, 0.0);
                self.emit();
                true
            }
            _ => false,
        }
    }

    /// Release any captured pointer without emitting. Idempotent.
    pub fn reset(&mut self) {
        self.captured = None;
        self.deflection = (0.0, 0.0);
    }

    fn emit(&self) {
        let _ = self
            .bus
            .publish_typed(topics::JOYSTICK_STATE, &self.state());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use concourse_types::from_payload;
    use serde_json::Value;

    use super::*;

    fn joystick(bus: &EventBus) -> VirtualJoystick {
        VirtualJoystick::new(bus.clone(), Rect::new(0.0, 500.0, 200.0, 200.0), 50.0)
    }

    fn capture(bus: &EventBus) -> Rc<RefCell<Vec<Value>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = bus.subscribe(topics::JOYSTICK_STATE, move |payload| {
            sink.borrow_mut().push(payload.clone());
            Ok(())
        });
        seen
    }

    #[test]
    fn captures_only_inside_the_region() {
        let bus = EventBus::new();
        let mut stick = joystick(&bus);
        assert!(!stick.try_pointer_down(1, Point::new(300.0, 300.0)));
        assert!(stick.try_pointer_down(1, Point::new(100.0, 600.0)));
        assert!(stick.is_active());
    }

    #[test]
    fn second_pointer_is_refused_while_captured() {
        let bus = EventBus::new();
        let mut stick = joystick(&bus);
        assert!(stick.try_pointer_down(1, Point::new(100.0, 600.0)));
        assert!(!stick.try_pointer_down(2, Point::new(100.0, 600.0)));
    }

    #[test]
    fn deflection_is_normalized_and_clamped() {
        let bus = EventBus::new();
        let seen = capture(&bus);
        let mut stick = joystick(&bus);

        let _ = stick.try_pointer_down(1, Point::new(100.0, 600.0));
        // 25 units right of origin on a 50-unit radius: half deflection.
        assert!(stick.pointer_move(1, Point::new(125.0, 600.0)));
        assert_eq!(stick.state().dx, 0.5);
        assert_eq!(stick.state().dy, 0.0);

        // Far beyond the radius: clamped to the unit disc.
        let _ = stick.pointer_move(1, Point::new(400.0, 600.0));
        assert_eq!(stick.state().dx, 1.0);

        let last: JoystickState = from_payload(seen.borrow().last().unwrap()).unwrap();
        assert!(last.active);
        assert_eq!(last.dx, 1.0);
    }

    #[test]
    fn release_recentres_and_emits_inactive() {
        let bus = EventBus::new();
        let seen = capture(&bus);
        let mut stick = joystick(&bus);

        let _ = stick.try_pointer_down(1, Point::new(100.0, 600.0));
        let _ = stick.pointer_move(1, Point::new(150.0, 600.0));
        assert!(stick.pointer_up(1));
        assert!(!stick.is_active());

        let last: JoystickState = from_payload(seen.borrow().last().unwrap()).unwrap();
        assert!(!last.active);
        assert_eq!(last.dx, 0.0);
    }

    #[test]
    fn moves_from_foreign_pointers_are_ignored() {
        let bus = EventBus::new();
        let mut stick = joystick(&bus);
        let _ = stick.try_pointer_down(1, Point::new(100.0, 600.0));
        assert!(!stick.pointer_move(2, Point::new(0.0, 0.0)));
        assert!(!stick.pointer_up(2));
        assert!(stick.is_active());
    }
}
