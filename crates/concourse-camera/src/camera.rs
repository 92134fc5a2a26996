//! The camera controller.

use tracing::debug;

use concourse_types::{Point, Rect, lerp};

use crate::error::CameraError;
use crate::pinch::PinchTracker;
use crate::tween::ZoomTween;

/// Rectangular region, centred on the camera, within which a followed
/// target can move without dragging the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadZone {
    /// Width of the region in world units.
    pub width: f32,
    /// Height of the region in world units.
    pub height: f32,
}

/// Tunables for the camera controller.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Lower zoom bound.
    pub min_zoom: f32,
    /// Upper zoom bound.
    pub max_zoom: f32,
    /// Increment applied by `zoom_in` / `zoom_out`.
    pub zoom_step: f32,
    /// Starting zoom (clamped into the bounds).
    pub initial_zoom: f32,
    /// Starting centre in world space.
    pub initial_center: Point,
    /// Per-update fraction of the remaining distance the follow covers,
    /// in `(0, 1]`. `1.0` snaps.
    pub follow_smoothing: f32,
    /// Follow dead-zone; `None` follows every movement.
    pub follow_dead_zone: Option<DeadZone>,
    /// Pinch distance delta below which zoom does not change.
    pub pinch_dead_zone: f32,
    /// Screen region whose pointers never participate in pinch (the
    /// virtual joystick owns it).
    pub reserved_region: Option<Rect>,
    /// Duration of the zoom-to-point animation.
    pub zoom_tween_ms: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.5,
            max_zoom: 3.0,
            zoom_step: 0.25,
            initial_zoom: 1.0,
            initial_center: Point::new(0.0, 0.0),
            follow_smoothing: 0.15,
            follow_dead_zone: Some(DeadZone {
                width: 80.0,
                height: 60.0,
            }),
            pinch_dead_zone: 8.0,
            reserved_region: None,
            zoom_tween_ms: 300.0,
        }
    }
}

/// The viewport camera: a world-space centre and a zoom factor.
///
/// Direct manipulation (steps, pan, pinch) interrupts any running
/// zoom-to-point animation; the follow target, if set, reasserts itself
/// on the next update once no animation is running.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraController {
    center: Point,
    zoom: f32,
    min_zoom: f32,
    max_zoom: f32,
    zoom_step: f32,
    follow_target: Option<Point>,
    follow_smoothing: f32,
    follow_dead_zone: Option<DeadZone>,
    pinch: PinchTracker,
    reserved_region: Option<Rect>,
    tween: Option<ZoomTween>,
    zoom_tween_ms: f64,
    destroyed: bool,
}

impl CameraController {
    /// Create a camera controller.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::InvalidConfig`] when the zoom bounds are
    /// not `0 < min <= max`, the step is non-positive, or the follow
    /// smoothing is outside `(0, 1]`.
    pub fn new(config: &CameraConfig) -> Result<Self, CameraError> {
        if !(config.min_zoom.is_finite()
            && config.max_zoom.is_finite()
            && config.min_zoom > 0.0
            && config.min_zoom <= config.max_zoom)
        {
            return Err(CameraError::InvalidConfig {
                reason: format!(
                    "zoom bounds must satisfy 0 < min <= max, got [{}, {}]",
                    config.min_zoom, config.max_zoom
                ),
            });
        }
        if !(config.zoom_step.is_finite() && config.zoom_step > 0.0) {
            return Err(CameraError::InvalidConfig {
                reason: "zoom_step must be positive and finite".to_owned(),
            });
        }
        if !(config.follow_smoothing > 0.0 && config.follow_smoothing <= 1.0) {
            return Err(CameraError::InvalidConfig {
                reason: "follow_smoothing must be in (0, 1]".to_owned(),
            });
        }

        Ok(Self {
            center: config.initial_center,
            zoom: config.initial_zoom.clamp(config.min_zoom, config.max_zoom),
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_step: config.zoom_step,
            follow_target: None,
            follow_smoothing: config.follow_smoothing,
            follow_dead_zone: config.follow_dead_zone,
            pinch: PinchTracker::new(config.pinch_dead_zone),
            reserved_region: config.reserved_region,
            tween: None,
            zoom_tween_ms: config.zoom_tween_ms,
            destroyed: false,
        })
    }

    /// Current zoom factor.
    pub const fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Current world-space centre.
    pub const fn center(&self) -> Point {
        self.center
    }

    /// Whether a zoom-to-point animation is running.
    pub const fn is_tweening(&self) -> bool {
        self.tween.is_some()
    }

    // -------------------------------------------------------------------
    // Direct manipulation
    // -------------------------------------------------------------------

    /// Set the zoom, clamped into the configured bounds. Interrupts any
    /// running animation.
    pub fn set_zoom(&mut self, zoom: f32) {
        if self.destroyed {
            return;
        }
        self.tween = None;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Step the zoom in by one increment.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + self.zoom_step);
    }

    /// Step the zoom out by one increment.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - self.zoom_step);
    }

    /// Move the centre by a world-space delta. Interrupts any animation.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        if self.destroyed {
            return;
        }
        self.tween = None;
        self.center = Point::new(self.center.x + dx, self.center.y + dy);
    }

    /// Move the centre to a world-space point. Interrupts any animation.
    pub fn pan_to(&mut self, point: Point) {
        if self.destroyed {
            return;
        }
        self.tween = None;
        self.center = point;
    }

    // -------------------------------------------------------------------
    // Follow
    // -------------------------------------------------------------------

    /// Set or clear the followed world position. The camera glides
    /// toward it on each update, subject to the dead-zone.
    pub fn set_follow_target(&mut self, target: Option<Point>) {
        self.follow_target = target;
    }

    /// The followed world position, if any.
    pub const fn follow_target(&self) -> Option<Point> {
        self.follow_target
    }

    // -------------------------------------------------------------------
    // Pointers (pinch)
    // -------------------------------------------------------------------

    /// Feed a pointer press. Pointers inside the reserved region are
    /// ignored entirely; returns whether the camera took the pointer.
    pub fn pointer_down(&mut self, id: u64, position: Point) -> bool {
        if self.destroyed {
            return false;
        }
        if let Some(region) = self.reserved_region {
            if region.contains(position) {
                return false;
            }
        }
        self.pinch.pointer_down(id, position, self.zoom);
        true
    }

    /// Feed a pointer move. An active pinch whose distance delta clears
    /// the dead-zone adjusts the zoom (clamped) and interrupts any
    /// running animation.
    pub fn pointer_move(&mut self, id: u64, position: Point) {
        if self.destroyed {
            return;
        }
        if let Some(proposed) = self.pinch.pointer_move(id, position) {
            self.tween = None;
            self.zoom = proposed.clamp(self.min_zoom, self.max_zoom);
        }
    }

    /// Feed a pointer release. Dropping below two pointers ends the
    /// pinch; the zoom keeps its last value.
    pub fn pointer_up(&mut self, id: u64) {
        if self.destroyed {
            return;
        }
        self.pinch.pointer_up(id, self.zoom);
    }

    /// Whether a pinch gesture is in progress.
    pub const fn is_pinching(&self) -> bool {
        self.pinch.is_pinching()
    }

    // -------------------------------------------------------------------
    // Animation
    // -------------------------------------------------------------------

    /// Animate to `target_zoom` (clamped) while keeping `world_point` at
    /// the same screen position, over the configured tween duration.
    pub fn zoom_to_point(&mut self, now_ms: f64, world_point: Point, target_zoom: f32) {
        if self.destroyed {
            return;
        }
        let to_zoom = target_zoom.clamp(self.min_zoom, self.max_zoom);
        // Screen position of p is (p - center) * zoom + viewport offset;
        // holding it fixed across the zoom change pins the new centre to
        // c1 = p - (p - c0) * z0 / z1.
        let scale = self.zoom / to_zoom;
        let to_center = Point::new(
            world_point.x - (world_point.x - self.center.x) * scale,
            world_point.y - (world_point.y - self.center.y) * scale,
        );
        debug!(zoom = to_zoom, "zoom-to-point animation started");
        self.tween = Some(ZoomTween::new(
            now_ms,
            self.zoom_tween_ms,
            self.zoom,
            to_zoom,
            self.center,
            to_center,
        ));
    }

    /// Advance the animation or the follow glide for this frame.
    pub fn update(&mut self, now_ms: f64) {
        if self.destroyed {
            return;
        }

        if let Some(tween) = self.tween {
            let frame = tween.sample(now_ms);
            self.zoom = frame.zoom;
            self.center = frame.center;
            if frame.done {
                self.tween = None;
            }
            return; // animation overrides follow until it lands
        }

        if let Some(target) = self.follow_target {
            if let Some(zone) = self.follow_dead_zone {
                let rect = Rect::centered_on(self.center, zone.width, zone.height);
                if rect.contains(target) {
                    return;
                }
            }
            self.center = Point::new(
                lerp(self.center.x, target.x, self.follow_smoothing),
                lerp(self.center.y, target.y, self.follow_smoothing),
            );
        }
    }

    /// Tear the camera down: drop the animation, the follow target, and
    /// all tracked pointers. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.tween = None;
        self.follow_target = None;
        self.pinch.reset();
        debug!("camera controller destroyed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn camera() -> CameraController {
        CameraController::new(&CameraConfig::default()).unwrap()
    }

    #[test]
    fn zoom_steps_clamp_at_both_bounds() {
        let mut cam = camera();
        for _ in 0..20 {
            cam.zoom_in();
        }
        assert_eq!(cam.zoom(), 3.0);
        for _ in 0..40 {
            cam.zoom_out();
        }
        assert_eq!(cam.zoom(), 0.5);
    }

    #[test]
    fn set_zoom_clamps_directly() {
        let mut cam = camera();
        cam.set_zoom(99.0);
        assert_eq!(cam.zoom(), 3.0);
        cam.set_zoom(0.01);
        assert_eq!(cam.zoom(), 0.5);
    }

    #[test]
    fn pan_moves_the_center() {
        let mut cam = camera();
        cam.pan_by(10.0, -5.0);
        assert_eq!(cam.center(), Point::new(10.0, -5.0));
        cam.pan_to(Point::new(100.0, 200.0));
        assert_eq!(cam.center(), Point::new(100.0, 200.0));
    }

    #[test]
    fn follow_glides_toward_the_target() {
        let mut cam = CameraController::new(&CameraConfig {
            follow_dead_zone: None,
            follow_smoothing: 0.5,
            ..CameraConfig::default()
        })
        .unwrap();

        cam.set_follow_target(Some(Point::new(100.0, 0.0)));
        cam.update(0.0);
        assert_eq!(cam.center(), Point::new(50.0, 0.0));
        cam.update(16.0);
        assert_eq!(cam.center(), Point::new(75.0, 0.0));
    }

    #[test]
    fn follow_ignores_movement_inside_the_dead_zone() {
        let mut cam = CameraController::new(&CameraConfig {
            follow_dead_zone: Some(DeadZone {
                width: 80.0,
                height: 60.0,
            }),
            ..CameraConfig::default()
        })
        .unwrap();

        cam.set_follow_target(Some(Point::new(30.0, 20.0))); // inside 80x60
        cam.update(0.0);
        assert_eq!(cam.center(), Point::new(0.0, 0.0));

        cam.set_follow_target(Some(Point::new(100.0, 0.0))); // outside
        cam.update(16.0);
        assert!(cam.center().x > 0.0);
    }

    #[test]
    fn pinch_spread_zooms_in_with_clamp() {
        let mut cam = camera();
        cam.set_zoom(2.0);
        assert!(cam.pointer_down(1, Point::new(0.0, 0.0)));
        assert!(cam.pointer_down(2, Point::new(100.0, 0.0)));
        assert!(cam.is_pinching());

        // Doubling the span proposes 4.0; the 3.0 bound clamps it.
        cam.pointer_move(2, Point::new(200.0, 0.0));
        assert_eq!(cam.zoom(), 3.0);
    }

    #[test]
    fn pinch_within_dead_zone_leaves_zoom_unchanged() {
        let mut cam = camera();
        let _ = cam.pointer_down(1, Point::new(0.0, 0.0));
        let _ = cam.pointer_down(2, Point::new(100.0, 0.0));
        cam.pointer_move(2, Point::new(105.0, 0.0)); // within the 8-unit dead-zone
        assert_eq!(cam.zoom(), 1.0);
    }

    #[test]
    fn pointers_in_the_reserved_region_never_pinch() {
        let mut cam = CameraController::new(&CameraConfig {
            reserved_region: Some(Rect::new(0.0, 500.0, 200.0, 200.0)),
            ..CameraConfig::default()
        })
        .unwrap();

        assert!(!cam.pointer_down(1, Point::new(50.0, 600.0))); // joystick area
        assert!(cam.pointer_down(2, Point::new(400.0, 100.0)));
        assert!(!cam.is_pinching());
    }

    #[test]
    fn lifting_a_pointer_ends_the_pinch_and_keeps_the_zoom() {
        let mut cam = camera();
        let _ = cam.pointer_down(1, Point::new(0.0, 0.0));
        let _ = cam.pointer_down(2, Point::new(100.0, 0.0));
        cam.pointer_move(2, Point::new(150.0, 0.0));
        let reached = cam.zoom();
        assert!(reached > 1.0);

        cam.pointer_up(2);
        assert!(!cam.is_pinching());
        cam.pointer_move(1, Point::new(500.0, 0.0));
        assert_eq!(cam.zoom(), reached);
    }

    #[test]
    fn zoom_to_point_lands_exactly_and_keeps_the_point_fixed() {
        let mut cam = camera();
        let focus = Point::new(80.0, 60.0);
        let screen_before = Point::new(
            (focus.x - cam.center().x) * cam.zoom(),
            (focus.y - cam.center().y) * cam.zoom(),
        );

        cam.zoom_to_point(0.0, focus, 2.0);
        assert!(cam.is_tweening());
        cam.update(150.0);
        cam.update(300.0);

        assert!(!cam.is_tweening());
        assert_eq!(cam.zoom(), 2.0);
        let screen_after = Point::new(
            (focus.x - cam.center().x) * cam.zoom(),
            (focus.y - cam.center().y) * cam.zoom(),
        );
        assert!((screen_after.x - screen_before.x).abs() < 0.001);
        assert!((screen_after.y - screen_before.y).abs() < 0.001);
    }

    #[test]
    fn manual_zoom_interrupts_the_animation() {
        let mut cam = camera();
        cam.zoom_to_point(0.0, Point::new(100.0, 100.0), 2.0);
        cam.update(100.0);
        cam.set_zoom(1.5);
        assert!(!cam.is_tweening());
        let zoom = cam.zoom();
        cam.update(200.0); // the abandoned tween must not reassert
        assert_eq!(cam.zoom(), zoom);
    }

    #[test]
    fn destroy_mid_animation_freezes_the_camera() {
        let mut cam = camera();
        cam.set_follow_target(Some(Point::new(500.0, 500.0)));
        cam.zoom_to_point(0.0, Point::new(100.0, 100.0), 2.5);
        cam.update(100.0);
        let (zoom, center) = (cam.zoom(), cam.center());

        cam.destroy();
        cam.destroy();
        cam.update(300.0);
        cam.zoom_in();
        cam.pan_by(10.0, 10.0);

        assert_eq!(cam.zoom(), zoom);
        assert_eq!(cam.center(), center);
    }

    #[test]
    fn invalid_bounds_rejected() {
        let config = CameraConfig {
            min_zoom: 2.0,
            max_zoom: 1.0,
            ..CameraConfig::default()
        };
        assert!(CameraController::new(&config).is_err());
    }

    #[test]
    fn initial_zoom_is_clamped_into_bounds() {
        let cam = CameraController::new(&CameraConfig {
            initial_zoom: 10.0,
            ..CameraConfig::default()
        })
        .unwrap();
        assert_eq!(cam.zoom(), 3.0);
    }
}
