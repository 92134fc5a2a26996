//! Eased zoom-and-centre animation.

use concourse_types::{Point, lerp};

/// An in-flight animation of zoom and centre over the virtual clock.
///
/// Both properties animate together along the same eased parameter, so a
/// zoom-to-point tween whose endpoints keep a world point stationary
/// drifts only fractionally mid-flight and lands exactly on target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTween {
    start_ms: f64,
    duration_ms: f64,
    from_zoom: f32,
    to_zoom: f32,
    from_center: Point,
    to_center: Point,
}

/// One sampled animation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenFrame {
    /// Zoom at the sampled time.
    pub zoom: f32,
    /// Centre at the sampled time.
    pub center: Point,
    /// True on and after the final frame.
    pub done: bool,
}

impl ZoomTween {
    /// Start a tween at `start_ms` lasting `duration_ms` (clamped ≥ 1).
    pub fn new(
        start_ms: f64,
        duration_ms: f64,
        from_zoom: f32,
        to_zoom: f32,
        from_center: Point,
        to_center: Point,
    ) -> Self {
        Self {
            start_ms,
            duration_ms: duration_ms.max(1.0),
            from_zoom,
            to_zoom,
            from_center,
            to_center,
        }
    }

    /// Sample the tween at the current virtual time.
    pub fn sample(&self, now_ms: f64) -> TweenFrame {
        let raw = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0);
        let eased = ease_in_out(to_f32(raw));
        TweenFrame {
            zoom: lerp(self.from_zoom, self.to_zoom, eased),
            center: Point::new(
                lerp(self.from_center.x, self.to_center.x, eased),
                lerp(self.from_center.y, self.to_center.y, eased),
            ),
            done: raw >= 1.0,
        }
    }

    /// Final zoom of the animation.
    pub const fn target_zoom(&self) -> f32 {
        self.to_zoom
    }

    /// Final centre of the animation.
    pub const fn target_center(&self) -> Point {
        self.to_center
    }
}

/// Smoothstep easing: slow in, slow out, exact at both ends.
const fn ease_in_out(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Narrow a clamped `[0, 1]` progress value to `f32`.
#[allow(clippy::cast_possible_truncation)] // input is clamped to [0, 1]
fn to_f32(t: f64) -> f32 {
    t.clamp(0.0, 1.0) as f32
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn tween() -> ZoomTween {
        ZoomTween::new(
            1000.0,
            300.0,
            1.0,
            2.0,
            Point::new(0.0, 0.0),
            Point::new(100.0, 50.0),
        )
    }

    #[test]
    fn endpoints_are_exact() {
        let t = tween();
        let start = t.sample(1000.0);
        assert_eq!(start.zoom, 1.0);
        assert_eq!(start.center, Point::new(0.0, 0.0));
        assert!(!start.done);

        let end = t.sample(1300.0);
        assert_eq!(end.zoom, 2.0);
        assert_eq!(end.center, Point::new(100.0, 50.0));
        assert!(end.done);
    }

    #[test]
    fn midpoint_is_halfway_and_eased_ends_are_slow() {
        let t = tween();
        let mid = t.sample(1150.0);
        assert!((mid.zoom - 1.5).abs() < 0.01);

        // Ease-in: the first tenth of the time covers well under a tenth
        // of the zoom range.
        let early = t.sample(1030.0);
        assert!(early.zoom - 1.0 < 0.05);
    }

    #[test]
    fn progress_is_monotonic() {
        let t = tween();
        let mut prev = t.sample(1000.0).zoom;
        let mut now = 1010.0;
        while now <= 1300.0 {
            let frame = t.sample(now);
            assert!(frame.zoom >= prev);
            prev = frame.zoom;
            now += 10.0;
        }
    }

    #[test]
    fn sampling_before_start_holds_the_origin() {
        let t = tween();
        let frame = t.sample(500.0);
        assert_eq!(frame.zoom, 1.0);
        assert!(!frame.done);
    }

    #[test]
    fn degenerate_duration_still_completes() {
        let t = ZoomTween::new(0.0, 0.0, 1.0, 2.0, Point::default(), Point::new(10.0, 0.0));
        let frame = t.sample(1.0);
        assert!(frame.done);
        assert_eq!(frame.zoom, 2.0);
    }
}
