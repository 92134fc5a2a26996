//! 2D geometry in screen-space coordinates.
//!
//! All positions use the screen convention: `x` grows rightward, `y`
//! grows *downward*. Bearing angles follow from `atan2(dy, dx)`, so
//! 0 degrees points east and 90 degrees points south.
//!
//! The 8-point compass divides the bearing circle into eight 45-degree
//! buckets centred on the cardinal and intercardinal directions, so the
//! east bucket covers `[-22.5, 22.5)` and so on around the circle.

use serde::{Deserialize, Serialize};

/// A point (or vector) in 2D world or screen space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, growing rightward.
    pub x: f32,
    /// Vertical coordinate, growing downward.
    pub y: f32,
}

impl Point {
    /// Create a point from coordinates.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Self) -> f32 {
        distance(self, other)
    }
}

/// An axis-aligned rectangle defined by its top-left corner and size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width (non-negative).
    pub width: f32,
    /// Height (non-negative).
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle of the given size centred on a point.
    pub fn centered_on(center: Point, width: f32, height: f32) -> Self {
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    /// Check whether a point lies inside this rectangle (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx.hypot(dy)
}

/// Bearing from one point to another, in degrees normalized to `[0, 360)`.
///
/// Screen-space y-down convention: 0 = east, 90 = south, 180 = west,
/// 270 = north.
pub fn bearing_deg(from: Point, to: Point) -> f32 {
    let dy = to.y - from.y;
    let dx = to.x - from.x;
    dy.atan2(dx).to_degrees().rem_euclid(360.0)
}

/// Linear interpolation between two scalars. `t` is clamped to `[0, 1]`.
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    from + (to - from) * t
}

/// The 8-point compass rose in screen-space convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Compass {
    /// North (bearing near 270 degrees in y-down space).
    N,
    /// North-east.
    NE,
    /// East (bearing near 0 degrees).
    E,
    /// South-east.
    SE,
    /// South (bearing near 90 degrees in y-down space).
    S,
    /// South-west.
    SW,
    /// West (bearing near 180 degrees).
    W,
    /// North-west.
    NW,
}

impl Compass {
    /// Map a bearing in degrees to its 45-degree compass bucket.
    ///
    /// Each bucket is centred on its direction: east covers bearings in
    /// `[337.5, 360) ∪ [0, 22.5)`, south-east covers `[22.5, 67.5)`, and
    /// so on. Any finite input is accepted; the bearing is normalized
    /// into `[0, 360)` first.
    pub fn from_bearing_deg(bearing: f32) -> Self {
        let deg = bearing.rem_euclid(360.0);
        if deg < 22.5 {
            Self::E
        } else if deg < 67.5 {
            Self::SE
        } else if deg < 112.5 {
            Self::S
        } else if deg < 157.5 {
            Self::SW
        } else if deg < 202.5 {
            Self::W
        } else if deg < 247.5 {
            Self::NW
        } else if deg < 292.5 {
            Self::N
        } else if deg < 337.5 {
            Self::NE
        } else {
            Self::E
        }
    }

    /// Return the display label for this direction.
    pub const fn label(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }
}

impl core::fmt::Display for Compass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.label())
    }
}
