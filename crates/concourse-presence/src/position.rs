//! Deterministic marker placement.
//!
//! The presence feed carries status only -- no coordinates -- so marker
//! positions are derived from identity: the uid is hashed and the hash
//! drives a `xorshift64` generator that yields a stable (angle, distance)
//! pair on a ring around the venue centre. Repeated derivations for the
//! same uid are identical, so markers do not jump between snapshots.
//!
//! The derivation is a stand-in for real position data and is isolated
//! behind [`PositionSource`]; swapping in a real feed touches nothing in
//! the clustering or marker logic.

use concourse_types::{Point, Uid};

/// Source of marker positions keyed by identity.
pub trait PositionSource {
    /// Return the world position for a uid. Must be pure: the same uid
    /// always maps to the same point.
    fn position_for(&self, uid: &Uid) -> Point;
}

/// Hash-based [`PositionSource`] placing markers on an annulus.
#[derive(Debug, Clone, PartialEq)]
pub struct HashPositionSource {
    /// Centre of the placement ring.
    center: Point,
    /// Inner ring radius.
    min_radius: f32,
    /// Outer ring radius.
    max_radius: f32,
}

impl HashPositionSource {
    /// Create a placement source for a ring around `center`.
    ///
    /// Radii are ordered automatically; negative values are clamped to 0.
    pub fn new(center: Point, min_radius: f32, max_radius: f32) -> Self {
        let lo = min_radius.max(0.0);
        let hi = max_radius.max(0.0);
        Self {
            center,
            min_radius: lo.min(hi),
            max_radius: lo.max(hi),
        }
    }
}

impl PositionSource for HashPositionSource {
    fn position_for(&self, uid: &Uid) -> Point {
        let mut state = fnv1a(uid.as_str());
        let angle = next_unit(&mut state) * core::f32::consts::TAU;
        let radius = self.min_radius + next_unit(&mut state) * (self.max_radius - self.min_radius);
        Point {
            x: self.center.x + angle.cos() * radius,
            y: self.center.y + angle.sin() * radius,
        }
    }
}

/// FNV-1a fold of a string into a 64-bit seed.
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
/// FNV-1a prime.
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(s: &str) -> u64 {
    let mut hash = FNV_OFFSET;
    for byte in s.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    // xorshift requires non-zero state.
    if hash == 0 { 0xdead_beef_cafe_babe } else { hash }
}

/// Advance the `xorshift64` state and map the top 16 bits to `[0, 1]`.
///
/// 16 bits keeps the integer-to-float conversion exact (`f32::from` on
/// `u16`) while giving far more resolution than marker placement needs.
fn next_unit(state: &mut u64) -> f32 {
    *state ^= *state << 13;
    *state ^= *state >> 7;
    *state ^= *state << 17;
    let top = *state >> 48;
    // Always fits in u16 after the shift; the guard satisfies checked-cast style.
    let short = u16::try_from(top).unwrap_or(u16::MAX);
    f32::from(short) / f32::from(u16::MAX)
}
