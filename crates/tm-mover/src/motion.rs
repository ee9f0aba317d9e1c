//! Movement-vector math.
//!
//! Speed is applied per axis, so without correction a diagonal step would
//! cover a tile on both axes in the time a straight step covers one.  Both
//! components are therefore scaled by [`DIAGONAL_FACTOR`] whenever neither is
//! zero.

use tm_core::PixelPos;

use crate::Speed;

/// Default slowdown applied to both axes on diagonal moves.
pub const DIAGONAL_FACTOR: f64 = 0.8;

/// A per-second translation in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { x: 0.0, y: 0.0 };

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Velocity that carries `pos` toward `target`.
///
/// Each axis moves at full `speed` toward the target or not at all when
/// already aligned; if both axes move, both are multiplied by
/// `diagonal_factor`.
pub fn movement_vector(pos: PixelPos, target: PixelPos, speed: Speed, diagonal_factor: f64) -> Velocity {
    let axis = |from: f64, to: f64, s: f64| {
        if to < from {
            -s
        } else if to > from {
            s
        } else {
            0.0
        }
    };
    let mut v = Velocity {
        x: axis(pos.x, target.x, speed.x),
        y: axis(pos.y, target.y, speed.y),
    };
    if v.x != 0.0 && v.y != 0.0 {
        v.x *= diagonal_factor;
        v.y *= diagonal_factor;
    }
    v
}

/// Move one coordinate by `delta` toward `target`.
///
/// Returns the new coordinate and whether the axis has arrived.  Crossing
/// the target clamps exactly onto it; a zero delta has arrived only if it is
/// already on the target.
#[inline]
pub(crate) fn advance_axis(pos: f64, target: f64, delta: f64) -> (f64, bool) {
    let next = pos + delta;
    if delta > 0.0 {
        if next >= target { (target, true) } else { (next, false) }
    } else if delta < 0.0 {
        if next <= target { (target, true) } else { (next, false) }
    } else {
        (pos, pos == target)
    }
}
