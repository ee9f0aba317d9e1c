//! The owner record and per-mover configuration.

use tm_core::{EntityId, MoveCategory, PixelPos};

use crate::motion::DIAGONAL_FACTOR;
use crate::{MoverError, MoverResult};

/// The entity being moved: a stable id, a pixel position, and a size.
///
/// Handed to [`Mover::new`][crate::Mover::new] by value; the mover owns it
/// from then on and is the only thing that changes `position`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    pub id:       EntityId,
    /// Top-left corner in pixels.
    pub position: PixelPos,
    pub width:    f64,
    pub height:   f64,
}

impl Body {
    /// A body at the pixel origin.  Use `Mover::place` to put it on a tile.
    pub fn new(id: EntityId, width: f64, height: f64) -> Self {
        Self { id, position: PixelPos::default(), width, height }
    }

    pub(crate) fn validate(&self) -> MoverResult<()> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(MoverError::InvalidBodySize { width: self.width, height: self.height });
        }
        Ok(())
    }
}

/// Per-axis speed in pixels per second.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Speed {
    pub x: f64,
    pub y: f64,
}

impl Speed {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same speed on both axes.
    pub const fn uniform(v: f64) -> Self {
        Self { x: v, y: v }
    }
}

/// Tunables for one mover.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoverConfig {
    pub speed: Speed,

    /// Multiplier applied to both axes when moving diagonally.  The default
    /// 0.8 keeps a diagonal step close to a straight one in duration.
    pub diagonal_factor: f64,

    /// Which terrain blocks this mover.
    pub category: MoveCategory,
}

impl MoverConfig {
    pub(crate) fn validate(&self) -> MoverResult<()> {
        let Speed { x, y } = self.speed;
        if !(x.is_finite() && y.is_finite() && x > 0.0 && y > 0.0) {
            return Err(MoverError::InvalidSpeed { x, y });
        }
        let f = self.diagonal_factor;
        if !(f > 0.0 && f <= 1.0) {
            return Err(MoverError::InvalidDiagonalFactor(f));
        }
        Ok(())
    }
}

impl Default for MoverConfig {
    /// 64 px/s on both axes, the standard diagonal factor, ground movement.
    fn default() -> Self {
        Self {
            speed:           Speed::uniform(64.0),
            diagonal_factor: DIAGONAL_FACTOR,
            category:        MoveCategory::Ground,
        }
    }
}
