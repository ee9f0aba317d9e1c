//! Movement category of an entity.

use std::fmt;

/// How an entity moves, which decides the terrain that blocks it.
///
/// The grid answers "is this tile blocked for category C?"; movers carry
/// their category in their configuration.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum MoveCategory {
    /// Walks on floor; blocked by walls and water.
    #[default]
    Ground,
    /// Walks and swims; blocked by walls only.
    Amphibious,
    /// Ignores terrain entirely.
    Flying,
}

impl fmt::Display for MoveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MoveCategory::Ground     => "ground",
            MoveCategory::Amphibious => "amphibious",
            MoveCategory::Flying     => "flying",
        };
        f.write_str(s)
    }
}
