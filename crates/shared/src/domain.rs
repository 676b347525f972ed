use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Number of holes on the board (3x3 grid).
pub const HOLE_COUNT: u8 = 9;
pub const GRID_WIDTH: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Welcome,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HoleIndex(u8);

impl HoleIndex {
    pub fn new(index: u8) -> Result<Self, GameError> {
        if index < HOLE_COUNT {
            Ok(Self(index))
        } else {
            Err(GameError::InvalidHole(index))
        }
    }

    /// Maps any value onto the board, used when drawing random cells.
    pub fn wrapping(index: u8) -> Self {
        Self(index % HOLE_COUNT)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn row(self) -> u8 {
        self.0 / GRID_WIDTH
    }

    pub fn all() -> impl Iterator<Item = HoleIndex> {
        (0..HOLE_COUNT).map(HoleIndex)
    }
}

impl TryFrom<u8> for HoleIndex {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HoleIndex> for u8 {
    fn from(value: HoleIndex) -> Self {
        value.0
    }
}

impl std::fmt::Display for HoleIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_holes_outside_the_grid() {
        assert!(HoleIndex::new(8).is_ok());
        assert!(matches!(HoleIndex::new(9), Err(GameError::InvalidHole(9))));
    }

    #[test]
    fn maps_holes_to_grid_coordinates() {
        let hole = HoleIndex::new(5).expect("hole");
        assert_eq!(hole.row(), 1);
        assert_eq!(HoleIndex::all().filter(|h| h.row() == 2).count(), 3);
        assert_eq!(HoleIndex::all().count(), HOLE_COUNT as usize);
    }

    #[test]
    fn deserialization_enforces_hole_range() {
        let hole: HoleIndex = serde_json::from_str("4").expect("valid hole");
        assert_eq!(hole.get(), 4);
        assert!(serde_json::from_str::<HoleIndex>("12").is_err());
    }
}
