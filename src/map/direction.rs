use std::{fmt, str::FromStr};

use bracket_geometry::prelude::Point;
use serde::{Deserialize, Serialize};

use crate::error::NavigationError;

/// One hex step within a floor. Axial grid with x pointing east and y
/// pointing north-west, so `ne` is the sum of both axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanarDirection {
    Ne,
    Nw,
    Ee,
    Ww,
    Se,
    Sw,
}

pub const PLANAR: [PlanarDirection; 6] = [
    PlanarDirection::Ne,
    PlanarDirection::Nw,
    PlanarDirection::Ee,
    PlanarDirection::Ww,
    PlanarDirection::Se,
    PlanarDirection::Sw,
];

impl PlanarDirection {
    pub fn opposite(self) -> Self {
        match self {
            PlanarDirection::Ne => PlanarDirection::Sw,
            PlanarDirection::Nw => PlanarDirection::Se,
            PlanarDirection::Ee => PlanarDirection::Ww,
            PlanarDirection::Ww => PlanarDirection::Ee,
            PlanarDirection::Se => PlanarDirection::Nw,
            PlanarDirection::Sw => PlanarDirection::Ne,
        }
    }

    pub fn delta(self) -> Point {
        match self {
            PlanarDirection::Ne => Point::new(1, 1),
            PlanarDirection::Nw => Point::new(0, 1),
            PlanarDirection::Ee => Point::new(1, 0),
            PlanarDirection::Ww => Point::new(-1, 0),
            PlanarDirection::Se => Point::new(0, -1),
            PlanarDirection::Sw => Point::new(-1, -1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanarDirection::Ne => "ne",
            PlanarDirection::Nw => "nw",
            PlanarDirection::Ee => "ee",
            PlanarDirection::Ww => "ww",
            PlanarDirection::Se => "se",
            PlanarDirection::Sw => "sw",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalDirection {
    Up,
    Dn,
}

impl VerticalDirection {
    pub fn opposite(self) -> Self {
        match self {
            VerticalDirection::Up => VerticalDirection::Dn,
            VerticalDirection::Dn => VerticalDirection::Up,
        }
    }

    /// Floor change applied to `z`.
    pub fn delta(self) -> i32 {
        match self {
            VerticalDirection::Up => 1,
            VerticalDirection::Dn => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VerticalDirection::Up => "up",
            VerticalDirection::Dn => "dn",
        }
    }
}

/// Any way out of a room: a hex step or a flight of stairs.
///
/// Serialized as the short lowercase token (`"ne"`, `"dn"`) so saves stay
/// readable and match the keys used by key scripts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Direction {
    Planar(PlanarDirection),
    Vertical(VerticalDirection),
}

pub const ALL_DIRECTIONS: [Direction; 8] = [
    Direction::Planar(PlanarDirection::Ne),
    Direction::Planar(PlanarDirection::Nw),
    Direction::Planar(PlanarDirection::Ee),
    Direction::Planar(PlanarDirection::Ww),
    Direction::Planar(PlanarDirection::Se),
    Direction::Planar(PlanarDirection::Sw),
    Direction::Vertical(VerticalDirection::Up),
    Direction::Vertical(VerticalDirection::Dn),
];

impl Direction {
    pub const NE: Direction = Direction::Planar(PlanarDirection::Ne);
    pub const NW: Direction = Direction::Planar(PlanarDirection::Nw);
    pub const EE: Direction = Direction::Planar(PlanarDirection::Ee);
    pub const WW: Direction = Direction::Planar(PlanarDirection::Ww);
    pub const SE: Direction = Direction::Planar(PlanarDirection::Se);
    pub const SW: Direction = Direction::Planar(PlanarDirection::Sw);
    pub const UP: Direction = Direction::Vertical(VerticalDirection::Up);
    pub const DN: Direction = Direction::Vertical(VerticalDirection::Dn);

    pub fn opposite(self) -> Self {
        match self {
            Direction::Planar(planar) => Direction::Planar(planar.opposite()),
            Direction::Vertical(vertical) => Direction::Vertical(vertical.opposite()),
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Vertical(_))
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Direction::Planar(PlanarDirection::Ne) => "North-East",
            Direction::Planar(PlanarDirection::Nw) => "North-West",
            Direction::Planar(PlanarDirection::Ee) => "East",
            Direction::Planar(PlanarDirection::Ww) => "West",
            Direction::Planar(PlanarDirection::Se) => "South-East",
            Direction::Planar(PlanarDirection::Sw) => "South-West",
            Direction::Vertical(VerticalDirection::Up) => "Upstairs",
            Direction::Vertical(VerticalDirection::Dn) => "Downstairs",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Planar(planar) => planar.as_str(),
            Direction::Vertical(vertical) => vertical.as_str(),
        }
    }
}

impl From<PlanarDirection> for Direction {
    fn from(planar: PlanarDirection) -> Self {
        Direction::Planar(planar)
    }
}

impl From<VerticalDirection> for Direction {
    fn from(vertical: VerticalDirection) -> Self {
        Direction::Vertical(vertical)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = NavigationError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let lowered = token.trim().to_ascii_lowercase();
        ALL_DIRECTIONS
            .iter()
            .copied()
            .find(|direction| direction.as_str() == lowered)
            .ok_or_else(|| NavigationError::UnknownDirection(token.to_string()))
    }
}

impl TryFrom<String> for Direction {
    type Error = NavigationError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        token.parse()
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        direction.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn opposite_is_an_involution() {
        for direction in ALL_DIRECTIONS {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn planar_deltas_are_distinct_and_cancel_their_opposite() {
        let mut seen = HashSet::new();
        for planar in PLANAR {
            let delta = planar.delta();
            let back = planar.opposite().delta();
            assert_eq!((delta.x + back.x, delta.y + back.y), (0, 0));
            assert!(seen.insert((delta.x, delta.y)), "duplicate delta for {planar:?}");
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn north_east_steps_along_both_axes() {
        assert_eq!(PlanarDirection::Ne.delta(), Point::new(1, 1));
    }

    #[test]
    fn tokens_parse_back() {
        for direction in ALL_DIRECTIONS {
            assert_eq!(direction.as_str().parse::<Direction>().unwrap(), direction);
        }
        assert_eq!("DN".parse::<Direction>().unwrap(), Direction::DN);
        assert!(matches!(
            "north".parse::<Direction>(),
            Err(NavigationError::UnknownDirection(_))
        ));
    }

    #[test]
    fn serializes_as_short_token() {
        let json = serde_json::to_string(&Direction::SW).unwrap();
        assert_eq!(json, "\"sw\"");
        let parsed: Direction = serde_json::from_str("\"up\"").unwrap();
        assert_eq!(parsed, Direction::UP);
    }

    #[test]
    fn display_names_are_human_readable() {
        assert_eq!(Direction::EE.display_name(), "East");
        assert_eq!(Direction::DN.display_name(), "Downstairs");
    }
}
