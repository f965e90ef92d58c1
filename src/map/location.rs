use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::direction::{Direction, PlanarDirection, VerticalDirection};

/// Axial hex position `(x, y)` plus floor index `z`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Planar(planar) => {
                let delta = planar.delta();
                Self::new(self.x + delta.x, self.y + delta.y, self.z)
            }
            Direction::Vertical(vertical) => Self::new(self.x, self.y, self.z + vertical.delta()),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Gallery,
    Vestibule,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Gallery => "gallery",
            RoomType::Vestibule => "vestibule",
        }
    }

    /// Horizontal moves always land on the other room type.
    pub fn complement(self) -> Self {
        match self {
            RoomType::Gallery => RoomType::Vestibule,
            RoomType::Vestibule => RoomType::Gallery,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "gallery" => Some(RoomType::Gallery),
            "vestibule" => Some(RoomType::Vestibule),
            _ => None,
        }
    }
}

/// Identity of a room, derived from its type and coordinate alone.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn derive(room_type: RoomType, coordinate: Coordinate) -> Self {
        Self(format!(
            "{}:{}:{}:{}",
            room_type.as_str(),
            coordinate.x,
            coordinate.y,
            coordinate.z
        ))
    }

    /// Recovers the type and coordinate encoded in the id, if well formed.
    pub fn parse_parts(&self) -> Option<(RoomType, Coordinate)> {
        let mut parts = self.0.split(':');
        let room_type = RoomType::from_token(parts.next()?)?;
        let x = parts.next()?.parse().ok()?;
        let y = parts.next()?.parse().ok()?;
        let z = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some((room_type, Coordinate::new(x, y, z)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub type Exits = SmallVec<[PlanarDirection; 2]>;

/// Something the player can do from a room: walk through an exit, return
/// along a realized connection, or take the stairs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoomAction {
    Exit(PlanarDirection),
    Stairs(VerticalDirection),
}

impl RoomAction {
    pub fn direction(&self) -> Direction {
        match self {
            RoomAction::Exit(planar) => Direction::Planar(*planar),
            RoomAction::Stairs(vertical) => Direction::Vertical(*vertical),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub coordinate: Coordinate,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub exits: Exits,
    #[serde(default)]
    pub connections: BTreeMap<Direction, RoomId>,
}

impl Location {
    pub fn new(room_type: RoomType, coordinate: Coordinate, exits: Exits) -> Self {
        Self {
            coordinate,
            room_type,
            exits,
            connections: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> RoomId {
        RoomId::derive(self.room_type, self.coordinate)
    }

    pub fn is_vestibule(&self) -> bool {
        self.room_type == RoomType::Vestibule
    }

    pub fn connection(&self, direction: Direction) -> Option<&RoomId> {
        self.connections.get(&direction)
    }

    /// Whether the player may leave this room in `direction`.
    pub fn offers(&self, direction: Direction) -> bool {
        match direction {
            Direction::Vertical(_) => self.is_vestibule(),
            Direction::Planar(planar) => {
                self.exits.contains(&planar) || self.connections.contains_key(&direction)
            }
        }
    }

    /// Every offered action, exits first, stairs last.
    pub fn actions(&self) -> Vec<RoomAction> {
        let mut planar: Vec<PlanarDirection> = self.exits.iter().copied().collect();
        for direction in self.connections.keys() {
            if let Direction::Planar(back) = direction {
                if !planar.contains(back) {
                    planar.push(*back);
                }
            }
        }
        planar.sort();

        let mut actions: Vec<RoomAction> = planar.into_iter().map(RoomAction::Exit).collect();
        if self.is_vestibule() {
            actions.push(RoomAction::Stairs(VerticalDirection::Up));
            actions.push(RoomAction::Stairs(VerticalDirection::Dn));
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn room_id_is_a_pure_function_of_type_and_coordinate() {
        let a = RoomId::derive(RoomType::Vestibule, Coordinate::new(1, 1, -1));
        let b = RoomId::derive(RoomType::Vestibule, Coordinate::new(1, 1, -1));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "vestibule:1:1:-1");
        assert_ne!(a, RoomId::derive(RoomType::Gallery, Coordinate::new(1, 1, -1)));
    }

    #[test]
    fn room_id_parts_round_trip() {
        let id = RoomId::derive(RoomType::Gallery, Coordinate::new(-3, 4, 2));
        assert_eq!(
            id.parse_parts(),
            Some((RoomType::Gallery, Coordinate::new(-3, 4, 2)))
        );
        assert_eq!(RoomId("atrium:0:0:0".into()).parse_parts(), None);
        assert_eq!(RoomId("gallery:0:0".into()).parse_parts(), None);
    }

    #[test]
    fn vertical_steps_change_only_the_floor() {
        let start = Coordinate::new(1, 1, 0);
        assert_eq!(start.step(Direction::DN), Coordinate::new(1, 1, -1));
        assert_eq!(start.step(Direction::UP), Coordinate::new(1, 1, 1));
        assert_eq!(start.step(Direction::SW), Coordinate::ORIGIN);
    }

    #[test]
    fn vestibules_offer_stairs_and_galleries_do_not() {
        let vestibule = Location::new(
            RoomType::Vestibule,
            Coordinate::ORIGIN,
            smallvec![PlanarDirection::Ee, PlanarDirection::Ww],
        );
        assert!(vestibule.offers(Direction::UP));
        assert!(vestibule.offers(Direction::DN));
        assert!(!vestibule.offers(Direction::NE));

        let gallery = Location::new(
            RoomType::Gallery,
            Coordinate::ORIGIN,
            smallvec![PlanarDirection::Ne, PlanarDirection::Sw],
        );
        assert!(!gallery.offers(Direction::UP));
        assert!(gallery.offers(Direction::NE));
    }

    #[test]
    fn realized_connections_are_offered_back() {
        let mut vestibule = Location::new(
            RoomType::Vestibule,
            Coordinate::new(1, 1, 0),
            smallvec![PlanarDirection::Ee, PlanarDirection::Ww],
        );
        assert!(!vestibule.offers(Direction::SW));
        vestibule.connections.insert(
            Direction::SW,
            RoomId::derive(RoomType::Gallery, Coordinate::ORIGIN),
        );
        assert!(vestibule.offers(Direction::SW));
        assert_eq!(
            vestibule.actions(),
            vec![
                RoomAction::Exit(PlanarDirection::Ee),
                RoomAction::Exit(PlanarDirection::Ww),
                RoomAction::Exit(PlanarDirection::Sw),
                RoomAction::Stairs(VerticalDirection::Up),
                RoomAction::Stairs(VerticalDirection::Dn),
            ]
        );
    }
}
