use std::collections::HashMap;

use bracket_random::prelude::RandomNumberGenerator;
use smallvec::smallvec;
use tracing::debug;

use crate::error::{NavigationError, NavigationResult};

use super::{
    direction::{Direction, PLANAR, PlanarDirection},
    location::{Coordinate, Exits, Location, RoomId, RoomType},
};

pub const GALLERY_EXITS: usize = 2;

/// Picks indices when a gallery rolls its exits. Swap in a seeded or scripted
/// source to make generation reproducible.
pub trait RandomSource {
    /// Returns an index in `0..upper`. `upper` is never zero.
    fn roll(&mut self, upper: usize) -> usize;
}

impl RandomSource for RandomNumberGenerator {
    fn roll(&mut self, upper: usize) -> usize {
        self.range(0, upper as i32) as usize
    }
}

/// Every room discovered so far, keyed by its derived id.
pub struct RoomGraph {
    rooms: HashMap<RoomId, Location>,
    rng: Box<dyn RandomSource>,
}

impl RoomGraph {
    /// A fresh world holding only the starting gallery at the origin.
    pub fn starting(rng: Box<dyn RandomSource>) -> Self {
        let mut graph = Self {
            rooms: HashMap::new(),
            rng,
        };
        graph.ensure_starting_gallery();
        graph
    }

    /// Replaces the rooms with a saved snapshot, checking every room and
    /// connection against the identity its id encodes. On error the graph
    /// is left as it was.
    pub fn restore(&mut self, rooms: Vec<Location>) -> NavigationResult<()> {
        let mut restored = HashMap::with_capacity(rooms.len());
        for location in rooms {
            let id = location.id();
            if restored.insert(id.clone(), location).is_some() {
                return Err(NavigationError::GraphCorruption {
                    id,
                    detail: "room saved twice".to_string(),
                });
            }
        }
        for (id, location) in &restored {
            for (direction, target) in &location.connections {
                check_connection(id, location, *direction, target)?;
            }
        }
        if restored.is_empty() {
            return Ok(());
        }
        self.rooms = restored;
        self.ensure_starting_gallery();
        Ok(())
    }

    pub fn starting_id() -> RoomId {
        RoomId::derive(RoomType::Gallery, Coordinate::ORIGIN)
    }

    fn ensure_starting_gallery(&mut self) {
        let id = Self::starting_id();
        if !self.rooms.contains_key(&id) {
            let exits = self.roll_gallery_exits(None);
            debug!(room = %id, ?exits, "generated starting gallery");
            self.rooms
                .insert(id, Location::new(RoomType::Gallery, Coordinate::ORIGIN, exits));
        }
    }

    pub fn get(&self, id: &RoomId) -> Option<&Location> {
        self.rooms.get(id)
    }

    pub fn contains(&self, id: &RoomId) -> bool {
        self.rooms.contains_key(id)
    }

    /// Snapshot iterator over the current rooms. Clone it to walk again.
    pub fn all(&self) -> impl Iterator<Item = &Location> + Clone {
        self.rooms.values()
    }

    /// Rooms ordered by id, for stable saves.
    pub fn rooms(&self) -> Vec<Location> {
        let mut rooms: Vec<(&RoomId, &Location)> = self.rooms.iter().collect();
        rooms.sort_by(|a, b| a.0.cmp(b.0));
        rooms.into_iter().map(|(_, location)| location.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Returns the room reached by leaving `origin` in `direction`, generating
    /// it on first visit, and wires the connection both ways.
    ///
    /// Horizontal moves alternate gallery and vestibule; stairs keep the
    /// vestibule type. Nothing is mutated when the direction is rejected or
    /// an inconsistency is found.
    pub fn get_or_generate(
        &mut self,
        origin: &RoomId,
        direction: Direction,
    ) -> NavigationResult<&Location> {
        let origin_location = self
            .rooms
            .get(origin)
            .ok_or_else(|| NavigationError::UnknownRoom(origin.clone()))?;
        if !origin_location.offers(direction) {
            return Err(NavigationError::InvalidDirection {
                room: origin.clone(),
                direction,
            });
        }

        let destination_type = match direction {
            Direction::Planar(_) => origin_location.room_type.complement(),
            Direction::Vertical(_) => origin_location.room_type,
        };
        let destination_coordinate = origin_location.coordinate.step(direction);
        let destination_id = RoomId::derive(destination_type, destination_coordinate);

        if let Some(existing) = origin_location.connection(direction) {
            if *existing != destination_id {
                return Err(NavigationError::GraphCorruption {
                    id: origin.clone(),
                    detail: format!("{direction} leads to {existing}, expected {destination_id}"),
                });
            }
        }

        match self.rooms.get(&destination_id) {
            Some(existing) => {
                if existing.room_type != destination_type
                    || existing.coordinate != destination_coordinate
                {
                    return Err(NavigationError::GraphCorruption {
                        id: destination_id,
                        detail: format!(
                            "stored as {} at {}",
                            existing.room_type.as_str(),
                            existing.coordinate
                        ),
                    });
                }
                if let Some(back) = existing.connection(direction.opposite()) {
                    if back != origin {
                        return Err(NavigationError::GraphCorruption {
                            id: destination_id.clone(),
                            detail: format!(
                                "{} leads to {back}, expected {origin}",
                                direction.opposite()
                            ),
                        });
                    }
                }
            }
            None => {
                let exits = match (destination_type, direction) {
                    (RoomType::Gallery, Direction::Planar(travel)) => {
                        self.roll_gallery_exits(Some(travel))
                    }
                    (RoomType::Gallery, Direction::Vertical(_)) => self.roll_gallery_exits(None),
                    (RoomType::Vestibule, _) => vestibule_exits(),
                };
                debug!(room = %destination_id, ?exits, "generated room");
                self.rooms.insert(
                    destination_id.clone(),
                    Location::new(destination_type, destination_coordinate, exits),
                );
            }
        }

        self.link(origin, direction, &destination_id);
        self.link(&destination_id, direction.opposite(), origin);

        self.rooms
            .get(&destination_id)
            .ok_or(NavigationError::UnknownRoom(destination_id))
    }

    fn link(&mut self, from: &RoomId, direction: Direction, to: &RoomId) {
        if let Some(location) = self.rooms.get_mut(from) {
            location
                .connections
                .entry(direction)
                .or_insert_with(|| to.clone());
        }
    }

    /// Two planar exits. When arriving by `travel` the way back is always one
    /// of them.
    fn roll_gallery_exits(&mut self, travel: Option<PlanarDirection>) -> Exits {
        let mut pool: Vec<PlanarDirection> = PLANAR.to_vec();
        let mut exits = Exits::new();
        if let Some(travel) = travel {
            let back = travel.opposite();
            pool.retain(|candidate| *candidate != back);
            exits.push(back);
        }
        while exits.len() < GALLERY_EXITS && !pool.is_empty() {
            let idx = self.rng.roll(pool.len()).min(pool.len() - 1);
            exits.push(pool.swap_remove(idx));
        }
        exits.sort();
        exits
    }
}

fn vestibule_exits() -> Exits {
    smallvec![PlanarDirection::Ee, PlanarDirection::Ww]
}

fn check_connection(
    id: &RoomId,
    location: &Location,
    direction: Direction,
    target: &RoomId,
) -> NavigationResult<()> {
    let corrupt = |detail: String| NavigationError::GraphCorruption {
        id: id.clone(),
        detail,
    };
    let (target_type, target_coordinate) = target
        .parse_parts()
        .ok_or_else(|| corrupt(format!("malformed connection {direction} -> {target}")))?;
    if target_coordinate != location.coordinate.step(direction) {
        return Err(corrupt(format!(
            "{direction} leads to {target}, which is not adjacent"
        )));
    }
    let expected_type = match direction {
        Direction::Planar(_) => location.room_type.complement(),
        Direction::Vertical(_) => location.room_type,
    };
    if target_type != expected_type {
        return Err(corrupt(format!(
            "{direction} leads to a {}",
            target_type.as_str()
        )));
    }
    Ok(())
}
