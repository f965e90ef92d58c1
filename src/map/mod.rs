pub mod direction;
pub mod graph;
pub mod location;

pub use direction::{ALL_DIRECTIONS, Direction, PLANAR, PlanarDirection, VerticalDirection};
pub use graph::{GALLERY_EXITS, RandomSource, RoomGraph};
pub use location::{Coordinate, Exits, Location, RoomAction, RoomId, RoomType};
