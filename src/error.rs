use std::path::PathBuf;

use crate::map::{Direction, RoomId};

/// Failures raised by the room graph and the navigation controller.
#[derive(thiserror::Error, Debug)]
pub enum NavigationError {
    /// The room does not offer the requested direction.
    #[error("{room} offers no way {direction}")]
    InvalidDirection { room: RoomId, direction: Direction },

    /// A traversal was requested from a room the graph has never generated.
    #[error("unknown room {0}")]
    UnknownRoom(RoomId),

    /// A stored room disagrees with the identity its id encodes.
    #[error("graph corruption at {id}: {detail}")]
    GraphCorruption { id: RoomId, detail: String },

    #[error("unknown direction {0:?}")]
    UnknownDirection(String),
}

/// Failures of the backing save store. Never fatal to a running session.
#[derive(thiserror::Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl NavigationError {
    /// Whether the session can no longer trust its room graph.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::GraphCorruption { .. })
    }
}

pub type NavigationResult<T> = Result<T, NavigationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Coordinate, RoomType};

    #[test]
    fn only_corruption_is_fatal() {
        let id = RoomId::derive(RoomType::Gallery, Coordinate::ORIGIN);
        let corrupt = NavigationError::GraphCorruption {
            id: id.clone(),
            detail: "type mismatch".to_string(),
        };
        assert!(corrupt.is_fatal());

        let refused = NavigationError::InvalidDirection {
            room: id.clone(),
            direction: Direction::UP,
        };
        assert!(!refused.is_fatal());
        assert!(!NavigationError::UnknownRoom(id).is_fatal());
        assert!(!NavigationError::UnknownDirection("north".to_string()).is_fatal());
    }
}
