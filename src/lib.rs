//! Hex-grid room navigation for a library-walking game.
//!
//! The world is a graph of galleries and vestibules on an axial hex grid
//! with stacked floors. Rooms are generated the first time the player
//! walks into them and wired to their neighbour on first traversal. Every
//! move is logged and written through to a JSON save so a session can be
//! resumed where it ended.

pub mod config;
pub mod error;
pub mod history;
pub mod map;
pub mod navigation;
pub mod persistence;
pub mod scripted_input;

pub use error::{NavigationError, NavigationResult, PersistenceError};
pub use navigation::{NavigationController, SubscriptionId};
