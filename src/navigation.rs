use tracing::{debug, info, warn};

use crate::{
    error::{NavigationError, NavigationResult},
    history::{TraversalLog, TraversalRecord},
    map::{Direction, Location, RandomSource, RoomGraph, RoomId},
    persistence::{SaveDocument, SaveStore},
};

pub type SubscriptionId = u64;

type LocationHandler = Box<dyn FnMut(&Location)>;

/// Holds the player's current room and is the only way to move it.
pub struct NavigationController {
    graph: RoomGraph,
    log: TraversalLog,
    current: RoomId,
    subscribers: Vec<(SubscriptionId, LocationHandler)>,
    next_subscription: SubscriptionId,
}

impl NavigationController {
    /// Starts in the log's last room when the graph knows it, otherwise in
    /// the starting gallery.
    pub fn new(graph: RoomGraph, log: TraversalLog) -> Self {
        let current = match log.last_location() {
            Some(last) if graph.contains(last) => {
                info!(room = %last, "resuming from last location");
                last.clone()
            }
            Some(last) => {
                warn!(room = %last, "last location missing from saved rooms; starting over");
                RoomGraph::starting_id()
            }
            None => RoomGraph::starting_id(),
        };
        Self {
            graph,
            log,
            current,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Loads the saved session from `store`. Unreadable or inconsistent saves
    /// are logged and replaced by a fresh world; startup never fails.
    pub fn resume(store: Box<dyn SaveStore>, rng: Box<dyn RandomSource>) -> Self {
        let document = match store.load() {
            Ok(Some(document)) => document,
            Ok(None) => {
                info!("no saved session, starting fresh");
                SaveDocument::default()
            }
            Err(err) => {
                warn!(error = %err, "could not read saved session, starting fresh");
                SaveDocument::default()
            }
        };

        let mut graph = RoomGraph::starting(rng);
        let log = match graph.restore(document.rooms.clone()) {
            Ok(()) => TraversalLog::from_document(&document, store),
            Err(err) => {
                warn!(error = %err, "saved rooms are inconsistent, starting fresh");
                TraversalLog::new(store)
            }
        };
        Self::new(graph, log)
    }

    pub fn current(&self) -> &RoomId {
        &self.current
    }

    pub fn current_location(&self) -> Option<&Location> {
        self.graph.get(&self.current)
    }

    pub fn graph(&self) -> &RoomGraph {
        &self.graph
    }

    pub fn log(&self) -> &TraversalLog {
        &self.log
    }

    /// Moves the player one room. A rejected direction leaves every piece
    /// of state untouched.
    pub fn traverse(&mut self, direction: Direction) -> NavigationResult<Location> {
        let offered = self
            .current_location()
            .map(|location| location.offers(direction))
            .unwrap_or(false);
        if !offered {
            return Err(NavigationError::InvalidDirection {
                room: self.current.clone(),
                direction,
            });
        }

        let destination = self
            .graph
            .get_or_generate(&self.current, direction)?
            .clone();
        let destination_id = destination.id();
        let from = std::mem::replace(&mut self.current, destination_id.clone());
        debug!(%from, to = %destination_id, %direction, "traversed");

        self.log.append(
            TraversalRecord::now(from, destination_id, direction),
            &self.graph,
        );
        for (_, handler) in self.subscribers.iter_mut() {
            handler(&destination);
        }
        Ok(destination)
    }

    pub fn on_location_changed<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&Location) + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(handler)));
        id
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Coordinate, RoomType, graph::tests::ne_sw_graph};
    use crate::persistence::MemoryStore;
    use std::{cell::RefCell, rc::Rc};

    fn controller(store: &MemoryStore) -> NavigationController {
        NavigationController::new(ne_sw_graph(), TraversalLog::new(Box::new(store.clone())))
    }

    #[test]
    fn starts_in_the_starting_gallery() {
        let nav = controller(&MemoryStore::new());
        assert_eq!(nav.current(), &RoomGraph::starting_id());
        assert_eq!(
            nav.current_location().unwrap().room_type,
            RoomType::Gallery
        );
    }

    #[test]
    fn walks_the_documented_route() {
        let store = MemoryStore::new();
        let mut nav = controller(&store);
        let gallery = nav.current().clone();

        let vestibule = nav.traverse(Direction::NE).unwrap();
        assert_eq!(vestibule.room_type, RoomType::Vestibule);
        assert_eq!(vestibule.coordinate, Coordinate::new(1, 1, 0));
        let vestibule_id = vestibule.id();
        assert_eq!(
            nav.graph().get(&gallery).unwrap().connection(Direction::NE),
            Some(&vestibule_id)
        );
        assert_eq!(
            nav.graph().get(&vestibule_id).unwrap().connection(Direction::SW),
            Some(&gallery)
        );

        let lower = nav.traverse(Direction::DN).unwrap();
        assert_eq!(lower.room_type, RoomType::Vestibule);
        assert_eq!(lower.coordinate, Coordinate::new(1, 1, -1));

        let rooms_before = nav.graph().len();
        let connections_before = nav.graph().get(&vestibule_id).unwrap().connections.clone();
        let back = nav.traverse(Direction::UP).unwrap();
        assert_eq!(back.id(), vestibule_id);
        assert_eq!(nav.graph().len(), rooms_before);
        assert_eq!(
            nav.graph().get(&vestibule_id).unwrap().connections,
            connections_before
        );

        assert_eq!(nav.log().len(), 3);
        assert_eq!(nav.log().unique_room_count(), 2);
        assert_eq!(nav.log().last_location(), Some(&vestibule_id));
        assert_eq!(store.load().unwrap().unwrap().history.len(), 3);
    }

    #[test]
    fn invalid_direction_changes_nothing() {
        let store = MemoryStore::new();
        let mut nav = controller(&store);
        let fired = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&fired);
        nav.on_location_changed(move |_| *counter.borrow_mut() += 1);

        let err = nav.traverse(Direction::UP).unwrap_err();
        assert!(matches!(err, NavigationError::InvalidDirection { .. }));
        assert_eq!(nav.current(), &RoomGraph::starting_id());
        assert!(nav.log().is_empty());
        assert_eq!(nav.graph().len(), 1);
        assert_eq!(*fired.borrow(), 0);
        assert!(store.raw().is_none());
    }

    #[test]
    fn subscribers_hear_every_move_until_unsubscribed() {
        let mut nav = controller(&MemoryStore::new());
        let seen: Rc<RefCell<Vec<RoomId>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let id = nav.on_location_changed(move |location| sink.borrow_mut().push(location.id()));

        let vestibule = nav.traverse(Direction::NE).unwrap().id();
        assert_eq!(seen.borrow().as_slice(), &[vestibule]);

        assert!(nav.unsubscribe(id));
        assert!(!nav.unsubscribe(id));
        nav.traverse(Direction::SW).unwrap();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn persistence_failure_does_not_block_movement() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let mut nav = controller(&store);
        let vestibule = nav.traverse(Direction::NE).unwrap();
        assert_eq!(nav.current(), &vestibule.id());
        assert_eq!(nav.log().len(), 1);
    }

    #[test]
    fn resumes_where_the_last_session_ended() {
        let store = MemoryStore::new();
        let mut nav = controller(&store);
        nav.traverse(Direction::NE).unwrap();
        let lower = nav.traverse(Direction::DN).unwrap().id();
        drop(nav);

        let resumed = NavigationController::resume(
            Box::new(store.clone()),
            Box::new(crate::map::graph::tests::ScriptedRolls::new(vec![4])),
        );
        assert_eq!(resumed.current(), &lower);
        assert_eq!(resumed.graph().len(), 3);
        assert_eq!(resumed.log().len(), 2);
        assert_eq!(resumed.log().unique_room_count(), 2);
    }

    #[test]
    fn last_location_outside_the_snapshot_falls_back_to_the_start() {
        let store = MemoryStore::new();
        let mut nav = controller(&store);
        nav.traverse(Direction::NE).unwrap();
        let mut document = store.load().unwrap().unwrap();
        document.rooms.retain(|room| room.room_type == RoomType::Gallery);
        for room in &mut document.rooms {
            room.connections.clear();
        }
        let damaged = MemoryStore::with_document(&document).unwrap();

        let resumed = NavigationController::resume(
            Box::new(damaged),
            Box::new(crate::map::graph::tests::ScriptedRolls::new(vec![0, 0])),
        );
        assert_eq!(resumed.current(), &RoomGraph::starting_id());
    }

    #[test]
    fn unreadable_save_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("navigation.json"), "[1, 2").unwrap();
        let store = crate::persistence::JsonFileStore::new(dir.path(), "navigation.json");
        let nav = NavigationController::resume(
            Box::new(store),
            Box::new(crate::map::graph::tests::ScriptedRolls::new(vec![0, 0])),
        );
        assert_eq!(nav.current(), &RoomGraph::starting_id());
        assert!(nav.log().is_empty());
        assert_eq!(nav.graph().len(), 1);
    }
}
