use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    map::{Direction, RoomGraph, RoomId},
    persistence::{SaveDocument, SaveStore},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalRecord {
    pub from: RoomId,
    pub to: RoomId,
    pub direction: Direction,
    pub timestamp: DateTime<Utc>,
}

impl TraversalRecord {
    pub fn now(from: RoomId, to: RoomId, direction: Direction) -> Self {
        Self {
            from,
            to,
            direction,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only movement history, written through to the save store on
/// every append.
pub struct TraversalLog {
    history: Vec<TraversalRecord>,
    unique_rooms: HashSet<RoomId>,
    unique_order: Vec<RoomId>,
    last_location: Option<RoomId>,
    store: Box<dyn SaveStore>,
}

impl TraversalLog {
    pub fn new(store: Box<dyn SaveStore>) -> Self {
        Self {
            history: Vec::new(),
            unique_rooms: HashSet::new(),
            unique_order: Vec::new(),
            last_location: None,
            store,
        }
    }

    /// Rebuilds the log from a loaded document. The unique set is the union
    /// of the saved ids and every saved destination.
    pub fn from_document(document: &SaveDocument, store: Box<dyn SaveStore>) -> Self {
        let mut log = Self::new(store);
        for id in &document.unique_rooms {
            log.remember(id);
        }
        for record in &document.history {
            log.remember(&record.to);
        }
        log.history = document.history.clone();
        log.last_location = log
            .history
            .last()
            .map(|record| record.to.clone())
            .or_else(|| document.last_location.as_ref().map(|location| location.id()));
        log
    }

    fn remember(&mut self, id: &RoomId) {
        if self.unique_rooms.insert(id.clone()) {
            self.unique_order.push(id.clone());
        }
    }

    /// Records the move in memory, then saves. A failed save is logged and
    /// the in-memory record stays.
    pub fn append(&mut self, record: TraversalRecord, graph: &RoomGraph) {
        self.remember(&record.to);
        self.last_location = Some(record.to.clone());
        self.history.push(record);

        let document = self.document(graph);
        if let Err(err) = self.store.save(&document) {
            warn!(error = %err, records = self.history.len(), "failed to save traversal log");
        }
    }

    pub fn document(&self, graph: &RoomGraph) -> SaveDocument {
        SaveDocument {
            history: self.history.clone(),
            unique_rooms: self.unique_order.clone(),
            last_location: self
                .last_location
                .as_ref()
                .and_then(|id| graph.get(id))
                .cloned(),
            rooms: graph.rooms(),
        }
    }

    /// Most recent first.
    pub fn recent_history(&self, limit: usize) -> Vec<&TraversalRecord> {
        self.history.iter().rev().take(limit).collect()
    }

    pub fn unique_room_count(&self) -> usize {
        self.unique_rooms.len()
    }

    pub fn last_location(&self) -> Option<&RoomId> {
        self.last_location.as_ref()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
