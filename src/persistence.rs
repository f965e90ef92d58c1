//! Save documents and the stores that hold them.
//!
//! A session is saved as one compact JSON document. Files are written
//! to a sibling temporary path and renamed into place so a crash mid-write
//! never leaves a truncated save behind.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::PersistenceError,
    history::TraversalRecord,
    map::{Location, RoomId},
};

pub const SAVE_FILE_NAME: &str = "navigation.json";

/// Everything needed to resume a session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDocument {
    #[serde(default)]
    pub history: Vec<TraversalRecord>,
    /// Every distinct destination ever reached. The key predates vestibules.
    #[serde(default, rename = "uniqueGalleries")]
    pub unique_rooms: Vec<RoomId>,
    #[serde(default)]
    pub last_location: Option<Location>,
    #[serde(default)]
    pub rooms: Vec<Location>,
}

pub trait SaveStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<SaveDocument>, PersistenceError>;

    fn save(&mut self, document: &SaveDocument) -> Result<(), PersistenceError>;
}

#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(dir: P, file_name: &str) -> Self {
        Self {
            path: dir.as_ref().join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SaveStore for JsonFileStore {
    fn load(&self) -> Result<Option<SaveDocument>, PersistenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&mut self, document: &SaveDocument) -> Result<(), PersistenceError> {
        // Rewritten on every move, so keep it compact.
        let json = serde_json::to_string(document)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json).map_err(|err| self.io_error(err))?;
        fs::rename(&staging, &self.path).map_err(|err| self.io_error(err))
    }
}

#[cfg(test)]
pub(crate) use memory::MemoryStore;
