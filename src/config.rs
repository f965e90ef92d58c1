use std::path::PathBuf;

use bracket_random::prelude::RandomNumberGenerator;
use clap::Parser;

use crate::{
    map::RandomSource,
    persistence::{JsonFileStore, SAVE_FILE_NAME},
};

pub const DATA_DIR_VAR: &str = "HEXWANDER_DATA_DIR";
pub const SEED_VAR: &str = "HEXWANDER_SEED";
pub const DEFAULT_DATA_DIR: &str = ".hexwander";

/// Walk the stacks of a hex-grid library
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "hexwander")]
#[command(about = "Walk a procedurally wired hex-grid library")]
pub struct Args {
    /// Run the direction script at this path instead of opening the terminal
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Directory holding the save file
    #[arg(long, env = DATA_DIR_VAR, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Fixed seed for exit rolls (clock-seeded when absent)
    #[arg(long, env = SEED_VAR)]
    pub seed: Option<u64>,
}

/// Where a session is saved and how its world is rolled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub data_dir: PathBuf,
    pub file_name: String,
    /// Fixed seed for exit rolls; `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            file_name: SAVE_FILE_NAME.to_string(),
            seed: None,
        }
    }
}

impl From<&Args> for SessionConfig {
    fn from(args: &Args) -> Self {
        Self {
            data_dir: args.data_dir.clone(),
            seed: args.seed,
            ..Self::default()
        }
    }
}

impl SessionConfig {
    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.data_dir, &self.file_name)
    }

    pub fn random_source(&self) -> Box<dyn RandomSource> {
        match self.seed {
            Some(seed) => Box::new(RandomNumberGenerator::seeded(seed)),
            None => Box::new(RandomNumberGenerator::new()),
        }
    }
}
