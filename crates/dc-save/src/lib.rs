//! dc-save: Save/restore system for the dungeon crawl
//!
//! Wraps an engine [`Snapshot`] in a versioned JSON save file.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dc_core::config::EngineConfig;
use dc_core::snapshot::Snapshot;
use dc_core::{GameEngine, RandomSource, SnapshotError};

/// Current save file format version
pub const SAVE_VERSION: u32 = 1;

/// Save/restore errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Save file not found")]
    NotFound,

    #[error("Incompatible save version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Invalid save file header")]
    InvalidHeader,

    #[error("Saved game rejected: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Save file header, readable without restoring the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveHeader {
    pub magic: String,
    pub version: u32,
    /// One-based floor the player stands on
    pub floor: usize,
    /// Treasures carried at save time
    pub treasures: usize,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
}

impl SaveHeader {
    const MAGIC: &'static str = "DCRS";

    pub fn new(snapshot: &Snapshot) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: SAVE_VERSION,
            floor: snapshot.player.pos.z + 1,
            treasures: snapshot.player.treasures.len(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.magic != Self::MAGIC {
            return Err(SaveError::InvalidHeader);
        }
        if self.version != SAVE_VERSION {
            return Err(SaveError::IncompatibleVersion {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// Complete save file structure
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveFile {
    pub header: SaveHeader,
    pub snapshot: Snapshot,
}

#[derive(Deserialize)]
struct HeaderOnly {
    header: SaveHeader,
}

/// Save a snapshot to a file
pub fn save_game(snapshot: &Snapshot, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let path = path.as_ref();
    let save_file = SaveFile {
        header: SaveHeader::new(snapshot),
        snapshot: snapshot.clone(),
    };

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &save_file)?;
    tracing::info!(target: "dc_save", path = %path.display(), "game saved");
    Ok(())
}

/// Load a snapshot from a file
pub fn load_game(path: impl AsRef<Path>) -> Result<Snapshot, SaveError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|_| SaveError::NotFound)?;
    let reader = BufReader::new(file);
    let save_file: SaveFile = serde_json::from_reader(reader)?;

    save_file.header.validate()?;
    tracing::info!(target: "dc_save", path = %path.display(), "game loaded");
    Ok(save_file.snapshot)
}

/// Load a save file straight into a running engine.
pub fn load_engine<R: RandomSource>(
    path: impl AsRef<Path>,
    config: EngineConfig,
    rng: R,
) -> Result<GameEngine<R>, SaveError> {
    let snapshot = load_game(path)?;
    let engine = GameEngine::restore(snapshot, config, rng).inspect_err(|err| {
        tracing::warn!(target: "dc_save", %err, "save file failed validation");
    })?;
    Ok(engine)
}

/// Load only the header from a save file (for a save browser)
pub fn load_header(path: impl AsRef<Path>) -> Result<SaveHeader, SaveError> {
    let file = File::open(path).map_err(|_| SaveError::NotFound)?;
    let reader = BufReader::new(file);
    let partial: HeaderOnly = serde_json::from_reader(reader)?;
    partial.header.validate()?;
    Ok(partial.header)
}

/// Check if a save file exists
pub fn save_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Delete a save file
pub fn delete_save(path: impl AsRef<Path>) -> Result<(), SaveError> {
    std::fs::remove_file(path)?;
    Ok(())
}

/// Get the default save path for a save name
pub fn default_save_path(name: &str) -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("dungeon-crawl");
    path.push("saves");
    std::fs::create_dir_all(&path).ok();
    path.push(format!("{name}.json"));
    path
}
