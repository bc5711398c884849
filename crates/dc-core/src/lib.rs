//! dc-core: rules engine for a turn-based dungeon crawl
//!
//! Owns the dungeon, the player and the three interaction modes
//! (exploration, monster encounter, vendor shopping). Rendering, input
//! parsing and storage live outside this crate and talk to it through
//! [`GameEngine::step`], the snapshot record and the read-only views.
//!
//! All randomness is drawn from an explicitly passed [`RandomSource`], so
//! a seed plus a command sequence always replays the same game.

pub mod action;
pub mod combat;
pub mod config;
pub mod dungeon;
pub mod event;
pub mod player;
pub mod shop;
pub mod snapshot;
pub mod view;

mod consts;
mod error;
mod gameloop;

pub use consts::*;
pub use error::{ConfigError, CreationError, RoomDecodeError, SnapshotError};
pub use gameloop::{EngineState, GameEngine, Outcome};

pub use dc_rng::{RandomSource, ScriptedRng, SeededRng};
