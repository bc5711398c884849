//! Engine configuration
//!
//! Every field has a default, so a config file only needs to name what it
//! changes.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::player::Race;
use crate::shop::PriceList;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Race of the rolled character for a new game.
    pub race: Race,
    /// Emit `Event::Debug` for room entries and relocations.
    pub debug_events: bool,
    pub prices: PriceList,
}

impl EngineConfig {
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
