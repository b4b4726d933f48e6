use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::game::GameEvent;

/// User settings persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterSettings {
    /// Event ids in split order; the first one starts the timer
    pub events: Vec<String>,
    /// Publish game time to the timer every tick
    pub update_game_time: bool,
    /// Keep counting time lost to quickloads and in-map restarts
    pub accumulate_across_restarts: bool,
}

impl Default for SplitterSettings {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            update_game_time: true,
            accumulate_across_restarts: false,
        }
    }
}

impl SplitterSettings {
    /// A full-game run: start on e1m1, split on every episode hub and the boss
    pub fn full_game() -> Self {
        Self {
            events: vec![
                "map_loaded:e1m1".to_string(),
                "map_loaded:e2m1".to_string(),
                "map_loaded:e3m1".to_string(),
                "map_loaded:e4m1".to_string(),
                "map_loaded:end".to_string(),
                "shub_niggurath_dead".to_string(),
            ],
            ..Default::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load settings, or defaults if the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(settings) => Ok(settings),
            Err(e) if e.is_not_found() => {
                info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Parsed events; unknown ids become [`GameEvent::Never`]
    pub fn parsed_events(&self) -> Vec<GameEvent> {
        self.events.iter().map(|id| GameEvent::from_id(id)).collect()
    }
}
