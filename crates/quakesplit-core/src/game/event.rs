//! Events a run can start or split on.
//!
//! Events are identified by short string ids in the settings document:
//!
//! | id                        | event                                  |
//! |---------------------------|----------------------------------------|
//! | `map_loaded:<map>`        | `<map>` was just loaded                |
//! | `map_changed`             | any map was just loaded                |
//! | `counter_incremented:<map>` | a new game was spawned on `<map>`    |
//! | `shub_niggurath_dead`     | final boss defeated                    |
//! | `never`                   | never occurs                           |
//!
//! Older settings used `loaded_map_<map>` and `empty`; both are still read.

use std::fmt;

use strum::{EnumString, IntoStaticStr};
use tracing::warn;

use crate::config::maps::{END_MAP, EPISODE_MAPS, START_MAP};
use crate::game::{GameSnapshot, GameState};

const MAP_LOADED_PREFIX: &str = "map_loaded:";
const COUNTER_PREFIX: &str = "counter_incremented:";
const LEGACY_MAP_LOADED_PREFIX: &str = "loaded_map_";
const LEGACY_EMPTY: &str = "empty";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
pub enum TerminalCondition {
    #[strum(serialize = "shub_niggurath_dead")]
    ShubNiggurathDefeated,
}

impl TerminalCondition {
    pub fn id(&self) -> &'static str {
        self.into()
    }

    fn has_occurred(&self, snapshot: &GameSnapshot) -> bool {
        match self {
            Self::ShubNiggurathDefeated => {
                snapshot.curr_map == END_MAP
                    && snapshot.game_state == GameState::IntermissionText
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameEvent {
    MapLoaded(String),
    MapChanged,
    CounterIncrementedOnMap(String),
    Terminal(TerminalCondition),
    Never,
}

impl GameEvent {
    pub fn has_occurred(&self, snapshot: &GameSnapshot) -> bool {
        match self {
            Self::MapLoaded(map) => snapshot.map_changed && snapshot.curr_map == *map,
            Self::MapChanged => snapshot.map_changed && !snapshot.curr_map.is_empty(),
            Self::CounterIncrementedOnMap(map) => {
                snapshot.counter_changed && snapshot.curr_map == *map
            }
            Self::Terminal(condition) => condition.has_occurred(snapshot),
            Self::Never => false,
        }
    }

    pub fn id(&self) -> String {
        match self {
            Self::MapLoaded(map) => format!("{}{}", MAP_LOADED_PREFIX, map),
            Self::MapChanged => "map_changed".to_string(),
            Self::CounterIncrementedOnMap(map) => format!("{}{}", COUNTER_PREFIX, map),
            Self::Terminal(condition) => condition.id().to_string(),
            Self::Never => "never".to_string(),
        }
    }

    /// Parse a current or legacy id
    pub fn parse(id: &str) -> Option<Self> {
        let id = id.trim();
        if let Some(map) = id.strip_prefix(MAP_LOADED_PREFIX) {
            return (!map.is_empty()).then(|| Self::MapLoaded(map.to_string()));
        }
        if let Some(map) = id.strip_prefix(COUNTER_PREFIX) {
            return (!map.is_empty()).then(|| Self::CounterIncrementedOnMap(map.to_string()));
        }
        if let Some(map) = id.strip_prefix(LEGACY_MAP_LOADED_PREFIX) {
            return (!map.is_empty()).then(|| Self::MapLoaded(map.to_string()));
        }
        match id {
            "map_changed" => Some(Self::MapChanged),
            "never" | LEGACY_EMPTY => Some(Self::Never),
            other => other.parse::<TerminalCondition>().ok().map(Self::Terminal),
        }
    }

    /// Parse an id from settings; unrecognized ids become [`GameEvent::Never`]
    pub fn from_id(id: &str) -> Self {
        Self::parse(id).unwrap_or_else(|| {
            warn!("Unknown event id '{}', it will never occur", id);
            Self::Never
        })
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::MapLoaded(_) => "A certain map was loaded.",
            Self::MapChanged => "Any map was loaded.",
            Self::CounterIncrementedOnMap(_) => "A new game was started on a certain map.",
            Self::Terminal(TerminalCondition::ShubNiggurathDefeated) => {
                "Player defeated Shub-Niggurath."
            }
            Self::Never => "Never occurs.",
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MapLoaded(map) => write!(f, "Map '{}' was loaded", map),
            Self::MapChanged => write!(f, "Map changed"),
            Self::CounterIncrementedOnMap(map) => write!(f, "New game on '{}'", map),
            Self::Terminal(TerminalCondition::ShubNiggurathDefeated) => {
                write!(f, "Shub-Niggurath dead")
            }
            Self::Never => write!(f, "Never"),
        }
    }
}

/// Every event a user can pick, built once at startup
#[derive(Debug, Clone)]
pub struct EventCatalog {
    events: Vec<GameEvent>,
}

impl EventCatalog {
    pub fn build() -> Self {
        let mut events: Vec<GameEvent> = std::iter::once(START_MAP)
            .chain(EPISODE_MAPS.iter().copied())
            .chain(std::iter::once(END_MAP))
            .map(|map| GameEvent::MapLoaded(map.to_string()))
            .collect();

        events.push(GameEvent::MapChanged);
        events.push(GameEvent::CounterIncrementedOnMap(START_MAP.to_string()));
        events.push(GameEvent::Terminal(TerminalCondition::ShubNiggurathDefeated));

        Self { events }
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&GameEvent> {
        let event = GameEvent::parse(id)?;
        self.events.iter().find(|e| **e == event)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
