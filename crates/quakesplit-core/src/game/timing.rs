//! Game time reconciliation.
//!
//! The game only exposes per-map time while playing and a total (qdqstats)
//! during intermissions, and both go backwards on quickloads and restarts.
//! [`TimingEngine`] turns one [`TickReading`] per tick into a
//! [`GameSnapshot`] whose game time never moves backward within a run.
//!
//! Per tick:
//!
//! 1. counter and map name are compared with the previous tick
//! 2. game state is updated (unreadable or unknown values keep the old one)
//! 3. in an intermission, total time comes from the game's time for the
//!    finished map plus `saved_total_time`, or from the last map time when
//!    that is unavailable; it never drops below the last published game time
//! 4. leaving an intermission carries the total into `saved_total_time`
//! 5. while playing, a drop in map time may be folded into the total, and the
//!    raw value is only trusted once it has been reset after a map load

use tracing::debug;

use crate::config::limits::MAP_NAME_LEN;
use crate::config::maps::START_MAP;
use crate::config::thresholds::{MAP_TIME_SETTLE_SECS, RESTART_TOLERANCE_SECS};
use crate::error::Result;
use crate::game::{GameSnapshot, GameState};
use crate::memory::ReadMemory;
use crate::offset::VersionLayout;

/// Raw values read on one tick; `None` means the read failed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReading {
    pub counter: Option<i32>,
    pub map: Option<String>,
    pub game_state: Option<i32>,
    pub map_time: Option<f32>,
    pub total_time: Option<f32>,
}

impl TickReading {
    pub fn read<R: ReadMemory>(reader: &R, layout: &VersionLayout) -> Self {
        Self {
            counter: layout
                .counter
                .as_ref()
                .and_then(|p| field("counter", p.deref::<i32, _>(reader))),
            map: field("map name", layout.map_name.deref_string(reader, MAP_NAME_LEN)),
            game_state: field("game state", layout.game_state.deref::<i32, _>(reader)),
            map_time: field("map time", layout.map_time.deref::<f32, _>(reader)),
            total_time: field("total time", layout.total_time.deref::<f32, _>(reader)),
        }
    }
}

/// Unreadable memory is expected between ticks; anything else is worth a log line
fn field<T>(name: &str, value: Result<T>) -> Option<T> {
    match value {
        Ok(value) => Some(value),
        Err(e) if e.is_transient() => None,
        Err(e) => {
            debug!("Skipping {} this tick: {}", name, e);
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimingEngine {
    snapshot: GameSnapshot,
    /// Time accrued before the game's own total was last reset: earlier maps,
    /// folded restarts, and any shortfall of a lagging read
    saved_total_time: f32,
    accumulate_across_restarts: bool,
    counter_primed: bool,
}

impl TimingEngine {
    pub fn new(accumulate_across_restarts: bool) -> Self {
        Self {
            snapshot: GameSnapshot::default(),
            saved_total_time: 0.0,
            accumulate_across_restarts,
            counter_primed: false,
        }
    }

    pub fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }

    pub fn saved_total_time(&self) -> f32 {
        self.saved_total_time
    }

    /// Read the game and advance one tick
    pub fn update<R: ReadMemory>(&mut self, reader: &R, layout: &VersionLayout) -> &GameSnapshot {
        let reading = TickReading::read(reader, layout);
        self.apply(&reading)
    }

    /// Advance one tick from already-read values
    pub fn apply(&mut self, reading: &TickReading) -> &GameSnapshot {
        let published = self.snapshot.game_time();
        let was_playing = self.snapshot.game_state.is_playing();

        self.update_counter(reading.counter);
        self.update_map(reading.map.as_deref());
        self.update_state(reading.game_state);

        if self.snapshot.game_state.is_playing() {
            if !was_playing {
                // The game's own figure only covers the next map
                self.saved_total_time = self.snapshot.total_time;
            }
            self.update_playing(reading.map_time);
        } else {
            self.update_intermission(reading.total_time, published);
        }

        &self.snapshot
    }

    /// Zero all times for a new run.
    ///
    /// The current map and counter are kept so the next tick does not report
    /// a change that did not happen.
    pub fn reset(&mut self) {
        self.snapshot.map_time = 0.0;
        self.snapshot.total_time = 0.0;
        self.saved_total_time = 0.0;
        self.snapshot.map_changed = false;
        self.snapshot.counter_changed = false;
        self.snapshot.game_state = GameState::Playing;
    }

    fn update_counter(&mut self, counter: Option<i32>) {
        let Some(counter) = counter else {
            self.snapshot.counter_changed = false;
            return;
        };

        // The first value after attach is a baseline, not an increment
        self.snapshot.counter_changed = self.counter_primed && counter != self.snapshot.counter;
        if self.snapshot.counter_changed {
            debug!("Counter {} -> {}", self.snapshot.counter, counter);
        }
        self.snapshot.counter = counter;
        self.counter_primed = true;
    }

    fn update_map(&mut self, map: Option<&str>) {
        match map {
            Some(map) if map != self.snapshot.curr_map => {
                debug!("Map '{}' -> '{}'", self.snapshot.curr_map, map);
                self.snapshot.curr_map = map.to_string();
                self.snapshot.map_changed = true;
            }
            _ => self.snapshot.map_changed = false,
        }
    }

    fn update_state(&mut self, raw: Option<i32>) {
        let Some(state) = raw.and_then(GameState::from_i32) else {
            return;
        };
        if state != self.snapshot.game_state {
            debug!("Game state {} -> {}", self.snapshot.game_state, state);
            self.snapshot.game_state = state;
        }
    }

    fn update_intermission(&mut self, authoritative: Option<f32>, published: f32) {
        match authoritative {
            Some(value) if value > 0.0 => {
                let candidate = value + self.saved_total_time;
                if candidate < published {
                    debug!("Game total {} behind published {}", candidate, published);
                    self.saved_total_time += published - candidate;
                    self.snapshot.total_time = published;
                } else {
                    self.snapshot.total_time = candidate;
                }
            }
            _ => self.snapshot.total_time += self.snapshot.map_time,
        }
        self.snapshot.map_time = 0.0;
    }

    fn update_playing(&mut self, raw: Option<f32>) {
        if let Some(raw) = raw {
            if self.accumulate_across_restarts
                && raw < self.snapshot.map_time - RESTART_TOLERANCE_SECS
            {
                debug!(
                    "Map time dropped {} -> {}, keeping {}s",
                    self.snapshot.map_time, raw, self.snapshot.map_time
                );
                self.snapshot.total_time += self.snapshot.map_time;
                self.saved_total_time = self.snapshot.total_time;
            }

            // Right after a load the field still holds the previous map's time
            if self.snapshot.map_time != 0.0 || raw < MAP_TIME_SETTLE_SECS {
                self.snapshot.map_time = raw;
            }
        }

        if self.snapshot.curr_map == START_MAP {
            self.snapshot.map_time = 0.0;
        }
    }
}

impl Default for TimingEngine {
    fn default() -> Self {
        Self::new(false)
    }
}
