use std::time::Duration;

use serde::Serialize;

use crate::game::GameState;

/// Game facts derived on the latest tick
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub curr_map: String,
    /// `curr_map` differs from the previous tick
    pub map_changed: bool,
    pub game_state: GameState,
    pub counter: i32,
    /// `counter` differs from the previous tick
    pub counter_changed: bool,
    /// Seconds spent on the current map
    pub map_time: f32,
    /// Seconds accumulated on previous maps and attempts
    pub total_time: f32,
}

impl GameSnapshot {
    /// Elapsed game time of the run in seconds
    pub fn game_time(&self) -> f32 {
        if self.game_state.is_playing() {
            self.map_time + self.total_time
        } else {
            self.total_time
        }
    }

    pub fn game_time_duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.game_time()).unwrap_or_default()
    }

    pub fn in_intermission(&self) -> bool {
        !self.game_state.is_playing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_time_while_playing() {
        let snapshot = GameSnapshot {
            map_time: 10.0,
            total_time: 100.0,
            ..Default::default()
        };
        assert_eq!(snapshot.game_time(), 110.0);
    }

    #[test]
    fn test_game_time_in_intermission_ignores_map_time() {
        let snapshot = GameSnapshot {
            game_state: GameState::Intermission,
            map_time: 10.0,
            total_time: 100.0,
            ..Default::default()
        };
        assert_eq!(snapshot.game_time(), 100.0);
        assert!(snapshot.in_intermission());
    }

    #[test]
    fn test_game_time_duration() {
        let snapshot = GameSnapshot {
            total_time: 1.5,
            ..Default::default()
        };
        assert_eq!(snapshot.game_time_duration(), Duration::from_millis(1500));

        let negative = GameSnapshot {
            total_time: -1.0,
            ..Default::default()
        };
        assert_eq!(negative.game_time_duration(), Duration::ZERO);
    }
}
