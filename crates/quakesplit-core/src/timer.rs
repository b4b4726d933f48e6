use std::time::Duration;

use serde::Serialize;
use strum::{Display, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, IntoStaticStr)]
pub enum TimerPhase {
    #[default]
    NotRunning,
    Running,
    Paused,
    Ended,
}

/// The host timer driven by the splitter
pub trait TimerModel {
    fn phase(&self) -> TimerPhase;

    fn start(&mut self);

    fn split(&mut self);

    fn set_game_time(&mut self, time: Duration);

    fn set_game_time_paused(&mut self, paused: bool);
}
