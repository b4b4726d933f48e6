//! Minimal timer printing starts and splits to the console.

use std::time::{Duration, Instant};

use quakesplit_core::{RunLog, SplitAction, TimerModel, TimerPhase, format_game_time};
use tracing::warn;

pub struct ConsoleTimer {
    phase: TimerPhase,
    started_at: Option<Instant>,
    game_time: Duration,
    game_time_paused: bool,
    splits: usize,
    /// Splits after the start that complete the run
    segments: usize,
    run_log: RunLog,
}

impl ConsoleTimer {
    pub fn new(run_log: RunLog, segments: usize) -> Self {
        Self {
            phase: TimerPhase::NotRunning,
            started_at: None,
            game_time: Duration::ZERO,
            game_time_paused: false,
            splits: 0,
            segments,
            run_log,
        }
    }

    pub fn reset(&mut self) {
        self.phase = TimerPhase::NotRunning;
        self.started_at = None;
        self.game_time = Duration::ZERO;
        self.splits = 0;
        self.run_log.end_run();
        println!("Timer reset");
    }

    pub fn real_time(&self) -> Duration {
        self.started_at.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn game_time(&self) -> Duration {
        self.game_time
    }

    pub fn is_game_time_paused(&self) -> bool {
        self.game_time_paused
    }

    /// Print and log a start or split made during the last tick
    pub fn record(&mut self, action: SplitAction, map: &str) {
        let (kind, label) = match action {
            SplitAction::Start => ("start", "Started".to_string()),
            SplitAction::Split => ("split", format!("Split {}", self.splits)),
        };

        println!(
            "{:<9} {:<6} game {}  real {}",
            label,
            map,
            format_game_time(self.game_time),
            format_game_time(self.real_time())
        );

        if let Err(e) = self.run_log.record(kind, map, self.game_time) {
            warn!("Failed to write run log: {}", e);
        }
        if self.phase == TimerPhase::Ended {
            println!("Run finished in {}", format_game_time(self.game_time));
            self.run_log.end_run();
        }
    }
}

impl TimerModel for ConsoleTimer {
    fn phase(&self) -> TimerPhase {
        self.phase
    }

    fn start(&mut self) {
        if self.phase != TimerPhase::NotRunning {
            return;
        }
        self.phase = TimerPhase::Running;
        self.started_at = Some(Instant::now());
        self.splits = 0;

        match self.run_log.start_run() {
            Ok(path) => tracing::debug!("Logging run to {}", path.display()),
            Err(e) => warn!("Failed to create run log: {}", e),
        }
    }

    fn split(&mut self) {
        if self.phase != TimerPhase::Running {
            return;
        }
        self.splits += 1;
        if self.splits >= self.segments {
            self.phase = TimerPhase::Ended;
        }
    }

    fn set_game_time(&mut self, time: Duration) {
        self.game_time = time;
    }

    fn set_game_time_paused(&mut self, paused: bool) {
        self.game_time_paused = paused;
    }
}
