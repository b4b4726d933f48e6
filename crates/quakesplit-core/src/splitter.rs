//! Tick-driven autosplitter.
//!
//! The host attaches once the game process is found, calls
//! [`AutoSplitter::tick`] once per refresh, forwards timer resets and starts,
//! and detaches when the process exits.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::Result;
use crate::game::{EventMatcher, GameEvent, GameSnapshot, SplitAction, TimingEngine};
use crate::memory::ReadMemory;
use crate::offset::{LayoutTable, VersionLayout, detect_layout};
use crate::settings::SplitterSettings;
use crate::timer::{TimerModel, TimerPhase};

/// State tied to one attached process
#[derive(Debug)]
struct AttachSession {
    process_name: String,
    layout: VersionLayout,
    engine: TimingEngine,
}

pub struct AutoSplitter {
    table: LayoutTable,
    settings: SplitterSettings,
    matcher: EventMatcher,
    session: Option<AttachSession>,
}

impl AutoSplitter {
    pub fn new(table: LayoutTable, settings: SplitterSettings) -> Self {
        let matcher = EventMatcher::new(settings.parsed_events());
        Self {
            table,
            settings,
            matcher,
            session: None,
        }
    }

    /// Detect the layout of a freshly found process and start a session.
    ///
    /// The restart accumulation option is captured here and holds until the
    /// next attach.
    pub fn attach<R: ReadMemory>(&mut self, reader: &R, process_name: &str) -> Result<&VersionLayout> {
        let layout = detect_layout(reader, &self.table, process_name)?;
        let engine = TimingEngine::new(self.settings.accumulate_across_restarts);
        info!("Attached to {} ({})", process_name, layout.version);

        let session = self.session.insert(AttachSession {
            process_name: process_name.to_string(),
            layout,
            engine,
        });
        Ok(&session.layout)
    }

    pub fn detach(&mut self) {
        if let Some(session) = self.session.take() {
            info!("Detached from {}", session.process_name);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.session.is_some()
    }

    pub fn layout(&self) -> Option<&VersionLayout> {
        self.session.as_ref().map(|s| &s.layout)
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.session.as_ref().map(|s| s.engine.snapshot())
    }

    pub fn matcher(&self) -> &EventMatcher {
        &self.matcher
    }

    pub fn settings(&self) -> &SplitterSettings {
        &self.settings
    }

    pub fn table(&self) -> &LayoutTable {
        &self.table
    }

    /// Observe the game once and drive the timer. No-op while detached.
    pub fn tick<R, T>(&mut self, reader: &R, timer: &mut T) -> Option<SplitAction>
    where
        R: ReadMemory,
        T: TimerModel + ?Sized,
    {
        let session = self.session.as_mut()?;

        // Game time only moves when it is published below
        timer.set_game_time_paused(true);

        let snapshot = session.engine.update(reader, &session.layout);
        let run_active = timer.phase() != TimerPhase::NotRunning;

        let action = self.matcher.evaluate(snapshot, run_active);
        match action {
            Some(SplitAction::Start) => {
                timer.set_game_time(Duration::ZERO);
                timer.start();
            }
            Some(SplitAction::Split) => timer.split(),
            None => {}
        }

        if self.settings.update_game_time {
            timer.set_game_time(snapshot.game_time_duration());
        }

        action
    }

    /// The timer was reset
    pub fn on_reset(&mut self) {
        debug!("Timer reset");
        if let Some(session) = self.session.as_mut() {
            session.engine.reset();
        }
        self.matcher.reset();
    }

    /// The timer was started, possibly by hand
    pub fn on_start(&mut self) {
        debug!("Timer started");
        self.matcher.mark_started();
    }

    /// Replace the configured events and rewind to the first one
    pub fn set_events(&mut self, events: Vec<GameEvent>) {
        self.matcher = EventMatcher::new(events);
    }

    /// Apply changed settings; the accumulation option takes effect on the
    /// next attach
    pub fn set_settings(&mut self, settings: SplitterSettings) {
        if settings.events != self.settings.events {
            self.set_events(settings.parsed_events());
        }
        self.settings = settings;
    }
}
