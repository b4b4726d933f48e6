use tracing::{debug, info};

use crate::game::{GameEvent, GameSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAction {
    Start,
    Split,
}

/// Walks the configured events in order.
///
/// Only the event under the cursor is ever tested, so each event triggers at
/// most once per run. A trailing [`GameEvent::Never`] keeps the cursor in
/// bounds after the last real event.
#[derive(Debug, Clone)]
pub struct EventMatcher {
    events: Vec<GameEvent>,
    cursor: usize,
}

impl EventMatcher {
    pub fn new(mut events: Vec<GameEvent>) -> Self {
        events.push(GameEvent::Never);
        Self { events, cursor: 0 }
    }

    /// Test the pending event against this tick's snapshot
    pub fn evaluate(&mut self, snapshot: &GameSnapshot, run_active: bool) -> Option<SplitAction> {
        let event = self.events.get(self.cursor)?;
        if !event.has_occurred(snapshot) {
            return None;
        }

        let action = if run_active {
            SplitAction::Split
        } else {
            SplitAction::Start
        };
        info!("{} ({:?})", event, action);

        self.cursor += 1;
        Some(action)
    }

    /// Back to the first event
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// The run was started without the first event, expect the second one
    pub fn mark_started(&mut self) {
        if self.cursor == 0 && self.configured_len() > 0 {
            debug!("Run started externally, skipping '{}'", self.events[0]);
            self.cursor = 1;
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn pending(&self) -> Option<&GameEvent> {
        self.events.get(self.cursor)
    }

    /// Number of events excluding the sentinel
    pub fn configured_len(&self) -> usize {
        self.events.len() - 1
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.configured_len()
    }
}

impl Default for EventMatcher {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(map: &str) -> GameSnapshot {
        GameSnapshot {
            curr_map: map.to_string(),
            map_changed: true,
            ..Default::default()
        }
    }

    fn events(maps: &[&str]) -> Vec<GameEvent> {
        maps.iter().map(|m| GameEvent::MapLoaded(m.to_string())).collect()
    }

    #[test]
    fn test_start_then_split() {
        let mut matcher = EventMatcher::new(events(&["e1m1", "e1m2"]));
        assert_eq!(matcher.evaluate(&loaded("e1m1"), false), Some(SplitAction::Start));
        assert_eq!(matcher.evaluate(&loaded("e1m2"), true), Some(SplitAction::Split));
        assert!(matcher.is_finished());
    }

    #[test]
    fn test_only_pending_event_is_tested() {
        let mut matcher = EventMatcher::new(events(&["a", "b", "c"]));

        assert_eq!(matcher.evaluate(&loaded("b"), false), None);
        assert_eq!(matcher.cursor(), 0);

        assert_eq!(matcher.evaluate(&loaded("a"), false), Some(SplitAction::Start));
        assert_eq!(matcher.cursor(), 1);
        assert_eq!(matcher.pending(), Some(&GameEvent::MapLoaded("b".to_string())));

        assert_eq!(matcher.evaluate(&loaded("c"), true), None);
        assert_eq!(matcher.evaluate(&loaded("b"), true), Some(SplitAction::Split));
    }

    #[test]
    fn test_event_fires_at_most_once() {
        let mut matcher = EventMatcher::new(events(&["e1m1"]));
        assert!(matcher.evaluate(&loaded("e1m1"), false).is_some());
        assert!(matcher.evaluate(&loaded("e1m1"), true).is_none());
        assert_eq!(matcher.pending(), Some(&GameEvent::Never));
    }

    #[test]
    fn test_cursor_stops_at_sentinel() {
        let mut matcher = EventMatcher::new(Vec::new());
        for _ in 0..3 {
            assert!(matcher.evaluate(&loaded("e1m1"), true).is_none());
        }
        assert_eq!(matcher.cursor(), 0);
        assert!(matcher.is_finished());
    }

    #[test]
    fn test_reset_rewinds() {
        let mut matcher = EventMatcher::new(events(&["e1m1", "e1m2"]));
        matcher.evaluate(&loaded("e1m1"), false);
        matcher.reset();
        assert_eq!(matcher.cursor(), 0);
        assert_eq!(matcher.evaluate(&loaded("e1m1"), false), Some(SplitAction::Start));
    }

    #[test]
    fn test_mark_started() {
        let mut matcher = EventMatcher::new(events(&["e1m1", "e1m2"]));
        matcher.mark_started();
        assert_eq!(matcher.cursor(), 1);
        // already past the first event, no effect
        matcher.mark_started();
        assert_eq!(matcher.cursor(), 1);

        let mut empty = EventMatcher::default();
        empty.mark_started();
        assert_eq!(empty.cursor(), 0);
    }
}
