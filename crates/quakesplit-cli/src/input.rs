use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::shutdown::ShutdownSignal;

/// Requests from the keyboard to the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Start,
    Reset,
}

#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    Quit,
    Command(HostCommand),
    Ignore,
}

/// Spawn a thread that turns key presses into commands.
///
/// - Esc, `q`, `Q`, Ctrl+C: quit
/// - `s`: start the timer by hand
/// - `r`: reset the timer
pub fn spawn_keyboard_monitor(
    shutdown: Arc<ShutdownSignal>,
    commands: Sender<HostCommand>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        debug!("Keyboard monitor started");

        while !shutdown.is_shutdown() {
            // Poll with a timeout so the shutdown flag is rechecked
            if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
                continue;
            }
            let Ok(Event::Key(key_event)) = event::read() else {
                continue;
            };

            match classify(&key_event) {
                KeyAction::Quit => {
                    debug!("Quit key pressed: {:?}", key_event.code);
                    shutdown.trigger();
                    break;
                }
                KeyAction::Command(command) => {
                    if commands.send(command).is_err() {
                        break;
                    }
                }
                KeyAction::Ignore => {}
            }
        }

        debug!("Keyboard monitor stopped");
    })
}

fn classify(event: &KeyEvent) -> KeyAction {
    if event.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }
    match event.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Command(HostCommand::Reset),
        KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Command(HostCommand::Start),
        _ => KeyAction::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(classify(&key(KeyCode::Esc, KeyModifiers::NONE)), KeyAction::Quit);
        assert_eq!(classify(&key(KeyCode::Char('q'), KeyModifiers::NONE)), KeyAction::Quit);
        assert_eq!(classify(&key(KeyCode::Char('Q'), KeyModifiers::SHIFT)), KeyAction::Quit);
        assert_eq!(classify(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)), KeyAction::Quit);
    }

    #[test]
    fn test_command_keys() {
        assert_eq!(
            classify(&key(KeyCode::Char('r'), KeyModifiers::NONE)),
            KeyAction::Command(HostCommand::Reset)
        );
        assert_eq!(
            classify(&key(KeyCode::Char('s'), KeyModifiers::NONE)),
            KeyAction::Command(HostCommand::Start)
        );
    }

    #[test]
    fn test_other_keys_ignored() {
        assert_eq!(classify(&key(KeyCode::Char('c'), KeyModifiers::NONE)), KeyAction::Ignore);
        assert_eq!(classify(&key(KeyCode::Enter, KeyModifiers::NONE)), KeyAction::Ignore);
    }

    #[test]
    fn test_release_ignored() {
        let mut event = key(KeyCode::Char('r'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(classify(&event), KeyAction::Ignore);
    }
}
