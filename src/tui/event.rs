//! Keyboard handling - the dashboard's idle wait

use crate::wait::{IdleWait, Wake};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Poll one terminal event and map it to a wake reason.
///
/// Raw mode swallows SIGINT, so Ctrl-C arrives here as a key press.
pub fn poll_event(timeout: Duration) -> Result<Option<Wake>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    let wake = match event::read()? {
        Event::Key(key) => handle_key(key),
        Event::Resize(_, _) => Some(Wake::Refresh),
        _ => None,
    };
    Ok(wake)
}

pub fn handle_key(key: KeyEvent) -> Option<Wake> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Wake::Interrupted),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Wake::Interrupted),
        KeyCode::Char('r') => Some(Wake::Refresh),
        _ => None,
    }
}

/// Idle wait that doubles as the key poll.
#[derive(Debug, Default)]
pub struct KeyWait;

impl IdleWait for KeyWait {
    fn wait(&mut self, timeout: Duration) -> Result<Wake> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            if let Some(wake) = poll_event(remaining)? {
                return Ok(wake);
            }
            if remaining.is_zero() {
                return Ok(Wake::Elapsed);
            }
        }
    }
}
