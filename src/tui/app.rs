//! Terminal chart renderer and terminal setup

use crate::aggregate::AggregateSnapshot;
use crate::render::ChartRenderer;
use crate::tui::ui::{self, Header};
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use std::io::{self, Stdout};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enter raw mode and the alternate screen.
///
/// A failure part way through leaves the terminal as it was found. Also
/// installs a panic hook that restores the terminal before the panic
/// message is printed.
pub fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let stdout = or_undo(
        execute!(io::stdout(), EnterAlternateScreen).map(|_| io::stdout()),
        || {
            let _ = disable_raw_mode();
        },
    )?;
    let terminal = or_undo(Terminal::new(CrosstermBackend::new(stdout)), reset_terminal)?;
    install_panic_hook();
    Ok(terminal)
}

/// Pass `result` through, running `undo` first when it is an error.
fn or_undo<T>(result: io::Result<T>, undo: impl FnOnce()) -> Result<T> {
    result.map_err(|e| {
        undo();
        e.into()
    })
}

/// Leave raw mode and the alternate screen, ignoring errors.
fn reset_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        reset_terminal();
        previous(info);
    }));
}

/// Undo `init_terminal`.
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Two-panel live dashboard drawn with ratatui.
pub struct TerminalChart<B: Backend> {
    terminal: Terminal<B>,
    source: String,
    frames: u64,
}

impl<B: Backend> TerminalChart<B> {
    pub fn new(terminal: Terminal<B>, source: impl Into<String>) -> Self {
        Self {
            terminal,
            source: source.into(),
            frames: 0,
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// Number of frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_terminal(self) -> Terminal<B> {
        self.terminal
    }
}

impl<B: Backend> ChartRenderer for TerminalChart<B> {
    fn redraw(&mut self, snapshot: &AggregateSnapshot<'_>) -> Result<()> {
        let updated_at = chrono::Local::now().format("%H:%M:%S").to_string();
        let header = Header {
            source: &self.source,
            updated_at: &updated_at,
        };
        self.terminal.draw(|frame| ui::render(frame, &header, snapshot))?;
        self.frames += 1;
        Ok(())
    }
}
