//! Terminal dashboard

mod app;
mod event;
mod ui;

#[cfg(test)]
mod tests;

pub use app::{init_terminal, restore_terminal, TerminalChart, Tui};
pub use event::{handle_key, poll_event, KeyWait};
pub use ui::{render, Header};
