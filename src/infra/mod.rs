//! Infrastructure layer - file access

pub mod tailer;

pub use tailer::{StartAt, TailError, Tailer};
