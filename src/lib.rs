//! tailchart - live charts over a newline-delimited JSON feed

pub mod aggregate;
pub mod cli;
pub mod consumer;
pub mod infra;
pub mod record;
pub mod render;
pub mod tui;
pub mod wait;

pub use aggregate::{AggregateSnapshot, AggregateStore, SentimentSeries, Summary};
pub use consumer::{Consumer, LineOutcome, LoopState, ShutdownReason, DEFAULT_POLL_INTERVAL};
pub use infra::{StartAt, TailError, Tailer};
pub use record::{Record, RecordError};
pub use render::{ChartRenderer, LogRenderer};
pub use wait::{IdleWait, SignalWait, Wake};
