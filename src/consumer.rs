//! Consumer loop - tail, parse, aggregate, redraw

use crate::aggregate::AggregateStore;
use crate::infra::tailer::Tailer;
use crate::record::{is_blank, Record};
use crate::render::ChartRenderer;
use crate::wait::{IdleWait, Wake};
use anyhow::{Error, Result};
use std::time::Duration;
use tracing::{debug, error, info};

/// Default delay between polls when no new line is available
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Why the loop stopped
#[derive(Debug)]
pub enum ShutdownReason {
    Interrupted,
    /// I/O on the data file or drawing the chart failed
    Failed(Error),
}

/// Loop state
#[derive(Debug)]
pub enum LoopState {
    WaitingForData,
    ProcessingLine(Vec<u8>),
    ShuttingDown(ShutdownReason),
}

/// Outcome of feeding one line to the aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Record applied, carrying its message index
    Applied(u64),
    /// Line could not be parsed and was dropped
    Rejected,
    /// Whitespace only
    Blank,
}

pub struct Consumer<R, W> {
    tailer: Tailer,
    store: AggregateStore,
    renderer: R,
    waiter: W,
    poll_interval: Duration,
    state: Option<LoopState>,
}

impl<R: ChartRenderer, W: IdleWait> Consumer<R, W> {
    pub fn new(tailer: Tailer, renderer: R, waiter: W) -> Self {
        Self {
            tailer,
            store: AggregateStore::new(),
            renderer,
            waiter,
            poll_interval: DEFAULT_POLL_INTERVAL,
            state: Some(LoopState::WaitingForData),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn store(&self) -> &AggregateStore {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_parts(self) -> (AggregateStore, R) {
        (self.store, self.renderer)
    }

    pub fn state(&self) -> Option<&LoopState> {
        self.state.as_ref()
    }

    pub fn is_shutting_down(&self) -> bool {
        matches!(self.state, Some(LoopState::ShuttingDown(_)) | None)
    }

    /// Run one transition of the state machine.
    pub fn step(&mut self) {
        let next = match self.state.take() {
            Some(LoopState::WaitingForData) => self.poll(),
            Some(LoopState::ProcessingLine(line)) => self.process(&line),
            Some(done @ LoopState::ShuttingDown(_)) => done,
            None => return,
        };
        self.state = Some(next);
    }

    /// Step until shutdown, then let the renderer clean up.
    ///
    /// A user interrupt is a normal exit; I/O and render failures are
    /// returned after cleanup.
    pub fn run(&mut self) -> Result<()> {
        info!(path = %self.tailer.path().display(), "Consumer is ready and waiting for new JSON messages...");

        // Empty panels are visible while waiting for the first record
        if let Err(e) = self.renderer.redraw(&self.store.snapshot()) {
            error!("Unexpected error: {:#}", e);
            self.state = Some(LoopState::ShuttingDown(ShutdownReason::Failed(e)));
        }

        while !self.is_shutting_down() {
            self.step();
        }

        let reason = match self.state.take() {
            Some(LoopState::ShuttingDown(reason)) => reason,
            _ => ShutdownReason::Interrupted,
        };

        let cleanup = self.renderer.finish(&self.store.snapshot());
        info!("Consumer closed.");

        match reason {
            ShutdownReason::Interrupted => cleanup,
            ShutdownReason::Failed(e) => {
                if let Err(cleanup_err) = cleanup {
                    error!("Renderer cleanup failed: {:#}", cleanup_err);
                }
                Err(e)
            }
        }
    }

    /// Parse one line and fold it into the aggregates, redrawing on success.
    ///
    /// Per-line problems never escape; only a render failure does.
    pub fn handle_line(&mut self, line: &[u8]) -> Result<LineOutcome> {
        if is_blank(line) {
            return Ok(LineOutcome::Blank);
        }
        debug!(raw = %String::from_utf8_lossy(line), "Raw message");

        match Record::parse(line) {
            Ok(record) => {
                let index = self.store.apply(&record);
                self.renderer.redraw(&self.store.snapshot())?;
                Ok(LineOutcome::Applied(index))
            }
            Err(e) => {
                error!("Error processing message: {}", e);
                self.store.reject();
                Ok(LineOutcome::Rejected)
            }
        }
    }

    fn poll(&mut self) -> LoopState {
        match self.tailer.next_line() {
            Ok(Some(line)) if !is_blank(&line) => LoopState::ProcessingLine(line),
            Ok(_) => {
                debug!("No new messages. Waiting...");
                self.idle(self.poll_interval)
            }
            Err(e) => {
                error!(path = %self.tailer.path().display(), "Unexpected error reading data file: {}", e);
                LoopState::ShuttingDown(ShutdownReason::Failed(e.into()))
            }
        }
    }

    fn process(&mut self, line: &[u8]) -> LoopState {
        if let Err(e) = self.handle_line(line) {
            error!("Unexpected error: {:#}", e);
            return LoopState::ShuttingDown(ShutdownReason::Failed(e));
        }
        self.idle(Duration::ZERO)
    }

    fn idle(&mut self, timeout: Duration) -> LoopState {
        match self.waiter.wait(timeout) {
            Ok(Wake::Elapsed) => LoopState::WaitingForData,
            Ok(Wake::Interrupted) => {
                info!("Consumer interrupted by user.");
                LoopState::ShuttingDown(ShutdownReason::Interrupted)
            }
            Ok(Wake::Refresh) => match self.renderer.redraw(&self.store.snapshot()) {
                Ok(()) => LoopState::WaitingForData,
                Err(e) => {
                    error!("Unexpected error: {:#}", e);
                    LoopState::ShuttingDown(ShutdownReason::Failed(e))
                }
            },
            Err(e) => {
                error!("Unexpected error: {:#}", e);
                LoopState::ShuttingDown(ShutdownReason::Failed(e))
            }
        }
    }
}
