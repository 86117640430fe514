//! Idle waiting and interrupt detection

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// What ended an idle wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// The interval passed without anything happening
    Elapsed,
    /// The user asked to stop
    Interrupted,
    /// The display needs a fresh redraw (e.g. terminal resize)
    Refresh,
}

/// Suspension point of the consumer loop.
///
/// `wait` blocks for at most `timeout`; a zero timeout only checks for a
/// pending interrupt.
pub trait IdleWait {
    fn wait(&mut self, timeout: Duration) -> Result<Wake>;
}

/// Sleep-based wait that observes Ctrl-C through a process signal handler.
pub struct SignalWait {
    interrupted: Arc<AtomicBool>,
}

impl SignalWait {
    /// Install the Ctrl-C handler. Only one may be installed per process.
    pub fn install() -> Result<Self> {
        let interrupted = Arc::new(AtomicBool::new(false));
        let flag = interrupted.clone();
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })
        .context("Failed to set Ctrl+C handler")?;

        Ok(Self { interrupted })
    }

    /// Wait driven by an externally owned flag.
    pub fn with_flag(interrupted: Arc<AtomicBool>) -> Self {
        Self { interrupted }
    }
}

impl IdleWait for SignalWait {
    fn wait(&mut self, timeout: Duration) -> Result<Wake> {
        if !timeout.is_zero() && !self.interrupted.load(Ordering::SeqCst) {
            std::thread::sleep(timeout);
        }

        if self.interrupted.load(Ordering::SeqCst) {
            Ok(Wake::Interrupted)
        } else {
            Ok(Wake::Elapsed)
        }
    }
}
