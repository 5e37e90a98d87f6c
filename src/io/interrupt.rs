//! Ctrl-C handling for the run loop.
//!
//! The handler only raises a flag; the loop observes it at the attempt
//! boundary and goes through the normal finalize/export path, so partial
//! results are never lost to an interrupt.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};

/// Shared flag raised when the user interrupts the run.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Install a Ctrl-C handler that raises `flag`.
pub fn install_handler(flag: &InterruptFlag) -> Result<()> {
    let flag = flag.clone();
    ctrlc::set_handler(move || {
        eprintln!("\ninterrupt received, finishing current attempt and exporting...");
        flag.raise();
    })
    .context("install interrupt handler")
}
