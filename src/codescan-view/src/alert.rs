//! Decode alert feedback
//!
//! The "vibrate on scan" behavior behind a seam, so hosts can plug in
//! whatever feedback their platform offers and tests can observe it.

use std::io::Write;

use tracing::warn;

/// Short feedback emitted once per reported decode.
pub trait Alert {
    fn alert(&mut self);
}

/// No feedback at all
pub struct Silent;

impl Alert for Silent {
    fn alert(&mut self) {}
}

/// Rings the terminal bell
pub struct TerminalBell;

impl Alert for TerminalBell {
    fn alert(&mut self) {
        let mut stdout = std::io::stdout();
        if stdout.write_all(b"\x07").and_then(|_| stdout.flush()).is_err() {
            warn!("failed to ring terminal bell");
        }
    }
}
