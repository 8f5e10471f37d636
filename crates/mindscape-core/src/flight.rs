//! Single-flight guard and session epochs.
//!
//! Each controller owns one `InFlight`; a write only starts if it can take
//! the guard, and the guard is released when the returned `FlightGuard` drops,
//! including on early return.
//!
//! Controllers also own an `Epoch`, bumped whenever they are bound to a user
//! or closed. Work started under an older epoch must not touch current state.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Default)]
pub struct InFlight {
    busy: Rc<Cell<bool>>,
    generation: Rc<Cell<u64>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` if an operation already holds the guard
    pub fn try_begin(&self) -> Option<FlightGuard> {
        if self.busy.replace(true) {
            return None;
        }
        Some(FlightGuard {
            busy: self.busy.clone(),
            generation: self.generation.clone(),
            started: self.generation.get(),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    /// Free the guard for new work. An operation still running keeps its
    /// `FlightGuard`, but dropping it no longer affects this `InFlight`.
    pub fn reset(&self) {
        self.generation.set(self.generation.get() + 1);
        self.busy.set(false);
    }
}

#[must_use = "the operation is only guarded while the FlightGuard is alive"]
pub struct FlightGuard {
    busy: Rc<Cell<bool>>,
    generation: Rc<Cell<u64>>,
    started: u64,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        if self.generation.get() == self.started {
            self.busy.set(false);
        }
    }
}

/// Counter identifying the current binding of a controller
#[derive(Debug, Default)]
pub struct Epoch(Cell<u64>);

impl Epoch {
    /// Start a new epoch and return it
    pub fn advance(&self) -> u64 {
        let next = self.0.get() + 1;
        self.0.set(next);
        next
    }

    pub fn current(&self) -> u64 {
        self.0.get()
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.0.get() == epoch
    }
}

/// How a guarded user action ended
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Preconditions not met (empty input, no session), or the session changed
    /// underneath; nothing was reported
    Skipped,
    /// Another operation held the guard; nothing happened
    Busy,
    Done,
    /// Already reported to the user
    Failed(mindscape_types::AppError),
}

impl Outcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done)
    }
}
