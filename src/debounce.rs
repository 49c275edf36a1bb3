//! Turns a fast-changing search box into a committed query.
//!
//! Each non-empty input hands out a ticket; the runtime schedules a single
//! timer per ticket (replacing the previous one) and reports back with
//! [`Debouncer::fire`]. Only the most recent ticket commits, so a timer that
//! escaped cancellation is harmless.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebounceStep {
    /// The input is blank; the committed query is now empty.
    Cleared,
    /// Commit is pending until `ticket` fires after the quiet window.
    Scheduled(u64),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debouncer {
    raw: String,
    committed: String,
    pending: Option<u64>,
    last_ticket: u64,
}

impl Debouncer {
    pub fn input(&mut self, raw: &str) -> DebounceStep {
        self.raw = raw.to_string();
        if raw.trim().is_empty() {
            self.pending = None;
            self.committed.clear();
            return DebounceStep::Cleared;
        }
        self.last_ticket += 1;
        self.pending = Some(self.last_ticket);
        DebounceStep::Scheduled(self.last_ticket)
    }

    /// Returns the newly committed (trimmed) query when `ticket` is still current.
    pub fn fire(&mut self, ticket: u64) -> Option<String> {
        if self.pending != Some(ticket) {
            return None;
        }
        self.pending = None;
        self.committed = self.raw.trim().to_string();
        Some(self.committed.clone())
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn has_searched(&self) -> bool {
        !self.committed.is_empty()
    }
}
