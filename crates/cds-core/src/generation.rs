//! Last-issued-wins guard for asynchronous completions.
//!
//! Each view slot (query result, interaction results, guideline detail, ...)
//! owns one `Generation`. Issuing a request takes a `Ticket`; when the
//! response arrives it is applied only if its ticket is still the latest one
//! issued for that slot. Resolution order does not matter.
//!
//! `Slot<T>` bundles a generation with the value, loading flag and
//! user-facing error of one slot, which is what every flow actually holds.

use std::fmt;

use tracing::{debug, error};

use cds_contracts::error::CdsResult;

/// Identifies one issued request within a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A monotonically increasing request counter for one view slot.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket. Every ticket issued earlier becomes stale.
    pub fn issue(&mut self) -> Ticket {
        self.current += 1;
        Ticket(self.current)
    }

    /// True only for the most recently issued ticket.
    pub fn accept(&self, ticket: Ticket) -> bool {
        self.current != 0 && ticket.0 == self.current
    }

    /// Invalidate every outstanding ticket without issuing a new request.
    ///
    /// Used when the slot is reset (clear form, navigation) so in-flight
    /// completions land nowhere.
    pub fn invalidate(&mut self) {
        self.current += 1;
    }
}

/// What happened to a completion handed back to its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request was issued after this one; the result was dropped.
    Stale,
}

impl Completion {
    pub fn is_applied(self) -> bool {
        matches!(self, Completion::Applied)
    }
}

// ── Slot ─────────────────────────────────────────────────────────────────────

/// One asynchronously loaded value plus its request bookkeeping.
///
/// A failed load keeps the previous value and sets `error`; the next
/// `begin` clears the error.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    name: &'static str,
    generation: Generation,
    value: Option<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> Slot<T> {
    /// `name` only appears in log events.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            generation: Generation::new(),
            value: None,
            loading: false,
            error: None,
        }
    }

    /// Start a request for this slot and return its ticket.
    pub fn begin(&mut self) -> Ticket {
        let ticket = self.generation.issue();
        self.loading = true;
        self.error = None;
        debug!(slot = self.name, ticket = %ticket, "request issued");
        ticket
    }

    /// Apply a completion if `ticket` is still current.
    pub fn complete(&mut self, ticket: Ticket, result: CdsResult<T>) -> Completion {
        if !self.generation.accept(ticket) {
            debug!(slot = self.name, ticket = %ticket, "discarding stale completion");
            return Completion::Stale;
        }

        self.loading = false;
        match result {
            Ok(value) => {
                self.value = Some(value);
                self.error = None;
            }
            Err(e) => {
                error!(slot = self.name, ticket = %ticket, error = %e, "request failed");
                self.error = Some(e.user_message());
            }
        }
        Completion::Applied
    }

    /// Drop the value and error and orphan any in-flight request.
    pub fn reset(&mut self) {
        self.generation.invalidate();
        self.value = None;
        self.loading = false;
        self.error = None;
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use cds_contracts::error::{CdsError, GENERIC_ERROR_MESSAGE};

    use super::*;

    #[test]
    fn latest_ticket_is_accepted() {
        let mut g = Generation::new();
        let t = g.issue();
        assert!(g.accept(t));
    }

    #[test]
    fn older_ticket_is_rejected_even_if_it_resolves_last() {
        let mut g = Generation::new();
        let first = g.issue();
        let second = g.issue();

        // second resolves first, then first resolves.
        assert!(g.accept(second));
        assert!(!g.accept(first));
    }

    #[test]
    fn invalidate_rejects_everything_outstanding() {
        let mut g = Generation::new();
        let t = g.issue();
        g.invalidate();
        assert!(!g.accept(t));

        let fresh = g.issue();
        assert!(g.accept(fresh));
        assert!(fresh > t);
    }

    #[test]
    fn ticket_displays_with_hash() {
        let mut g = Generation::new();
        assert_eq!(g.issue().to_string(), "#1");
    }

    // ── Slot ─────────────────────────────────────────────────────────────────

    #[test]
    fn slot_applies_current_completion() {
        let mut slot: Slot<u32> = Slot::new("numbers");
        let t = slot.begin();
        assert!(slot.is_loading());

        assert_eq!(slot.complete(t, Ok(7)), Completion::Applied);
        assert_eq!(slot.value(), Some(&7));
        assert!(!slot.is_loading());
    }

    #[test]
    fn slot_stale_completion_never_overwrites() {
        let mut slot: Slot<&str> = Slot::new("detail");
        let old = slot.begin();
        let new = slot.begin();

        assert_eq!(slot.complete(new, Ok("newer")), Completion::Applied);
        assert_eq!(slot.complete(old, Ok("older")), Completion::Stale);
        assert_eq!(slot.value(), Some(&"newer"));
    }

    #[test]
    fn slot_error_keeps_previous_value() {
        let mut slot: Slot<u32> = Slot::new("numbers");
        let t = slot.begin();
        slot.complete(t, Ok(1));

        let t = slot.begin();
        slot.complete(t, Err(CdsError::Transport { reason: "refused".into() }));

        assert_eq!(slot.value(), Some(&1));
        assert_eq!(slot.error(), Some(GENERIC_ERROR_MESSAGE));

        // A new request clears the banner.
        slot.begin();
        assert_eq!(slot.error(), None);
    }

    #[test]
    fn slot_reset_orphans_in_flight_request() {
        let mut slot: Slot<u32> = Slot::new("numbers");
        let t = slot.begin();
        slot.reset();

        assert_eq!(slot.complete(t, Ok(3)), Completion::Stale);
        assert_eq!(slot.value(), None);
        assert!(!slot.is_loading());
    }
}
