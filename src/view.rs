//! Fetch-cycle bookkeeping shared by the listing and detail views.

/// Identifies one fetch cycle started by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Monotonic cycle counter. Only the most recently issued ticket is current.
#[derive(Debug, Default)]
pub struct Generation {
    current: u64,
    closed: bool,
}

impl Generation {
    /// Issues a ticket that supersedes every earlier one.
    pub fn issue(&mut self) -> Ticket {
        self.current += 1;
        self.closed = false;
        Ticket(self.current)
    }

    /// Whether `ticket` may still write into the view.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        !self.closed && ticket.0 == self.current
    }

    /// Invalidates every outstanding ticket (the view was left).
    pub fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let mut generation = Generation::default();
        let first = generation.issue();
        let second = generation.issue();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn close_invalidates_outstanding_ticket() {
        let mut generation = Generation::default();
        let ticket = generation.issue();
        generation.close();
        assert!(!generation.is_current(ticket));
        let reopened = generation.issue();
        assert!(generation.is_current(reopened));
    }
}
