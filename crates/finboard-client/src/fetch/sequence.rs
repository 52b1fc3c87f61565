use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Orders overlapping refreshes. Every trigger takes a ticket; a response may
/// update state only if no newer ticket has been applied before it.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl RequestSequencer {
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Marks `ticket` as applied and returns true, or returns false when the
    /// response is stale.
    pub fn try_apply(&self, ticket: RequestTicket) -> bool {
        let previous = self.applied.fetch_max(ticket.0, Ordering::SeqCst);
        previous < ticket.0
    }

    pub fn last_applied(&self) -> u64 {
        self.applied.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::RequestSequencer;

    #[test]
    fn late_responses_from_older_triggers_are_discarded() {
        let sequencer = RequestSequencer::default();
        let slow = sequencer.issue();
        let fast = sequencer.issue();
        assert!(slow < fast);

        assert!(sequencer.try_apply(fast));
        assert!(!sequencer.try_apply(slow));
        assert_eq!(sequencer.last_applied(), fast.value());
    }

    #[test]
    fn in_order_responses_all_apply_once() {
        let sequencer = RequestSequencer::default();
        let first = sequencer.issue();
        let second = sequencer.issue();

        assert!(sequencer.try_apply(first));
        assert!(sequencer.try_apply(second));
        assert!(!sequencer.try_apply(second));
    }
}
