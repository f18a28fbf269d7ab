use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

/// Sequence number handed out when a fetch is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Snapshot slot that only accepts results newer than the last one applied.
///
/// Fetches may overlap; each takes a [`Ticket`] at issue time and the slot
/// drops any result whose ticket is not newer than the last applied one, so
/// a slow response can never overwrite a fresher snapshot.
#[derive(Debug)]
pub struct SequencedSlot<S> {
    tx: watch::Sender<S>,
    issued: AtomicU64,
    applied: AtomicU64,
}

impl<S> SequencedSlot<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _) = watch::channel(initial);
        Self {
            tx,
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    /// Take the next ticket.
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Apply `f` if `ticket` is newer than the last applied ticket.
    ///
    /// Returns `false` when the result was stale and dropped.
    pub fn apply(&self, ticket: Ticket, f: impl FnOnce(&mut S)) -> bool {
        let mut f = Some(f);
        // `send_if_modified` holds the write lock, which serializes the
        // compare-and-store on `applied`.
        self.tx.send_if_modified(|state| {
            if ticket.0 <= self.applied.load(Ordering::SeqCst) {
                return false;
            }
            self.applied.store(ticket.0, Ordering::SeqCst);
            if let Some(f) = f.take() {
                f(state);
            }
            true
        })
    }

    /// Edit local state outside the fetch sequence (e.g. the selected page).
    pub fn modify(&self, f: impl FnOnce(&mut S)) {
        self.tx.send_modify(f);
    }

    /// Last applied ticket, if any.
    pub fn last_applied(&self) -> Option<Ticket> {
        match self.applied.load(Ordering::SeqCst) {
            0 => None,
            n => Some(Ticket(n)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    pub fn borrow(&self) -> watch::Ref<'_, S> {
        self.tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_wins() {
        let slot = SequencedSlot::new(0_u32);
        let first = slot.issue();
        let second = slot.issue();

        assert!(slot.apply(second, |s| *s = 2));
        assert!(!slot.apply(first, |s| *s = 1), "stale result must be dropped");
        assert_eq!(*slot.borrow(), 2);
        assert_eq!(slot.last_applied(), Some(second));
    }

    #[test]
    fn in_order_results_all_apply() {
        let slot = SequencedSlot::new(Vec::new());
        let a = slot.issue();
        let b = slot.issue();
        assert!(slot.apply(a, |s| s.push("a")));
        assert!(slot.apply(b, |s| s.push("b")));
        assert_eq!(*slot.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn same_ticket_applies_once() {
        let slot = SequencedSlot::new(0_u32);
        let t = slot.issue();
        assert!(slot.apply(t, |s| *s += 1));
        assert!(!slot.apply(t, |s| *s += 1));
        assert_eq!(*slot.borrow(), 1);
    }

    #[test]
    fn modify_does_not_consume_tickets() {
        let slot = SequencedSlot::new(0_u32);
        let t = slot.issue();
        slot.modify(|s| *s = 10);
        assert!(slot.apply(t, |s| *s += 1));
        assert_eq!(*slot.borrow(), 11);
    }

    #[tokio::test]
    async fn subscribers_see_applied_results() {
        let slot = SequencedSlot::new(0_u32);
        let mut rx = slot.subscribe();
        let t = slot.issue();
        slot.apply(t, |s| *s = 5);
        rx.changed().await.expect("sender alive");
        assert_eq!(*rx.borrow_and_update(), 5);
    }
}
