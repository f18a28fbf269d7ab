// ── Interval poller ──
//
// One background task per mounted page. It fires a fetch immediately, then
// on every interval tick and on demand. Fetches run concurrently in a
// `JoinSet`; each carries the ticket it was issued with, and results are
// folded into the page state through a `SequencedSlot` so an older
// response can never replace a newer one. Stopping the poller (or dropping
// it) cancels the timer and aborts whatever is still in flight.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, watch};
use tokio::task::JoinSet;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::store::{FeedStream, SequencedSlot, Ticket};

/// Handle to a running poll loop over state `S`.
pub struct Poller<S> {
    label: &'static str,
    slot: Arc<SequencedSlot<S>>,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
}

impl<S> Poller<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Start polling.
    ///
    /// `fetch` produces one result per call; `reduce` folds an in-order
    /// result into the state. `interval == None` polls once at start and
    /// then only on [`refresh()`](Self::refresh).
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<T, F, Fut, R>(
        label: &'static str,
        interval: Option<Duration>,
        initial: S,
        fetch: F,
        reduce: R,
    ) -> Self
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        R: Fn(&mut S, T) + Send + Sync + 'static,
    {
        let slot = Arc::new(SequencedSlot::new(initial));
        let refresh = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        tokio::spawn(poll_task(
            label,
            interval,
            Arc::clone(&slot),
            Arc::clone(&refresh),
            cancel.clone(),
            fetch,
            reduce,
        ));
        debug!(feed = label, ?interval, "poller started");

        Self {
            label,
            slot,
            refresh,
            cancel,
        }
    }

    /// Fire a fetch now, independent of the interval.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    /// Latest snapshot.
    pub fn current(&self) -> S {
        self.slot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.slot.subscribe()
    }

    pub fn stream(&self) -> FeedStream<S> {
        FeedStream::new(self.slot.subscribe())
    }

    /// Edit state outside the fetch sequence.
    pub fn modify(&self, f: impl FnOnce(&mut S)) {
        self.slot.modify(f);
    }

    /// Stop the timer and abort in-flight fetches.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            debug!(feed = self.label, "poller stopped");
            self.cancel.cancel();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl<S> Drop for Poller<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn poll_task<S, T, F, Fut, R>(
    label: &'static str,
    interval: Option<Duration>,
    slot: Arc<SequencedSlot<S>>,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
    fetch: F,
    reduce: R,
) where
    T: Send + 'static,
    F: Fn() -> Fut,
    Fut: Future<Output = T> + Send + 'static,
    R: Fn(&mut S, T),
{
    let mut in_flight: JoinSet<(Ticket, T)> = JoinSet::new();
    let mut ticker = interval.map(|period| {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });

    let issue = |in_flight: &mut JoinSet<(Ticket, T)>| {
        let ticket = slot.issue();
        trace!(feed = label, ticket = ticket.get(), "fetch issued");
        let fut = fetch();
        in_flight.spawn(async move { (ticket, fut.await) });
    };

    // An interval's first tick completes immediately and covers the
    // initial fetch; manual-only feeds need it issued explicitly.
    if ticker.is_none() {
        issue(&mut in_flight);
    }

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                match joined {
                    Ok((ticket, result)) => {
                        if !slot.apply(ticket, |state| reduce(state, result)) {
                            debug!(feed = label, ticket = ticket.get(), "dropped stale result");
                        }
                    }
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => warn!(feed = label, error = %e, "fetch task failed"),
                }
            }

            () = refresh.notified() => issue(&mut in_flight),

            () = next_tick(&mut ticker) => issue(&mut in_flight),
        }
    }

    in_flight.abort_all();
    debug!(feed = label, "poll loop exited");
}
