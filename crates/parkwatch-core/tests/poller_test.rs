#![allow(clippy::unwrap_used)]
// Poller timing and ordering tests on a paused clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::time::sleep;

use parkwatch_core::Poller;

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

#[tokio::test(start_paused = true)]
async fn fetches_immediately_then_on_every_tick() {
    let calls = counter();
    let seen = Arc::clone(&calls);

    let poller = Poller::spawn(
        "test",
        Some(Duration::from_secs(5)),
        0_usize,
        move || {
            let n = seen.fetch_add(1, Ordering::SeqCst) + 1;
            async move { n }
        },
        |state, n| *state = n,
    );

    sleep(Duration::from_secs(1)).await;
    assert_eq!(poller.current(), 1);

    sleep(Duration::from_secs(5)).await;
    assert_eq!(poller.current(), 2);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(poller.current(), 4);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn slow_older_response_never_overwrites_newer() {
    let calls = counter();
    let seen = Arc::clone(&calls);

    let poller = Poller::spawn(
        "test",
        None,
        "initial",
        move || {
            let n = seen.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    sleep(Duration::from_secs(3)).await;
                    "slow"
                } else {
                    sleep(Duration::from_secs(1)).await;
                    "fast"
                }
            }
        },
        |state, value| *state = value,
    );

    // Let the initial fetch start, then overlap it with a manual refresh.
    sleep(Duration::from_millis(10)).await;
    poller.refresh();

    sleep(Duration::from_secs(2)).await;
    assert_eq!(poller.current(), "fast");

    sleep(Duration::from_secs(5)).await;
    assert_eq!(poller.current(), "fast");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn manual_feed_fetches_once_until_refreshed() {
    let calls = counter();
    let seen = Arc::clone(&calls);

    let poller = Poller::spawn(
        "test",
        None,
        0_usize,
        move || {
            let n = seen.fetch_add(1, Ordering::SeqCst) + 1;
            async move { n }
        },
        |state, n| *state = n,
    );

    sleep(Duration::from_secs(60)).await;
    assert_eq!(poller.current(), 1);

    poller.refresh();
    sleep(Duration::from_millis(10)).await;
    assert_eq!(poller.current(), 2);
}

#[tokio::test(start_paused = true)]
async fn stop_aborts_in_flight_fetch() {
    let completed = counter();
    let done = Arc::clone(&completed);

    let poller = Poller::spawn(
        "test",
        Some(Duration::from_secs(5)),
        0_usize,
        move || {
            let done = Arc::clone(&done);
            async move {
                sleep(Duration::from_secs(2)).await;
                done.fetch_add(1, Ordering::SeqCst);
                1_usize
            }
        },
        |state, n| *state = n,
    );

    sleep(Duration::from_millis(100)).await;
    poller.stop();
    assert!(poller.is_stopped());

    sleep(Duration::from_secs(20)).await;
    assert_eq!(poller.current(), 0);
    assert_eq!(completed.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_poller_closes_subscriptions() {
    let poller = Poller::spawn(
        "test",
        Some(Duration::from_secs(5)),
        0_usize,
        || async {
            sleep(Duration::from_secs(2)).await;
            1_usize
        },
        |state, n| *state = n,
    );
    let mut rx = poller.subscribe();

    sleep(Duration::from_millis(100)).await;
    drop(poller);

    assert!(rx.changed().await.is_err(), "no update may land after drop");
    assert_eq!(*rx.borrow(), 0);
}
