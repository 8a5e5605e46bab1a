//! Black-box tests against the public API only — no access to the
//! private queue/multiplexer/pool internals, matching how a host
//! application would actually use this crate.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use priority_dispatcher::{Dispatcher, ErrorSink, Priority, QueueOptions};

struct CountingSink {
    panics: Arc<AtomicUsize>,
}

impl ErrorSink for CountingSink {
    fn report_panic(&self, _payload: &(dyn Any + Send)) {
        self.panics.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn custom_error_sink_sees_exactly_one_report_per_panic() {
    let panics = Arc::new(AtomicUsize::new(0));
    let sink = Arc::new(CountingSink {
        panics: Arc::clone(&panics),
    });

    let dispatcher = Dispatcher::with_sink(2, default_config(), sink).unwrap();

    for _ in 0..3 {
        dispatcher
            .schedule(Priority::Normal, || panic!("boom"))
            .unwrap();
    }
    for _ in 0..10 {
        dispatcher.schedule(Priority::Normal, || {}).unwrap();
    }

    dispatcher.drain_blocking();
    assert_eq!(panics.load(Ordering::SeqCst), 3);
}

#[test]
fn bounded_high_priority_queue_applies_backpressure() {
    // A single worker, occupied by a barrier task, lets us fill the
    // bounded High queue to capacity and observe a third submit block.
    let mut config = BTreeMap::new();
    config.insert(Priority::High, QueueOptions::bounded(2));
    config.insert(Priority::Normal, QueueOptions::unbounded());
    let dispatcher = Arc::new(Dispatcher::new(1, config).unwrap());

    let barrier = Arc::new(Barrier::new(2));
    let b = Arc::clone(&barrier);
    dispatcher
        .schedule(Priority::Normal, move || {
            b.wait();
        })
        .unwrap();
    thread::sleep(Duration::from_millis(50));

    dispatcher.schedule(Priority::High, || {}).unwrap();
    dispatcher.schedule(Priority::High, || {}).unwrap();

    let unblocked = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let helper_dispatcher = Arc::clone(&dispatcher);
    let helper_unblocked = Arc::clone(&unblocked);
    let helper = thread::spawn(move || {
        helper_dispatcher.schedule(Priority::High, || {}).unwrap();
        helper_unblocked.store(true, Ordering::SeqCst);
    });

    thread::sleep(Duration::from_millis(50));
    assert!(
        !unblocked.load(Ordering::SeqCst),
        "third High submit should still be blocked on the full bounded queue"
    );

    barrier.wait();
    helper.join().unwrap();
    dispatcher.drain_blocking();
    assert!(unblocked.load(Ordering::SeqCst));
}

#[test]
fn dispatcher_remains_usable_across_repeated_drains() {
    let dispatcher = Dispatcher::with_default_config(2).unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    for round in 0..3 {
        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            dispatcher
                .schedule(Priority::Normal, move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }
        dispatcher.drain_blocking();
        assert_eq!(counter.load(Ordering::SeqCst), (round + 1) * 10);
    }
}

fn default_config() -> BTreeMap<Priority, QueueOptions> {
    let mut config = BTreeMap::new();
    config.insert(Priority::High, QueueOptions::bounded(1000));
    config.insert(Priority::Normal, QueueOptions::unbounded());
    config
}
