//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Generous bound used wherever a test must prove "does not hang".
pub const HANG_TIMEOUT: Duration = Duration::from_secs(10);

/// Run `f` on its own thread and fail the test if it does not finish in time.
pub fn within<T, F>(timeout: Duration, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    match rx.recv_timeout(timeout) {
        Ok(v) => v,
        Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
            panic!("operation did not finish within {timeout:?}")
        }
        Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
            panic!("operation panicked")
        }
    }
}

/// Source that counts how many elements were read from it.
pub struct CountingSource<T> {
    items: std::vec::IntoIter<T>,
    reads: Arc<AtomicUsize>,
}

impl<T> CountingSource<T> {
    pub fn new(items: Vec<T>) -> (Self, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        (
            Self {
                items: items.into_iter(),
                reads: Arc::clone(&reads),
            },
            reads,
        )
    }
}

impl<T> Iterator for CountingSource<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let item = self.items.next();
        if item.is_some() {
            self.reads.fetch_add(1, Ordering::SeqCst);
        }
        item
    }
}

pub fn reads(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

/// `1..=total`, failing with an I/O error once `good` elements were produced.
pub fn failing_source(good: u32, total: u32) -> impl Iterator<Item = Result<u32, io::Error>> {
    (1..=total).map(move |i| {
        if i > good {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "source truncated"))
        } else {
            Ok(i)
        }
    })
}
