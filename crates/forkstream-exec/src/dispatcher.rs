//! Dispatcher: the one and only traversal of the source.
//!
//! Invariants:
//! - The source is iterated sequentially, exactly once, on the calling thread.
//! - Each element goes to every attached channel in attach (registration)
//!   order. Sends never block, so a slow fork cannot hold the dispatcher up.
//! - Every attached channel receives exactly one end-of-stream marker, last.
//!   The marker is sent from `Drop` as well, so a panic inside the source
//!   iterator still releases every worker.

use forkstream_core::failure::{BoxError, TraversalFailure};

use crate::channel::ChannelSender;

/// Summary of one traversal.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// Elements read from the source and broadcast.
    pub elements: u64,
    /// Channels the elements were broadcast to.
    pub forks: usize,
    /// Set when the source yielded an error; traversal stopped there.
    pub failure: Option<TraversalFailure>,
    pub engine_version: &'static str,
}

pub struct Dispatcher<T> {
    channels: Vec<ChannelSender<T>>,
    dispatched: u64,
}

impl<T> Dispatcher<T> {
    pub fn with_capacity(forks: usize) -> Self {
        Self {
            channels: Vec::with_capacity(forks),
            dispatched: 0,
        }
    }

    /// Add a channel. Channels receive elements in the order attached.
    pub fn attach(&mut self, tx: ChannelSender<T>) {
        self.channels.push(tx);
    }

    pub fn fork_count(&self) -> usize {
        self.channels.len()
    }

    /// Send the end-of-stream marker to every channel that has not had one.
    fn finish(&mut self) {
        for tx in &mut self.channels {
            tx.close();
        }
    }
}

impl<T: Clone> Dispatcher<T> {
    /// Drain `source`, broadcasting every element, then close all channels.
    ///
    /// The first `Err` from the source ends traversal and is recorded in the
    /// report. It is never sent to the forks as data.
    pub fn run<I>(mut self, source: I) -> DispatchReport
    where
        I: IntoIterator<Item = Result<T, BoxError>>,
    {
        let mut failure = None;
        for item in source {
            match item {
                Ok(element) => self.broadcast(element),
                Err(cause) => {
                    failure = Some(TraversalFailure::new(self.dispatched, cause));
                    break;
                }
            }
        }
        self.finish();

        let report = DispatchReport {
            elements: self.dispatched,
            forks: self.channels.len(),
            failure,
            engine_version: forkstream_core::VERSION,
        };
        crate::metrics::dispatch_finished(&report);
        report
    }

    fn broadcast(&mut self, element: T) {
        crate::fail_point!("dispatch_element");
        self.dispatched += 1;
        // Clone for all but the last channel; the last one takes the value.
        if let Some((last, rest)) = self.channels.split_last() {
            for tx in rest {
                tx.send(element.clone());
            }
            last.send(element);
        }
    }
}

impl<T> Drop for Dispatcher<T> {
    fn drop(&mut self) {
        self.finish();
    }
}
