//! The lazy, single-pass view a fork transform consumes.

use std::iter::FusedIterator;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::channel::ChannelReceiver;

/// Progress of one stream, shared with the worker that owns the fork.
#[derive(Debug, Default)]
pub(crate) struct StreamProbe {
    pulled: AtomicU64,
    ended: AtomicBool,
    interrupted: AtomicBool,
}

impl StreamProbe {
    pub(crate) fn pulled(&self) -> u64 {
        self.pulled.load(Ordering::Acquire)
    }

    /// True once the end-of-stream marker has been observed.
    pub(crate) fn drained(&self) -> bool {
        self.ended.load(Ordering::Acquire)
    }

    pub(crate) fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Acquire)
    }
}

/// Elements of the source, in source order, as seen by one fork.
///
/// Each `next` blocks until the dispatcher has produced the next element.
/// The end-of-stream marker ends iteration and is never yielded. Once ended
/// the stream stays ended; it cannot be restarted.
///
/// If the channel is torn down before the marker arrives the stream ends
/// early and the fork is reported as interrupted, whatever the transform
/// returns.
pub struct ForkStream<T> {
    rx: ChannelReceiver<T>,
    probe: Arc<StreamProbe>,
    done: bool,
}

impl<T> ForkStream<T> {
    pub(crate) fn new(rx: ChannelReceiver<T>, probe: Arc<StreamProbe>) -> Self {
        Self {
            rx,
            probe,
            done: false,
        }
    }

    /// Elements yielded so far.
    pub fn pulled(&self) -> u64 {
        self.probe.pulled()
    }

    /// Elements already queued for this fork and not yet pulled (advisory).
    pub fn backlog(&self) -> usize {
        self.rx.backlog()
    }

    pub fn is_finished(&self) -> bool {
        self.done
    }
}

impl<T> Iterator for ForkStream<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.done {
            return None;
        }
        match self.rx.recv() {
            Ok(Some(v)) => {
                self.probe.pulled.fetch_add(1, Ordering::AcqRel);
                Some(v)
            }
            Ok(None) => {
                self.done = true;
                self.probe.ended.store(true, Ordering::Release);
                None
            }
            Err(_) => {
                self.done = true;
                self.probe.interrupted.store(true, Ordering::Release);
                None
            }
        }
    }
}

impl<T> FusedIterator for ForkStream<T> {}
