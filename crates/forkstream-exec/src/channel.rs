//! Element channel: one unbounded FIFO per fork.
//!
//! Single producer (the dispatcher), single consumer (the fork's stream).
//! Exactly one `EndOfStream` is ever sent on a channel and it is always the
//! last message; `ChannelSender::close` enforces that.

use crossbeam_channel::{unbounded, Receiver, Sender};
use thiserror::Error;

/// What travels on an element channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message<T> {
    Element(T),
    EndOfStream,
}

/// The sending side went away without sending `EndOfStream`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("element channel disconnected before end of stream")]
pub struct Disconnected;

/// Create a connected sender/receiver pair.
pub fn element_channel<T>() -> (ChannelSender<T>, ChannelReceiver<T>) {
    let (tx, rx) = unbounded();
    (
        ChannelSender { tx, closed: false },
        ChannelReceiver { rx },
    )
}

pub struct ChannelSender<T> {
    tx: Sender<Message<T>>,
    closed: bool,
}

impl<T> ChannelSender<T> {
    /// Enqueue one element. Never blocks.
    ///
    /// Returns `false` when the receiver is gone (the fork stopped reading);
    /// the element is dropped in that case.
    pub fn send(&self, value: T) -> bool {
        debug_assert!(!self.closed, "send after end of stream");
        self.tx.send(Message::Element(value)).is_ok()
    }

    /// Enqueue the end-of-stream marker. Idempotent: only the first call
    /// sends anything.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        // A receiver that already hung up needs no marker.
        let _ = self.tx.send(Message::EndOfStream);
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Messages sent but not yet received (advisory).
    pub fn backlog(&self) -> usize {
        self.tx.len()
    }
}

pub struct ChannelReceiver<T> {
    rx: Receiver<Message<T>>,
}

impl<T> ChannelReceiver<T> {
    /// Block until the next message.
    ///
    /// `Ok(Some(v))` is an element, `Ok(None)` is the end-of-stream marker.
    pub fn recv(&self) -> Result<Option<T>, Disconnected> {
        match self.rx.recv() {
            Ok(Message::Element(v)) => Ok(Some(v)),
            Ok(Message::EndOfStream) => Ok(None),
            Err(_) => Err(Disconnected),
        }
    }

    /// Messages queued and not yet received (advisory).
    pub fn backlog(&self) -> usize {
        self.rx.len()
    }
}
