//! Fork workers: one named OS thread per fork.
//!
//! The worker drives `transform(ForkStream)` and turns whatever happens into a
//! terminal outcome: a value, a returned error, a panic, or an interrupted
//! stream. Nothing a transform does can reach a sibling fork or the
//! dispatcher.

use std::any::Any;
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::{self, JoinHandle};

use forkstream_core::{ForkConfig, ForkFailure, ForkIndex, ForkState};

use crate::channel::ChannelReceiver;
use crate::metrics;
use crate::stream::{ForkStream, StreamProbe};

/// Type-erased outcome of one fork.
pub(crate) type WorkerOutput = Result<Box<dyn Any + Send>, ForkFailure>;

/// Type-erased transform, as stored by the registry.
pub(crate) type Transform<T> = Box<dyn FnOnce(ForkStream<T>) -> WorkerOutput + Send + 'static>;

/// Start the worker for fork `index`. The thread begins pulling immediately
/// and blocks until the dispatcher feeds its channel.
pub(crate) fn spawn<T: Send + 'static>(
    index: ForkIndex,
    label: &str,
    rx: ChannelReceiver<T>,
    transform: Transform<T>,
    config: &ForkConfig,
) -> io::Result<WorkerHandle> {
    let state = Arc::new(AtomicU8::new(ForkState::Pending as u8));
    let probe = Arc::new(StreamProbe::default());

    let name = config.thread_name(index.as_usize());
    let mut builder = thread::Builder::new().name(name.clone());
    if let Some(size) = config.worker_stack_size {
        builder = builder.stack_size(size);
    }

    let join = {
        let state = Arc::clone(&state);
        let probe = Arc::clone(&probe);
        let label = label.to_string();
        builder.spawn(move || run(&label, rx, transform, &state, probe))?
    };
    metrics::worker_spawned(label, &name);

    Ok(WorkerHandle {
        state,
        probe,
        join: Mutex::new(Some(join)),
        outcome: OnceLock::new(),
        taken: false,
    })
}

fn run<T>(
    label: &str,
    rx: ChannelReceiver<T>,
    transform: Transform<T>,
    state: &AtomicU8,
    probe: Arc<StreamProbe>,
) -> WorkerOutput {
    state.store(ForkState::Running as u8, Ordering::Release);

    let stream = ForkStream::new(rx, Arc::clone(&probe));
    let output = catch_unwind(AssertUnwindSafe(move || {
        crate::fail_point!("worker_start");
        transform(stream)
    }))
    .unwrap_or_else(|payload| Err(ForkFailure::panicked(payload)));

    // A stream cut off before its marker poisons whatever the transform made
    // of the partial input.
    let output = if probe.interrupted() {
        Err(ForkFailure::Interrupted)
    } else {
        output
    };

    let terminal = if output.is_ok() {
        ForkState::Completed
    } else {
        ForkState::Failed
    };
    state.store(terminal as u8, Ordering::Release);
    metrics::worker_finished(label, terminal, probe.pulled(), probe.drained());
    output
}

/// Caller-side handle to one worker's outcome.
pub(crate) struct WorkerHandle {
    state: Arc<AtomicU8>,
    probe: Arc<StreamProbe>,
    join: Mutex<Option<JoinHandle<WorkerOutput>>>,
    outcome: OnceLock<WorkerOutput>,
    taken: bool,
}

impl WorkerHandle {
    /// Current lifecycle state. Never blocks.
    pub(crate) fn state(&self) -> ForkState {
        ForkState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn pulled(&self) -> u64 {
        self.probe.pulled()
    }

    pub(crate) fn is_taken(&self) -> bool {
        self.taken
    }

    /// Block until the worker has finished and return its outcome. The join
    /// happens once; later calls return the stored outcome.
    pub(crate) fn wait(&self) -> &WorkerOutput {
        self.outcome.get_or_init(|| {
            let join = match self.join.lock() {
                Ok(mut slot) => slot.take(),
                Err(poisoned) => poisoned.into_inner().take(),
            };
            match join {
                Some(handle) => handle.join().unwrap_or_else(|payload| {
                    self.state.store(ForkState::Failed as u8, Ordering::Release);
                    Err(ForkFailure::panicked(payload))
                }),
                None => Err(ForkFailure::Interrupted),
            }
        })
    }

    /// Move the outcome out. Returns `None` once taken; other reads must check
    /// `is_taken` first.
    pub(crate) fn take(&mut self) -> Option<WorkerOutput> {
        if self.taken {
            return None;
        }
        self.wait();
        self.taken = true;
        self.outcome.take()
    }
}
