//! Fork registry: collect `key -> transform` pairs, then execute once.
//!
//! Nothing runs until `execute`. After that the registry is spent: further
//! registrations and a second `execute` fail with `AlreadyStarted`.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use forkstream_core::require::{ensure, ensure_absent};
use forkstream_core::{BoxError, ForkConfig, ForkFailure, ForkIndex, Result};

use crate::channel::element_channel;
use crate::collector::{ForkResults, ForkSlot};
use crate::dispatcher::Dispatcher;
use crate::metrics;
use crate::stream::ForkStream;
use crate::worker::{self, Transform, WorkerOutput};

type Source<'a, T> = Box<dyn Iterator<Item = std::result::Result<T, BoxError>> + 'a>;

struct ForkSpec<K, T> {
    key: K,
    label: String,
    transform: Transform<T>,
}

/// Builder for one forked traversal of `source`.
///
/// ```
/// use forkstream_exec::StreamForks;
///
/// let mut forks = StreamForks::new(vec![1u64, 2, 3, 4, 5]);
/// forks
///     .fork("sum", |s| s.sum::<u64>())?
///     .fork("list", |s| s.collect::<Vec<_>>())?;
/// let results = forks.execute()?;
///
/// assert_eq!(*results.get::<u64>(&"sum")?, 15);
/// assert_eq!(results.get::<Vec<u64>>(&"list")?, &vec![1, 2, 3, 4, 5]);
/// # Ok::<(), forkstream_core::Error>(())
/// ```
pub struct StreamForks<'a, K, T> {
    source: Option<Source<'a, T>>,
    forks: Vec<ForkSpec<K, T>>,
    index: HashMap<K, ForkIndex>,
    config: ForkConfig,
    started: bool,
}

impl<'a, K, T> StreamForks<'a, K, T>
where
    K: Eq + Hash + Clone + Debug,
    T: Clone + Send + 'static,
{
    /// Fork an infallible source.
    pub fn new<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Self::from_boxed(Box::new(source.into_iter().map(Ok)))
    }

    /// Fork a source whose reads can fail. The first `Err` ends traversal and
    /// is recorded as a `TraversalFailure`.
    pub fn from_fallible<I, E>(source: I) -> Self
    where
        I: IntoIterator<Item = std::result::Result<T, E>>,
        I::IntoIter: 'a,
        E: Into<BoxError>,
    {
        Self::from_boxed(Box::new(source.into_iter().map(|r| r.map_err(Into::into))))
    }

    fn from_boxed(source: Source<'a, T>) -> Self {
        Self {
            source: Some(source),
            forks: Vec::new(),
            index: HashMap::new(),
            config: ForkConfig::default(),
            started: false,
        }
    }

    /// Replace the configuration. Validated at `execute`.
    pub fn with_config(mut self, config: ForkConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ForkConfig {
        &self.config
    }

    /// Register an infallible fork.
    pub fn fork<F, R>(&mut self, key: K, transform: F) -> Result<&mut Self>
    where
        F: FnOnce(ForkStream<T>) -> R + Send + 'static,
        R: Send + 'static,
    {
        self.register(
            key,
            Box::new(move |stream: ForkStream<T>| -> WorkerOutput {
                Ok(Box::new(transform(stream)))
            }),
        )
    }

    /// Register a fork whose transform can fail. An `Err` becomes the fork's
    /// failure and is surfaced by `ForkResults::get` with its cause intact.
    pub fn try_fork<F, R, E>(&mut self, key: K, transform: F) -> Result<&mut Self>
    where
        F: FnOnce(ForkStream<T>) -> std::result::Result<R, E> + Send + 'static,
        R: Send + 'static,
        E: Into<BoxError>,
    {
        self.register(
            key,
            Box::new(move |stream: ForkStream<T>| -> WorkerOutput {
                match transform(stream) {
                    Ok(value) => Ok(Box::new(value)),
                    Err(err) => Err(ForkFailure::transform(err)),
                }
            }),
        )
    }

    fn register(&mut self, key: K, transform: Transform<T>) -> Result<&mut Self> {
        let notices = self.config.notices;
        ensure(!self.started, || notices.already_started())?;
        let label = format!("{key:?}");
        ensure_absent(&self.index, &key, || notices.duplicate_key(&label))?;

        let idx = ForkIndex::new(self.forks.len() as u32);
        self.index.insert(key.clone(), idx);
        metrics::fork_registered(&label, idx);
        self.forks.push(ForkSpec {
            key,
            label,
            transform,
        });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.forks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forks.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Start every worker, traverse the source once on this thread, and
    /// return the collector.
    ///
    /// A source failure does not make `execute` fail: it is recorded and
    /// applied to the outcomes according to the configured
    /// `TraversalPolicy`. A panic raised by the source iterator propagates
    /// after every fork's stream has been ended.
    pub fn execute(&mut self) -> Result<ForkResults<K>> {
        let notices = self.config.notices;
        ensure(!self.started, || notices.already_started())?;
        self.config.validate()?;
        self.started = true;
        let source = self.source.take().ok_or_else(|| notices.already_started())?;

        let specs = std::mem::take(&mut self.forks);
        let mut dispatcher = Dispatcher::with_capacity(specs.len());
        let mut slots = Vec::with_capacity(specs.len());

        for (i, spec) in specs.into_iter().enumerate() {
            let (tx, rx) = element_channel();
            dispatcher.attach(tx);
            // On failure `dispatcher` drops here and ends every stream already
            // handed to a worker.
            let worker = worker::spawn(
                ForkIndex::new(i as u32),
                &spec.label,
                rx,
                spec.transform,
                &self.config,
            )?;
            slots.push(ForkSlot {
                key: spec.key,
                label: spec.label,
                worker,
            });
        }

        let report = dispatcher.run(source);
        Ok(ForkResults::new(
            slots,
            report,
            self.config.traversal_policy,
            self.config.notices,
        ))
    }
}

impl<'a, K, T> From<Vec<T>> for StreamForks<'a, K, T>
where
    K: Eq + Hash + Clone + Debug,
    T: Clone + Send + 'static,
{
    fn from(source: Vec<T>) -> Self {
        StreamForks::new(source)
    }
}
