//! Result collector: keyed, blocking access to fork outcomes.
//!
//! Reads are idempotent. The first read of a fork joins its worker; every
//! later read returns the stored outcome without running anything again.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use forkstream_core::require::require_present;
use forkstream_core::{
    Error, ForkFailure, ForkState, NoticeTable, Result, TraversalFailure, TraversalPolicy,
};

use crate::dispatcher::DispatchReport;
use crate::worker::WorkerHandle;

pub(crate) struct ForkSlot<K> {
    pub(crate) key: K,
    pub(crate) label: String,
    pub(crate) worker: WorkerHandle,
}

/// Outcomes of every fork of one execution.
pub struct ForkResults<K> {
    slots: Vec<ForkSlot<K>>,
    index: HashMap<K, usize>,
    report: DispatchReport,
    policy: TraversalPolicy,
    notices: NoticeTable,
}

impl<K> ForkResults<K>
where
    K: Eq + Hash + Clone + Debug,
{
    pub(crate) fn new(
        slots: Vec<ForkSlot<K>>,
        report: DispatchReport,
        policy: TraversalPolicy,
        notices: NoticeTable,
    ) -> Self {
        let index = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.key.clone(), i))
            .collect();
        Self {
            slots,
            index,
            report,
            policy,
            notices,
        }
    }

    /// Block until fork `key` is done and borrow its result.
    ///
    /// Fails immediately with `UnknownKey` for a key that was never
    /// registered. A failed fork yields `Error::Fork` carrying the original
    /// cause; asking for the wrong `R` yields `TypeMismatch`.
    pub fn get<R: Any>(&self, key: &K) -> Result<&R> {
        let slot = self.slot(key)?;
        let value = self.resolve(slot)?;
        value
            .downcast_ref::<R>()
            .ok_or_else(|| self.notices.type_mismatch(&slot.label, type_name::<R>()))
    }

    /// Like [`get`](Self::get), but returns `Ok(None)` instead of blocking
    /// when the fork has not finished yet.
    pub fn try_get<R: Any>(&self, key: &K) -> Result<Option<&R>> {
        let slot = self.slot(key)?;
        if !slot.worker.is_taken() && !slot.worker.state().is_terminal() {
            return Ok(None);
        }
        self.get(key).map(Some)
    }

    /// Block until fork `key` is done and move its result out.
    ///
    /// Afterwards `get` and `take` on the same key fail with `AlreadyTaken`.
    /// On a type mismatch the result stays in place.
    pub fn take<R: Any>(&mut self, key: &K) -> Result<R> {
        let pos = self.position(key)?;
        {
            let slot = &self.slots[pos];
            let value = self.resolve(slot)?;
            if !value.is::<R>() {
                return Err(self.notices.type_mismatch(&slot.label, type_name::<R>()));
            }
        }

        let slot = &mut self.slots[pos];
        match slot.worker.take() {
            Some(Ok(value)) => match value.downcast::<R>() {
                Ok(value) => Ok(*value),
                // checked with `is::<R>` above
                Err(_) => Err(self.notices.type_mismatch(&slot.label, type_name::<R>())),
            },
            Some(Err(failure)) => Err(Error::Fork {
                key: slot.label.clone(),
                failure,
            }),
            None => Err(self.notices.already_taken(&slot.label)),
        }
    }

    /// Lifecycle state of fork `key`. Never blocks.
    ///
    /// Under `TraversalPolicy::FailForks` a finished fork reports `Failed`
    /// once the source has failed, matching what `get` returns.
    pub fn state(&self, key: &K) -> Result<ForkState> {
        let slot = self.slot(key)?;
        let state = slot.worker.state();
        if state.is_terminal() && self.forced_failure().is_some() {
            return Ok(ForkState::Failed);
        }
        Ok(state)
    }

    /// Elements fork `key` has pulled so far. Never blocks.
    pub fn pulled(&self, key: &K) -> Result<u64> {
        Ok(self.slot(key)?.worker.pulled())
    }

    /// Block until every fork has finished.
    pub fn wait_all(&self) {
        for slot in &self.slots {
            if !slot.worker.is_taken() {
                slot.worker.wait();
            }
        }
    }

    /// Keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.slots.iter().map(|slot| &slot.key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The source failure recorded by the dispatcher, if any.
    pub fn traversal_failure(&self) -> Option<&TraversalFailure> {
        self.report.failure.as_ref()
    }

    /// Elements read from the source (and delivered to every fork).
    pub fn elements_dispatched(&self) -> u64 {
        self.report.elements
    }

    pub fn report(&self) -> &DispatchReport {
        &self.report
    }

    fn position(&self, key: &K) -> Result<usize> {
        require_present(&self.index, key, || {
            self.notices.unknown_key(&format!("{key:?}"))
        })
        .copied()
    }

    fn slot(&self, key: &K) -> Result<&ForkSlot<K>> {
        Ok(&self.slots[self.position(key)?])
    }

    fn forced_failure(&self) -> Option<&TraversalFailure> {
        match self.policy {
            TraversalPolicy::FailForks => self.report.failure.as_ref(),
            TraversalPolicy::Truncate => None,
        }
    }

    /// Wait for `slot` and map its outcome (plus the traversal policy) to
    /// either the type-erased value or the error handed to the caller.
    fn resolve<'s>(&'s self, slot: &'s ForkSlot<K>) -> Result<&'s (dyn Any + Send)> {
        if slot.worker.is_taken() {
            return Err(self.notices.already_taken(&slot.label));
        }
        let output = slot.worker.wait();
        if let Some(failure) = self.forced_failure() {
            return Err(Error::Fork {
                key: slot.label.clone(),
                failure: ForkFailure::Traversal(failure.clone()),
            });
        }
        match output {
            Ok(value) => Ok(&**value),
            Err(failure) => Err(Error::Fork {
                key: slot.label.clone(),
                failure: failure.clone(),
            }),
        }
    }
}

impl<K: Debug> Debug for ForkResults<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForkResults")
            .field("keys", &self.slots.iter().map(|s| &s.key).collect::<Vec<_>>())
            .field("report", &self.report)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
