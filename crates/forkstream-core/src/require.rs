//! Precondition helpers: turn a failed check into a typed error instead of a
//! panic. Each takes the error lazily so the happy path does not format.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{Error, Result};

/// Fail with `err()` unless `cond` holds.
#[inline]
pub fn ensure(cond: bool, err: impl FnOnce() -> Error) -> Result<()> {
    if cond {
        Ok(())
    } else {
        Err(err())
    }
}

/// Fail with `err()` if `key` is already present in `map`.
#[inline]
pub fn ensure_absent<K, Q, V>(
    map: &HashMap<K, V>,
    key: &Q,
    err: impl FnOnce() -> Error,
) -> Result<()>
where
    K: Eq + Hash + Borrow<Q>,
    Q: Eq + Hash + ?Sized,
{
    ensure(!map.contains_key(key), err)
}

/// Look `key` up in `map`, failing with `err()` when it is missing.
#[inline]
pub fn require_present<'m, K, Q, V>(
    map: &'m HashMap<K, V>,
    key: &Q,
    err: impl FnOnce() -> Error,
) -> Result<&'m V>
where
    K: Eq + Hash + Borrow<Q>,
    Q: Eq + Hash + ?Sized,
{
    map.get(key).ok_or_else(err)
}
