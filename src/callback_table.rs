//! Ordered, keyed storage of observer callbacks.
//!
//! The table keeps callbacks in insertion order so fan-out is reproducible. Replacing
//! the callback of an existing key keeps the key's original position.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Observer callback: receives the canonical action name and the intercepted event.
pub type ActionCallback<E> = dyn Fn(&str, &E) + Send + Sync;

type Entry<E> = (Arc<str>, Arc<ActionCallback<E>>);

/// Thread-safe key → callback table.
///
/// Every operation takes the single inner lock for the duration of the structural
/// change only. Callbacks are never invoked while the lock is held; readers take a
/// [`Snapshot`] and iterate that instead.
pub struct CallbackTable<E: ?Sized> {
    entries: Mutex<Vec<Entry<E>>>,
}

impl<E: ?Sized> CallbackTable<E> {
    /// Creates an empty table. Usable in `static` items.
    pub const fn new() -> Self {
        CallbackTable {
            entries: Mutex::new(Vec::new()),
        }
    }

    // Observers never run under this lock, so a poisoned table is still consistent.
    fn lock(&self) -> MutexGuard<'_, Vec<Entry<E>>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Inserts or replaces the callback for `key`.
    ///
    /// Returns `true` if a previous callback for `key` was discarded. The discarded
    /// callback is dropped after the lock is released, so its captures may call back
    /// into the table.
    pub fn insert(&self, key: &str, callback: Arc<ActionCallback<E>>) -> bool {
        let mut entries = self.lock();
        let previous = match entries.iter_mut().find(|(k, _)| &**k == key) {
            Some(slot) => Some(std::mem::replace(&mut slot.1, callback)),
            None => {
                entries.push((Arc::from(key), callback));
                None
            }
        };
        drop(entries);
        previous.is_some()
    }

    /// Removes the callback for `key`. Returns whether one was present.
    pub fn remove(&self, key: &str) -> bool {
        let mut entries = self.lock();
        let index = entries.iter().position(|(k, _)| &**k == key);
        let removed = index.map(|index| entries.remove(index));
        drop(entries);
        removed.is_some()
    }

    /// Removes every callback and returns how many were dropped.
    pub fn clear(&self) -> usize {
        let removed = std::mem::take(&mut *self.lock());
        removed.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().iter().any(|(k, _)| &**k == key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Point-in-time copy of the current callbacks.
    ///
    /// Later mutations of the table do not affect the returned snapshot.
    pub fn snapshot(&self) -> Snapshot<E> {
        Snapshot {
            entries: self.lock().clone(),
        }
    }
}

impl<E: ?Sized> Default for CallbackTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable view of the callbacks registered at one point in time.
pub struct Snapshot<E: ?Sized> {
    entries: Vec<Entry<E>>,
}

impl<E: ?Sized> Snapshot<E> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in fan-out order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| &**k)
    }

    /// `(key, callback)` pairs in fan-out order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActionCallback<E>)> {
        self.entries.iter().map(|(k, cb)| (&**k, &**cb))
    }
}

impl<E: ?Sized> Clone for Snapshot<E> {
    fn clone(&self) -> Self {
        Snapshot {
            entries: self.entries.clone(),
        }
    }
}

impl<E: ?Sized> fmt::Debug for Snapshot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}
