//! Copy-on-write published values
//!
//! Readers clone an `Arc` to the current value and keep that point-in-time
//! view for as long as they need it. Writers edit a private copy and swap it
//! in, so a reader that already loaded a value never observes a partial or
//! later update.

use std::sync::Arc;

use parking_lot::RwLock;

/// Value published by a [`SnapshotCell`]
#[derive(Debug)]
pub struct Versioned<T> {
    /// Monotonic write counter, starting at 0 for the initial value
    pub version: u64,
    pub value: T,
}

/// Shared, atomically replaced value
#[derive(Debug)]
pub struct SnapshotCell<T> {
    current: RwLock<Arc<Versioned<T>>>,
}

impl<T: Clone> SnapshotCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: RwLock::new(Arc::new(Versioned { version: 0, value })),
        }
    }

    /// Current point-in-time value
    pub fn load(&self) -> Arc<Versioned<T>> {
        let guard = self.current.read();
        Arc::clone(&*guard)
    }

    /// Apply `f` to a copy of the value and publish the result.
    ///
    /// The write lock is held for the whole update so concurrent writers
    /// are serialised and none of their changes is lost.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        match self.try_update(|value| Ok::<R, std::convert::Infallible>(f(value))) {
            Ok(out) => out,
            Err(never) => match never {},
        }
    }

    /// Like [`update`](Self::update), but nothing is published when `f` fails
    pub fn try_update<R, E>(&self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E> {
        let mut guard = self.current.write();
        let version = guard.version + 1;
        let mut value = guard.value.clone();
        let out = f(&mut value)?;
        *guard = Arc::new(Versioned { version, value });
        Ok(out)
    }
}

impl<T: Clone + Default> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_snapshot_isolated_from_writes() {
        let cell: SnapshotCell<HashMap<String, f64>> = SnapshotCell::default();
        cell.update(|m| m.insert("a".to_string(), 1.0));

        let before = cell.load();
        cell.update(|m| m.insert("a".to_string(), 2.0));

        assert_eq!(before.value["a"], 1.0);
        assert_eq!(cell.load().value["a"], 2.0);
        assert_eq!(before.version, 1);
        assert_eq!(cell.load().version, 2);
    }

    #[test]
    fn test_failed_update_publishes_nothing() {
        let cell = SnapshotCell::new(vec![1]);
        let result: Result<(), &str> = cell.try_update(|v| {
            v.push(2);
            Err("rejected")
        });

        assert!(result.is_err());
        assert_eq!(cell.load().value, vec![1]);
        assert_eq!(cell.load().version, 0);
    }
}
