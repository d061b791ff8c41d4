//! Observable values shared between the gesture and update contexts.
//!
//! A [`Shared<T>`] is a cheap, cloneable handle to a value behind a
//! read-write lock. Every clone sees the same value. Writers never tear a
//! read, and subscribers are told about each change after the lock has been
//! released, so a subscriber may freely read the value again.

use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier returned by [`Shared::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: RwLock<T>,
    listeners: Mutex<Vec<(SubscriptionId, Listener<T>)>>,
    next_id: AtomicU64,
}

/// A typed observable cell.
pub struct Shared<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> Shared<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(value),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Copy of the current value.
    pub fn get(&self) -> T {
        self.inner.value.read().clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.read())
    }

    /// Replace the value and notify subscribers, even if it is unchanged.
    pub fn replace(&self, value: T) -> T {
        let old = std::mem::replace(&mut *self.inner.value.write(), value.clone());
        self.notify(&value);
        old
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let snapshot = {
            let mut guard = self.inner.value.write();
            f(&mut guard);
            guard.clone()
        };
        self.notify(&snapshot);
    }

    /// Register a change listener.
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    fn notify(&self, value: &T) {
        // Snapshot so listeners can subscribe or unsubscribe while running.
        let listeners: Vec<Listener<T>> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(value);
        }
    }
}

impl<T: Clone + PartialEq> Shared<T> {
    /// Store a new value. Returns whether it differed from the old one;
    /// subscribers only hear about actual changes.
    pub fn set(&self, value: T) -> bool {
        {
            let mut guard = self.inner.value.write();
            if *guard == value {
                return false;
            }
            *guard = value.clone();
        }
        self.notify(&value);
        true
    }
}

impl<T: Clone + Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("value", &*self.inner.value.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn test_set_reports_change() {
        let value = Shared::new(1);
        assert!(!value.set(1));
        assert!(value.set(2));
        assert_eq!(value.get(), 2);
    }

    #[test]
    fn test_clones_share_state() {
        let a = Shared::new(String::from("x"));
        let b = a.clone();
        b.set(String::from("y"));
        assert_eq!(a.get(), "y");
    }

    #[test]
    fn test_subscribers_see_changes_only() {
        let value = Shared::new(0);
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        value.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        value.set(0);
        value.set(5);
        value.set(5);
        value.update(|v| *v += 1);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(value.get(), 6);
    }

    #[test]
    fn test_listener_can_read_value() {
        let value = Shared::new(0);
        let observed = Arc::new(AtomicUsize::new(0));
        let handle = value.clone();
        let out = Arc::clone(&observed);
        value.subscribe(move |_| {
            out.store(handle.get() as usize, Ordering::SeqCst);
        });
        value.set(42);
        assert_eq!(observed.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn test_unsubscribe() {
        let value = Shared::new(0);
        let id = value.subscribe(|_| {});
        assert_eq!(value.subscriber_count(), 1);
        assert!(value.unsubscribe(id));
        assert!(!value.unsubscribe(id));
        assert_eq!(value.subscriber_count(), 0);
    }

    #[test]
    fn test_no_torn_reads_across_threads() {
        let value = Shared::new((0u64, 0u64));
        let writer = value.clone();
        let handle = thread::spawn(move || {
            for i in 1..=1000u64 {
                writer.set((i, i * 2));
            }
        });
        for _ in 0..1000 {
            let (a, b) = value.get();
            assert_eq!(b, a * 2);
        }
        handle.join().unwrap();
        assert_eq!(value.get(), (1000, 2000));
    }
}
