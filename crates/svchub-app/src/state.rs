//! Observable state cells.
//!
//! Each orchestrator publishes a snapshot of its screen state through a
//! [`StateCell`]. Consumers either grab the current value or subscribe to a
//! watch receiver and re-render whenever the snapshot changes.

use tokio::sync::watch;

/// A single observable value backed by a watch channel.
///
/// The cell keeps the channel sender alive for its whole lifetime, so
/// writes never fail even when nobody is subscribed.
#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> StateCell<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Current value, cloned out of the channel.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Read a projection of the current value without cloning the whole
    /// snapshot.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Subscribe to future changes. The receiver immediately sees the
    /// current value.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
