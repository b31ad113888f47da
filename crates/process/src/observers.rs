//! Multi-listener registry used for every out-of-band signal.
//!
//! Observers are called in registration order, outside the registry lock,
//! so an observer may subscribe further observers or call back into the
//! component that emitted the value.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A registered callback.
pub type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle returned by [`Observers::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// What a late subscriber sees of values emitted before it subscribed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replay {
    /// Nothing.
    Never,
    /// The most recent value, immediately on subscribe.
    Latest,
    /// Values emitted while nobody was subscribed, delivered to the first
    /// subscriber.
    Buffered,
}

struct State<T> {
    next_id: u64,
    observers: Vec<(ObserverId, Observer<T>)>,
    latest: Option<T>,
    pending: Vec<T>,
}

/// Registry of observers for values of type `T`.
pub struct Observers<T> {
    replay: Replay,
    state: Mutex<State<T>>,
}

impl<T: Clone> Observers<T> {
    pub fn new(replay: Replay) -> Self {
        Self {
            replay,
            state: Mutex::new(State {
                next_id: 0,
                observers: Vec::new(),
                latest: None,
                pending: Vec::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers an observer. Depending on the replay policy it may be
    /// invoked before this call returns.
    pub fn subscribe<F>(&self, f: F) -> ObserverId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let observer: Observer<T> = Arc::new(f);
        let (id, backlog) = {
            let mut state = self.state();
            let id = ObserverId(state.next_id);
            state.next_id += 1;
            state.observers.push((id, observer.clone()));
            let backlog = match self.replay {
                Replay::Never => Vec::new(),
                Replay::Latest => state.latest.iter().cloned().collect(),
                Replay::Buffered => std::mem::take(&mut state.pending),
            };
            (id, backlog)
        };
        for value in &backlog {
            observer(value);
        }
        id
    }

    /// Registers an observer that runs at most once.
    pub fn subscribe_once<F>(&self, f: F) -> ObserverId
    where
        F: FnOnce(&T) + Send + 'static,
    {
        let slot = Mutex::new(Some(f));
        self.subscribe(move |value| {
            let f = slot.lock().ok().and_then(|mut guard| guard.take());
            if let Some(f) = f {
                f(value);
            }
        })
    }

    /// Removes an observer. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut state = self.state();
        let before = state.observers.len();
        state.observers.retain(|(oid, _)| *oid != id);
        state.observers.len() != before
    }

    /// Delivers `value` to every observer. Returns how many were invoked.
    pub fn emit(&self, value: T) -> usize {
        let snapshot: Vec<Observer<T>> = {
            let mut state = self.state();
            if self.replay == Replay::Latest {
                state.latest = Some(value.clone());
            }
            if state.observers.is_empty() {
                if self.replay == Replay::Buffered {
                    state.pending.push(value);
                }
                return 0;
            }
            state.observers.iter().map(|(_, o)| o.clone()).collect()
        };
        for observer in &snapshot {
            observer(&value);
        }
        snapshot.len()
    }

    /// The most recent value, for [`Replay::Latest`] registries.
    pub fn latest(&self) -> Option<T> {
        self.state().latest.clone()
    }

    pub fn len(&self) -> usize {
        self.state().observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
