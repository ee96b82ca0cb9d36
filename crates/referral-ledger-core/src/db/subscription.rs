//! Live-query listeners and their handles.
//!
//! A subscriber registers a callback and receives a [`Subscription`]. The
//! host must call [`Subscription::close`] exactly once, typically when the
//! screen that opened it unmounts. A handle dropped without `close` still
//! detaches, but logs a warning since that means teardown was implicit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{DbError, DbResult};

type Callback<T> = Arc<dyn Fn(&[T]) + Send + Sync>;

struct Listener<T> {
    /// Only notified for this scope (e.g. a doctor ID); `None` = every scope
    scope: Option<String>,
    callback: Callback<T>,
}

struct RegistryState<T> {
    next_id: u64,
    listeners: HashMap<u64, Listener<T>>,
}

/// Listener registry for one kind of snapshot.
pub struct ListenerRegistry<T> {
    topic: &'static str,
    state: Arc<Mutex<RegistryState<T>>>,
}

impl<T: 'static> ListenerRegistry<T> {
    pub fn new(topic: &'static str) -> Self {
        Self {
            topic,
            state: Arc::new(Mutex::new(RegistryState {
                next_id: 1,
                listeners: HashMap::new(),
            })),
        }
    }

    /// Register a callback and return its handle.
    pub fn register<F>(&self, scope: Option<String>, callback: F) -> DbResult<Subscription>
    where
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        let mut state = self
            .state
            .lock()
            .map_err(|e| DbError::Lock(e.to_string()))?;

        let id = state.next_id;
        state.next_id += 1;
        state.listeners.insert(
            id,
            Listener {
                scope,
                callback: Arc::new(callback),
            },
        );
        tracing::debug!(topic = self.topic, id, "Subscription opened");

        let registry = Arc::downgrade(&self.state);
        Ok(Subscription {
            id,
            topic: self.topic,
            detach: Some(Box::new(move || {
                if let Some(state) = registry.upgrade() {
                    if let Ok(mut state) = state.lock() {
                        state.listeners.remove(&id);
                    }
                }
            })),
        })
    }

    /// Deliver a snapshot to listeners whose scope matches.
    ///
    /// Callbacks run after the registry lock is released, so a callback may
    /// itself subscribe or close handles.
    pub fn notify(&self, scope: Option<&str>, items: &[T]) -> DbResult<()> {
        let callbacks: Vec<Callback<T>> = {
            let state = self
                .state
                .lock()
                .map_err(|e| DbError::Lock(e.to_string()))?;
            state
                .listeners
                .values()
                .filter(|l| match (&l.scope, scope) {
                    (None, _) => true,
                    (Some(wanted), Some(actual)) => wanted == actual,
                    (Some(_), None) => false,
                })
                .map(|l| Arc::clone(&l.callback))
                .collect()
        };

        for callback in callbacks {
            callback(items);
        }
        Ok(())
    }

    /// Number of open subscriptions.
    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.listeners.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle for an open live query.
pub struct Subscription {
    id: u64,
    topic: &'static str,
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Stop receiving snapshots.
    pub fn close(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
            tracing::debug!(topic = self.topic, id = self.id, "Subscription closed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            tracing::warn!(
                topic = self.topic,
                id = self.id,
                "Subscription dropped without close()"
            );
            detach();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .field("open", &self.detach.is_some())
            .finish()
    }
}
