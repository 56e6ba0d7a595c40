//! Named events observable by the application.
//!
//! An [`EventBus`] is created once by the application (or by the [`Hunter`](crate::Hunter)
//! builder) and shared by cloning: every clone sees the same listeners.
//! The client emits [`ERROR_EVENT`] with the [`ApiError`](crate::ApiError) each time
//! a GraphQL endpoint answers with an errors envelope.
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use rip_hunter::{ApiError, ERROR_EVENT, EventBus};
//!
//! let bus = EventBus::<ApiError>::new();
//! let count = Arc::new(AtomicUsize::new(0));
//!
//! let id = bus.on(ERROR_EVENT, {
//!     let count = Arc::clone(&count);
//!     move |_error: &ApiError| {
//!         count.fetch_add(1, Ordering::SeqCst);
//!     }
//! });
//!
//! bus.emit(ERROR_EVENT, &ApiError::new(vec!["boom".to_string()]));
//! assert_eq!(count.load(Ordering::SeqCst), 1);
//!
//! assert!(bus.off(id));
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use tracing::debug;

/// Name of the event emitted when a GraphQL operation answers with errors.
pub const ERROR_EVENT: &str = "rip_hunter_error";

/// A listener callback.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Identifies a registered listener, used to unregister it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Registration<E> {
    event: String,
    listener: Listener<E>,
}

struct Registry<E> {
    next_id: u64,
    registrations: IndexMap<ListenerId, Registration<E>>,
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            registrations: IndexMap::new(),
        }
    }
}

/// A registry of listeners for named events carrying an `E` payload.
pub struct EventBus<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> EventBus<E> {
    /// Creates an event bus without listeners.
    pub fn new() -> Self {
        Self {
            registry: Arc::default(),
        }
    }

    /// Registers a listener for the named event.
    ///
    /// Listeners are called in registration order.
    pub fn on<F>(&self, event: impl Into<String>, listener: F) -> ListenerId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.registrations.insert(
            id,
            Registration {
                event: event.into(),
                listener: Arc::new(listener),
            },
        );
        id
    }

    /// Unregisters a listener, returns `false` if it was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        self.lock().registrations.shift_remove(&id).is_some()
    }

    /// Unregisters every listener of the named event.
    pub fn off_all(&self, event: &str) {
        self.lock()
            .registrations
            .retain(|_, registration| registration.event != event);
    }

    /// Calls every listener registered for the named event, returns how many were called.
    ///
    /// Listeners are collected before being called, so a listener may register or
    /// unregister listeners; the change applies to the next emission.
    pub fn emit(&self, event: &str, payload: &E) -> usize {
        let listeners = self
            .lock()
            .registrations
            .values()
            .filter(|registration| registration.event == event)
            .map(|registration| Arc::clone(&registration.listener))
            .collect::<Vec<_>>();

        debug!(event, listeners = listeners.len(), "emitting");
        for listener in &listeners {
            listener(payload);
        }
        listeners.len()
    }

    /// Number of listeners registered for the named event.
    pub fn listener_count(&self, event: &str) -> usize {
        self.lock()
            .registrations
            .values()
            .filter(|registration| registration.event == event)
            .count()
    }

    // A panicking listener runs outside the lock, the registry itself is never left inconsistent
    fn lock(&self) -> MutexGuard<'_, Registry<E>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.lock();
        f.debug_struct("EventBus")
            .field("listeners", &registry.registrations.len())
            .finish()
    }
}
