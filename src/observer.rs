//! Observer registration and synchronous notification.

use core::fmt;

use crate::error::{ThermostatError, ThermostatResult};

/// Immutable view of the thermostat state handed to observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateSnapshot {
    pub temperature: f64,
    pub target_temperature: f64,
    pub heater_on: bool,
}

/// Receives a snapshot every time the subject it is attached to changes.
///
/// Closures taking `&StateSnapshot` implement this trait directly.
pub trait Observer {
    fn on_state_changed(&mut self, snapshot: &StateSnapshot);
}

impl<F> Observer for F
where
    F: FnMut(&StateSnapshot),
{
    fn on_state_changed(&mut self, snapshot: &StateSnapshot) {
        self(snapshot)
    }
}

/// Handle returned by [`ObserverRegistry::attach`], used to detach later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered set of observers owned by a notifying subject.
///
/// Observers are notified in attachment order. Ids are never reused.
#[derive(Default)]
pub struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(ObserverId, Box<dyn Observer + Send>)>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer` after every existing one.
    pub fn attach(&mut self, observer: Box<dyn Observer + Send>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove and return the observer registered under `id`.
    ///
    /// Fails with [`ThermostatError::ObserverNotFound`] if `id` is not
    /// currently attached (including when it was already detached).
    pub fn detach(&mut self, id: ObserverId) -> ThermostatResult<Box<dyn Observer + Send>> {
        let index = self
            .observers
            .iter()
            .position(|(registered, _)| *registered == id)
            .ok_or(ThermostatError::ObserverNotFound { id })?;
        Ok(self.observers.remove(index).1)
    }

    /// Call every observer with `snapshot`, in attachment order.
    pub fn notify_all(&mut self, snapshot: &StateSnapshot) {
        tracing::trace!(observers = self.observers.len(), ?snapshot, "notifying observers");
        for (_, observer) in &mut self.observers {
            observer.on_state_changed(snapshot);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}
