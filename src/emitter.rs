//! Channel-backed event emitter.

use flume::{Receiver, Sender};

/// Publishing handle for one kind of event.
///
/// The event-driven orchestration wires its components together with
/// emitters: the sensor holds `Emitter<TemperatureEvent>`s and the mediator
/// holds an `Emitter<HeaterCommandEvent>`, so neither knows who consumes
/// what it publishes. The runtime hands out an `Emitter<Input>` so driving
/// loops can queue ticks and target changes.
///
/// `Emitter` wraps a lock-free channel sender, making it cheap to clone and
/// safe to use from any thread.
///
/// # Example
///
/// ```rust
/// use oxide_thermostat::{Emitter, TemperatureEvent};
///
/// let (emitter, inbox) = Emitter::channel();
/// emitter.emit(TemperatureEvent { temperature: 20.5 });
///
/// assert_eq!(inbox.try_recv().unwrap().temperature, 20.5);
/// ```
pub struct Emitter<Event: Send>(Sender<Event>);

impl<Event: Send> Clone for Emitter<Event> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<Event: Send> Emitter<Event> {
    /// Create a new emitter from a channel sender.
    pub(crate) fn new(sender: Sender<Event>) -> Self {
        Self(sender)
    }

    /// Create an unbounded channel and return its emitter and receiving end.
    pub fn channel() -> (Self, Receiver<Event>) {
        let (sender, receiver) = flume::unbounded();
        (Self::new(sender), receiver)
    }

    /// Emit an event.
    ///
    /// Events emitted after the receiving end has been dropped are discarded.
    pub fn emit(&self, event: Event) {
        self.0.send(event).ok();
    }
}

impl<Event: Send> core::fmt::Debug for Emitter<Event> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Emitter")
            .field("queued", &self.0.len())
            .finish()
    }
}
