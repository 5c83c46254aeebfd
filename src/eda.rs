//! Event-driven orchestration with a mediator topology.
//!
//! The sensor publishes [`TemperatureEvent`]s without knowing who listens.
//! The mediator is the only component that understands both event types:
//! it applies the heating policy and publishes [`HeaterCommandEvent`]s. The
//! heater consumes commands and notifies its own observers.
//!
//! ```text
//! Sensor --TemperatureEvent--> Mediator --HeaterCommandEvent--> Heater ..> Display
//! ```
//!
//! Events travel over [`Emitter`] channels that [`EdaSimulation`] drains
//! within the same cycle, so delivery is synchronous for the caller.

use flume::Receiver;
use serde::{Deserialize, Serialize};

use crate::emitter::Emitter;
use crate::environment::TemperatureSource;
use crate::error::{ensure_finite, ThermostatResult};
use crate::events::{HeaterCommandEvent, TemperatureEvent};
use crate::flow::{Component, CycleFlow};
use crate::observer::{Observer, ObserverId, ObserverRegistry, StateSnapshot};
use crate::policy::HeatingPolicy;
use crate::simulation::{Architecture, CycleReport, Simulation};

/// Event producer. Knows nothing but the emitters it publishes to.
#[derive(Debug, Default)]
pub struct TemperatureSensor {
    subscribers: Vec<Emitter<TemperatureEvent>>,
}

impl TemperatureSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener for future measurements.
    pub fn subscribe(&mut self, listener: Emitter<TemperatureEvent>) {
        self.subscribers.push(listener);
    }

    /// Number of listeners the sensor publishes to.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Publish one measurement to every subscriber.
    pub fn publish(&self, temperature: f64) {
        let event = TemperatureEvent { temperature };
        tracing::trace!(temperature, subscribers = self.subscribers.len(), "temperature event");
        for subscriber in &self.subscribers {
            subscriber.emit(event);
        }
    }
}

/// When the mediator publishes a heater command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandMode {
    /// Only when the decision differs from the current heater state.
    #[default]
    OnChange,
    /// Also re-send `turn_on = true` every cycle while heating, so a
    /// display can show the ongoing flow. Logical state is unaffected.
    KeepAlive,
}

/// Applies the heating policy to temperature events and commands the heater.
#[derive(Debug)]
pub struct EventMediator {
    target_temperature: f64,
    policy: HeatingPolicy,
    mode: CommandMode,
    heater_on: bool,
    last_temperature: Option<f64>,
    heater: Option<Emitter<HeaterCommandEvent>>,
}

impl EventMediator {
    /// Mediator with no heater registered yet.
    ///
    /// Fails if `target_temperature` is not finite.
    pub fn new(target_temperature: f64, policy: HeatingPolicy) -> ThermostatResult<Self> {
        ensure_finite("initial_target", target_temperature)?;
        Ok(Self {
            target_temperature,
            policy,
            mode: CommandMode::default(),
            heater_on: false,
            last_temperature: None,
            heater: None,
        })
    }

    pub fn with_command_mode(mut self, mode: CommandMode) -> Self {
        self.mode = mode;
        self
    }

    /// Route future commands to `heater`, replacing any previous route.
    pub fn register_heater(&mut self, heater: Emitter<HeaterCommandEvent>) {
        self.heater = Some(heater);
    }

    pub fn target_temperature(&self) -> f64 {
        self.target_temperature
    }

    /// Applies from the next temperature event.
    pub fn set_target_temperature(&mut self, target: f64) -> ThermostatResult<()> {
        ensure_finite("target_temperature", target)?;
        self.target_temperature = target;
        Ok(())
    }

    /// Most recent measurement handled, if any.
    pub fn last_temperature(&self) -> Option<f64> {
        self.last_temperature
    }

    pub fn command_mode(&self) -> CommandMode {
        self.mode
    }

    /// Heater state the next decision starts from.
    pub fn heater_state(&self) -> bool {
        self.heater_on
    }

    pub(crate) fn assume_heater_state(&mut self, heater_on: bool) {
        self.heater_on = heater_on;
    }

    /// Handle one measurement. Returns the command published, if any.
    pub fn on_temperature_event(&mut self, event: TemperatureEvent) -> Option<HeaterCommandEvent> {
        self.last_temperature = Some(event.temperature);
        let turn_on = self
            .policy
            .decide(event.temperature, self.target_temperature, self.heater_on);

        let changed = turn_on != self.heater_on;
        let keep_alive = self.mode == CommandMode::KeepAlive && turn_on;
        self.heater_on = turn_on;
        if !changed && !keep_alive {
            tracing::trace!(temperature = event.temperature, "no command");
            return None;
        }

        let command = HeaterCommandEvent { turn_on };
        tracing::trace!(temperature = event.temperature, turn_on, changed, "heater command");
        if let Some(heater) = &self.heater {
            heater.emit(command);
        }
        Some(command)
    }
}

/// The temperature and target the display should show with the heater state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub temperature: f64,
    pub target_temperature: f64,
}

/// Command consumer side of the event bus.
///
/// Swapping the heater implementation only touches the mediator's command
/// channel; the sensor is unaffected.
pub trait HeaterDevice {
    fn on_heater_command(&mut self, command: HeaterCommandEvent);

    fn is_on(&self) -> bool;

    /// Tell observers about the current state.
    fn notify_observers(&mut self, reading: Reading);

    fn attach(&mut self, observer: Box<dyn Observer + Send>) -> ObserverId;

    fn detach(&mut self, id: ObserverId) -> ThermostatResult<Box<dyn Observer + Send>>;

    /// Install `observers` and hand back the registry they displace.
    fn replace_observers(&mut self, observers: ObserverRegistry) -> ObserverRegistry;
}

/// Default heater: stores the commanded state and notifies its observers.
#[derive(Debug, Default)]
pub struct Heater {
    is_on: bool,
    observers: ObserverRegistry,
}

impl Heater {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HeaterDevice for Heater {
    fn on_heater_command(&mut self, command: HeaterCommandEvent) {
        self.is_on = command.turn_on;
    }

    fn is_on(&self) -> bool {
        self.is_on
    }

    fn notify_observers(&mut self, reading: Reading) {
        self.observers.notify_all(&StateSnapshot {
            temperature: reading.temperature,
            target_temperature: reading.target_temperature,
            heater_on: self.is_on,
        });
    }

    fn attach(&mut self, observer: Box<dyn Observer + Send>) -> ObserverId {
        self.observers.attach(observer)
    }

    fn detach(&mut self, id: ObserverId) -> ThermostatResult<Box<dyn Observer + Send>> {
        self.observers.detach(id)
    }

    fn replace_observers(&mut self, observers: ObserverRegistry) -> ObserverRegistry {
        core::mem::replace(&mut self.observers, observers)
    }
}

/// Sensor, mediator and heater wired over event channels.
pub struct EdaSimulation<S> {
    source: S,
    sensor: TemperatureSensor,
    mediator: EventMediator,
    heater: Box<dyn HeaterDevice + Send>,
    temperature_events: Receiver<TemperatureEvent>,
    heater_commands: Receiver<HeaterCommandEvent>,
    temperature: f64,
}

impl<S: TemperatureSource> EdaSimulation<S> {
    /// Wire `sensor -> mediator -> heater`.
    ///
    /// `initial_temperature` is what observers see before the first cycle.
    pub fn new(
        source: S,
        initial_temperature: f64,
        mut mediator: EventMediator,
        heater: Box<dyn HeaterDevice + Send>,
    ) -> ThermostatResult<Self> {
        ensure_finite("initial_temperature", initial_temperature)?;

        let mut sensor = TemperatureSensor::new();
        let (temperature_emitter, temperature_events) = Emitter::channel();
        sensor.subscribe(temperature_emitter);

        let (command_emitter, heater_commands) = Emitter::channel();
        mediator.register_heater(command_emitter);
        mediator.assume_heater_state(heater.is_on());

        Ok(Self {
            source,
            sensor,
            mediator,
            heater,
            temperature_events,
            heater_commands,
            temperature: initial_temperature,
        })
    }

    pub fn sensor(&self) -> &TemperatureSensor {
        &self.sensor
    }

    pub fn mediator(&self) -> &EventMediator {
        &self.mediator
    }

    /// The heater currently receiving commands.
    pub fn heater(&self) -> &(dyn HeaterDevice + Send) {
        self.heater.as_ref()
    }

    /// Where each cycle's measurement comes from.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Swap the heater, returning the previous one.
    ///
    /// Observers attached through [`Simulation::attach_observer`] move to the
    /// new heater and keep their ids. Any observers the replacement already
    /// carried go to the returned heater. The mediator continues from the new
    /// heater's state so a mismatch is corrected by the next command.
    pub fn replace_heater(
        &mut self,
        heater: Box<dyn HeaterDevice + Send>,
    ) -> Box<dyn HeaterDevice + Send> {
        self.mediator.assume_heater_state(heater.is_on());
        let mut previous = core::mem::replace(&mut self.heater, heater);
        let observers = previous.replace_observers(ObserverRegistry::new());
        let displaced = self.heater.replace_observers(observers);
        previous.replace_observers(displaced);
        tracing::debug!(heater_on = self.heater.is_on(), "heater replaced");
        previous
    }

    fn reading(&self) -> Reading {
        Reading {
            temperature: self.temperature,
            target_temperature: self.mediator.target_temperature(),
        }
    }
}

impl<S: TemperatureSource> Simulation for EdaSimulation<S> {
    fn architecture(&self) -> Architecture {
        Architecture::Eda
    }

    fn run_cycle(&mut self) -> CycleReport {
        self.temperature = self.source.read(self.heater.is_on());
        self.sensor.publish(self.temperature);

        let mut flow = CycleFlow::starting_at(Component::Sensor);
        let mut command = None;
        for event in self.temperature_events.try_iter() {
            flow.push_hop(Component::Mediator);
            if let Some(published) = self.mediator.on_temperature_event(event) {
                command = Some(published);
            }
        }

        for received in self.heater_commands.try_iter() {
            flow.push_hop(Component::Heater);
            self.heater.on_heater_command(received);
        }

        let reading = self.reading();
        tracing::debug!(
            architecture = "eda",
            temperature = reading.temperature,
            target = reading.target_temperature,
            heater_on = self.heater.is_on(),
            command = ?command,
            "control cycle"
        );
        self.heater.notify_observers(reading);

        CycleReport {
            architecture: Architecture::Eda,
            snapshot: self.snapshot(),
            flow,
            command,
        }
    }

    fn set_target_temperature(&mut self, target: f64) -> ThermostatResult<()> {
        self.mediator.set_target_temperature(target)
    }

    fn snapshot(&self) -> StateSnapshot {
        let reading = self.reading();
        StateSnapshot {
            temperature: reading.temperature,
            target_temperature: reading.target_temperature,
            heater_on: self.heater.is_on(),
        }
    }

    fn attach_observer(&mut self, observer: Box<dyn Observer + Send>) -> ObserverId {
        self.heater.attach(observer)
    }

    fn detach_observer(&mut self, id: ObserverId) -> ThermostatResult<Box<dyn Observer + Send>> {
        self.heater.detach(id)
    }
}

impl<S> core::fmt::Debug for EdaSimulation<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EdaSimulation")
            .field("sensor", &self.sensor)
            .field("mediator", &self.mediator)
            .field("heater_on", &self.heater.is_on())
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}
