//! Model-View-Controller orchestration.
//!
//! The controller reads the temperature, applies the heating policy and
//! writes the outcome into the model. The model only stores state and
//! broadcasts every change to its observers (the views), synchronously and
//! in attachment order.
//!
//! ```text
//! Sensor -> Controller -> Model ..> View
//! ```

use crate::environment::TemperatureSource;
use crate::error::{ensure_finite, ThermostatResult};
use crate::flow::{Component, CycleFlow};
use crate::observer::{Observer, ObserverId, ObserverRegistry, StateSnapshot};
use crate::policy::HeatingPolicy;
use crate::simulation::{Architecture, CycleReport, Simulation};

/// Stored thermostat state plus the views observing it.
///
/// State can only be changed from inside the crate (by
/// [`HeaterController`]); every mutation ends with one notification.
#[derive(Debug)]
pub struct HeaterModel {
    temperature: f64,
    target_temperature: f64,
    heater_on: bool,
    observers: ObserverRegistry,
}

impl HeaterModel {
    /// Model with the heater off. Both temperatures must be finite.
    pub fn new(initial_temperature: f64, target_temperature: f64) -> ThermostatResult<Self> {
        ensure_finite("initial_temperature", initial_temperature)?;
        ensure_finite("initial_target", target_temperature)?;
        Ok(Self {
            temperature: initial_temperature,
            target_temperature,
            heater_on: false,
            observers: ObserverRegistry::new(),
        })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn target_temperature(&self) -> f64 {
        self.target_temperature
    }

    pub fn is_heater_on(&self) -> bool {
        self.heater_on
    }

    /// Copy of the state handed to views.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            temperature: self.temperature,
            target_temperature: self.target_temperature,
            heater_on: self.heater_on,
        }
    }

    /// Register a view. It is notified on every model change.
    pub fn attach(&mut self, observer: Box<dyn Observer + Send>) -> ObserverId {
        self.observers.attach(observer)
    }

    /// See [`ObserverRegistry::detach`].
    pub fn detach(&mut self, id: ObserverId) -> ThermostatResult<Box<dyn Observer + Send>> {
        self.observers.detach(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Store the outcome of one control cycle.
    pub(crate) fn record_cycle(&mut self, temperature: f64, heater_on: bool) {
        self.temperature = temperature;
        self.heater_on = heater_on;
        self.notify();
    }

    pub(crate) fn set_target_temperature(&mut self, target: f64) {
        self.target_temperature = target;
        self.notify();
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        self.observers.notify_all(&snapshot);
    }
}

/// Drives the MVC loop: read → decide → mutate model.
#[derive(Debug)]
pub struct HeaterController<S> {
    model: HeaterModel,
    source: S,
    policy: HeatingPolicy,
}

impl<S: TemperatureSource> HeaterController<S> {
    pub fn new(model: HeaterModel, source: S, policy: HeatingPolicy) -> Self {
        Self {
            model,
            source,
            policy,
        }
    }

    /// The model views observe.
    pub fn model(&self) -> &HeaterModel {
        &self.model
    }

    /// Where each cycle's reading comes from.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Policy applied to every reading.
    pub fn policy(&self) -> &HeatingPolicy {
        &self.policy
    }
}

impl<S: TemperatureSource> Simulation for HeaterController<S> {
    fn architecture(&self) -> Architecture {
        Architecture::Mvc
    }

    fn run_cycle(&mut self) -> CycleReport {
        let previous = self.model.is_heater_on();
        let temperature = self.source.read(previous);
        let heater_on = self
            .policy
            .decide(temperature, self.model.target_temperature(), previous);

        tracing::debug!(
            architecture = "mvc",
            temperature,
            target = self.model.target_temperature(),
            heater_on,
            "control cycle"
        );
        self.model.record_cycle(temperature, heater_on);

        CycleReport {
            architecture: Architecture::Mvc,
            snapshot: self.model.snapshot(),
            flow: CycleFlow::starting_at(Component::Sensor)
                .then(Component::Controller)
                .then(Component::Model)
                .then(Component::View),
            command: None,
        }
    }

    fn set_target_temperature(&mut self, target: f64) -> ThermostatResult<()> {
        ensure_finite("target_temperature", target)?;
        self.model.set_target_temperature(target);
        Ok(())
    }

    fn snapshot(&self) -> StateSnapshot {
        self.model.snapshot()
    }

    fn attach_observer(&mut self, observer: Box<dyn Observer + Send>) -> ObserverId {
        self.model.attach(observer)
    }

    fn detach_observer(&mut self, id: ObserverId) -> ThermostatResult<Box<dyn Observer + Send>> {
        self.model.detach(id)
    }
}
