//! Contract shared by the MVC and event-driven orchestrations.

use core::fmt;

use crate::error::ThermostatResult;
use crate::events::HeaterCommandEvent;
use crate::flow::CycleFlow;
use crate::observer::{Observer, ObserverId, StateSnapshot};

/// Which orchestration style a simulation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    Mvc,
    Eda,
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::Mvc => f.write_str("MVC"),
            Architecture::Eda => f.write_str("EDA"),
        }
    }
}

/// What a single cycle produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub architecture: Architecture,
    /// State after the cycle, as delivered to observers.
    pub snapshot: StateSnapshot,
    /// Components and links the cycle passed through.
    pub flow: CycleFlow,
    /// Command the mediator published this cycle. Always `None` for MVC.
    pub command: Option<HeaterCommandEvent>,
}

/// A thermostat simulation that a driving loop can tick.
///
/// Implementations own all state they touch, so `run_cycle` needs no
/// locking; callers must not invoke one instance concurrently with itself.
///
/// Each cycle:
/// 1. reads the temperature, advancing the physical world with the heater
///    state decided last cycle
/// 2. applies the heating policy through the architecture's own path
/// 3. notifies attached observers exactly once
pub trait Simulation {
    fn architecture(&self) -> Architecture;

    /// Run one read → decide → notify cycle.
    fn run_cycle(&mut self) -> CycleReport;

    /// Change the target temperature. Takes effect from the next cycle.
    ///
    /// Fails with a configuration error for non-finite values.
    fn set_target_temperature(&mut self, target: f64) -> ThermostatResult<()>;

    /// Current state without running a cycle.
    fn snapshot(&self) -> StateSnapshot;

    /// Attach an observer that is notified after every cycle.
    fn attach_observer(&mut self, observer: Box<dyn Observer + Send>) -> ObserverId;

    /// Detach and return a previously attached observer.
    fn detach_observer(&mut self, id: ObserverId) -> ThermostatResult<Box<dyn Observer + Send>>;
}

impl<S: Simulation + ?Sized> Simulation for Box<S> {
    fn architecture(&self) -> Architecture {
        (**self).architecture()
    }

    fn run_cycle(&mut self) -> CycleReport {
        (**self).run_cycle()
    }

    fn set_target_temperature(&mut self, target: f64) -> ThermostatResult<()> {
        (**self).set_target_temperature(target)
    }

    fn snapshot(&self) -> StateSnapshot {
        (**self).snapshot()
    }

    fn attach_observer(&mut self, observer: Box<dyn Observer + Send>) -> ObserverId {
        (**self).attach_observer(observer)
    }

    fn detach_observer(&mut self, id: ObserverId) -> ThermostatResult<Box<dyn Observer + Send>> {
        (**self).detach_observer(id)
    }
}
