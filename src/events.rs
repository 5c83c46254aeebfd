//! Transient events exchanged on the event-driven bus.

/// A temperature measurement published by the sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureEvent {
    pub temperature: f64,
}

/// A command from the mediator telling the heater what to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaterCommandEvent {
    pub turn_on: bool,
}
