//! A smart-thermostat simulation that contrasts two architecture styles.
//!
//! Both styles share the same physics ([`SimulationEnvironment`]) and the
//! same hysteresis rule ([`HeatingPolicy`]); only the path a reading takes
//! to the heater and the display differs:
//!
//! - **MVC** ([`HeaterController`]): the controller reads, decides and
//!   writes to a [`HeaterModel`], which synchronously notifies its views.
//! - **EDA** ([`EdaSimulation`]): a [`TemperatureSensor`] publishes events,
//!   an [`EventMediator`] turns them into heater commands, and the
//!   [`Heater`] notifies its observers. The sensor never sees the heater.
//!
//! Displays implement [`Renderer`] and are attached as observers through a
//! [`View`].
//!
//! ## Example
//!
//! ```rust
//! use oxide_thermostat::{Renderer, Simulation, SimulationConfig, View};
//!
//! struct Printer;
//!
//! impl Renderer for Printer {
//!     fn render(&mut self, temperature: f64, target: f64, heater_on: bool) {
//!         println!("{temperature:.1} / {target:.1} heater={heater_on}");
//!     }
//! }
//!
//! let config = SimulationConfig {
//!     noise_amplitude: 0.0,
//!     ..SimulationConfig::default()
//! };
//!
//! let mut mvc = config.build_mvc().unwrap();
//! let mut eda = config.build_eda().unwrap();
//! mvc.attach_observer(Box::new(View::new(Printer)));
//! eda.attach_observer(Box::new(View::new(Printer)));
//!
//! for _ in 0..10 {
//!     let a = mvc.run_cycle();
//!     let b = eda.run_cycle();
//!     assert_eq!(a.snapshot, b.snapshot);
//! }
//! ```

// Module declarations
mod config;
mod eda;
mod emitter;
mod environment;
mod error;
mod events;
mod flow;
mod mvc;
mod observer;
mod policy;
mod renderer;
mod runtime;
mod simulation;

// Public re-exports
pub use config::SimulationConfig;
pub use eda::{
    CommandMode, EdaSimulation, EventMediator, Heater, HeaterDevice, Reading, TemperatureSensor,
};
pub use emitter::Emitter;
pub use environment::{
    NoNoise, NoiseSource, Physics, ScriptedReadings, SimulationEnvironment, TemperatureRange,
    TemperatureSource, UniformNoise,
};
pub use error::{ThermostatError, ThermostatResult};
pub use events::{HeaterCommandEvent, TemperatureEvent};
pub use flow::{Component, CycleFlow, FlowStep};
pub use mvc::{HeaterController, HeaterModel};
pub use observer::{Observer, ObserverId, ObserverRegistry, StateSnapshot};
pub use policy::{decide, HeatingPolicy};
pub use renderer::{status_line, ConsoleRenderer, Renderer, View};
pub use runtime::{BoxedSimulation, Input, ThermostatRuntime};
pub use simulation::{Architecture, CycleReport, Simulation};

// Test utilities (only available with 'testing' feature or during tests)
#[cfg(any(test, feature = "testing"))]
pub use renderer::TestRenderer;
#[cfg(any(test, feature = "testing"))]
pub use runtime::TestRuntime;
