//! The runtime that feeds driving-loop inputs to simulations.

use flume::Receiver;

use crate::{Emitter, Simulation};

/// Inputs a driving loop can queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    /// Run one cycle of every simulation.
    Tick,
    /// Change the target temperature of every simulation.
    SetTarget(f64),
}

/// A simulation the runtime can move to whichever thread drives it.
pub type BoxedSimulation = Box<dyn Simulation + Send>;

/// The runtime that feeds driving-loop inputs to simulations.
///
/// Driving loops (a timer thread, a slider callback, a test) send
/// [`Input`]s through the [`Emitter`] returned by [`ThermostatRuntime::new`].
/// Inputs are queued via a lock-free channel and processed one at a time on
/// the thread where [`ThermostatRuntime::run`] is awaited. Each simulation
/// owns its own target; `SetTarget` is delivered to each one separately.
///
/// For manual control in tests, use [`TestRuntime`].
///
/// # Example
///
/// ```rust
/// use oxide_thermostat::{Input, SimulationConfig, ThermostatRuntime};
///
/// let config = SimulationConfig { seed: Some(1), ..SimulationConfig::default() };
/// let (mut runtime, emitter) = ThermostatRuntime::new(vec![
///     Box::new(config.build_mvc().unwrap()),
///     Box::new(config.build_eda().unwrap()),
/// ]);
///
/// emitter.emit(Input::SetTarget(22.0));
/// emitter.emit(Input::Tick);
/// drop(emitter);
///
/// futures::executor::block_on(runtime.run());
/// assert_eq!(runtime.cycles(), 1);
/// ```
pub struct ThermostatRuntime {
    simulations: Vec<BoxedSimulation>,
    inputs: Receiver<Input>,
    cycles: u64,
}

impl ThermostatRuntime {
    /// Create a runtime and the emitter that drives it.
    ///
    /// [`run`](Self::run) returns once every clone of the emitter is dropped.
    pub fn new(simulations: Vec<BoxedSimulation>) -> (Self, Emitter<Input>) {
        let (emitter, inputs) = Emitter::channel();
        (
            ThermostatRuntime {
                simulations,
                inputs,
                cycles: 0,
            },
            emitter,
        )
    }

    /// Process inputs until every emitter has been dropped.
    pub async fn run(&mut self) {
        tracing::info!(simulations = self.simulations.len(), "thermostat runtime started");

        while let Ok(input) = self.inputs.recv_async().await {
            self.step(input);
        }

        tracing::info!(cycles = self.cycles, "thermostat runtime stopped");
    }

    /// Number of ticks processed so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn simulations(&self) -> &[BoxedSimulation] {
        &self.simulations
    }

    fn step(&mut self, input: Input) {
        match input {
            Input::Tick => {
                self.cycles += 1;
                for simulation in &mut self.simulations {
                    let report = simulation.run_cycle();
                    tracing::trace!(
                        cycle = self.cycles,
                        architecture = %report.architecture,
                        flow = %report.flow,
                        "cycle finished"
                    );
                }
            }
            Input::SetTarget(target) => {
                for simulation in &mut self.simulations {
                    if let Err(error) = simulation.set_target_temperature(target) {
                        tracing::warn!(
                            %error,
                            architecture = %simulation.architecture(),
                            "rejected target temperature"
                        );
                    }
                }
            }
        }
    }
}

impl core::fmt::Debug for ThermostatRuntime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ThermostatRuntime")
            .field("simulations", &self.simulations.len())
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}

#[cfg(any(test, feature = "testing"))]
/// Test runtime with manual input processing control.
///
/// Only available with the `testing` feature or during tests.
///
/// Unlike [`ThermostatRuntime::run`], nothing happens when inputs are
/// emitted until [`process_inputs`](Self::process_inputs) is called.
///
/// ```rust
/// use oxide_thermostat::{Input, SimulationConfig, TestRenderer, TestRuntime};
///
/// let config = SimulationConfig { noise_amplitude: 0.0, ..SimulationConfig::default() };
/// let renderer = TestRenderer::new();
/// let mut mvc = config.build_mvc().unwrap();
/// oxide_thermostat::Simulation::attach_observer(&mut mvc, renderer.boxed());
///
/// let mut runtime = TestRuntime::new(vec![Box::new(mvc)]);
/// runtime.emitter().emit(Input::Tick);
/// runtime.process_inputs();
///
/// assert_eq!(renderer.count(), 1);
/// ```
pub struct TestRuntime {
    runtime: ThermostatRuntime,
    emitter: Emitter<Input>,
}

#[cfg(any(test, feature = "testing"))]
impl TestRuntime {
    pub fn new(simulations: Vec<BoxedSimulation>) -> Self {
        let (runtime, emitter) = ThermostatRuntime::new(simulations);
        TestRuntime { runtime, emitter }
    }

    /// Handle for queueing inputs. Nothing runs until [`Self::process_inputs`].
    pub fn emitter(&self) -> Emitter<Input> {
        self.emitter.clone()
    }

    /// Process all queued inputs. Returns how many were processed.
    pub fn process_inputs(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(input) = self.runtime.inputs.try_recv() {
            self.runtime.step(input);
            processed += 1;
        }
        processed
    }

    pub fn cycles(&self) -> u64 {
        self.runtime.cycles()
    }

    pub fn simulations(&self) -> &[BoxedSimulation] {
        self.runtime.simulations()
    }
}
