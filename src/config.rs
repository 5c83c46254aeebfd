//! Simulation configuration, read once at construction.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::eda::{CommandMode, EdaSimulation, EventMediator, Heater};
use crate::environment::{
    NoNoise, NoiseSource, Physics, SimulationEnvironment, TemperatureRange, UniformNoise,
};
use crate::error::{ensure_finite, ThermostatError, ThermostatResult};
use crate::mvc::{HeaterController, HeaterModel};
use crate::policy::HeatingPolicy;

/// Constants for one simulation instance.
///
/// Defaults reproduce the classic demo room: 21 °C inside, 5 °C outside,
/// 5 % loss per tick, 0.4 °C gain per heating tick and ±0.05 °C noise.
///
/// ```rust
/// use oxide_thermostat::SimulationConfig;
///
/// let config = SimulationConfig::from_yaml_str("initial_target: 22.5\nseed: 3\n").unwrap();
/// assert_eq!(config.initial_target, 22.5);
/// assert_eq!(config.hysteresis_band, 0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub initial_temperature: f64,
    pub initial_target: f64,
    pub outside_temperature: f64,
    pub insulation_coefficient: f64,
    pub heater_power: f64,
    pub hysteresis_band: f64,
    /// Half-width of the uniform per-tick perturbation. Zero disables noise.
    pub noise_amplitude: f64,
    /// Noise seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Clamp the simulated temperature into this range.
    pub clamp: Option<TemperatureRange>,
    /// When the EDA mediator publishes heater commands.
    pub command_mode: CommandMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let physics = Physics::default();
        Self {
            initial_temperature: 21.0,
            initial_target: 21.0,
            outside_temperature: physics.outside_temperature,
            insulation_coefficient: physics.insulation_coefficient,
            heater_power: physics.heater_power,
            hysteresis_band: HeatingPolicy::DEFAULT_BAND,
            noise_amplitude: 0.05,
            seed: None,
            clamp: None,
            command_mode: CommandMode::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> ThermostatResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file.
    pub fn load(path: impl AsRef<Path>) -> ThermostatResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ThermostatError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Room physics described by this configuration.
    pub fn physics(&self) -> Physics {
        Physics {
            outside_temperature: self.outside_temperature,
            insulation_coefficient: self.insulation_coefficient,
            heater_power: self.heater_power,
        }
    }

    /// Reject non-finite values and out-of-range constants.
    pub fn validate(&self) -> ThermostatResult<()> {
        ensure_finite("initial_temperature", self.initial_temperature)?;
        ensure_finite("initial_target", self.initial_target)?;
        self.physics().validate()?;
        HeatingPolicy::new(self.hysteresis_band)?;
        ensure_finite("noise_amplitude", self.noise_amplitude)?;
        if self.noise_amplitude < 0.0 {
            return Err(ThermostatError::configuration(
                "noise_amplitude must not be negative",
            ));
        }
        if let Some(range) = self.clamp {
            TemperatureRange::new(range.min, range.max)?;
        }
        Ok(())
    }

    /// Heating policy with the configured dead band.
    pub fn policy(&self) -> ThermostatResult<HeatingPolicy> {
        HeatingPolicy::new(self.hysteresis_band)
    }

    fn noise(&self) -> ThermostatResult<Box<dyn NoiseSource + Send>> {
        if self.noise_amplitude == 0.0 {
            return Ok(Box::new(NoNoise));
        }
        let noise = match self.seed {
            Some(seed) => UniformNoise::new(self.noise_amplitude, seed)?,
            None => UniformNoise::from_entropy(self.noise_amplitude)?,
        };
        Ok(Box::new(noise))
    }

    /// Build a fresh environment. Each simulation gets its own.
    pub fn build_environment(&self) -> ThermostatResult<SimulationEnvironment> {
        self.validate()?;
        let environment =
            SimulationEnvironment::new(self.initial_temperature, self.physics(), self.noise()?)?;
        Ok(match self.clamp {
            Some(range) => environment.with_clamp(range),
            None => environment,
        })
    }

    /// Controller, model and environment for the MVC orchestration.
    pub fn build_mvc(&self) -> ThermostatResult<HeaterController<SimulationEnvironment>> {
        let environment = self.build_environment()?;
        let model = HeaterModel::new(environment.temperature(), self.initial_target)?;
        Ok(HeaterController::new(model, environment, self.policy()?))
    }

    /// Sensor, mediator and heater for the event-driven orchestration.
    pub fn build_eda(&self) -> ThermostatResult<EdaSimulation<SimulationEnvironment>> {
        let environment = self.build_environment()?;
        let initial_temperature = environment.temperature();
        let mediator = EventMediator::new(self.initial_target, self.policy()?)?
            .with_command_mode(self.command_mode);
        EdaSimulation::new(
            environment,
            initial_temperature,
            mediator,
            Box::new(Heater::new()),
        )
    }
}
