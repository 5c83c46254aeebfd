//! Physical model of the heated room.
//!
//! The room exchanges heat with the outside proportionally to the
//! temperature difference and gains a fixed amount per tick while the
//! heater runs. A pluggable [`NoiseSource`] perturbs each step; tests use
//! [`NoNoise`] or a seeded [`UniformNoise`] for reproducible trajectories.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ThermostatError, ThermostatResult};

/// Produces the per-tick perturbation added to the temperature.
pub trait NoiseSource {
    fn next_perturbation(&mut self) -> f64;
}

/// Closures work as noise sources.
impl<F> NoiseSource for F
where
    F: FnMut() -> f64,
{
    fn next_perturbation(&mut self) -> f64 {
        self()
    }
}

/// Noise source that never perturbs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNoise;

impl NoiseSource for NoNoise {
    fn next_perturbation(&mut self) -> f64 {
        0.0
    }
}

/// Uniform noise in `[-amplitude, amplitude]` from a seeded `ChaCha8Rng`.
#[derive(Debug, Clone)]
pub struct UniformNoise {
    rng: ChaCha8Rng,
    amplitude: f64,
}

impl UniformNoise {
    /// Reproducible noise in `[-amplitude, amplitude]`.
    pub fn new(amplitude: f64, seed: u64) -> ThermostatResult<Self> {
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            amplitude: checked_amplitude(amplitude)?,
        })
    }

    /// Seed from OS entropy. Trajectories are not reproducible.
    pub fn from_entropy(amplitude: f64) -> ThermostatResult<Self> {
        Ok(Self {
            rng: ChaCha8Rng::from_entropy(),
            amplitude: checked_amplitude(amplitude)?,
        })
    }
}

fn checked_amplitude(amplitude: f64) -> ThermostatResult<f64> {
    ensure_finite("noise_amplitude", amplitude)?;
    if amplitude < 0.0 {
        return Err(ThermostatError::configuration(
            "noise_amplitude must not be negative",
        ));
    }
    Ok(amplitude)
}

impl NoiseSource for UniformNoise {
    fn next_perturbation(&mut self) -> f64 {
        if self.amplitude == 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-self.amplitude..=self.amplitude)
    }
}

/// Inclusive temperature range the simulation is clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
}

impl TemperatureRange {
    /// Fails unless both bounds are finite and `min < max`.
    pub fn new(min: f64, max: f64) -> ThermostatResult<Self> {
        ensure_finite("clamp.min", min)?;
        ensure_finite("clamp.max", max)?;
        if min >= max {
            return Err(ThermostatError::configuration(
                "clamp.min must be less than clamp.max",
            ));
        }
        Ok(Self { min, max })
    }

    /// Pull `temperature` into the range.
    pub fn clamp(&self, temperature: f64) -> f64 {
        temperature.clamp(self.min, self.max)
    }
}

/// Physical constants of the room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    pub outside_temperature: f64,
    /// Fraction of the inside/outside difference lost per tick (0..=1).
    pub insulation_coefficient: f64,
    /// Temperature gained per tick while heating.
    pub heater_power: f64,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            outside_temperature: 5.0,
            insulation_coefficient: 0.05,
            heater_power: 0.40,
        }
    }
}

impl Physics {
    /// Every constant must be finite, with insulation in `[0, 1]` and
    /// non-negative heater power.
    pub fn validate(&self) -> ThermostatResult<()> {
        ensure_finite("outside_temperature", self.outside_temperature)?;
        ensure_finite("insulation_coefficient", self.insulation_coefficient)?;
        ensure_finite("heater_power", self.heater_power)?;
        if !(0.0..=1.0).contains(&self.insulation_coefficient) {
            return Err(ThermostatError::configuration(
                "insulation_coefficient must be within 0..=1",
            ));
        }
        if self.heater_power < 0.0 {
            return Err(ThermostatError::configuration(
                "heater_power must not be negative",
            ));
        }
        Ok(())
    }

    /// Temperature a permanently running heater settles at.
    ///
    /// `None` when the room is perfectly insulated.
    pub fn heating_equilibrium(&self) -> Option<f64> {
        (self.insulation_coefficient > 0.0)
            .then(|| self.outside_temperature + self.heater_power / self.insulation_coefficient)
    }
}

/// Owns the room temperature and advances it one tick at a time.
pub struct SimulationEnvironment {
    temperature: f64,
    physics: Physics,
    clamp: Option<TemperatureRange>,
    noise: Box<dyn NoiseSource + Send>,
}

impl SimulationEnvironment {
    pub fn new(
        initial_temperature: f64,
        physics: Physics,
        noise: Box<dyn NoiseSource + Send>,
    ) -> ThermostatResult<Self> {
        ensure_finite("initial_temperature", initial_temperature)?;
        physics.validate()?;
        Ok(Self {
            temperature: initial_temperature,
            physics,
            clamp: None,
            noise,
        })
    }

    /// Clamp every step to `range`. The initial temperature is clamped too.
    pub fn with_clamp(mut self, range: TemperatureRange) -> Self {
        self.temperature = range.clamp(self.temperature);
        self.clamp = Some(range);
        self
    }

    /// Current room temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    /// Advance one tick and return the new temperature.
    pub fn advance(&mut self, heater_is_on: bool) -> f64 {
        let mut delta = (self.physics.outside_temperature - self.temperature)
            * self.physics.insulation_coefficient;
        if heater_is_on {
            delta += self.physics.heater_power;
        }
        let next = self.temperature + delta + self.noise.next_perturbation();
        self.temperature = match self.clamp {
            Some(range) => range.clamp(next),
            None => next,
        };
        self.temperature
    }
}

impl std::fmt::Debug for SimulationEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEnvironment")
            .field("temperature", &self.temperature)
            .field("physics", &self.physics)
            .field("clamp", &self.clamp)
            .finish_non_exhaustive()
    }
}

/// Where an orchestration gets its temperature reading each cycle.
///
/// `heater_on` is the heater state decided in the previous cycle, which the
/// physical world needs to evolve; pure readers may ignore it.
pub trait TemperatureSource {
    fn read(&mut self, heater_on: bool) -> f64;
}

impl TemperatureSource for SimulationEnvironment {
    fn read(&mut self, heater_on: bool) -> f64 {
        self.advance(heater_on)
    }
}

impl<F> TemperatureSource for F
where
    F: FnMut(bool) -> f64,
{
    fn read(&mut self, heater_on: bool) -> f64 {
        self(heater_on)
    }
}

/// Replays a fixed sequence of readings, repeating the last one forever.
#[derive(Debug, Clone)]
pub struct ScriptedReadings {
    readings: Vec<f64>,
    cursor: usize,
}

impl ScriptedReadings {
    pub fn new(readings: Vec<f64>) -> ThermostatResult<Self> {
        if readings.is_empty() {
            return Err(ThermostatError::configuration(
                "scripted readings must not be empty",
            ));
        }
        for reading in &readings {
            ensure_finite("scripted reading", *reading)?;
        }
        Ok(Self {
            readings,
            cursor: 0,
        })
    }
}

impl TemperatureSource for ScriptedReadings {
    fn read(&mut self, _heater_on: bool) -> f64 {
        let index = self.cursor.min(self.readings.len() - 1);
        self.cursor = self.cursor.saturating_add(1);
        self.readings[index]
    }
}
