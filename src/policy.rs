//! Hysteresis heating decision.

use crate::error::{ensure_finite, ThermostatError, ThermostatResult};

/// Decide the next heater state.
///
/// Turns the heater on strictly below `target - band`, off strictly above
/// `target + band`, and otherwise keeps `previous`. Readings exactly on a
/// threshold never toggle.
pub fn decide(current: f64, target: f64, previous: bool, band: f64) -> bool {
    if current < target - band {
        true
    } else if current > target + band {
        false
    } else {
        previous
    }
}

/// Hysteresis policy with a fixed dead band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatingPolicy {
    band: f64,
}

impl HeatingPolicy {
    /// Default dead band half-width (°C).
    pub const DEFAULT_BAND: f64 = 0.5;

    /// Create a policy with the given half-width of the dead band.
    pub fn new(band: f64) -> ThermostatResult<Self> {
        ensure_finite("hysteresis_band", band)?;
        if band < 0.0 {
            return Err(ThermostatError::configuration(
                "hysteresis_band must not be negative",
            ));
        }
        Ok(Self { band })
    }

    /// Half-width of the dead band (°C).
    pub fn band(&self) -> f64 {
        self.band
    }

    /// `(on_below, off_above)` for the given target.
    pub fn thresholds(&self, target: f64) -> (f64, f64) {
        (target - self.band, target + self.band)
    }

    /// [`decide`] with this policy's band.
    pub fn decide(&self, current: f64, target: f64, previous: bool) -> bool {
        decide(current, target, previous, self.band)
    }
}

impl Default for HeatingPolicy {
    fn default() -> Self {
        Self {
            band: Self::DEFAULT_BAND,
        }
    }
}
