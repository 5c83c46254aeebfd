use oxide_thermostat::{
    EdaSimulation, EventMediator, Heater, HeaterController, HeaterModel, HeatingPolicy,
    ScriptedReadings, SimulationConfig, StateSnapshot,
};

pub(crate) const SCENARIO_READINGS: [f64; 5] = [22.0, 20.6, 19.0, 19.8, 21.0];

pub(crate) fn quiet_config() -> SimulationConfig {
    SimulationConfig {
        noise_amplitude: 0.0,
        ..SimulationConfig::default()
    }
}

pub(crate) fn seeded_config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        seed: Some(seed),
        ..SimulationConfig::default()
    }
}

pub(crate) fn scripted_mvc(readings: &[f64]) -> HeaterController<ScriptedReadings> {
    HeaterController::new(
        HeaterModel::new(21.0, 21.0).unwrap(),
        ScriptedReadings::new(readings.to_vec()).unwrap(),
        HeatingPolicy::new(0.5).unwrap(),
    )
}

pub(crate) fn scripted_eda(readings: &[f64]) -> EdaSimulation<ScriptedReadings> {
    EdaSimulation::new(
        ScriptedReadings::new(readings.to_vec()).unwrap(),
        21.0,
        EventMediator::new(21.0, HeatingPolicy::new(0.5).unwrap()).unwrap(),
        Box::new(Heater::new()),
    )
    .unwrap()
}

pub(crate) const SNAPSHOT: StateSnapshot = StateSnapshot {
    temperature: 20.0,
    target_temperature: 21.0,
    heater_on: false,
};
