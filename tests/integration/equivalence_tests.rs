use oxide_thermostat::{CommandMode, Simulation, SimulationConfig, TestRenderer};

use super::{quiet_config, seeded_config};

fn trajectories(config: &SimulationConfig, cycles: usize) -> (Vec<(f64, bool)>, Vec<(f64, bool)>) {
    let mvc_renders = TestRenderer::new();
    let eda_renders = TestRenderer::new();
    let mut mvc = config.build_mvc().unwrap();
    let mut eda = config.build_eda().unwrap();
    mvc.attach_observer(mvc_renders.boxed());
    eda.attach_observer(eda_renders.boxed());

    for _ in 0..cycles {
        mvc.run_cycle();
        eda.run_cycle();
    }

    (mvc_renders.trajectory(), eda_renders.trajectory())
}

#[test]
fn given_no_noise_should_produce_identical_trajectories() {
    let (mvc, eda) = trajectories(&quiet_config(), 200);

    assert_eq!(mvc.len(), 200);
    assert_eq!(mvc, eda);
}

#[test]
fn given_same_seed_should_produce_identical_trajectories() {
    let (mvc, eda) = trajectories(&seeded_config(42), 200);

    assert_eq!(mvc, eda);
}

#[test]
fn given_keep_alive_mode_should_not_change_trajectory() {
    let keep_alive = SimulationConfig {
        command_mode: CommandMode::KeepAlive,
        ..seeded_config(7)
    };

    let (mvc, eda) = trajectories(&keep_alive, 150);

    assert_eq!(mvc, eda);
}

#[test]
fn given_default_power_should_settle_below_target_with_heater_on() {
    let (mvc, _) = trajectories(&quiet_config(), 600);

    let (temperature, heater_on) = mvc[mvc.len() - 1];
    assert!(heater_on);
    assert!((temperature - 13.0).abs() < 1e-6);
}

#[test]
fn given_enough_power_should_oscillate_around_target() {
    let strong_heater = SimulationConfig {
        heater_power: 1.2,
        ..quiet_config()
    };
    let (mvc, eda) = trajectories(&strong_heater, 300);
    assert_eq!(mvc, eda);

    let settled = &mvc[100..];
    assert!(settled.iter().any(|(_, on)| *on));
    assert!(settled.iter().any(|(_, on)| !*on));
    assert!(settled
        .iter()
        .all(|(temperature, _)| (19.5..=22.5).contains(temperature)));
}
