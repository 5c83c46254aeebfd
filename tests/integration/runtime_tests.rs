use std::thread;

use oxide_thermostat::{Input, Simulation, TestRenderer, TestRuntime, ThermostatRuntime};

use super::{quiet_config, seeded_config};

#[test]
fn given_ticks_should_cycle_every_simulation() {
    let config = quiet_config();
    let mvc_renders = TestRenderer::new();
    let eda_renders = TestRenderer::new();
    let mut mvc = config.build_mvc().unwrap();
    let mut eda = config.build_eda().unwrap();
    mvc.attach_observer(mvc_renders.boxed());
    eda.attach_observer(eda_renders.boxed());

    let mut runtime = TestRuntime::new(vec![Box::new(mvc), Box::new(eda)]);
    let emitter = runtime.emitter();
    for _ in 0..4 {
        emitter.emit(Input::Tick);
    }

    assert_eq!(runtime.process_inputs(), 4);
    assert_eq!(runtime.cycles(), 4);
    assert_eq!(mvc_renders.count(), 4);
    assert_eq!(mvc_renders.trajectory(), eda_renders.trajectory());
}

#[test]
fn given_set_target_should_reach_each_simulation() {
    let config = quiet_config();
    let mut runtime = TestRuntime::new(vec![
        Box::new(config.build_mvc().unwrap()),
        Box::new(config.build_eda().unwrap()),
    ]);

    runtime.emitter().emit(Input::SetTarget(24.0));
    runtime.emitter().emit(Input::Tick);
    runtime.process_inputs();

    for simulation in runtime.simulations() {
        let snapshot = simulation.snapshot();
        assert_eq!(snapshot.target_temperature, 24.0);
        assert!(snapshot.heater_on);
    }
}

#[test]
fn given_invalid_target_should_keep_previous_target() {
    let mut runtime = TestRuntime::new(vec![Box::new(quiet_config().build_eda().unwrap())]);

    runtime.emitter().emit(Input::SetTarget(f64::NAN));
    runtime.process_inputs();

    assert_eq!(runtime.simulations()[0].snapshot().target_temperature, 21.0);
}

#[test]
fn given_no_inputs_should_process_nothing() {
    let mut runtime = TestRuntime::new(vec![Box::new(quiet_config().build_mvc().unwrap())]);

    assert_eq!(runtime.process_inputs(), 0);
    assert_eq!(runtime.cycles(), 0);
}

#[test]
fn given_inputs_from_another_thread_should_run_until_emitters_dropped() {
    let renders = TestRenderer::new();
    let mut mvc = seeded_config(3).build_mvc().unwrap();
    mvc.attach_observer(renders.boxed());
    let (mut runtime, emitter) = ThermostatRuntime::new(vec![Box::new(mvc)]);

    let driver = thread::spawn(move || {
        for _ in 0..10 {
            emitter.emit(Input::Tick);
        }
    });

    futures::executor::block_on(runtime.run());
    driver.join().unwrap();

    assert_eq!(runtime.cycles(), 10);
    assert_eq!(renders.count(), 10);
}
