use portable_atomic_util::Arc;
use spin::Mutex;

use oxide_thermostat::{
    Emitter, HeaterCommandEvent, HeaterDevice, Observer, ObserverId, ObserverRegistry, Reading,
    Simulation, StateSnapshot, TemperatureSensor, ThermostatResult,
};

use super::scripted_eda;

/// Heater replacement that logs every command it receives.
struct RecordingHeater {
    is_on: bool,
    commands: Arc<Mutex<Vec<HeaterCommandEvent>>>,
    observers: ObserverRegistry,
}

impl HeaterDevice for RecordingHeater {
    fn on_heater_command(&mut self, command: HeaterCommandEvent) {
        self.is_on = command.turn_on;
        self.commands.lock().push(command);
    }

    fn is_on(&self) -> bool {
        self.is_on
    }

    fn notify_observers(&mut self, reading: Reading) {
        self.observers.notify_all(&StateSnapshot {
            temperature: reading.temperature,
            target_temperature: reading.target_temperature,
            heater_on: self.is_on,
        });
    }

    fn attach(&mut self, observer: Box<dyn Observer + Send>) -> ObserverId {
        self.observers.attach(observer)
    }

    fn detach(&mut self, id: ObserverId) -> ThermostatResult<Box<dyn Observer + Send>> {
        self.observers.detach(id)
    }

    fn replace_observers(&mut self, observers: ObserverRegistry) -> ObserverRegistry {
        core::mem::replace(&mut self.observers, observers)
    }
}

#[test]
fn sensor_only_knows_its_single_subscriber() {
    let eda = scripted_eda(&[20.0]);

    assert_eq!(eda.sensor().subscriber_count(), 1);
}

#[test]
fn sensor_publishes_without_any_consumer_wired() {
    let sensor = TemperatureSensor::new();

    // No subscribers and no heater anywhere: publishing is still valid.
    sensor.publish(19.0);

    let (emitter, inbox) = Emitter::channel();
    let mut sensor = sensor;
    sensor.subscribe(emitter);
    sensor.publish(19.5);
    assert_eq!(inbox.try_recv().unwrap().temperature, 19.5);
}

#[test]
fn given_replaced_heater_should_receive_commands_without_touching_sensor() {
    let mut eda = scripted_eda(&[19.0, 22.0, 19.0]);
    eda.run_cycle();
    assert!(eda.heater().is_on());

    let commands = Arc::new(Mutex::new(Vec::new()));
    let previous = eda.replace_heater(Box::new(RecordingHeater {
        is_on: false,
        commands: commands.clone(),
        observers: ObserverRegistry::new(),
    }));

    assert!(previous.is_on());
    assert!(!eda.mediator().heater_state());
    assert_eq!(eda.sensor().subscriber_count(), 1);

    eda.run_cycle();
    eda.run_cycle();

    assert_eq!(
        *commands.lock(),
        vec![HeaterCommandEvent { turn_on: true }]
    );
    assert!(eda.heater().is_on());
}

fn counting_observer(seen: &Arc<Mutex<usize>>) -> Box<dyn Observer + Send> {
    let counter = seen.clone();
    Box::new(move |_: &StateSnapshot| *counter.lock() += 1)
}

#[test]
fn given_replaced_heater_should_keep_notifying_attached_observers() {
    let mut eda = scripted_eda(&[19.0]);
    let seen = Arc::new(Mutex::new(0usize));
    let id = eda.attach_observer(counting_observer(&seen));

    eda.run_cycle();
    let mut original = eda.replace_heater(Box::new(RecordingHeater {
        is_on: true,
        commands: Arc::new(Mutex::new(Vec::new())),
        observers: ObserverRegistry::new(),
    }));
    eda.run_cycle();

    assert_eq!(*seen.lock(), 2);
    original.notify_observers(Reading {
        temperature: 19.0,
        target_temperature: 21.0,
    });
    assert_eq!(*seen.lock(), 2);

    assert!(eda.detach_observer(id).is_ok());
    eda.run_cycle();
    assert_eq!(*seen.lock(), 2);
}

#[test]
fn given_replacement_with_own_observers_should_return_them_with_previous_heater() {
    let mut eda = scripted_eda(&[19.0]);
    let own = Arc::new(Mutex::new(0usize));
    let mut observers = ObserverRegistry::new();
    observers.attach(counting_observer(&own));

    let mut original = eda.replace_heater(Box::new(RecordingHeater {
        is_on: false,
        commands: Arc::new(Mutex::new(Vec::new())),
        observers,
    }));
    eda.run_cycle();
    assert_eq!(*own.lock(), 0);

    original.notify_observers(Reading {
        temperature: 19.0,
        target_temperature: 21.0,
    });
    assert_eq!(*own.lock(), 1);
}
