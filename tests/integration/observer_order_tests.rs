use mockall::{mock, predicate::eq, Sequence};
use portable_atomic_util::Arc;
use spin::Mutex;

use oxide_thermostat::{Observer, ObserverRegistry, Simulation, StateSnapshot};

use super::{scripted_mvc, SNAPSHOT};

mock! {
    pub Watcher {}

    impl Observer for Watcher {
        fn on_state_changed(&mut self, snapshot: &StateSnapshot);
    }
}

fn expect_in_sequence(sequence: &mut Sequence, times: usize) -> MockWatcher {
    let mut watcher = MockWatcher::new();
    watcher
        .expect_on_state_changed()
        .with(eq(SNAPSHOT))
        .times(times)
        .in_sequence(sequence)
        .return_const(());
    watcher
}

#[test]
fn given_three_observers_should_notify_in_attachment_order() {
    let mut sequence = Sequence::new();
    let a = expect_in_sequence(&mut sequence, 1);
    let b = expect_in_sequence(&mut sequence, 1);
    let c = expect_in_sequence(&mut sequence, 1);

    let mut registry = ObserverRegistry::new();
    registry.attach(Box::new(a));
    registry.attach(Box::new(b));
    registry.attach(Box::new(c));

    registry.notify_all(&SNAPSHOT);
}

fn logging_watcher(
    log: &Arc<Mutex<Vec<&'static str>>>,
    name: &'static str,
    times: usize,
) -> MockWatcher {
    let log = log.clone();
    let mut watcher = MockWatcher::new();
    watcher
        .expect_on_state_changed()
        .times(times)
        .returning(move |_| log.lock().push(name));
    watcher
}

#[test]
fn given_middle_observer_detached_should_notify_remaining_in_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut registry = ObserverRegistry::new();
    registry.attach(Box::new(logging_watcher(&log, "a", 2)));
    let b = registry.attach(Box::new(logging_watcher(&log, "b", 1)));
    registry.attach(Box::new(logging_watcher(&log, "c", 2)));

    registry.notify_all(&SNAPSHOT);
    let detached = registry.detach(b).unwrap();
    registry.notify_all(&SNAPSHOT);

    assert_eq!(*log.lock(), vec!["a", "b", "c", "a", "c"]);
    assert_eq!(registry.len(), 2);
    drop(detached);
}

#[test]
fn given_mvc_cycle_should_notify_views_once_with_model_snapshot() {
    let mut mvc = scripted_mvc(&[19.0]);
    let mut view = MockWatcher::new();
    view.expect_on_state_changed()
        .withf(|snapshot| snapshot.temperature == 19.0 && snapshot.heater_on)
        .times(1)
        .return_const(());
    mvc.attach_observer(Box::new(view));

    mvc.run_cycle();
}
