//! Reference-counted environment listeners of the connectivity monitor

use std::cell::RefCell;
use std::rc::Rc;

use rstest::rstest;
use serial_test::serial;
use thali_pages::connectivity::{ConnectivityEvent, ConnectivityMonitor};
use thali_pages::testing::MockEnvironment;

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
#[case(32)]
#[serial]
fn test_n_subscribers_then_n_detaches_leave_no_listeners(#[case] subscribers: usize) {
	// Arrange
	let env = MockEnvironment::new(true);
	let monitor = ConnectivityMonitor::new(env.clone());

	// Act
	let subscriptions: Vec<_> = (0..subscribers)
		.map(|_| monitor.subscribe(|_| {}))
		.collect();
	let attached = env.listener_count();
	drop(subscriptions);

	// Assert
	assert_eq!(attached, 2);
	assert_eq!(env.listener_count(), 0);
	assert_eq!(env.added_count(), 2);
	assert_eq!(env.removed_count(), 2);
	assert!(!monitor.is_attached());
}

#[rstest]
#[serial]
fn test_detach_in_reverse_and_interleaved_order() {
	let env = MockEnvironment::new(true);
	let monitor = ConnectivityMonitor::new(env.clone());

	let mut subscriptions: Vec<_> = (0..4).map(|_| Some(monitor.subscribe(|_| {}))).collect();
	for index in [2, 0, 3] {
		subscriptions[index].take();
		assert_eq!(env.listener_count(), 2);
	}
	subscriptions[1].take();

	assert_eq!(env.listener_count(), 0);
}

#[rstest]
#[serial]
fn test_reattach_cycles_balance_add_and_remove() {
	let env = MockEnvironment::new(true);
	let monitor = ConnectivityMonitor::new(env.clone());

	for _ in 0..10 {
		let first = monitor.subscribe(|_| {});
		let second = monitor.subscribe(|_| {});
		drop(second);
		first.unsubscribe();
	}

	assert_eq!(env.added_count(), 20);
	assert_eq!(env.removed_count(), 20);
	assert_eq!(env.listener_count(), 0);
}

#[rstest]
#[serial]
fn test_events_reach_every_live_subscriber() {
	let env = MockEnvironment::new(true);
	let monitor = ConnectivityMonitor::new(env.clone());
	let seen = Rc::new(RefCell::new(Vec::new()));
	let _subscriptions: Vec<_> = (0..3)
		.map(|index| {
			let seen = seen.clone();
			monitor.subscribe(move |online| seen.borrow_mut().push((index, online)))
		})
		.collect();

	env.fire(ConnectivityEvent::Lost);

	assert_eq!(*seen.borrow(), vec![(0, false), (1, false), (2, false)]);
	assert_eq!(monitor.version(), 1);
}

#[rstest]
#[serial]
fn test_events_after_last_detach_are_not_observed() {
	let env = MockEnvironment::new(true);
	let monitor = ConnectivityMonitor::new(env.clone());
	drop(monitor.subscribe(|_| {}));

	env.fire(ConnectivityEvent::Lost);

	assert!(monitor.is_online());
	assert_eq!(monitor.version(), 0);
}

#[rstest]
#[serial]
fn test_install_replaces_shared_monitor() {
	let env = MockEnvironment::new(false);

	let installed = ConnectivityMonitor::install(env.clone());
	let shared = ConnectivityMonitor::shared();
	let _subscription = shared.subscribe(|_| {});

	assert!(!shared.is_online());
	assert_eq!(env.listener_count(), 2);
	assert_eq!(installed.subscriber_count(), 1);
}
