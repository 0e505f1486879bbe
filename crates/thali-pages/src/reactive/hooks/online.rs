//! Connectivity hook: use_online_status

use thali_core::{Scope, Signal};

use crate::connectivity::ConnectivityMonitor;

/// Subscribes the calling component to the shared connectivity monitor.
///
/// Returns a signal following the online flag. The subscription is released
/// when the scope is disposed.
pub fn use_online_status(scope: &Scope) -> Signal<bool> {
	use_online_status_in(scope, &ConnectivityMonitor::shared())
}

/// [`use_online_status`] against an explicit monitor
pub fn use_online_status_in(scope: &Scope, monitor: &ConnectivityMonitor) -> Signal<bool> {
	let online = Signal::new(monitor.is_online());
	let subscription = monitor.subscribe({
		let online = online.clone();
		move |value| {
			online.set_if_changed(value);
		}
	});
	// Monitor state may have been resynced by the first subscription
	online.set_if_changed(monitor.is_online());

	scope.on_cleanup(move || drop(subscription));
	online
}
