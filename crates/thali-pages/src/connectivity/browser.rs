//! Browser connectivity environment (`window` `online` / `offline` events)

use core::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use super::{ConnectivityEnvironment, ConnectivityEvent, Listener};

/// Listens on `window` and reads `navigator.onLine`
#[derive(Default)]
pub struct BrowserEnvironment {
	// The JS closure must outlive its registration
	registered: RefCell<Vec<(ConnectivityEvent, Listener, Closure<dyn Fn()>)>>,
}

impl BrowserEnvironment {
	/// Create an environment bound to the global `window`
	pub fn new() -> Self {
		Self::default()
	}
}

impl ConnectivityEnvironment for BrowserEnvironment {
	fn is_online(&self) -> bool {
		web_sys::window()
			.map(|window| window.navigator().on_line())
			.unwrap_or(true)
	}

	fn add_listener(&self, event: ConnectivityEvent, listener: &Listener) {
		let Some(window) = web_sys::window() else {
			crate::warn_log!("no window available, {} events unavailable", event.event_name());
			return;
		};
		let callback = listener.clone();
		let closure = Closure::<dyn Fn()>::new(move || callback());
		if window
			.add_event_listener_with_callback(event.event_name(), closure.as_ref().unchecked_ref())
			.is_err()
		{
			crate::warn_log!("failed to register {} listener", event.event_name());
			return;
		}
		self.registered
			.borrow_mut()
			.push((event, listener.clone(), closure));
	}

	fn remove_listener(&self, event: ConnectivityEvent, listener: &Listener) {
		let removed = {
			let mut registered = self.registered.borrow_mut();
			let position = registered
				.iter()
				.position(|(kind, stored, _)| *kind == event && Rc::ptr_eq(stored, listener));
			position.map(|index| registered.remove(index))
		};
		let Some((_, _, closure)) = removed else {
			return;
		};
		if let Some(window) = web_sys::window() {
			let _ = window.remove_event_listener_with_callback(
				event.event_name(),
				closure.as_ref().unchecked_ref(),
			);
		}
	}
}
