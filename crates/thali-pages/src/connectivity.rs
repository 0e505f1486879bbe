//! Connectivity monitor.
//!
//! Tracks online/offline transitions reported by the host environment and
//! fans them out to subscribers. The environment listeners are reference
//! counted: the first subscriber attaches one listener per event, the last
//! subscriber to leave removes those exact listeners again.
//!
//! ## Example
//!
//! ```ignore
//! use thali_pages::connectivity::ConnectivityMonitor;
//!
//! let monitor = ConnectivityMonitor::shared();
//! let subscription = monitor.subscribe(|online| {
//!     info_log!("online: {}", online);
//! });
//!
//! // Dropping the guard detaches this subscriber only
//! drop(subscription);
//! ```

#[cfg(target_arch = "wasm32")]
mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserEnvironment;

use core::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use thali_core::Signal;

/// Payload-less callback registered with the environment
pub type Listener = Rc<dyn Fn()>;

/// The two transitions an environment reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectivityEvent {
	/// Connection dropped (`offline`)
	Lost,
	/// Connection came back (`online`)
	Restored,
}

impl ConnectivityEvent {
	/// DOM event name
	pub fn event_name(self) -> &'static str {
		match self {
			Self::Lost => "offline",
			Self::Restored => "online",
		}
	}
}

/// Host seam the monitor attaches to.
///
/// `remove_listener` must match by pointer identity ([`Rc::ptr_eq`]) against
/// the listener that was passed to `add_listener`.
pub trait ConnectivityEnvironment {
	/// Current connectivity as reported by the host
	fn is_online(&self) -> bool;

	/// Register `listener` for `event`
	fn add_listener(&self, event: ConnectivityEvent, listener: &Listener);

	/// Unregister a listener previously passed to `add_listener`
	fn remove_listener(&self, event: ConnectivityEvent, listener: &Listener);
}

/// Environment without connectivity events, reporting a fixed state
#[derive(Debug, Clone, Copy)]
pub struct StaticEnvironment {
	online: bool,
}

impl StaticEnvironment {
	/// An environment that is always online
	pub fn online() -> Self {
		Self { online: true }
	}

	/// An environment that is always offline
	pub fn offline() -> Self {
		Self { online: false }
	}
}

impl ConnectivityEnvironment for StaticEnvironment {
	fn is_online(&self) -> bool {
		self.online
	}

	fn add_listener(&self, _event: ConnectivityEvent, _listener: &Listener) {}

	fn remove_listener(&self, _event: ConnectivityEvent, _listener: &Listener) {}
}

/// Snapshot of the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityState {
	/// Whether the host is online
	pub online: bool,
	/// Bumped on every applied transition
	pub version: u64,
}

type SubscriberFn = Rc<dyn Fn(bool)>;

struct Attached {
	lost: Listener,
	restored: Listener,
}

struct MonitorInner {
	env: Rc<dyn ConnectivityEnvironment>,
	state: Cell<ConnectivityState>,
	online: Signal<bool>,
	subscribers: RefCell<Vec<(u64, SubscriberFn)>>,
	next_subscriber: Cell<u64>,
	attached: RefCell<Option<Attached>>,
}

/// Observable online flag backed by a [`ConnectivityEnvironment`].
///
/// Clones share the same monitor.
#[derive(Clone)]
pub struct ConnectivityMonitor {
	inner: Rc<MonitorInner>,
}

thread_local! {
	static SHARED: RefCell<Option<ConnectivityMonitor>> = const { RefCell::new(None) };
}

impl ConnectivityMonitor {
	/// Create a monitor over `env`. Nothing is attached until the first subscriber.
	pub fn new(env: impl ConnectivityEnvironment + 'static) -> Self {
		Self::from_rc(Rc::new(env))
	}

	/// Create a monitor over a shared environment
	pub fn from_rc(env: Rc<dyn ConnectivityEnvironment>) -> Self {
		let online = env.is_online();
		Self {
			inner: Rc::new(MonitorInner {
				env,
				state: Cell::new(ConnectivityState { online, version: 0 }),
				online: Signal::new(online),
				subscribers: RefCell::new(Vec::new()),
				next_subscriber: Cell::new(0),
				attached: RefCell::new(None),
			}),
		}
	}

	/// Replace the thread's shared monitor and return it
	pub fn install(env: impl ConnectivityEnvironment + 'static) -> Self {
		let monitor = Self::new(env);
		SHARED.with(|shared| *shared.borrow_mut() = Some(monitor.clone()));
		monitor
	}

	/// The thread's shared monitor, created over the platform environment on first use
	pub fn shared() -> Self {
		SHARED.with(|shared| {
			shared
				.borrow_mut()
				.get_or_insert_with(|| Self::from_rc(platform_environment()))
				.clone()
		})
	}

	/// Register `callback` for transitions.
	///
	/// The subscriber stays registered until the returned guard is dropped.
	pub fn subscribe<F>(&self, callback: F) -> ConnectivitySubscription
	where
		F: Fn(bool) + 'static,
	{
		if self.inner.subscribers.borrow().is_empty() {
			self.inner.attach();
		}

		let id = self.inner.next_subscriber.get();
		self.inner.next_subscriber.set(id + 1);
		self.inner
			.subscribers
			.borrow_mut()
			.push((id, Rc::new(callback)));

		ConnectivitySubscription {
			monitor: Some(self.inner.clone()),
			id,
		}
	}

	/// Whether the host is online
	pub fn is_online(&self) -> bool {
		self.inner.state.get().online
	}

	/// Number of applied transitions so far
	pub fn version(&self) -> u64 {
		self.inner.state.get().version
	}

	/// Current snapshot
	pub fn state(&self) -> ConnectivityState {
		self.inner.state.get()
	}

	/// Number of live subscriptions
	pub fn subscriber_count(&self) -> usize {
		self.inner.subscribers.borrow().len()
	}

	/// Whether environment listeners are currently attached
	pub fn is_attached(&self) -> bool {
		self.inner.attached.borrow().is_some()
	}

	/// Reactive view of the online flag.
	///
	/// Updated on every applied transition, whether or not anybody subscribed.
	pub fn online_signal(&self) -> Signal<bool> {
		self.inner.online.clone()
	}
}

impl core::fmt::Debug for ConnectivityMonitor {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("ConnectivityMonitor")
			.field("state", &self.state())
			.field("subscribers", &self.subscriber_count())
			.finish()
	}
}

impl MonitorInner {
	fn attach(self: &Rc<Self>) {
		if self.attached.borrow().is_some() {
			return;
		}

		// The host may have changed while nobody was listening
		let online = self.env.is_online();
		if online != self.state.get().online {
			self.apply(online);
		}

		let lost = self.listener(false);
		let restored = self.listener(true);
		self.env.add_listener(ConnectivityEvent::Lost, &lost);
		self.env.add_listener(ConnectivityEvent::Restored, &restored);
		*self.attached.borrow_mut() = Some(Attached { lost, restored });

		tracing::debug!("connectivity listeners attached");
	}

	fn detach(&self) {
		let Some(attached) = self.attached.borrow_mut().take() else {
			return;
		};
		self.env
			.remove_listener(ConnectivityEvent::Lost, &attached.lost);
		self.env
			.remove_listener(ConnectivityEvent::Restored, &attached.restored);

		tracing::debug!("connectivity listeners detached");
	}

	fn listener(self: &Rc<Self>, online: bool) -> Listener {
		let monitor: Weak<Self> = Rc::downgrade(self);
		Rc::new(move || {
			if let Some(monitor) = monitor.upgrade() {
				monitor.apply(online);
			}
		})
	}

	fn apply(&self, online: bool) {
		let current = self.state.get();
		if current.online == online {
			tracing::debug!(online, "ignoring repeated connectivity event");
			return;
		}

		let next = ConnectivityState {
			online,
			version: current.version + 1,
		};
		self.state.set(next);
		self.online.set(online);

		// Subscribers may unsubscribe from inside their callback
		let subscribers: Vec<SubscriberFn> = self
			.subscribers
			.borrow()
			.iter()
			.map(|(_, callback)| callback.clone())
			.collect();
		for callback in subscribers {
			callback(online);
		}
	}

	fn unsubscribe(&self, id: u64) {
		let now_empty = {
			let mut subscribers = self.subscribers.borrow_mut();
			let before = subscribers.len();
			subscribers.retain(|(subscriber, _)| *subscriber != id);
			before != subscribers.len() && subscribers.is_empty()
		};
		if now_empty {
			self.detach();
		}
	}
}

/// Registration guard returned by [`ConnectivityMonitor::subscribe`]
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct ConnectivitySubscription {
	monitor: Option<Rc<MonitorInner>>,
	id: u64,
}

impl ConnectivitySubscription {
	/// Detach this subscriber. Same as dropping the guard.
	pub fn unsubscribe(mut self) {
		self.release();
	}

	fn release(&mut self) {
		if let Some(monitor) = self.monitor.take() {
			monitor.unsubscribe(self.id);
		}
	}
}

impl Drop for ConnectivitySubscription {
	fn drop(&mut self) {
		self.release();
	}
}

impl core::fmt::Debug for ConnectivitySubscription {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("ConnectivitySubscription")
			.field("id", &self.id)
			.field("active", &self.monitor.is_some())
			.finish()
	}
}

#[cfg(target_arch = "wasm32")]
fn platform_environment() -> Rc<dyn ConnectivityEnvironment> {
	Rc::new(BrowserEnvironment::new())
}

#[cfg(not(target_arch = "wasm32"))]
fn platform_environment() -> Rc<dyn ConnectivityEnvironment> {
	Rc::new(StaticEnvironment::online())
}
