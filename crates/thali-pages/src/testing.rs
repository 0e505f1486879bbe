//! Test doubles.
//!
//! - [`MockEnvironment`]: a connectivity environment that counts listeners and
//!   fires events on demand
//! - [`MockCatalog`]: a catalogue answering with scripted payloads
//! - [`PendingFetches`]: a fetcher whose requests stay pending until resolved
//!   by hand, in any order

use core::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use serde_json::Value;

use crate::api::{Catalog, EntityId};
use crate::connectivity::{ConnectivityEnvironment, ConnectivityEvent, Listener};
use crate::error::FetchError;

#[derive(Default)]
struct EnvironmentState {
	online: Cell<bool>,
	listeners: RefCell<Vec<(ConnectivityEvent, Listener)>>,
	added: Cell<usize>,
	removed: Cell<usize>,
}

/// Connectivity environment driven by the test.
///
/// Clones share the same state, so a test keeps one clone while the monitor
/// owns another.
#[derive(Clone)]
pub struct MockEnvironment {
	state: Rc<EnvironmentState>,
}

impl MockEnvironment {
	/// Create an environment reporting `online`
	pub fn new(online: bool) -> Self {
		let state = EnvironmentState::default();
		state.online.set(online);
		Self {
			state: Rc::new(state),
		}
	}

	/// Change the reported state without firing an event
	pub fn set_online(&self, online: bool) {
		self.state.online.set(online);
	}

	/// Change the reported state and fire the matching event
	pub fn fire(&self, event: ConnectivityEvent) {
		self.state
			.online
			.set(matches!(event, ConnectivityEvent::Restored));
		// Listeners may be removed while firing
		let listeners: Vec<Listener> = self
			.state
			.listeners
			.borrow()
			.iter()
			.filter(|(kind, _)| *kind == event)
			.map(|(_, listener)| listener.clone())
			.collect();
		for listener in listeners {
			listener();
		}
	}

	/// Listeners currently registered
	pub fn listener_count(&self) -> usize {
		self.state.listeners.borrow().len()
	}

	/// Total `add_listener` calls
	pub fn added_count(&self) -> usize {
		self.state.added.get()
	}

	/// Total `remove_listener` calls that removed something
	pub fn removed_count(&self) -> usize {
		self.state.removed.get()
	}
}

impl ConnectivityEnvironment for MockEnvironment {
	fn is_online(&self) -> bool {
		self.state.online.get()
	}

	fn add_listener(&self, event: ConnectivityEvent, listener: &Listener) {
		self.state.added.set(self.state.added.get() + 1);
		self.state
			.listeners
			.borrow_mut()
			.push((event, listener.clone()));
	}

	fn remove_listener(&self, event: ConnectivityEvent, listener: &Listener) {
		let mut listeners = self.state.listeners.borrow_mut();
		if let Some(index) = listeners
			.iter()
			.position(|(kind, stored)| *kind == event && Rc::ptr_eq(stored, listener))
		{
			listeners.remove(index);
			self.state.removed.set(self.state.removed.get() + 1);
		}
	}
}

/// Catalogue answering from scripted payloads.
///
/// Unscripted restaurants answer with an empty object.
#[derive(Clone)]
pub struct MockCatalog {
	list: Rc<RefCell<Result<Value, FetchError>>>,
	details: Rc<RefCell<HashMap<EntityId, Result<Value, FetchError>>>>,
	requests: Rc<Cell<usize>>,
}

impl MockCatalog {
	/// Create a catalogue with an empty list and no restaurants
	pub fn new() -> Self {
		Self {
			list: Rc::new(RefCell::new(Ok(Value::Null))),
			details: Rc::default(),
			requests: Rc::default(),
		}
	}

	/// Answer the list request with `payload`
	pub fn with_list(self, payload: Value) -> Self {
		*self.list.borrow_mut() = Ok(payload);
		self
	}

	/// Fail the list request with `error`
	pub fn with_list_error(self, error: FetchError) -> Self {
		*self.list.borrow_mut() = Err(error);
		self
	}

	/// Answer requests for restaurant `id` with `payload`
	pub fn with_restaurant(self, id: impl Into<EntityId>, payload: Value) -> Self {
		self.details.borrow_mut().insert(id.into(), Ok(payload));
		self
	}

	/// Fail requests for restaurant `id` with `error`
	pub fn with_restaurant_error(self, id: impl Into<EntityId>, error: FetchError) -> Self {
		self.details.borrow_mut().insert(id.into(), Err(error));
		self
	}

	/// Change the list answer of a shared catalogue
	pub fn set_list(&self, answer: Result<Value, FetchError>) {
		*self.list.borrow_mut() = answer;
	}

	/// Requests served so far
	pub fn request_count(&self) -> usize {
		self.requests.get()
	}
}

impl Default for MockCatalog {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait(?Send)]
impl Catalog for MockCatalog {
	async fn restaurants(&self) -> Result<Value, FetchError> {
		self.requests.set(self.requests.get() + 1);
		self.list.borrow().clone()
	}

	async fn restaurant(&self, id: &EntityId) -> Result<Value, FetchError> {
		self.requests.set(self.requests.get() + 1);
		self.details
			.borrow()
			.get(id)
			.cloned()
			.unwrap_or_else(|| Ok(Value::Object(Default::default())))
	}
}

type Pending<K, T> = Vec<(K, oneshot::Sender<Result<T, FetchError>>)>;

/// Requests that stay pending until the test resolves them.
///
/// Dropping an unresolved request makes it fail with a network error.
pub struct PendingFetches<K, T> {
	pending: Rc<RefCell<Pending<K, T>>>,
	issued: Rc<Cell<usize>>,
}

impl<K, T> Clone for PendingFetches<K, T> {
	fn clone(&self) -> Self {
		Self {
			pending: Rc::clone(&self.pending),
			issued: Rc::clone(&self.issued),
		}
	}
}

impl<K, T> Default for PendingFetches<K, T> {
	fn default() -> Self {
		Self {
			pending: Rc::default(),
			issued: Rc::default(),
		}
	}
}

impl<K: PartialEq + 'static, T: 'static> PendingFetches<K, T> {
	/// Create an empty set of requests
	pub fn new() -> Self {
		Self::default()
	}

	/// A fetcher recording each request it is asked for
	pub fn fetcher(&self) -> impl Fn(K) -> LocalBoxFuture<'static, Result<T, FetchError>> + 'static {
		let pending = self.pending.clone();
		let issued = self.issued.clone();
		move |key| {
			let (sender, receiver) = oneshot::channel();
			pending.borrow_mut().push((key, sender));
			issued.set(issued.get() + 1);
			async move {
				receiver
					.await
					.unwrap_or_else(|_| Err(FetchError::Network("request dropped".to_string())))
			}
			.boxed_local()
		}
	}

	/// Complete the oldest live request for `key`. Returns false when there is none.
	pub fn resolve(&self, key: &K, result: Result<T, FetchError>) -> bool {
		let sender = {
			let mut pending = self.pending.borrow_mut();
			pending.retain(|(_, sender)| !sender.is_canceled());
			let index = pending.iter().position(|(pending_key, _)| pending_key == key);
			index.map(|index| pending.remove(index).1)
		};
		match sender {
			Some(sender) => sender.send(result).is_ok(),
			None => false,
		}
	}

	/// Requests issued so far, resolved or not
	pub fn issued_count(&self) -> usize {
		self.issued.get()
	}

	/// Requests whose caller is still waiting
	pub fn pending_count(&self) -> usize {
		self.pending
			.borrow()
			.iter()
			.filter(|(_, sender)| !sender.is_canceled())
			.count()
	}
}
