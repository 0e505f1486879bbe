//! Resource hook: one async resource bound to a reactive view state.
//!
//! A [`Resource`] owns a `Signal<ResourceState<T>>` and the single in-flight
//! request for its current key. Each request carries the generation it was
//! issued under and its own [`CancelToken`]; a result is committed only when
//! the resource has not been torn down, the generation is still the latest
//! and the token was not cancelled. Everything else is discarded.
//!
//! ## Example
//!
//! ```ignore
//! use thali_pages::resource::Resource;
//!
//! let detail = Resource::new(move |id: String| {
//!     let catalog = catalog.clone();
//!     async move { catalog.restaurant(&id).await }
//! });
//!
//! detail.subscribe("A".to_string());
//! detail.subscribe("B".to_string()); // "A" can no longer commit
//! ```

use core::cell::{Cell, RefCell};
use core::fmt::Debug;
use core::future::Future;
use std::rc::{Rc, Weak};

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use thali_core::{CancelToken, Signal, TaskHandle, spawn_local};

use crate::error::FetchError;

/// Observable state of one resource subscription
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResourceState<T> {
	/// Nothing requested yet
	#[default]
	Idle,
	/// A request is in flight
	Loading,
	/// The latest request succeeded
	Ready(T),
	/// The latest request failed
	Failed(FetchError),
}

impl<T> ResourceState<T> {
	/// Whether no request was issued yet
	pub fn is_idle(&self) -> bool {
		matches!(self, Self::Idle)
	}

	/// Whether a request is in flight
	pub fn is_loading(&self) -> bool {
		matches!(self, Self::Loading)
	}

	/// Whether data is available
	pub fn is_ready(&self) -> bool {
		matches!(self, Self::Ready(_))
	}

	/// Whether the latest request failed
	pub fn is_failed(&self) -> bool {
		matches!(self, Self::Failed(_))
	}

	/// Idle or loading: nothing to show yet
	pub fn is_pending(&self) -> bool {
		matches!(self, Self::Idle | Self::Loading)
	}

	/// The data, when ready
	pub fn data(&self) -> Option<&T> {
		match self {
			Self::Ready(data) => Some(data),
			_ => None,
		}
	}

	/// The error, when failed
	pub fn error(&self) -> Option<&FetchError> {
		match self {
			Self::Failed(error) => Some(error),
			_ => None,
		}
	}

	/// Map the ready value, keeping every other state
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResourceState<U> {
		match self {
			Self::Idle => ResourceState::Idle,
			Self::Loading => ResourceState::Loading,
			Self::Ready(data) => ResourceState::Ready(f(data)),
			Self::Failed(error) => ResourceState::Failed(error),
		}
	}
}

/// What happens to the transport of a superseded request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelPolicy {
	/// Drop the request future at its next suspension point
	Abort,
	/// Let the request run to completion; only the staleness check protects state
	Advisory,
}

type Fetcher<K, T> = Rc<dyn Fn(K) -> LocalBoxFuture<'static, Result<T, FetchError>>>;

struct InFlight {
	generation: u64,
	token: CancelToken,
	task: Option<TaskHandle>,
}

impl InFlight {
	fn cancel(self) {
		self.token.cancel();
		if let Some(task) = self.task {
			task.abort();
		}
	}
}

struct ResourceInner<K: 'static, T: 'static> {
	fetcher: Fetcher<K, T>,
	policy: CancelPolicy,
	state: Signal<ResourceState<T>>,
	key: RefCell<Option<K>>,
	generation: Cell<u64>,
	in_flight: RefCell<Option<InFlight>>,
	torn_down: Cell<bool>,
}

/// An async resource keyed by `K`.
///
/// Clones share the same subscription. Requests run as local tasks, so on
/// native targets `subscribe` must be called inside a `tokio::task::LocalSet`.
pub struct Resource<K: 'static, T: 'static> {
	inner: Rc<ResourceInner<K, T>>,
}

impl<K, T> Clone for Resource<K, T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<K, T> Resource<K, T>
where
	K: Clone + PartialEq + Debug + 'static,
	T: 'static,
{
	/// Create an idle resource whose superseded requests are aborted
	pub fn new<F, Fut>(fetcher: F) -> Self
	where
		F: Fn(K) -> Fut + 'static,
		Fut: Future<Output = Result<T, FetchError>> + 'static,
	{
		Self::with_policy(fetcher, CancelPolicy::Abort)
	}

	/// Create an idle resource that never aborts the transport.
	///
	/// Superseded requests still complete; their results are discarded.
	pub fn advisory<F, Fut>(fetcher: F) -> Self
	where
		F: Fn(K) -> Fut + 'static,
		Fut: Future<Output = Result<T, FetchError>> + 'static,
	{
		Self::with_policy(fetcher, CancelPolicy::Advisory)
	}

	/// Create an idle resource with an explicit cancel policy
	pub fn with_policy<F, Fut>(fetcher: F, policy: CancelPolicy) -> Self
	where
		F: Fn(K) -> Fut + 'static,
		Fut: Future<Output = Result<T, FetchError>> + 'static,
	{
		Self {
			inner: Rc::new(ResourceInner {
				fetcher: Rc::new(move |key| fetcher(key).boxed_local()),
				policy,
				state: Signal::new(ResourceState::Idle),
				key: RefCell::new(None),
				generation: Cell::new(0),
				in_flight: RefCell::new(None),
				torn_down: Cell::new(false),
			}),
		}
	}

	/// Point the resource at `key`.
	///
	/// A key equal to the current one is a no-op while its request is in
	/// flight or its result is showing. Any other key supersedes the previous
	/// request. Returns whether a request was issued.
	pub fn subscribe(&self, key: K) -> bool {
		let inner = &self.inner;
		let same_key = inner.key.borrow().as_ref() == Some(&key);
		if same_key && !inner.torn_down.get() && !inner.state.with_untracked(ResourceState::is_idle) {
			tracing::debug!(?key, "resource already subscribed to this key");
			return false;
		}
		inner.issue(key);
		true
	}

	/// Re-issue the request for the current key. Returns false when there is none.
	pub fn retry(&self) -> bool {
		let key = self.inner.key.borrow().clone();
		match key {
			Some(key) => {
				tracing::debug!(?key, "retrying resource");
				self.inner.issue(key);
				true
			}
			None => false,
		}
	}

	/// Stop caring about the in-flight request.
	///
	/// Synchronous: once this returns no pending result can change the state.
	/// Subscribing afterwards starts a fresh cycle.
	pub fn teardown(&self) {
		if self.inner.torn_down.replace(true) {
			return;
		}
		if let Some(previous) = self.inner.in_flight.take() {
			tracing::debug!(generation = previous.generation, "tearing down in-flight request");
			previous.cancel();
		}
	}

	/// Current state, tracked
	pub fn state(&self) -> ResourceState<T>
	where
		T: Clone,
	{
		self.inner.state.get()
	}

	/// Current state without tracking
	pub fn state_untracked(&self) -> ResourceState<T>
	where
		T: Clone,
	{
		self.inner.state.get_untracked()
	}

	/// Borrow the current state, tracked
	pub fn with_state<R>(&self, f: impl FnOnce(&ResourceState<T>) -> R) -> R {
		self.inner.state.with(f)
	}

	/// The underlying state signal
	pub fn state_signal(&self) -> Signal<ResourceState<T>> {
		self.inner.state.clone()
	}

	/// The key of the latest request
	pub fn key(&self) -> Option<K> {
		self.inner.key.borrow().clone()
	}

	/// Number of requests issued so far
	pub fn generation(&self) -> u64 {
		self.inner.generation.get()
	}

	/// Whether a request may still commit
	pub fn is_in_flight(&self) -> bool {
		self.inner.in_flight.borrow().is_some()
	}

	/// Whether `teardown` ran since the last subscribe
	pub fn is_torn_down(&self) -> bool {
		self.inner.torn_down.get()
	}

	/// Cancel policy of superseded requests
	pub fn policy(&self) -> CancelPolicy {
		self.inner.policy
	}
}

impl<K, T> ResourceInner<K, T>
where
	K: Clone + PartialEq + Debug + 'static,
	T: 'static,
{
	fn issue(self: &Rc<Self>, key: K) {
		self.torn_down.set(false);
		if let Some(previous) = self.in_flight.take() {
			tracing::debug!(generation = previous.generation, "superseding in-flight request");
			previous.cancel();
		}

		let generation = self.generation.get() + 1;
		self.generation.set(generation);
		*self.key.borrow_mut() = Some(key.clone());

		let token = CancelToken::new();
		let request = (self.fetcher)(key);
		let resource: Weak<Self> = Rc::downgrade(self);
		let task = spawn_local({
			let token = token.clone();
			async move {
				let result = request.await;
				if let Some(resource) = resource.upgrade() {
					resource.commit(generation, &token, result);
				}
			}
		});
		let task = match self.policy {
			CancelPolicy::Abort => Some(task),
			CancelPolicy::Advisory => None,
		};
		*self.in_flight.borrow_mut() = Some(InFlight {
			generation,
			token,
			task,
		});

		self.state.set(ResourceState::Loading);
	}

	fn commit(&self, generation: u64, token: &CancelToken, result: Result<T, FetchError>) {
		if self.torn_down.get() || token.is_cancelled() || self.generation.get() != generation {
			tracing::debug!(
				generation,
				latest = self.generation.get(),
				"discarding stale resource result"
			);
			return;
		}

		self.in_flight.borrow_mut().take();
		let next = match result {
			Ok(data) => ResourceState::Ready(data),
			Err(error) => {
				tracing::debug!(%error, generation, "resource request failed");
				ResourceState::Failed(error)
			}
		};
		self.state.set(next);
	}
}

impl<K: 'static, T: 'static> Drop for ResourceInner<K, T> {
	fn drop(&mut self) {
		if let Some(previous) = self.in_flight.get_mut().take() {
			previous.cancel();
		}
	}
}

impl<K: Debug + 'static, T: 'static> Debug for Resource<K, T> {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Resource")
			.field("key", &*self.inner.key.borrow())
			.field("generation", &self.inner.generation.get())
			.field("policy", &self.inner.policy)
			.finish()
	}
}
