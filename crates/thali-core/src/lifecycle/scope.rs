use core::cell::{Cell, RefCell};
use core::future::Future;
use std::rc::Rc;

use crate::cancel::CancelToken;
use crate::reactive::{Effect, NodeId};
use crate::spawn::{TaskHandle, spawn_local};

type Cleanup = Box<dyn FnOnce()>;

/// Owner of the side effects of one mount cycle.
///
/// Clones share the same scope. Disposal is synchronous and runs once: the
/// scope token is cancelled, tracked tasks are aborted, owned effects are
/// disposed, then cleanups run in reverse registration order. A scope whose
/// last clone is dropped without an explicit `dispose` is disposed then.
#[derive(Clone)]
pub struct Scope {
	inner: Rc<ScopeInner>,
}

struct ScopeInner {
	id: NodeId,
	token: CancelToken,
	disposed: Cell<bool>,
	cleanups: RefCell<Vec<Cleanup>>,
	effects: RefCell<Vec<Effect>>,
	tasks: RefCell<Vec<TaskHandle>>,
}

impl Scope {
	/// Create a live scope
	pub fn new() -> Self {
		Self {
			inner: Rc::new(ScopeInner {
				id: NodeId::new(),
				token: CancelToken::new(),
				disposed: Cell::new(false),
				cleanups: RefCell::new(Vec::new()),
				effects: RefCell::new(Vec::new()),
				tasks: RefCell::new(Vec::new()),
			}),
		}
	}

	/// Identity of this scope (for logging)
	pub fn id(&self) -> NodeId {
		self.inner.id
	}

	/// The scope's liveness flag, cancelled on dispose
	pub fn token(&self) -> CancelToken {
		self.inner.token.clone()
	}

	/// Whether the scope has not been disposed yet
	pub fn is_alive(&self) -> bool {
		!self.inner.disposed.get()
	}

	/// Register a release action.
	///
	/// On an already disposed scope the action runs immediately.
	pub fn on_cleanup<F>(&self, cleanup: F)
	where
		F: FnOnce() + 'static,
	{
		if self.inner.disposed.get() {
			cleanup();
			return;
		}
		self.inner.cleanups.borrow_mut().push(Box::new(cleanup));
	}

	/// Run `f` now and again, synchronously, whenever a signal it read changes.
	///
	/// The watcher lives until the scope is disposed. Returns `None` on a disposed scope.
	pub fn watch<F>(&self, f: F) -> Option<NodeId>
	where
		F: FnMut() + 'static,
	{
		if self.inner.disposed.get() {
			return None;
		}
		Some(self.adopt(Effect::layout(f)))
	}

	/// Take ownership of an effect so that it is disposed with the scope
	pub fn adopt(&self, effect: Effect) -> NodeId {
		let id = effect.id();
		if self.inner.disposed.get() {
			effect.dispose();
		} else {
			self.inner.effects.borrow_mut().push(effect);
		}
		id
	}

	/// Spawn tracked async work.
	///
	/// The task is aborted when the scope is disposed. The returned token is the
	/// scope token, for work that must check liveness after its own awaits.
	pub fn spawn<F>(&self, future: F) -> CancelToken
	where
		F: Future<Output = ()> + 'static,
	{
		if self.inner.disposed.get() {
			return self.token();
		}
		let handle = spawn_local(future);
		let mut tasks = self.inner.tasks.borrow_mut();
		tasks.retain(TaskHandle::is_live);
		tasks.push(handle);
		self.token()
	}

	/// Spawn `future` and hand its output to `then` only if the scope is still alive.
	pub fn spawn_guarded<T, Fut, Then>(&self, future: Fut, then: Then) -> CancelToken
	where
		T: 'static,
		Fut: Future<Output = T> + 'static,
		Then: FnOnce(T) + 'static,
	{
		let token = self.token();
		let scope_id = self.id();
		self.spawn(async move {
			let output = future.await;
			if token.is_current() {
				then(output);
			} else {
				tracing::debug!(scope = ?scope_id, "discarding async result of a disposed scope");
			}
		})
	}

	/// Number of spawned tasks that have neither finished nor been aborted
	pub fn live_task_count(&self) -> usize {
		self.inner
			.tasks
			.borrow()
			.iter()
			.filter(|task| task.is_live())
			.count()
	}

	/// Number of tracked task handles, pruned on every spawn
	pub fn tracked_task_count(&self) -> usize {
		self.inner.tasks.borrow().len()
	}

	/// Number of cleanups waiting for dispose
	pub fn cleanup_count(&self) -> usize {
		self.inner.cleanups.borrow().len()
	}

	/// Release everything the scope owns. Idempotent.
	pub fn dispose(&self) {
		self.inner.release();
	}
}

impl Default for Scope {
	fn default() -> Self {
		Self::new()
	}
}

impl core::fmt::Debug for Scope {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Scope")
			.field("id", &self.inner.id)
			.field("alive", &self.is_alive())
			.finish()
	}
}

impl ScopeInner {
	fn release(&self) {
		if self.disposed.replace(true) {
			return;
		}

		self.token.cancel();

		for task in self.tasks.take() {
			task.abort();
		}

		// Dropped outside the borrow: disposing an effect may drop signals
		let effects = self.effects.take();
		drop(effects);

		let cleanups = self.cleanups.take();
		for cleanup in cleanups.into_iter().rev() {
			cleanup();
		}
	}
}

impl Drop for ScopeInner {
	fn drop(&mut self) {
		self.release();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::reactive::Signal;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	fn test_cleanups_run_once_in_reverse_order() {
		// Arrange
		let scope = Scope::new();
		let log = Rc::new(RefCell::new(Vec::new()));
		for name in ["listener", "timer", "request"] {
			let log = log.clone();
			scope.on_cleanup(move || log.borrow_mut().push(name));
		}

		// Act
		scope.dispose();
		scope.dispose();

		// Assert
		assert_eq!(*log.borrow(), vec!["request", "timer", "listener"]);
		assert!(!scope.is_alive());
		assert!(scope.token().is_cancelled());
	}

	#[rstest]
	fn test_cleanup_on_disposed_scope_runs_immediately() {
		let scope = Scope::new();
		scope.dispose();
		let ran = Rc::new(Cell::new(false));

		scope.on_cleanup({
			let ran = ran.clone();
			move || ran.set(true)
		});

		assert!(ran.get());
		assert_eq!(scope.cleanup_count(), 0);
	}

	#[rstest]
	fn test_dropping_last_clone_disposes() {
		let ran = Rc::new(Cell::new(false));
		let token = {
			let scope = Scope::new();
			let ran = ran.clone();
			scope.on_cleanup(move || ran.set(true));
			scope.token()
		};

		assert!(ran.get());
		assert!(token.is_cancelled());
	}

	#[rstest]
	#[serial]
	fn test_watch_stops_after_dispose() {
		let scope = Scope::new();
		let source = Signal::new(1);
		let seen = Rc::new(RefCell::new(Vec::new()));

		scope.watch({
			let source = source.clone();
			let seen = seen.clone();
			move || seen.borrow_mut().push(source.get())
		});
		source.set(2);
		scope.dispose();
		source.set(3);

		assert_eq!(*seen.borrow(), vec![1, 2]);
		assert!(scope.watch(|| {}).is_none());
	}

	#[rstest]
	#[tokio::test]
	async fn test_spawn_guarded_discards_after_dispose() {
		let local = tokio::task::LocalSet::new();
		let committed = Rc::new(Cell::new(false));

		local
			.run_until({
				let committed = committed.clone();
				async move {
					let scope = Scope::new();
					let (tx, rx) = futures::channel::oneshot::channel::<u32>();
					scope.spawn_guarded(rx, move |_| committed.set(true));
					tokio::task::yield_now().await;

					scope.dispose();
					let _ = tx.send(7);
					tokio::task::yield_now().await;
				}
			})
			.await;

		assert!(!committed.get());
	}

	#[rstest]
	#[tokio::test]
	async fn test_finished_tasks_are_pruned_on_spawn() {
		let local = tokio::task::LocalSet::new();

		local
			.run_until(async {
				// Arrange
				let scope = Scope::new();

				// Act
				for _ in 0..100 {
					scope.spawn(async {});
					tokio::task::yield_now().await;
				}
				let (tx, rx) = futures::channel::oneshot::channel::<()>();
				scope.spawn(async move {
					let _ = rx.await;
				});

				// Assert
				assert!(scope.tracked_task_count() <= 2);
				assert_eq!(scope.live_task_count(), 1);
				let _ = tx.send(());
			})
			.await;
	}

	#[rstest]
	#[tokio::test]
	async fn test_spawn_guarded_commits_while_alive() {
		let local = tokio::task::LocalSet::new();
		let committed = Rc::new(Cell::new(None));

		local
			.run_until({
				let committed = committed.clone();
				async move {
					let scope = Scope::new();
					let (tx, rx) = futures::channel::oneshot::channel::<u32>();
					scope.spawn_guarded(rx, move |value| committed.set(value.ok()));
					let _ = tx.send(7);
					for _ in 0..4 {
						tokio::task::yield_now().await;
					}
					assert!(scope.is_alive());
				}
			})
			.await;

		assert_eq!(committed.get(), Some(7));
	}
}
