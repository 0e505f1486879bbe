//! Local task spawning.
//!
//! Fetches and other async work run as tasks on the rendering thread:
//! `tokio::task::spawn_local` on native targets (inside a `tokio::task::LocalSet`),
//! `wasm_bindgen_futures::spawn_local` in the browser. Every task is wrapped in
//! [`futures::future::abortable`] so that its owner can drop it at the next
//! suspension point.

use core::cell::Cell;
use core::future::Future;
use std::rc::Rc;

use futures::future::{AbortHandle, abortable};

/// Handle to a spawned local task
#[derive(Debug, Clone)]
pub struct TaskHandle {
	abort: AbortHandle,
	finished: Rc<Cell<bool>>,
}

impl TaskHandle {
	/// Stop the task at its next suspension point. Idempotent.
	pub fn abort(&self) {
		self.abort.abort();
	}

	/// Whether [`TaskHandle::abort`] was called
	pub fn is_aborted(&self) -> bool {
		self.abort.is_aborted()
	}

	/// Whether the task ran to completion
	pub fn is_finished(&self) -> bool {
		self.finished.get()
	}

	/// Whether the task can still make progress
	pub fn is_live(&self) -> bool {
		!self.is_aborted() && !self.is_finished()
	}
}

/// Spawn a future on the current thread.
///
/// # Panics
///
/// On native targets, panics when called outside of a `tokio::task::LocalSet`.
pub fn spawn_local<F>(future: F) -> TaskHandle
where
	F: Future<Output = ()> + 'static,
{
	let (task, abort) = abortable(future);
	let finished = Rc::new(Cell::new(false));
	spawn_detached({
		let finished = finished.clone();
		async move {
			match task.await {
				Ok(()) => finished.set(true),
				Err(_) => tracing::trace!("local task aborted"),
			}
		}
	});
	TaskHandle { abort, finished }
}

/// Schedule flushes of passive effects as local tasks.
///
/// After this call, passive effects re-run shortly after the signal write that
/// invalidated them instead of waiting for a manual flush.
pub fn use_local_scheduler() {
	crate::reactive::set_scheduler(|flush| {
		spawn_detached(async move { flush() });
	});
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_detached<F>(future: F)
where
	F: Future<Output = ()> + 'static,
{
	// Detached: completion is observed through the task's own side effects
	drop(tokio::task::spawn_local(future));
}

#[cfg(target_arch = "wasm32")]
fn spawn_detached<F>(future: F)
where
	F: Future<Output = ()> + 'static,
{
	wasm_bindgen_futures::spawn_local(future);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::reactive::{Effect, Signal, with_runtime};
	use rstest::rstest;
	use serial_test::serial;
	use std::cell::RefCell;

	#[rstest]
	#[tokio::test]
	async fn test_spawned_task_runs() {
		let local = tokio::task::LocalSet::new();
		let ran = Rc::new(Cell::new(false));

		local
			.run_until({
				let ran = ran.clone();
				async move {
					spawn_local(async move { ran.set(true) });
					tokio::task::yield_now().await;
				}
			})
			.await;
		local.await;

		assert!(ran.get());
	}

	#[rstest]
	#[tokio::test]
	async fn test_completed_task_reports_finished() {
		let local = tokio::task::LocalSet::new();

		local
			.run_until(async {
				let handle = spawn_local(async {});
				assert!(handle.is_live());

				tokio::task::yield_now().await;

				assert!(handle.is_finished());
				assert!(!handle.is_aborted());
				assert!(!handle.is_live());
			})
			.await;
	}

	#[rstest]
	#[serial]
	#[tokio::test]
	async fn test_local_scheduler_flushes_passive_effects() {
		let local = tokio::task::LocalSet::new();

		local
			.run_until(async {
				// Arrange
				use_local_scheduler();
				let source = Signal::new(0);
				let runs = Rc::new(RefCell::new(Vec::new()));
				let _effect = Effect::new({
					let source = source.clone();
					let runs = runs.clone();
					move || runs.borrow_mut().push(source.get())
				});

				// Act
				source.set(1);
				tokio::task::yield_now().await;
				source.set(2);
				tokio::task::yield_now().await;

				// Assert
				assert_eq!(*runs.borrow(), vec![0, 1, 2]);
				assert_eq!(with_runtime(|rt| rt.pending_count()), 0);
				crate::reactive::clear_scheduler();
			})
			.await;
	}

	#[rstest]
	#[serial]
	#[tokio::test]
	async fn test_writes_before_flush_coalesce_into_one_run() {
		let local = tokio::task::LocalSet::new();

		local
			.run_until(async {
				use_local_scheduler();
				let source = Signal::new(0);
				let runs = Rc::new(Cell::new(0));
				let _effect = Effect::new({
					let source = source.clone();
					let runs = runs.clone();
					move || {
						let _ = source.get();
						runs.set(runs.get() + 1);
					}
				});

				source.set(1);
				source.set(2);
				tokio::task::yield_now().await;

				assert_eq!(runs.get(), 2);
				crate::reactive::clear_scheduler();
			})
			.await;
	}

	#[rstest]
	#[tokio::test]
	async fn test_aborted_task_never_completes() {
		let local = tokio::task::LocalSet::new();
		let ran = Rc::new(Cell::new(false));
		let (tx, rx) = futures::channel::oneshot::channel::<()>();

		local
			.run_until({
				let ran = ran.clone();
				async move {
					let handle = spawn_local(async move {
						let _ = rx.await;
						ran.set(true);
					});
					tokio::task::yield_now().await;
					handle.abort();
					let _ = tx.send(());
					tokio::task::yield_now().await;
					assert!(handle.is_aborted());
				}
			})
			.await;
		local.await;

		assert!(!ran.get());
	}
}
