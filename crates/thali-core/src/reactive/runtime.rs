//! Reactive Runtime
//!
//! The runtime owns the dependency graph between signals and effects and decides
//! when an effect re-runs.
//!
//! ## Architecture
//!
//! 1. **Observer Stack**: the effect currently executing sits on top of the stack
//! 2. **Dependency Tracking**: `Signal::get()` records an edge to the top observer
//! 3. **Notification**: `Signal::set()` re-runs layout subscribers right away and
//!    queues passive subscribers
//! 4. **Flush**: queued effects run when the installed scheduler fires, or when
//!    [`Runtime::flush_updates`] is called by hand
//!
//! There is one runtime per thread. Views, resources and the connectivity
//! monitor all live on the thread that renders, so no synchronization is needed.
//!
//! ## Example
//!
//! ```ignore
//! use thali_core::reactive::{Effect, Signal, with_runtime};
//!
//! let count = Signal::new(0);
//!
//! let _effect = Effect::new({
//!     let count = count.clone();
//!     move || println!("count = {}", count.get())
//! });
//!
//! count.set(1);
//! with_runtime(|rt| rt.flush_updates()); // prints "count = 1"
//! ```

use core::cell::{Cell, RefCell};
use core::sync::atomic::{AtomicUsize, Ordering};
use std::collections::BTreeMap;

/// Unique identifier for reactive nodes (signals, effects, scopes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	/// Create a new unique NodeId
	pub fn new() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl Default for NodeId {
	fn default() -> Self {
		Self::new()
	}
}

/// Effect execution timing.
///
/// - Layout effects run synchronously inside the `set()` that invalidated them
/// - Passive effects are queued and run on the next flush
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectTiming {
	/// Runs synchronously when a dependency changes
	Layout,
	/// Runs on the next flush of pending updates
	#[default]
	Passive,
}

/// An effect that is currently executing
#[derive(Debug, Clone, Copy)]
pub struct Observer {
	/// Effect being executed
	pub id: NodeId,
	/// Timing the effect was registered with
	pub timing: EffectTiming,
}

/// Dependency graph node
#[derive(Debug, Default)]
pub(crate) struct DependencyNode {
	/// Nodes that depend on this node
	pub(crate) subscribers: Vec<NodeId>,
	/// Nodes this node depends on
	pub(crate) dependencies: Vec<NodeId>,
}

/// Type for the flush scheduler function
type SchedulerFn = Box<dyn Fn(Box<dyn FnOnce()>)>;

thread_local! {
	static SCHEDULER: RefCell<Option<SchedulerFn>> = const { RefCell::new(None) };
}

/// Install the function that schedules flushes of passive effects.
///
/// Without a scheduler, passive effects stay queued until
/// [`Runtime::flush_updates`] is called. `thali_core::spawn::use_local_scheduler`
/// installs one that flushes from a local task.
///
/// # Arguments
///
/// * `scheduler` - Receives the flush closure and decides when to run it.
pub fn set_scheduler<F>(scheduler: F)
where
	F: Fn(Box<dyn FnOnce()>) + 'static,
{
	SCHEDULER.with(|slot| *slot.borrow_mut() = Some(Box::new(scheduler)));
}

/// Remove the installed scheduler, if any.
pub fn clear_scheduler() {
	let _ = SCHEDULER.try_with(|slot| slot.borrow_mut().take());
}

/// Per-thread reactive runtime
pub struct Runtime {
	/// Effects currently executing, innermost last
	observer_stack: RefCell<Vec<Observer>>,
	/// Dependency graph: NodeId -> DependencyNode
	pub(crate) dependency_graph: RefCell<BTreeMap<NodeId, DependencyNode>>,
	/// Passive effects waiting for the next flush
	pub(crate) pending_updates: RefCell<Vec<NodeId>>,
	/// Whether a flush has been handed to the scheduler
	pub(crate) update_scheduled: Cell<bool>,
	/// Depth of nested `untrack` calls
	untracked_depth: Cell<usize>,
}

impl Runtime {
	/// Create a new Runtime instance
	pub fn new() -> Self {
		Self {
			observer_stack: RefCell::new(Vec::new()),
			dependency_graph: RefCell::new(BTreeMap::new()),
			pending_updates: RefCell::new(Vec::new()),
			update_scheduled: Cell::new(false),
			untracked_depth: Cell::new(0),
		}
	}

	/// The effect currently executing, if any
	pub fn current_observer(&self) -> Option<NodeId> {
		self.observer_stack
			.borrow()
			.last()
			.map(|observer| observer.id)
	}

	/// Push an observer onto the stack before running its effect
	pub fn push_observer(&self, observer: Observer) {
		self.observer_stack.borrow_mut().push(observer);
	}

	/// Pop the observer pushed by the matching `push_observer`
	pub fn pop_observer(&self) -> Option<Observer> {
		self.observer_stack.borrow_mut().pop()
	}

	/// Record that the current observer reads `signal_id`.
	///
	/// No-op outside an effect or inside [`untrack`].
	pub fn track_dependency(&self, signal_id: NodeId) {
		if self.untracked_depth.get() > 0 {
			return;
		}
		let Some(observer_id) = self.current_observer() else {
			return;
		};

		let mut graph = self.dependency_graph.borrow_mut();

		let signal_node = graph.entry(signal_id).or_default();
		if !signal_node.subscribers.contains(&observer_id) {
			signal_node.subscribers.push(observer_id);
		}

		let observer_node = graph.entry(observer_id).or_default();
		if !observer_node.dependencies.contains(&signal_id) {
			observer_node.dependencies.push(signal_id);
		}
	}

	/// Notify the subscribers of a signal that it changed.
	///
	/// Layout subscribers execute before this returns; passive subscribers are queued.
	pub fn notify_signal_change(&self, signal_id: NodeId) {
		let subscribers = match self.dependency_graph.borrow().get(&signal_id) {
			Some(node) => node.subscribers.clone(),
			None => return,
		};

		let mut passive = Vec::new();
		for subscriber_id in subscribers {
			match super::effect::effect_timing(subscriber_id) {
				Some(EffectTiming::Layout) => super::effect::Effect::execute_effect(subscriber_id),
				Some(EffectTiming::Passive) => passive.push(subscriber_id),
				// Disposed between the snapshot and now
				None => {}
			}
		}

		for effect_id in passive {
			self.schedule_update(effect_id);
		}
	}

	/// Queue a passive effect for the next flush
	pub fn schedule_update(&self, node_id: NodeId) {
		{
			let mut pending = self.pending_updates.borrow_mut();
			if !pending.contains(&node_id) {
				pending.push(node_id);
			}
		}

		if self.update_scheduled.replace(true) {
			return;
		}

		let handed_off = SCHEDULER
			.try_with(|slot| match slot.borrow().as_ref() {
				Some(scheduler) => {
					scheduler(Box::new(|| with_runtime(|rt| rt.flush_updates())));
					true
				}
				None => false,
			})
			.unwrap_or(false);

		// Without a scheduler the queue is flushed by hand
		if !handed_off {
			self.update_scheduled.set(false);
		}
	}

	/// Run every queued passive effect.
	///
	/// Effects queued while flushing run in the same call.
	pub fn flush_updates(&self) {
		self.update_scheduled.set(false);
		loop {
			let pending = core::mem::take(&mut *self.pending_updates.borrow_mut());
			if pending.is_empty() {
				break;
			}
			for node_id in pending {
				super::effect::Effect::execute_effect(node_id);
			}
		}
	}

	/// Number of passive effects waiting for a flush
	pub fn pending_count(&self) -> usize {
		self.pending_updates.borrow().len()
	}

	/// Drop every edge from `node_id` to the signals it read.
	///
	/// Called before an effect re-runs so that it only keeps the dependencies
	/// of its latest execution.
	pub fn clear_dependencies(&self, node_id: NodeId) {
		let mut graph = self.dependency_graph.borrow_mut();

		let dependencies = match graph.get_mut(&node_id) {
			Some(node) => core::mem::take(&mut node.dependencies),
			None => return,
		};

		for dep_id in dependencies {
			if let Some(dep_node) = graph.get_mut(&dep_id) {
				dep_node.subscribers.retain(|&id| id != node_id);
			}
		}
	}

	/// Remove a node from the dependency graph
	pub fn remove_node(&self, node_id: NodeId) {
		self.clear_dependencies(node_id);
		let mut graph = self.dependency_graph.borrow_mut();
		if let Some(node) = graph.remove(&node_id) {
			for subscriber in node.subscribers {
				if let Some(sub_node) = graph.get_mut(&subscriber) {
					sub_node.dependencies.retain(|&id| id != node_id);
				}
			}
		}
		drop(graph);
		self.pending_updates.borrow_mut().retain(|&id| id != node_id);
	}

	/// Check if a node exists in the dependency graph (for testing)
	pub fn has_node(&self, node_id: NodeId) -> bool {
		self.dependency_graph.borrow().contains_key(&node_id)
	}

	/// Get the number of subscribers for a node (for testing)
	pub fn subscriber_count(&self, node_id: NodeId) -> usize {
		self.dependency_graph
			.borrow()
			.get(&node_id)
			.map(|node| node.subscribers.len())
			.unwrap_or(0)
	}

	/// Lift every enclosing `untrack` for the duration of an effect run.
	///
	/// Returns the depth to hand back to [`Runtime::restore_untracked`].
	pub(crate) fn suspend_untracked(&self) -> usize {
		self.untracked_depth.replace(0)
	}

	pub(crate) fn restore_untracked(&self, depth: usize) {
		self.untracked_depth.set(depth);
	}

	fn enter_untracked(&self) {
		self.untracked_depth.set(self.untracked_depth.get() + 1);
	}

	fn exit_untracked(&self) {
		self.untracked_depth
			.set(self.untracked_depth.get().saturating_sub(1));
	}
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new()
	}
}

thread_local! {
	static RUNTIME: Runtime = Runtime::new();
}

/// Run `f` with this thread's runtime.
///
/// ```ignore
/// use thali_core::reactive::with_runtime;
///
/// with_runtime(|rt| rt.flush_updates());
/// ```
pub fn with_runtime<F, R>(f: F) -> R
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.with(f)
}

/// Safe variant for `Drop` implementations.
///
/// Returns None once the thread-local storage has been destroyed.
pub(crate) fn try_with_runtime<F, R>(f: F) -> Option<R>
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.try_with(f).ok()
}

/// Run `f` without recording dependencies for the current effect.
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
	struct Exit;
	impl Drop for Exit {
		fn drop(&mut self) {
			let _ = try_with_runtime(|rt| rt.exit_untracked());
		}
	}

	with_runtime(|rt| rt.enter_untracked());
	let _exit = Exit;
	f()
}
