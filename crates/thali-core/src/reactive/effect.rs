//! Effect - Reactive Side Effects
//!
//! An `Effect` runs a closure immediately and again whenever a signal read
//! during its previous run changes.
//!
//! ## Re-entrancy
//!
//! An effect that writes a signal it also reads invalidates itself. Instead of
//! recursing, the runtime marks the running effect dirty and runs it again once
//! the current pass returns. Writes guarded by `Signal::set_if_changed` converge
//! after one extra pass; an effect that changes its own input on every pass is
//! stopped after [`MAX_EFFECT_PASSES`] and an error is logged.
//!
//! ## Example
//!
//! ```ignore
//! use thali_core::reactive::{Effect, EffectTiming, Signal};
//!
//! let count = Signal::new(0);
//! let doubled = Signal::new(0);
//!
//! let _effect = Effect::new_with_timing(
//!     {
//!         let (count, doubled) = (count.clone(), doubled.clone());
//!         move || doubled.set(count.get() * 2)
//!     },
//!     EffectTiming::Layout,
//! );
//!
//! count.set(5);
//! assert_eq!(doubled.get_untracked(), 10);
//! ```

use core::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use super::runtime::{EffectTiming, NodeId, Observer, try_with_runtime, with_runtime};

/// Upper bound on consecutive passes of one self-invalidating effect
pub const MAX_EFFECT_PASSES: usize = 100;

type EffectFn = Box<dyn FnMut() + 'static>;

struct EffectSlot {
	/// Taken out while the effect runs, so that nested notifications never
	/// borrow the slot table re-entrantly
	run: Option<EffectFn>,
	timing: EffectTiming,
}

thread_local! {
	static EFFECTS: RefCell<BTreeMap<NodeId, EffectSlot>> = const { RefCell::new(BTreeMap::new()) };

	// Running effects and whether they were invalidated during their current pass
	static RUNNING: RefCell<BTreeMap<NodeId, bool>> = const { RefCell::new(BTreeMap::new()) };
}

/// Timing of a live effect, `None` if no such effect exists
pub(crate) fn effect_timing(effect_id: NodeId) -> Option<EffectTiming> {
	EFFECTS
		.try_with(|effects| effects.borrow().get(&effect_id).map(|slot| slot.timing))
		.ok()
		.flatten()
}

/// A reactive effect that re-runs when its dependencies change
///
/// Dropping the handle disposes the effect.
pub struct Effect {
	id: NodeId,
	disposed: Rc<Cell<bool>>,
}

impl Effect {
	/// Create a passive effect and run it once.
	///
	/// # Arguments
	///
	/// * `f` - The effect function.
	pub fn new<F>(f: F) -> Self
	where
		F: FnMut() + 'static,
	{
		Self::new_with_timing(f, EffectTiming::Passive)
	}

	/// Create a layout effect and run it once.
	pub fn layout<F>(f: F) -> Self
	where
		F: FnMut() + 'static,
	{
		Self::new_with_timing(f, EffectTiming::Layout)
	}

	/// Create an effect with the given timing and run it once.
	///
	/// # Arguments
	///
	/// * `f` - The effect function.
	/// * `timing` - Whether re-runs happen synchronously (Layout) or on flush (Passive).
	pub fn new_with_timing<F>(mut f: F, timing: EffectTiming) -> Self
	where
		F: FnMut() + 'static,
	{
		let id = NodeId::new();
		let disposed = Rc::new(Cell::new(false));

		let guard = disposed.clone();
		EFFECTS.with(|effects| {
			effects.borrow_mut().insert(
				id,
				EffectSlot {
					run: Some(Box::new(move || {
						if !guard.get() {
							f();
						}
					})),
					timing,
				},
			);
		});

		Self::execute_effect(id);

		Self { id, disposed }
	}

	/// Execute an effect by its ID.
	///
	/// Called by the runtime when a dependency changes and by the lifecycle
	/// controller for explicit re-renders. Calling it for an effect that is
	/// already running marks that effect for another pass instead of recursing.
	pub(crate) fn execute_effect(effect_id: NodeId) {
		let reentered = RUNNING.with(|running| {
			let mut running = running.borrow_mut();
			match running.get_mut(&effect_id) {
				Some(dirty) => {
					*dirty = true;
					true
				}
				None => {
					running.insert(effect_id, false);
					false
				}
			}
		});
		if reentered {
			return;
		}

		let mut passes = 0;
		loop {
			passes += 1;

			let taken = EFFECTS.with(|effects| {
				effects
					.borrow_mut()
					.get_mut(&effect_id)
					.and_then(|slot| slot.run.take().map(|run| (run, slot.timing)))
			});
			let Some((mut run, timing)) = taken else {
				break;
			};

			// An enclosing `untrack` must not stop this effect from re-tracking
			let outer_untracked = with_runtime(|rt| {
				rt.clear_dependencies(effect_id);
				rt.push_observer(Observer {
					id: effect_id,
					timing,
				});
				rt.suspend_untracked()
			});

			run();

			with_runtime(|rt| {
				rt.pop_observer();
				rt.restore_untracked(outer_untracked);
			});

			// Disposed while running: the slot is gone and the closure is dropped
			// here, outside of any borrow of the slot table
			let orphaned = EFFECTS.with(|effects| match effects.borrow_mut().get_mut(&effect_id) {
				Some(slot) => {
					slot.run = Some(run);
					None
				}
				None => Some(run),
			});
			drop(orphaned);

			let dirty = RUNNING.with(|running| {
				running
					.borrow_mut()
					.get_mut(&effect_id)
					.map(|dirty| core::mem::replace(dirty, false))
					.unwrap_or(false)
			});
			if !dirty {
				break;
			}
			if passes >= MAX_EFFECT_PASSES {
				tracing::error!(
					effect = ?effect_id,
					passes,
					"effect invalidated itself on every pass; update cycle stopped"
				);
				break;
			}
		}

		RUNNING.with(|running| {
			running.borrow_mut().remove(&effect_id);
		});
	}

	/// Run `f` as part of the effect's current execution.
	///
	/// Invalidations of the effect raised by `f` are coalesced into one pass
	/// that runs after `f` returns.
	pub(crate) fn run_within<R>(effect_id: NodeId, f: impl FnOnce() -> R) -> R {
		let nested = RUNNING.with(|running| {
			let mut running = running.borrow_mut();
			if running.contains_key(&effect_id) {
				true
			} else {
				running.insert(effect_id, false);
				false
			}
		});
		let result = f();
		if !nested {
			let dirty = RUNNING
				.with(|running| running.borrow_mut().remove(&effect_id))
				.unwrap_or(false);
			if dirty {
				Self::execute_effect(effect_id);
			}
		}
		result
	}

	/// Get the NodeId of this effect
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Whether [`Effect::dispose`] has run
	pub fn is_disposed(&self) -> bool {
		self.disposed.get()
	}

	/// Dispose this effect.
	///
	/// The effect never runs again and leaves the dependency graph. Idempotent.
	pub fn dispose(&self) {
		if self.disposed.replace(true) {
			return;
		}

		let _ = try_with_runtime(|rt| rt.remove_node(self.id));

		let slot = EFFECTS
			.try_with(|effects| effects.borrow_mut().remove(&self.id))
			.ok()
			.flatten();
		drop(slot);
	}
}

impl Drop for Effect {
	fn drop(&mut self) {
		self.dispose();
	}
}

impl core::fmt::Debug for Effect {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Effect")
			.field("id", &self.id)
			.field("disposed", &self.disposed.get())
			.finish()
	}
}
