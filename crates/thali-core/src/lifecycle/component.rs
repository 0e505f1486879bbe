use core::cell::{Cell, RefCell};
use std::rc::Rc;

use super::scope::Scope;
use crate::reactive::{Effect, EffectTiming, untrack};

/// A stateful view with side effects tied to its presence on screen
pub trait Component: 'static {
	/// What `render` produces
	type Output: Clone + 'static;

	/// Acquire side effects. Runs exactly once per mount, before the first render.
	fn init(&mut self, scope: &Scope) {
		let _ = scope;
	}

	/// Produce the current output. Signals read here become render dependencies.
	fn render(&self) -> Self::Output;

	/// Runs after every re-render except the first render.
	///
	/// Signals read here are not tracked. Writes must be guarded with
	/// `Signal::set_if_changed` (or an equivalent input check), otherwise each
	/// write schedules yet another render.
	fn updated(&mut self, scope: &Scope) {
		let _ = scope;
	}

	/// Runs exactly once per mount, after the scope has been disposed
	fn teardown(&mut self) {}
}

/// A mounted component.
///
/// Dropping the handle unmounts the component.
pub struct Mounted<C: Component> {
	component: Rc<RefCell<C>>,
	scope: Scope,
	output: Rc<RefCell<Option<C::Output>>>,
	renders: Rc<Cell<usize>>,
	// Set when a re-render happened while the component was borrowed
	update_pending: Rc<Cell<bool>>,
	render_effect: Option<Effect>,
}

/// Mount a component: run `init`, then render it under a layout effect.
pub fn mount<C: Component>(component: C) -> Mounted<C> {
	let component = Rc::new(RefCell::new(component));
	let scope = Scope::new();

	component.borrow_mut().init(&scope);

	let output = Rc::new(RefCell::new(None));
	let renders = Rc::new(Cell::new(0));
	let update_pending = Rc::new(Cell::new(false));

	let render_effect = Effect::new_with_timing(
		{
			let component = component.clone();
			let output = output.clone();
			let renders = renders.clone();
			let scope = scope.clone();
			let update_pending = update_pending.clone();
			move || {
				let rendered = component.borrow().render();
				let previous = output.replace(Some(rendered));
				drop(previous);

				let count = renders.get() + 1;
				renders.set(count);
				if count > 1 {
					match component.try_borrow_mut() {
						Ok(mut component) => untrack(|| component.updated(&scope)),
						Err(_) => update_pending.set(true),
					}
				}
			}
		},
		EffectTiming::Layout,
	);

	tracing::info!(
		scope = ?scope.id(),
		component = core::any::type_name::<C>(),
		"component mounted"
	);

	Mounted {
		component,
		scope,
		output,
		renders,
		update_pending,
		render_effect: Some(render_effect),
	}
}

impl<C: Component> Mounted<C> {
	/// Latest rendered output, `None` once unmounted
	pub fn output(&self) -> Option<C::Output> {
		if !self.is_mounted() {
			return None;
		}
		self.output.borrow().clone()
	}

	/// Number of renders so far, including the first one
	pub fn render_count(&self) -> usize {
		self.renders.get()
	}

	/// Whether `unmount` has not run yet
	pub fn is_mounted(&self) -> bool {
		self.render_effect.is_some()
	}

	/// The scope owning this mount's side effects
	pub fn scope(&self) -> &Scope {
		&self.scope
	}

	/// Borrow the component.
	///
	/// A re-render triggered by `f` runs right away; its `updated` call is
	/// deferred until `f` returns.
	pub fn with_component<R>(&self, f: impl FnOnce(&C) -> R) -> R {
		let result = f(&self.component.borrow());
		if self.update_pending.replace(false) {
			if let Some(effect) = &self.render_effect {
				Effect::run_within(effect.id(), || {
					untrack(|| self.component.borrow_mut().updated(&self.scope));
				});
			}
		}
		result
	}

	/// Re-render for state the runtime does not track.
	///
	/// Ignored after unmount; coalesced into the running pass when called from
	/// inside `render` or `updated`.
	pub fn rerender(&self) {
		if let Some(effect) = &self.render_effect {
			Effect::execute_effect(effect.id());
		}
	}

	/// Unmount: stop rendering, dispose the scope, run `teardown`. Idempotent.
	pub fn unmount(&mut self) {
		let Some(render_effect) = self.render_effect.take() else {
			return;
		};
		render_effect.dispose();
		drop(render_effect);

		self.scope.dispose();
		self.component.borrow_mut().teardown();
		self.output.borrow_mut().take();

		tracing::info!(
			scope = ?self.scope.id(),
			component = core::any::type_name::<C>(),
			"component unmounted"
		);
	}
}

impl<C: Component> Drop for Mounted<C> {
	fn drop(&mut self) {
		self.unmount();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::reactive::Signal;
	use rstest::rstest;
	use serial_test::serial;

	#[derive(Default)]
	struct Calls {
		init: Cell<usize>,
		updated: Cell<usize>,
		teardown: Cell<usize>,
		cleanup: Cell<usize>,
	}

	struct Counter {
		count: Signal<u32>,
		calls: Rc<Calls>,
	}

	impl Component for Counter {
		type Output = String;

		fn init(&mut self, scope: &Scope) {
			self.calls.init.set(self.calls.init.get() + 1);
			let calls = self.calls.clone();
			scope.on_cleanup(move || calls.cleanup.set(calls.cleanup.get() + 1));
		}

		fn render(&self) -> String {
			format!("count: {}", self.count.get())
		}

		fn updated(&mut self, _scope: &Scope) {
			self.calls.updated.set(self.calls.updated.get() + 1);
		}

		fn teardown(&mut self) {
			self.calls.teardown.set(self.calls.teardown.get() + 1);
		}
	}

	/// Mirrors `source` into `mirror` from `updated`
	struct Mirror {
		source: Signal<u32>,
		mirror: Signal<u32>,
		guarded: bool,
	}

	impl Component for Mirror {
		type Output = (u32, u32);

		fn render(&self) -> (u32, u32) {
			(self.source.get(), self.mirror.get())
		}

		fn updated(&mut self, _scope: &Scope) {
			let next = self.source.get_untracked();
			if self.guarded {
				self.mirror.set_if_changed(next);
			} else {
				// Re-derives every time, even when equal
				self.mirror.set(next);
			}
		}
	}

	/// Copies `source` into `mirror` from `updated`; a scope watcher records `mirror`
	struct Watched {
		source: Signal<u32>,
		mirror: Signal<u32>,
		seen: Rc<RefCell<Vec<u32>>>,
	}

	impl Component for Watched {
		type Output = u32;

		fn init(&mut self, scope: &Scope) {
			let mirror = self.mirror.clone();
			let seen = self.seen.clone();
			scope.watch(move || seen.borrow_mut().push(mirror.get()));
		}

		fn render(&self) -> u32 {
			self.source.get()
		}

		fn updated(&mut self, _scope: &Scope) {
			self.mirror.set_if_changed(self.source.get_untracked());
		}
	}

	#[rstest]
	#[serial]
	fn test_watcher_woken_by_updated_keeps_reacting() {
		// Arrange
		let source = Signal::new(0);
		let mirror = Signal::new(0);
		let seen = Rc::new(RefCell::new(Vec::new()));
		let _mounted = mount(Watched {
			source: source.clone(),
			mirror: mirror.clone(),
			seen: seen.clone(),
		});

		// Act
		source.set(1);
		mirror.set(42);

		// Assert
		assert_eq!(*seen.borrow(), vec![0, 1, 42]);
	}

	#[rstest]
	#[serial]
	fn test_init_and_teardown_run_exactly_once() {
		// Arrange
		let calls = Rc::new(Calls::default());
		let count = Signal::new(0);

		// Act
		let mut mounted = mount(Counter {
			count: count.clone(),
			calls: calls.clone(),
		});
		count.set(1);
		count.set(2);
		mounted.unmount();
		mounted.unmount();
		drop(mounted);

		// Assert
		assert_eq!(calls.init.get(), 1);
		assert_eq!(calls.updated.get(), 2);
		assert_eq!(calls.teardown.get(), 1);
		assert_eq!(calls.cleanup.get(), 1);
	}

	#[rstest]
	#[serial]
	fn test_render_follows_signal_until_unmount() {
		let calls = Rc::new(Calls::default());
		let count = Signal::new(0);
		let mut mounted = mount(Counter {
			count: count.clone(),
			calls,
		});
		assert_eq!(mounted.output().as_deref(), Some("count: 0"));

		count.set(5);
		assert_eq!(mounted.output().as_deref(), Some("count: 5"));
		assert_eq!(mounted.render_count(), 2);

		mounted.unmount();
		count.set(6);
		assert_eq!(mounted.output(), None);
		assert_eq!(mounted.render_count(), 2);
	}

	#[rstest]
	#[serial]
	fn test_repeated_mount_cycles_pair_init_with_teardown() {
		let calls = Rc::new(Calls::default());
		let count = Signal::new(0);

		for _ in 0..3 {
			let mounted = mount(Counter {
				count: count.clone(),
				calls: calls.clone(),
			});
			assert!(mounted.is_mounted());
		}

		assert_eq!(calls.init.get(), 3);
		assert_eq!(calls.teardown.get(), 3);
		assert_eq!(calls.cleanup.get(), 3);
		with_runtime_check(&count, 0);
	}

	fn with_runtime_check(signal: &Signal<u32>, expected: usize) {
		crate::reactive::with_runtime(|rt| assert_eq!(rt.subscriber_count(signal.id()), expected));
	}

	#[rstest]
	#[serial]
	fn test_guarded_update_action_converges() {
		let source = Signal::new(1);
		let mirror = Signal::new(0);
		let mounted = mount(Mirror {
			source: source.clone(),
			mirror: mirror.clone(),
			guarded: true,
		});

		source.set(2);

		// source change -> render + updated writes mirror -> one extra render
		assert_eq!(mounted.output(), Some((2, 2)));
		assert_eq!(mounted.render_count(), 3);
	}

	#[rstest]
	#[serial]
	fn test_unguarded_update_action_is_cut_off() {
		let source = Signal::new(1);
		let mirror = Signal::new(0);
		let mounted = mount(Mirror {
			source: source.clone(),
			mirror: mirror.clone(),
			guarded: false,
		});

		source.set(2);

		assert_eq!(mounted.output(), Some((2, 2)));
		assert_eq!(
			mounted.render_count(),
			1 + crate::reactive::MAX_EFFECT_PASSES
		);
	}

	#[rstest]
	#[serial]
	fn test_rerender_inside_with_component_defers_updated() {
		let calls = Rc::new(Calls::default());
		let count = Signal::new(0);
		let mounted = mount(Counter {
			count: count.clone(),
			calls: calls.clone(),
		});

		let seen_inside = mounted.with_component(|_| {
			count.set(1);
			calls.updated.get()
		});

		assert_eq!(seen_inside, 0);
		assert_eq!(calls.updated.get(), 1);
		assert_eq!(mounted.output().as_deref(), Some("count: 1"));
	}

	#[rstest]
	#[serial]
	fn test_rerender_after_unmount_is_ignored() {
		let calls = Rc::new(Calls::default());
		let mut mounted = mount(Counter {
			count: Signal::new(0),
			calls: calls.clone(),
		});

		mounted.rerender();
		assert_eq!(mounted.render_count(), 2);

		mounted.unmount();
		mounted.rerender();
		assert_eq!(mounted.render_count(), 2);
		assert_eq!(calls.updated.get(), 1);
	}
}
