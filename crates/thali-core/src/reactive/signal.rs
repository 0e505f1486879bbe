//! Signal - Fine-grained Reactive Primitive
//!
//! `Signal<T>` holds a value and records a dependency whenever it is read from
//! inside an effect.
//!
//! ## Key Features
//!
//! - **Automatic Dependency Tracking**: `get()` inside an Effect registers the Effect as a subscriber
//! - **Change Notification**: `set()` / `update()` re-run subscribers
//! - **Equality Gate**: `set_if_changed()` only notifies when the value actually differs,
//!   which is what keeps update actions from looping on unchanged state
//! - **Shared**: clones share one value through `Rc<RefCell<T>>`
//!
//! ## Example
//!
//! ```ignore
//! use thali_core::reactive::Signal;
//!
//! let count = Signal::new(0);
//! count.set(42);
//! count.update(|n| *n += 1);
//! assert_eq!(count.get(), 43);
//! assert!(!count.set_if_changed(43));
//! ```

use core::cell::RefCell;
use core::fmt;
use std::rc::Rc;

use super::runtime::{NodeId, try_with_runtime, with_runtime};

/// A reactive value shared by all of its clones
///
/// The value must not be written while a `with` closure on the same signal is
/// still borrowing it.
pub struct Signal<T: 'static> {
	id: NodeId,
	value: Rc<RefCell<T>>,
}

impl<T: 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			value: Rc::clone(&self.value),
		}
	}
}

impl<T: 'static> Signal<T> {
	/// Create a new Signal with the given initial value
	pub fn new(value: T) -> Self {
		Self {
			id: NodeId::new(),
			value: Rc::new(RefCell::new(value)),
		}
	}

	/// Get a clone of the current value, tracking the dependency
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		with_runtime(|rt| rt.track_dependency(self.id));
		self.get_untracked()
	}

	/// Get a clone of the current value without tracking
	pub fn get_untracked(&self) -> T
	where
		T: Clone,
	{
		self.value.borrow().clone()
	}

	/// Borrow the current value, tracking the dependency.
	///
	/// Avoids a clone for large values such as lists.
	pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		with_runtime(|rt| rt.track_dependency(self.id));
		f(&self.value.borrow())
	}

	/// Borrow the current value without tracking
	pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
		f(&self.value.borrow())
	}

	/// Replace the value and notify subscribers
	pub fn set(&self, value: T) {
		let previous = core::mem::replace(&mut *self.value.borrow_mut(), value);
		drop(previous);
		with_runtime(|rt| rt.notify_signal_change(self.id));
	}

	/// Replace the value only if it differs from the current one.
	///
	/// Returns whether subscribers were notified.
	pub fn set_if_changed(&self, value: T) -> bool
	where
		T: PartialEq,
	{
		if *self.value.borrow() == value {
			return false;
		}
		self.set(value);
		true
	}

	/// Mutate the value in place and notify subscribers once
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&mut T),
	{
		f(&mut *self.value.borrow_mut());
		with_runtime(|rt| rt.notify_signal_change(self.id));
	}

	/// Get the NodeId of this signal
	pub fn id(&self) -> NodeId {
		self.id
	}
}

impl<T: Default + 'static> Default for Signal<T> {
	fn default() -> Self {
		Self::new(T::default())
	}
}

impl<T: 'static> Drop for Signal<T> {
	fn drop(&mut self) {
		// Last clone leaves the graph
		if Rc::strong_count(&self.value) == 1 {
			let _ = try_with_runtime(|rt| rt.remove_node(self.id));
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("id", &self.id)
			.field("value", &*self.value.borrow())
			.finish()
	}
}
