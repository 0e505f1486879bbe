//! Cloneable callback wrapper.
//!
//! A [`Callback`] keeps one closure behind an `Rc`, so every clone calls the
//! same function and compares equal to the original. Views hand callbacks to
//! buttons (retry, search, filter) without re-creating closures per render.

use std::rc::Rc;

/// A shared, cheaply cloneable function
pub struct Callback<Args = (), Ret = ()> {
	inner: Rc<dyn Fn(Args) -> Ret + 'static>,
}

impl<Args, Ret> Callback<Args, Ret> {
	/// Wrap a function or closure
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Args) -> Ret + 'static,
	{
		Self { inner: Rc::new(f) }
	}

	/// Call the wrapped function
	pub fn call(&self, args: Args) -> Ret {
		(self.inner)(args)
	}

	/// Whether both callbacks wrap the very same closure
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl<Args, Ret> Clone for Callback<Args, Ret> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<Args, Ret> PartialEq for Callback<Args, Ret> {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl<Args, Ret> core::fmt::Debug for Callback<Args, Ret> {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Callback")
			.field("ptr", &Rc::as_ptr(&self.inner).cast::<()>())
			.finish()
	}
}

impl<F, Args, Ret> From<F> for Callback<Args, Ret>
where
	F: Fn(Args) -> Ret + 'static,
{
	fn from(f: F) -> Self {
		Self::new(f)
	}
}
