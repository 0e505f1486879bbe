//! Cooperative cancellation.
//!
//! A [`CancelToken`] is the "is this call still current" flag of an async
//! operation. The owner cancels it when the operation becomes irrelevant
//! (unmount, superseded request); the operation checks it before committing
//! anything it produced.

use core::cell::Cell;
use std::rc::Rc;

/// Shared cancellation flag; clones observe the same state
#[derive(Clone, Default)]
pub struct CancelToken {
	cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
	/// Create a token that is still current
	pub fn new() -> Self {
		Self::default()
	}

	/// Mark the token cancelled. Idempotent.
	pub fn cancel(&self) {
		self.cancelled.set(true);
	}

	/// Whether [`CancelToken::cancel`] was called on any clone
	pub fn is_cancelled(&self) -> bool {
		self.cancelled.get()
	}

	/// Inverse of [`CancelToken::is_cancelled`]
	pub fn is_current(&self) -> bool {
		!self.cancelled.get()
	}
}

impl core::fmt::Debug for CancelToken {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("CancelToken")
			.field("cancelled", &self.cancelled.get())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_clones_share_cancellation() {
		let token = CancelToken::new();
		let clone = token.clone();
		assert!(clone.is_current());

		token.cancel();

		assert!(clone.is_cancelled());
		assert!(!clone.is_current());
	}

	#[rstest]
	fn test_independent_tokens() {
		let first = CancelToken::new();
		let second = CancelToken::new();

		first.cancel();

		assert!(second.is_current());
	}
}
