//! Fine-grained reactivity: signals, effects and the runtime that links them.
//!
//! Reading a [`Signal`] inside a running [`Effect`] records a dependency. Writing
//! the signal re-runs the dependent effects: layout effects synchronously,
//! passive effects on the next flush of the runtime.

pub mod effect;
pub mod runtime;
pub mod signal;

pub use effect::{Effect, MAX_EFFECT_PASSES};
pub use runtime::{
	EffectTiming, NodeId, Runtime, clear_scheduler, set_scheduler, untrack, with_runtime,
};
pub use signal::Signal;
