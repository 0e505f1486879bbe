//! Effect hooks: use_effect and use_layout_effect
//!
//! Both hooks create an [`Effect`] owned by the given scope. Dependencies are
//! tracked automatically: any `Signal` read inside the closure re-runs it when
//! it changes. The effect is disposed together with the scope.

use thali_core::{Effect, NodeId, Scope};

/// Runs a side effect after reactive state changes.
///
/// The closure runs once immediately. Re-runs are passive: they are queued
/// when a dependency changes and executed on the next runtime flush (driven by
/// the local scheduler installed with `thali_core::spawn::use_local_scheduler`).
///
/// # Arguments
///
/// * `scope` - The scope owning the effect
/// * `f` - The side effect
///
/// # Example
///
/// ```ignore
/// use thali_pages::reactive::hooks::use_effect;
///
/// use_effect(scope, {
///     let query = query.clone();
///     move || info_log!("searching for {}", query.get())
/// });
/// ```
pub fn use_effect<F>(scope: &Scope, f: F) -> NodeId
where
	F: FnMut() + 'static,
{
	scope.adopt(Effect::new(f))
}

/// Runs a side effect synchronously whenever reactive state changes.
///
/// Use this when the effect must observe every transition in order, for
/// example to copy fetched data into a controller before the next render.
///
/// # Arguments
///
/// * `scope` - The scope owning the effect
/// * `f` - The side effect
pub fn use_layout_effect<F>(scope: &Scope, f: F) -> NodeId
where
	F: FnMut() + 'static,
{
	scope.adopt(Effect::layout(f))
}
