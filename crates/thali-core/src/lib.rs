//! # thali-core
//!
//! Fine-grained reactive runtime and component lifecycle controller.
//!
//! ## Modules
//!
//! - [`reactive`]: `Signal`, `Effect` and the thread-local runtime that tracks
//!   dependencies between them
//! - [`lifecycle`]: the mount / update / unmount contract (`Component`, `Mounted`)
//!   and the `Scope` that owns a mount cycle's side effects
//! - [`cancel`]: cooperative cancellation flags consulted before committing async results
//! - [`spawn`]: local (single-threaded) task spawning with optional hard abort
//!
//! The runtime is single-threaded by construction: every reactive node lives in
//! thread-local storage and is shared through `Rc`. Async work runs as local tasks
//! and commits its results back into signals.

pub mod cancel;
pub mod lifecycle;
pub mod reactive;
pub mod spawn;

pub use cancel::CancelToken;
pub use lifecycle::{Component, Mounted, Scope, mount};
pub use reactive::{Effect, EffectTiming, NodeId, Signal, untrack, with_runtime};
pub use spawn::{TaskHandle, spawn_local};
