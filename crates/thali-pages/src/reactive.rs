//! Reactive hooks for thali-pages views.
//!
//! The runtime itself (`Signal`, `Effect`) lives in `thali_core`; this module
//! adds hooks that bind effects, resources and connectivity to a
//! [`Scope`](thali_core::Scope) so they are released with it.

pub mod hooks;

pub use hooks::{use_effect, use_layout_effect, use_online_status, use_online_status_in, use_resource};
pub use thali_core::{Effect, Signal, untrack};
