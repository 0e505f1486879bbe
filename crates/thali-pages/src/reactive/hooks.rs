//! Scope-bound hooks.
//!
//! Every hook takes the [`Scope`](thali_core::Scope) of the component calling
//! it and registers its own release there: effects are disposed, resources are
//! torn down and connectivity subscriptions are dropped when the scope is
//! disposed.

mod effect;
mod online;
mod resource;

pub use effect::{use_effect, use_layout_effect};
pub use online::{use_online_status, use_online_status_in};
pub use resource::use_resource;
