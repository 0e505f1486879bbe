//! Reactive runtime and lifecycle controller
//!
//! Re-exports `thali-core`: signals, effects, scopes, components and
//! cancellation tokens.

pub use thali_core::*;
