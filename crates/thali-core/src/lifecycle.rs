//! Mount / update / unmount contract for stateful views.
//!
//! A [`Component`] declares:
//!
//! - `init`: runs exactly once when the component is mounted
//! - `render`: produces the component's output; re-runs whenever a signal it read changes
//! - `updated`: runs after every re-render that follows the first one
//! - `teardown`: runs exactly once when the component is unmounted
//!
//! Everything acquired during `init` (listeners, timers, in-flight requests,
//! watchers) is registered on the mount's [`Scope`]. Unmounting disposes the
//! scope synchronously, before `teardown`, so that the release happens on every
//! exit path, including an unmount that races a pending async initialization.
//!
//! ```ignore
//! use thali_core::lifecycle::{mount, Component, Scope};
//! use thali_core::reactive::Signal;
//!
//! struct Clock { ticks: Signal<u32> }
//!
//! impl Component for Clock {
//!     type Output = String;
//!
//!     fn init(&mut self, scope: &Scope) {
//!         let ticks = self.ticks.clone();
//!         scope.spawn(async move { /* tick every second */ });
//!         scope.on_cleanup(move || drop(ticks));
//!     }
//!
//!     fn render(&self) -> String {
//!         format!("{} ticks", self.ticks.get())
//!     }
//! }
//!
//! let mounted = mount(Clock { ticks: Signal::new(0) });
//! assert_eq!(mounted.output().as_deref(), Some("0 ticks"));
//! ```

mod component;
mod scope;

pub use component::{Component, Mounted, mount};
pub use scope::Scope;
