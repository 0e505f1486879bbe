//! # thali
//!
//! Reactive view core for a restaurant catalogue client.
//!
//! thali ties asynchronous remote data, network connectivity and component
//! lifetime together: every side effect a view starts is released exactly
//! once when the view goes away, late responses never overwrite newer state,
//! and a failing subtree never takes its siblings down with it.
//!
//! ## Crates
//!
//! - [`core`]: `Signal`/`Effect` runtime, `Scope`, `Component`, `mount`, `CancelToken`
//! - [`pages`] (feature `pages`, default): connectivity monitor, resource hook,
//!   list controller, detail view, fallback boundary, catalogue client
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use thali::prelude::*;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     tracing_subscriber::fmt::init();
//!
//!     let settings = PagesSettings::from_file("thali.toml")?.with_env_overrides()?;
//!     let catalog: Rc<dyn Catalog> = Rc::new(HttpCatalog::new(settings.api.clone())?);
//!
//!     let local = tokio::task::LocalSet::new();
//!     local
//!         .run_until(async move {
//!             let list = mount(RestaurantList::new(
//!                 catalog,
//!                 ConnectivityMonitor::shared(),
//!                 &settings,
//!             ));
//!             tokio::task::yield_now().await;
//!             println!("{}", list.output().unwrap_or_default().to_html());
//!         })
//!         .await;
//!     Ok(())
//! }
//! ```

pub mod core;
#[cfg(feature = "pages")]
pub mod pages;

/// Commonly used items from every enabled crate
pub mod prelude {
	pub use thali_core::{
		CancelToken, Component, Effect, Mounted, Scope, Signal, mount, untrack,
	};

	#[cfg(feature = "pages")]
	pub use thali_pages::prelude::*;
}
