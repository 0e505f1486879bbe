//! thali Pages - restaurant catalogue views on the thali reactive core
//!
//! Binds remote data, connectivity and component lifetime together so that a
//! view always shows exactly one of: an offline notice, a placeholder, an
//! isolated failure, or its content.
//!
//! ## Architecture
//!
//! - [`connectivity`]: Process-wide online flag with reference-counted host listeners
//! - [`resource`]: Async resource bound to a `ResourceState` with stale-result suppression
//! - [`reactive`]: Scope-bound hooks (`use_effect`, `use_resource`, `use_online_status`)
//! - [`list`]: Master/visible restaurant lists with exclusive filters, and the list view
//! - [`detail`]: Restaurant detail view keyed by identifier
//! - [`boundary`]: Placeholder and failure isolation around resource-backed subtrees
//! - [`api`]: Catalogue client, model and tolerant payload extraction
//! - [`component`]: Inspectable view tree
//! - [`config`]: TOML settings
//!
//! ## Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use thali_pages::prelude::*;
//!
//! let settings = PagesSettings::from_file("thali.toml")?.with_env_overrides()?;
//! let catalog: Rc<dyn Catalog> = Rc::new(HttpCatalog::new(settings.api.clone())?);
//!
//! let list = mount(RestaurantList::new(catalog, ConnectivityMonitor::shared(), &settings));
//! println!("{}", list.output().unwrap_or_default().to_html());
//! ```

pub mod api;
pub mod boundary;
pub mod callback;
pub mod component;
pub mod config;
pub mod connectivity;
pub mod detail;
pub mod error;
pub mod list;
pub mod logging;
pub mod reactive;
pub mod resource;

// Unified prelude for simplified imports
pub mod prelude;

// Test doubles (mock environment, scripted catalogue, pending fetches)
pub mod testing;

pub use api::{Catalog, EntityId, HttpCatalog, MenuItem, RestaurantDetail, RestaurantSummary};
pub use boundary::{FallbackBoundary, Placeholder};
pub use callback::Callback;
pub use component::{Element, View};
pub use config::PagesSettings;
pub use connectivity::{
	ConnectivityEnvironment, ConnectivityEvent, ConnectivityMonitor, ConnectivityState,
	ConnectivitySubscription,
};
pub use detail::RestaurantDetailView;
pub use error::{ConfigError, FetchError, RenderError};
pub use list::{ActiveFilter, ListController, RestaurantList};
pub use reactive::{use_effect, use_layout_effect, use_online_status, use_resource};
pub use resource::{CancelPolicy, Resource, ResourceState};
