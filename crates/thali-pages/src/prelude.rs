//! Commonly used items
//!
//! ```ignore
//! use thali_pages::prelude::*;
//! ```

pub use crate::api::{
	Catalog, EntityId, HttpCatalog, MenuItem, RestaurantDetail, RestaurantSummary,
	fetch_restaurant, fetch_restaurants,
};
pub use crate::boundary::{FallbackBoundary, Placeholder};
pub use crate::callback::Callback;
pub use crate::component::{Element, View};
pub use crate::config::PagesSettings;
pub use crate::connectivity::{ConnectivityEvent, ConnectivityMonitor};
pub use crate::detail::RestaurantDetailView;
pub use crate::error::{FetchError, RenderError};
pub use crate::list::{ActiveFilter, ListController, RestaurantList};
pub use crate::reactive::{
	use_effect, use_layout_effect, use_online_status, use_online_status_in, use_resource,
};
pub use crate::resource::{Resource, ResourceState};
pub use crate::{debug_log, error_log, info_log, warn_log};
pub use thali_core::{Component, Mounted, Scope, Signal, mount, untrack};
