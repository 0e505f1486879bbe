//! Catalogue views on the reactive core
//!
//! This module provides access to thali-pages: the connectivity monitor, the
//! resource hook, the restaurant list and detail views, and fallback
//! boundaries.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use thali::pages::prelude::*;
//!
//! let settings = PagesSettings::default();
//! let catalog: Rc<dyn Catalog> = Rc::new(HttpCatalog::new(settings.api.clone())?);
//! let detail = mount(RestaurantDetailView::new(
//!     catalog,
//!     ConnectivityMonitor::shared(),
//!     &settings,
//!     "229",
//! ));
//!
//! // Later, navigating to another restaurant
//! detail.with_component(|view| view.show("311"));
//! ```

// Re-export all thali-pages functionality
pub use thali_pages::*;
