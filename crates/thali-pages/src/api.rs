//! Catalogue API.
//!
//! - [`catalog`]: the [`Catalog`] trait and its HTTP implementation
//! - [`model`]: restaurant summaries, details and menu items
//! - [`extract`]: turning loosely shaped payloads into the model
//! - [`path`]: safe navigation through `serde_json::Value` trees
//!
//! The remote payload is not contractually shaped field by field. Every
//! extractor defaults a missing node to an empty value instead of failing.

pub mod catalog;
pub mod extract;
pub mod model;
pub mod path;

pub use catalog::{Catalog, HttpCatalog, fetch_restaurant, fetch_restaurants};
pub use model::{EntityId, MenuItem, RestaurantDetail, RestaurantSummary};
