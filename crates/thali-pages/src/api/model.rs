//! Catalogue model.
//!
//! Values are built once by the extractors when a fetch resolves and replaced
//! wholesale by the next one; nothing here is mutated in place.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a restaurant, unique within a list
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
	/// Wrap an identifier
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// The identifier text
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Whether the identifier is empty
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for EntityId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for EntityId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for EntityId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl From<u64> for EntityId {
	fn from(id: u64) -> Self {
		Self(id.to_string())
	}
}

/// One entry of the restaurant list
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RestaurantSummary {
	/// Identifier
	pub id: EntityId,
	/// Display name
	pub name: String,
	/// Rating as delivered by the server, parsed on demand
	pub rating: Option<String>,
	/// Cuisines in the server's order
	pub cuisines: Vec<String>,
	/// Delivery time estimate
	pub delivery_minutes: Option<u32>,
	/// Cost descriptor, e.g. "₹300 for two"
	pub cost_for_two: Option<String>,
	/// Neighbourhood
	pub area: Option<String>,
	/// Image key on the image CDN
	pub image_id: Option<String>,
}

impl RestaurantSummary {
	/// Create a summary with only an identifier and a name
	pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			..Self::default()
		}
	}

	/// Set the raw rating text
	pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
		self.rating = Some(rating.into());
		self
	}

	/// Set the cuisines
	pub fn with_cuisines<I, S>(mut self, cuisines: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.cuisines = cuisines.into_iter().map(Into::into).collect();
		self
	}

	/// Rating parsed as a number. Absent, unparseable and non-finite ratings yield `None`.
	pub fn rating_value(&self) -> Option<f64> {
		self.rating
			.as_deref()
			.and_then(|rating| rating.trim().parse::<f64>().ok())
			.filter(|rating| rating.is_finite())
	}
}

/// One dish on a menu
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MenuItem {
	/// Identifier
	pub id: String,
	/// Dish name
	pub name: String,
	/// Price, `defaultPrice` taking precedence over `price`
	pub price: Option<u64>,
	/// Menu section title, empty when the section has none
	pub category: String,
	/// Free text description
	pub description: Option<String>,
}

impl MenuItem {
	/// Price as displayed, `None` when the item has no price
	pub fn price_text(&self) -> Option<String> {
		self.price.map(|price| price.to_string())
	}
}

/// A restaurant with its menu
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RestaurantDetail {
	/// Identifier
	pub id: EntityId,
	/// Display name
	pub name: String,
	/// Cost descriptor, empty when missing
	pub cost_for_two: String,
	/// Cuisines in the server's order
	pub cuisines: Vec<String>,
	/// Menu in the server's order
	pub menu: Vec<MenuItem>,
	/// Neighbourhood, empty when missing
	pub area: String,
	/// Rating text, when present
	pub rating: Option<String>,
}
