//! Shared helpers for thali-pages integration tests

#![allow(dead_code)]

use serde_json::{Value, json};
use thali_pages::api::{Catalog, EntityId};
use thali_pages::error::FetchError;
use thali_pages::testing::PendingFetches;

/// Let spawned local tasks run to their next suspension point
pub async fn settle() {
	for _ in 0..8 {
		tokio::task::yield_now().await;
	}
}

/// List payload wrapping `(id, name, rating)` entries in the catalogue's card layout
pub fn list_payload(entries: &[(&str, &str, Option<&str>)]) -> Value {
	let restaurants: Vec<Value> = entries
		.iter()
		.map(|(id, name, rating)| {
			let mut info = json!({ "id": id, "name": name, "cuisines": ["North Indian"] });
			if let Some(rating) = rating {
				info["avgRatingString"] = json!(rating);
			}
			json!({ "info": info })
		})
		.collect();

	json!({
		"data": { "cards": [
			{ "card": { "card": { "header": { "title": "Restaurants near you" } } } },
			{ "card": { "card": { "gridElements": { "infoWithStyle": { "restaurants": restaurants } } } } }
		] }
	})
}

/// Detail payload with a header and one menu section of `items`
pub fn detail_payload(name: &str, items: Vec<Value>) -> Value {
	json!({
		"data": { "cards": [
			{ "card": { "card": { "info": { "name": name, "cuisines": ["Biryani"], "costForTwoMessage": "₹400 for two" } } } },
			{ "groupedCard": { "cardGroupMap": { "REGULAR": { "cards": [
				{ "card": { "card": { "title": "Recommended", "itemCards": items } } }
			] } } } }
		] }
	})
}

/// One `itemCards` entry
pub fn item(id: &str, name: &str, price: Option<u64>, default_price: Option<u64>) -> Value {
	let mut info = json!({ "id": id, "name": name });
	if let Some(price) = price {
		info["price"] = json!(price);
	}
	if let Some(default_price) = default_price {
		info["defaultPrice"] = json!(default_price);
	}
	json!({ "card": { "info": info } })
}

/// Catalogue whose detail requests stay pending until resolved by the test
#[derive(Clone, Default)]
pub struct GatedCatalog {
	pub details: PendingFetches<EntityId, Value>,
	pub list: PendingFetches<(), Value>,
}

#[async_trait::async_trait(?Send)]
impl Catalog for GatedCatalog {
	async fn restaurants(&self) -> Result<Value, FetchError> {
		(self.list.fetcher())(()).await
	}

	async fn restaurant(&self, id: &EntityId) -> Result<Value, FetchError> {
		(self.details.fetcher())(id.clone()).await
	}
}
