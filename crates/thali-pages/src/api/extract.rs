//! Payload extraction.
//!
//! List payload: the first card under `data.cards` carrying
//! `card.card.gridElements.infoWithStyle.restaurants`; each element's `info`
//! object is one summary.
//!
//! Detail payload: the first `data.cards[*].card.card.info` with a name is the
//! header; menu sections live under
//! `data.cards[*].groupedCard.cardGroupMap.REGULAR.cards[*].card.card`, each
//! carrying `itemCards[*].card.info`.

use serde_json::Value;

use super::model::{EntityId, MenuItem, RestaurantDetail, RestaurantSummary};
use super::path::{array_at, lookup, opt_str_at, str_at, strings_at, u64_at};

const RESTAURANTS_PATH: &str = "card.card.gridElements.infoWithStyle.restaurants";
const HEADER_PATH: &str = "card.card.info";
const SECTIONS_PATH: &str = "groupedCard.cardGroupMap.REGULAR.cards";

/// Restaurant summaries in payload order. Missing nodes yield an empty list.
pub fn restaurants(payload: &Value) -> Vec<RestaurantSummary> {
	let cards = array_at(payload, "data.cards");
	let Some(restaurants) = cards
		.iter()
		.find_map(|card| lookup(card, RESTAURANTS_PATH).and_then(Value::as_array))
	else {
		tracing::warn!(cards = cards.len(), "no restaurant list in payload, showing none");
		return Vec::new();
	};

	restaurants
		.iter()
		.filter_map(|element| element.get("info").filter(|info| info.is_object()))
		.map(summary)
		.collect()
}

fn summary(info: &Value) -> RestaurantSummary {
	RestaurantSummary {
		id: EntityId::new(str_at(info, "id")),
		name: str_at(info, "name"),
		rating: opt_str_at(info, "avgRatingString").or_else(|| opt_str_at(info, "avgRating")),
		cuisines: strings_at(info, "cuisines"),
		delivery_minutes: u64_at(info, "sla.deliveryTime").and_then(|minutes| u32::try_from(minutes).ok()),
		cost_for_two: opt_str_at(info, "costForTwo"),
		area: opt_str_at(info, "areaName"),
		image_id: opt_str_at(info, "cloudinaryImageId"),
	}
}

/// Detail of restaurant `id`. Every missing field defaults to empty.
pub fn restaurant_detail(id: &EntityId, payload: &Value) -> RestaurantDetail {
	let cards = array_at(payload, "data.cards");

	let header = cards
		.iter()
		.filter_map(|card| lookup(card, HEADER_PATH))
		.find(|info| !str_at(info, "name").is_empty());
	if header.is_none() {
		tracing::warn!(%id, "no restaurant header in payload");
	}
	let field = |path: &str| header.map(|info| str_at(info, path)).unwrap_or_default();

	RestaurantDetail {
		id: id.clone(),
		name: field("name"),
		cost_for_two: field("costForTwoMessage"),
		cuisines: header.map(|info| strings_at(info, "cuisines")).unwrap_or_default(),
		menu: menu(cards),
		area: field("areaName"),
		rating: header.and_then(|info| opt_str_at(info, "avgRatingString")),
	}
}

fn menu(cards: &[Value]) -> Vec<MenuItem> {
	cards
		.iter()
		.flat_map(|card| array_at(card, SECTIONS_PATH))
		.filter_map(|section| lookup(section, "card.card"))
		.flat_map(|section| {
			let category = str_at(section, "title");
			array_at(section, "itemCards")
				.iter()
				.filter_map(|item| lookup(item, "card.info"))
				.map(move |info| menu_item(info, &category))
		})
		.collect()
}

/// One menu item; `defaultPrice` takes precedence over `price`
pub fn menu_item(info: &Value, category: &str) -> MenuItem {
	MenuItem {
		id: str_at(info, "id"),
		name: str_at(info, "name"),
		price: u64_at(info, "defaultPrice").or_else(|| u64_at(info, "price")),
		category: category.to_string(),
		description: opt_str_at(info, "description").filter(|text| !text.is_empty()),
	}
}
