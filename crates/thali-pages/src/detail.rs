//! Restaurant detail view.
//!
//! Fetches one restaurant by identifier through its own [`Resource`], so two
//! quick navigations ("A" then "B") always end up showing "B". Fetched
//! details are kept per identifier only when `detail.cache` is enabled;
//! otherwise every visit refetches.

use core::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thali_core::{Component, Scope, Signal};

use crate::api::{Catalog, EntityId, MenuItem, RestaurantDetail, fetch_restaurant};
use crate::boundary::{FallbackBoundary, Placeholder};
use crate::callback::Callback;
use crate::component::{Element, View};
use crate::config::{DetailSettings, PagesSettings};
use crate::connectivity::ConnectivityMonitor;
use crate::error::FetchError;
use crate::list::OFFLINE_NOTICE;
use crate::reactive::hooks::{use_online_status_in, use_resource};
use crate::resource::Resource;

type DetailCache = Rc<RefCell<HashMap<EntityId, RestaurantDetail>>>;

struct Bound {
	resource: Resource<EntityId, RestaurantDetail>,
	online: Signal<bool>,
	boundary: FallbackBoundary,
}

/// The restaurant detail (menu) view
pub struct RestaurantDetailView {
	catalog: Rc<dyn Catalog>,
	monitor: ConnectivityMonitor,
	settings: DetailSettings,
	initial: EntityId,
	cache: Option<DetailCache>,
	bound: Option<Bound>,
}

impl RestaurantDetailView {
	/// Create the view for restaurant `id`. Nothing is fetched until it is mounted.
	pub fn new(
		catalog: Rc<dyn Catalog>,
		monitor: ConnectivityMonitor,
		settings: &PagesSettings,
		id: impl Into<EntityId>,
	) -> Self {
		let settings = settings.detail.clone();
		let cache = settings.cache.then(DetailCache::default);
		Self {
			catalog,
			monitor,
			settings,
			initial: id.into(),
			cache,
			bound: None,
		}
	}

	/// Navigate to restaurant `id`. Returns whether a fetch was issued.
	///
	/// Ignored before mount.
	pub fn show(&self, id: impl Into<EntityId>) -> bool {
		match &self.bound {
			Some(bound) => bound.resource.subscribe(id.into()),
			None => false,
		}
	}

	/// The detail resource, once mounted
	pub fn resource(&self) -> Option<&Resource<EntityId, RestaurantDetail>> {
		self.bound.as_ref().map(|bound| &bound.resource)
	}

	/// Number of cached details (always 0 with caching disabled)
	pub fn cached_count(&self) -> usize {
		self.cache
			.as_ref()
			.map_or(0, |cache| cache.borrow().len())
	}

	fn render_bound(&self, bound: &Bound) -> View {
		let body = if bound.online.get() {
			bound
				.resource
				.with_state(|state| bound.boundary.render(state, |detail| Ok(detail_view(detail))))
		} else {
			Element::new("div")
				.class("offline-notice")
				.child(OFFLINE_NOTICE)
				.into()
		};
		Element::new("div").class("restaurant-detail").child(body).into()
	}
}

impl Component for RestaurantDetailView {
	type Output = View;

	fn init(&mut self, scope: &Scope) {
		let catalog = self.catalog.clone();
		let cache = self.cache.clone();
		let resource = use_resource(scope, self.initial.clone(), move |id: EntityId| {
			load_detail(catalog.clone(), cache.clone(), id)
		});

		let online = use_online_status_in(scope, &self.monitor);
		let boundary = FallbackBoundary::new("restaurant-detail")
			.placeholder(Placeholder::cards(self.settings.placeholder_cards))
			.on_retry(Callback::new({
				let resource = resource.clone();
				move |()| {
					resource.retry();
				}
			}));

		self.bound = Some(Bound {
			resource,
			online,
			boundary,
		});
	}

	fn render(&self) -> View {
		match &self.bound {
			Some(bound) => self.render_bound(bound),
			None => View::Empty,
		}
	}
}

async fn load_detail(
	catalog: Rc<dyn Catalog>,
	cache: Option<DetailCache>,
	id: EntityId,
) -> Result<RestaurantDetail, FetchError> {
	if let Some(hit) = cache
		.as_ref()
		.and_then(|cache| cache.borrow().get(&id).cloned())
	{
		tracing::debug!(%id, "restaurant detail served from cache");
		return Ok(hit);
	}
	let detail = fetch_restaurant(&*catalog, &id).await?;
	if let Some(cache) = &cache {
		cache.borrow_mut().insert(id, detail.clone());
	}
	Ok(detail)
}

/// Header and menu of one restaurant
pub fn detail_view(detail: &RestaurantDetail) -> View {
	let header = Element::new("div")
		.class("detail-header")
		.child(Element::new("h1").class("name").child(detail.name.as_str()))
		.child(
			Element::new("p")
				.class("cuisines")
				.child(detail.cuisines.join(", ")),
		)
		.child(
			Element::new("p")
				.class("cost-for-two")
				.child(detail.cost_for_two.as_str()),
		);

	let menu = Element::new("ul")
		.class("menu")
		.children(detail.menu.iter().map(menu_item_view));

	View::Fragment(vec![header.into(), menu.into()])
}

/// One menu row; the price element is omitted when the item has no price
pub fn menu_item_view(item: &MenuItem) -> Element {
	let row = Element::new("li")
		.class("menu-item")
		.child(Element::new("span").class("item-name").child(item.name.as_str()));
	match item.price_text() {
		Some(price) => row.child(Element::new("span").class("item-price").child(price)),
		None => row,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_menu_row_without_price_has_no_price_element() {
		let priced = MenuItem {
			name: "Veg Biryani".to_string(),
			price: Some(250),
			..MenuItem::default()
		};
		let unpriced = MenuItem {
			name: "Raita".to_string(),
			..MenuItem::default()
		};

		let priced: View = menu_item_view(&priced).into();
		let unpriced: View = menu_item_view(&unpriced).into();

		assert_eq!(
			priced.find_by_class("item-price").map(Element::text_content).as_deref(),
			Some("250")
		);
		assert!(unpriced.find_by_class("item-price").is_none());
		assert_eq!(unpriced.text_content(), "Raita");
	}
}
