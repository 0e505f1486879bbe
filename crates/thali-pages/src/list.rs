//! Restaurant list: controller and view.
//!
//! [`ListController`] keeps the master list exactly as fetched and derives the
//! visible list from it with at most one [`ActiveFilter`]. Every operation
//! recomputes the visible list from the master list, so filters never
//! compound.
//!
//! [`RestaurantList`] is the component binding the controller to the list
//! resource and to connectivity. Rendering precedence: offline notice, then
//! the boundary (placeholder or failure), then the cards.
//!
//! ## Example
//!
//! ```ignore
//! use thali_pages::list::ListController;
//!
//! let list = ListController::new();
//! list.set_master(restaurants);
//! list.apply_top_rated(4.0);
//! list.apply_search("biryani"); // replaces the top-rated filter
//! ```

use std::rc::Rc;

use thali_core::{Component, Scope, Signal, untrack};

use crate::api::{Catalog, RestaurantSummary, fetch_restaurants};
use crate::boundary::{FallbackBoundary, Placeholder};
use crate::callback::Callback;
use crate::component::{Element, View};
use crate::config::{ListSettings, PagesSettings};
use crate::connectivity::ConnectivityMonitor;
use crate::reactive::hooks::{use_online_status_in, use_resource};
use crate::resource::Resource;

/// Shown instead of everything else while offline
pub const OFFLINE_NOTICE: &str = "Looks like you're offline! Please check your internet connection.";

/// Shown when the active filter matches nothing
pub const EMPTY_RESULT_NOTICE: &str = "No restaurants match your filter.";

/// The zero-or-one predicate applied to the master list
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActiveFilter {
	/// Everything
	#[default]
	All,
	/// Case-insensitive substring match on the name
	Search(String),
	/// Rating strictly above the threshold; unrated entries are excluded
	TopRated(f64),
}

impl ActiveFilter {
	/// Whether `restaurant` passes the filter
	pub fn matches(&self, restaurant: &RestaurantSummary) -> bool {
		match self {
			Self::All => true,
			Self::Search(term) => restaurant
				.name
				.to_lowercase()
				.contains(&term.to_lowercase()),
			Self::TopRated(threshold) => restaurant
				.rating_value()
				.is_some_and(|rating| rating > *threshold),
		}
	}

	/// Subsequence of `master` passing the filter, in master order
	pub fn apply(&self, master: &[RestaurantSummary]) -> Vec<RestaurantSummary> {
		if let Self::Search(term) = self {
			// Lowercase the term once for the whole list
			let term = term.to_lowercase();
			return master
				.iter()
				.filter(|restaurant| restaurant.name.to_lowercase().contains(&term))
				.cloned()
				.collect();
		}
		master
			.iter()
			.filter(|restaurant| self.matches(restaurant))
			.cloned()
			.collect()
	}
}

/// Master and visible restaurant lists.
///
/// Clones share the same lists. All state lives in signals, so views reading
/// [`ListController::visible`] re-render when it changes.
#[derive(Clone, Default)]
pub struct ListController {
	master: Signal<Rc<[RestaurantSummary]>>,
	visible: Signal<Vec<RestaurantSummary>>,
	filter: Signal<ActiveFilter>,
	search_text: Signal<String>,
}

impl ListController {
	/// Create an empty controller
	pub fn new() -> Self {
		Self::default()
	}

	/// Replace the master list with a freshly fetched one.
	///
	/// The visible list becomes the whole master list; the filter and the
	/// search box text reset.
	pub fn set_master(&self, list: Vec<RestaurantSummary>) {
		tracing::debug!(count = list.len(), "replacing master list");
		self.visible.set(list.clone());
		self.master.set(Rc::from(list));
		self.filter.set_if_changed(ActiveFilter::All);
		self.search_text.set_if_changed(String::new());
	}

	/// Show entries whose name contains `term`, ignoring case. An empty term shows everything.
	pub fn apply_search(&self, term: &str) {
		self.apply(ActiveFilter::Search(term.to_string()));
	}

	/// Show entries rated strictly above `threshold`
	pub fn apply_top_rated(&self, threshold: f64) {
		self.apply(ActiveFilter::TopRated(threshold));
	}

	/// Show the whole master list
	pub fn clear_filter(&self) {
		self.apply(ActiveFilter::All);
	}

	/// Make `filter` the only active filter
	pub fn apply(&self, filter: ActiveFilter) {
		let visible = self.master.with_untracked(|master| filter.apply(master));
		self.visible.set(visible);
		self.filter.set_if_changed(filter);
	}

	/// The list as fetched
	pub fn master(&self) -> Rc<[RestaurantSummary]> {
		self.master.get()
	}

	/// The list after the active filter, tracked
	pub fn visible(&self) -> Vec<RestaurantSummary> {
		self.visible.get()
	}

	/// Borrow the visible list, tracked
	pub fn with_visible<R>(&self, f: impl FnOnce(&[RestaurantSummary]) -> R) -> R {
		self.visible.with(|visible| f(visible))
	}

	/// The active filter
	pub fn active_filter(&self) -> ActiveFilter {
		self.filter.get()
	}

	/// Update the search box text without filtering
	pub fn set_search_text(&self, text: impl Into<String>) {
		self.search_text.set_if_changed(text.into());
	}

	/// Current search box text
	pub fn search_text(&self) -> String {
		self.search_text.get()
	}

	/// Search for the text typed into the search box
	pub fn submit_search(&self) {
		let term = self.search_text.get_untracked();
		self.apply_search(&term);
	}
}

impl core::fmt::Debug for ListController {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("ListController")
			.field("master", &self.master.with_untracked(|master| master.len()))
			.field("visible", &self.visible.with_untracked(Vec::len))
			.field("filter", &self.filter.get_untracked())
			.finish()
	}
}

/// Click handlers of the list view, allocated once per mount
#[derive(Clone)]
struct ListActions {
	search: Callback,
	top_rated: Callback,
	show_all: Callback,
}

struct Bound {
	resource: Resource<(), Vec<RestaurantSummary>>,
	online: Signal<bool>,
	boundary: FallbackBoundary,
	actions: ListActions,
}

/// The restaurant list view
pub struct RestaurantList {
	catalog: Rc<dyn Catalog>,
	monitor: ConnectivityMonitor,
	settings: ListSettings,
	controller: ListController,
	bound: Option<Bound>,
}

impl RestaurantList {
	/// Create the view. Nothing is fetched until it is mounted.
	pub fn new(catalog: Rc<dyn Catalog>, monitor: ConnectivityMonitor, settings: &PagesSettings) -> Self {
		Self {
			catalog,
			monitor,
			settings: settings.list.clone(),
			controller: ListController::new(),
			bound: None,
		}
	}

	/// The controller behind the view
	pub fn controller(&self) -> &ListController {
		&self.controller
	}

	/// The list resource, once mounted
	pub fn resource(&self) -> Option<&Resource<(), Vec<RestaurantSummary>>> {
		self.bound.as_ref().map(|bound| &bound.resource)
	}

	fn render_bound(&self, bound: &Bound) -> View {
		let online = bound.online.get();
		let body = if online {
			bound.resource.with_state(|state| {
				View::Fragment(vec![
					self.filter_bar(&bound.actions),
					bound.boundary.render(state, |_| Ok(self.cards())),
				])
			})
		} else {
			Element::new("div")
				.class("offline-notice")
				.child(OFFLINE_NOTICE)
				.into()
		};

		Element::new("div").class("restaurant-list").child(body).into()
	}

	fn filter_bar(&self, actions: &ListActions) -> View {
		Element::new("div")
			.class("filter-bar")
			.child(
				Element::new("span")
					.class("search-text")
					.child(self.controller.search_text()),
			)
			.child(button("search-button", "Search", &actions.search))
			.child(button("top-rated-button", "Top Rated Restaurants", &actions.top_rated))
			.child(button("all-button", "All Restaurants", &actions.show_all))
			.into()
	}

	fn cards(&self) -> View {
		self.controller.with_visible(|visible| {
			if visible.is_empty() {
				return Element::new("p")
					.class("empty-result")
					.child(EMPTY_RESULT_NOTICE)
					.into();
			}
			Element::new("div")
				.class("restaurant-cards")
				.children(visible.iter().map(restaurant_card))
				.into()
		})
	}
}

impl Component for RestaurantList {
	type Output = View;

	fn init(&mut self, scope: &Scope) {
		let catalog = self.catalog.clone();
		let resource = use_resource(scope, (), move |()| {
			let catalog = catalog.clone();
			async move { fetch_restaurants(&*catalog).await }
		});

		scope.watch({
			let resource = resource.clone();
			let controller = self.controller.clone();
			move || {
				let fetched = resource.with_state(|state| state.data().cloned());
				if let Some(list) = fetched {
					untrack(|| controller.set_master(list));
				}
			}
		});

		let online = use_online_status_in(scope, &self.monitor);

		let actions = ListActions {
			search: Callback::new({
				let controller = self.controller.clone();
				move |()| controller.submit_search()
			}),
			top_rated: Callback::new({
				let controller = self.controller.clone();
				let threshold = self.settings.top_rated_threshold;
				move |()| controller.apply_top_rated(threshold)
			}),
			show_all: Callback::new({
				let controller = self.controller.clone();
				move |()| controller.clear_filter()
			}),
		};
		let boundary = FallbackBoundary::new("restaurant-list")
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
			actions,
		});
	}

	fn render(&self) -> View {
		match &self.bound {
			Some(bound) => self.render_bound(bound),
			None => View::Empty,
		}
	}
}

fn button(class: &str, label: &str, action: &Callback) -> Element {
	Element::new("button")
		.class(class)
		.child(label)
		.on_click(action.clone())
}

/// Card of one restaurant
pub fn restaurant_card(restaurant: &RestaurantSummary) -> Element {
	let mut card = Element::new("div")
		.class("restaurant-card")
		.child(Element::new("h3").class("name").child(restaurant.name.as_str()))
		.child(
			Element::new("p")
				.class("cuisines")
				.child(restaurant.cuisines.join(", ")),
		);
	if let Some(rating) = &restaurant.rating {
		card = card.child(
			Element::new("p")
				.class("rating")
				.child(format!("{rating} stars")),
		);
	}
	if let Some(minutes) = restaurant.delivery_minutes {
		card = card.child(
			Element::new("p")
				.class("delivery-time")
				.child(format!("{minutes} minutes")),
		);
	}
	card
}
