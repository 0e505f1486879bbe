//! Properties of the list controller's exclusive filters

use proptest::prelude::*;
use thali_pages::api::RestaurantSummary;
use thali_pages::list::{ActiveFilter, ListController};

fn restaurant() -> impl Strategy<Value = RestaurantSummary> {
	let rating = prop_oneof![
		Just(None),
		(0.0f64..5.0).prop_map(|rating| Some(format!("{rating:.1}"))),
		Just(Some("--".to_string())),
	];
	("[0-9]{1,4}", "[A-Za-z ]{0,12}", rating).prop_map(|(id, name, rating)| RestaurantSummary {
		rating,
		..RestaurantSummary::new(id, name)
	})
}

fn filter() -> impl Strategy<Value = ActiveFilter> {
	prop_oneof![
		Just(ActiveFilter::All),
		"[a-zA-Z ]{0,3}".prop_map(ActiveFilter::Search),
		(0.0f64..5.0).prop_map(ActiveFilter::TopRated),
	]
}

proptest! {
	#[test]
	fn empty_search_is_identity(master in prop::collection::vec(restaurant(), 0..20)) {
		let list = ListController::new();
		list.set_master(master.clone());

		list.apply_search("");

		prop_assert_eq!(list.visible(), master);
	}

	#[test]
	fn second_filter_ignores_first(
		master in prop::collection::vec(restaurant(), 0..20),
		first in filter(),
		second in filter(),
	) {
		let list = ListController::new();
		list.set_master(master.clone());

		list.apply(first);
		list.apply(second.clone());

		prop_assert_eq!(list.visible(), second.apply(&master));
		prop_assert_eq!(list.active_filter(), second);
	}

	#[test]
	fn visible_is_ordered_subsequence_of_master(
		master in prop::collection::vec(restaurant(), 0..20),
		active in filter(),
	) {
		let list = ListController::new();
		list.set_master(master.clone());

		list.apply(active);

		let mut remaining = master.iter();
		for shown in list.visible() {
			prop_assert!(remaining.any(|candidate| *candidate == shown));
		}
	}

	#[test]
	fn top_rated_only_keeps_parseable_ratings_above_threshold(
		master in prop::collection::vec(restaurant(), 0..20),
		threshold in 0.0f64..5.0,
	) {
		let list = ListController::new();
		list.set_master(master);

		list.apply_top_rated(threshold);

		for shown in list.visible() {
			let rating = shown.rating_value();
			prop_assert!(rating.is_some_and(|rating| rating > threshold));
		}
	}

	#[test]
	fn reapplying_is_idempotent(
		master in prop::collection::vec(restaurant(), 0..20),
		active in filter(),
	) {
		let list = ListController::new();
		list.set_master(master);

		list.apply(active.clone());
		let once = list.visible();
		list.apply(active);

		prop_assert_eq!(list.visible(), once);
	}
}
