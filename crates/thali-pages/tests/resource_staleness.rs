//! Stale-result suppression of the resource hook and the detail view

mod common;

use std::rc::Rc;

use common::{GatedCatalog, detail_payload, item, settle};
use rstest::rstest;
use serial_test::serial;
use thali_core::{Scope, mount};
use thali_pages::api::{Catalog, EntityId};
use thali_pages::config::PagesSettings;
use thali_pages::connectivity::ConnectivityMonitor;
use thali_pages::detail::RestaurantDetailView;
use thali_pages::error::FetchError;
use thali_pages::reactive::hooks::use_resource;
use thali_pages::resource::{Resource, ResourceState};
use thali_pages::testing::{MockEnvironment, PendingFetches};

fn monitor() -> ConnectivityMonitor {
	ConnectivityMonitor::new(MockEnvironment::new(true))
}

#[rstest]
#[case::abort(false)]
#[case::advisory(true)]
#[serial]
#[tokio::test]
async fn test_later_key_wins_even_when_earlier_resolves_last(#[case] advisory: bool) {
	let local = tokio::task::LocalSet::new();
	local
		.run_until(async move {
			// Arrange
			let fetches = PendingFetches::<String, String>::new();
			let resource = if advisory {
				Resource::advisory(fetches.fetcher())
			} else {
				Resource::new(fetches.fetcher())
			};

			// Act
			resource.subscribe("A".to_string());
			settle().await;
			resource.subscribe("B".to_string());
			settle().await;
			fetches.resolve(&"B".to_string(), Ok("detail of B".to_string()));
			settle().await;
			fetches.resolve(&"A".to_string(), Ok("detail of A".to_string()));
			settle().await;

			// Assert
			assert_eq!(
				resource.state_untracked(),
				ResourceState::Ready("detail of B".to_string())
			);
			assert_eq!(resource.key().as_deref(), Some("B"));
		})
		.await;
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_abort_policy_drops_superseded_request() {
	let local = tokio::task::LocalSet::new();
	local
		.run_until(async {
			let fetches = PendingFetches::<u32, u32>::new();
			let resource = Resource::new(fetches.fetcher());

			resource.subscribe(1);
			settle().await;
			resource.subscribe(2);
			settle().await;

			// The aborted request no longer has anybody waiting for it
			assert_eq!(fetches.issued_count(), 2);
			assert_eq!(fetches.pending_count(), 1);
			assert!(!fetches.resolve(&1, Ok(1)));
		})
		.await;
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_failure_of_superseded_request_is_discarded() {
	let local = tokio::task::LocalSet::new();
	local
		.run_until(async {
			let fetches = PendingFetches::<u32, u32>::new();
			let resource = Resource::advisory(fetches.fetcher());

			resource.subscribe(1);
			resource.subscribe(2);
			settle().await;
			fetches.resolve(&1, Err(FetchError::Timeout));
			settle().await;

			assert!(resource.state_untracked().is_loading());
			fetches.resolve(&2, Ok(20));
			settle().await;
			assert_eq!(resource.state_untracked(), ResourceState::Ready(20));
		})
		.await;
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_unmount_before_resolution_changes_nothing() {
	let local = tokio::task::LocalSet::new();
	local
		.run_until(async {
			// Arrange
			let fetches = PendingFetches::<u32, String>::new();
			let scope = Scope::new();
			let resource = use_resource(&scope, 1, fetches.fetcher());
			settle().await;
			let generation = resource.generation();

			// Act
			scope.dispose();
			fetches.resolve(&1, Ok("late".to_string()));
			settle().await;

			// Assert
			assert!(resource.state_untracked().is_loading());
			assert_eq!(resource.generation(), generation);
			assert!(!resource.is_in_flight());
		})
		.await;
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_detail_view_shows_latest_navigation() {
	let local = tokio::task::LocalSet::new();
	local
		.run_until(async {
			// Arrange
			let catalog = GatedCatalog::default();
			let shared: Rc<dyn Catalog> = Rc::new(catalog.clone());
			let detail = mount(RestaurantDetailView::new(
				shared,
				monitor(),
				&PagesSettings::default(),
				"A",
			));
			settle().await;

			// Act
			assert!(detail.with_component(|view| view.show("B")));
			settle().await;
			catalog
				.details
				.resolve(&EntityId::from("B"), Ok(detail_payload("Bravo", vec![])));
			settle().await;
			catalog
				.details
				.resolve(&EntityId::from("A"), Ok(detail_payload("Alpha", vec![])));
			settle().await;

			// Assert
			let html = detail.output().unwrap_or_default().to_html();
			assert!(html.contains("Bravo"));
			assert!(!html.contains("Alpha"));
		})
		.await;
}

#[rstest]
#[serial]
#[tokio::test]
async fn test_detail_view_unmounted_mid_fetch_ignores_response() {
	let local = tokio::task::LocalSet::new();
	local
		.run_until(async {
			let catalog = GatedCatalog::default();
			let shared: Rc<dyn Catalog> = Rc::new(catalog.clone());
			let mut detail = mount(RestaurantDetailView::new(
				shared,
				monitor(),
				&PagesSettings::default(),
				"A",
			));
			settle().await;
			let resource = detail.with_component(|view| view.resource().cloned());

			detail.unmount();
			catalog.details.resolve(
				&EntityId::from("A"),
				Ok(detail_payload("Alpha", vec![item("1", "Dal", Some(120), None)])),
			);
			settle().await;

			assert_eq!(detail.output(), None);
			let resource = resource.expect("resource is bound while mounted");
			assert!(resource.is_torn_down());
			assert!(resource.state_untracked().is_loading());
		})
		.await;
}
