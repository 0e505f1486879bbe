//! Catalogue service client.
//!
//! [`Catalog`] is the seam between views and the remote service: views only
//! see raw JSON payloads and run them through [`extract`](super::extract).
//! [`HttpCatalog`] talks to the service over `reqwest`; tests use
//! `testing::MockCatalog`.

use async_trait::async_trait;
use serde_json::Value;

use super::extract;
use super::model::{EntityId, RestaurantDetail, RestaurantSummary};
use crate::config::ApiSettings;
use crate::error::FetchError;

/// Read-only access to the catalogue service
#[async_trait(?Send)]
pub trait Catalog {
	/// Raw restaurant list payload
	async fn restaurants(&self) -> Result<Value, FetchError>;

	/// Raw menu payload of restaurant `id`
	async fn restaurant(&self, id: &EntityId) -> Result<Value, FetchError>;
}

/// Fetch and extract the restaurant list
pub async fn fetch_restaurants(catalog: &dyn Catalog) -> Result<Vec<RestaurantSummary>, FetchError> {
	let payload = catalog.restaurants().await?;
	Ok(extract::restaurants(&payload))
}

/// Fetch and extract one restaurant
pub async fn fetch_restaurant(
	catalog: &dyn Catalog,
	id: &EntityId,
) -> Result<RestaurantDetail, FetchError> {
	let payload = catalog.restaurant(id).await?;
	Ok(extract::restaurant_detail(id, &payload))
}

/// [`Catalog`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpCatalog {
	client: reqwest::Client,
	api: ApiSettings,
}

impl HttpCatalog {
	/// Create a client for the endpoints in `api`
	pub fn new(api: ApiSettings) -> Result<Self, FetchError> {
		Ok(Self {
			client: build_client(&api)?,
			api,
		})
	}

	/// Endpoints in use
	pub fn settings(&self) -> &ApiSettings {
		&self.api
	}

	async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
		tracing::debug!(url, "fetching");
		let response = self.client.get(url).send().await?;
		let status = response.status();
		if !status.is_success() {
			return Err(FetchError::Status {
				status: status.as_u16(),
			});
		}

		let body = response.text().await?;
		match serde_json::from_str(&body) {
			Ok(payload) => Ok(payload),
			Err(error) => {
				// Malformed bodies are absorbed like missing fields
				tracing::warn!(url, %error, "response is not JSON, treating it as empty");
				Ok(Value::Null)
			}
		}
	}
}

#[async_trait(?Send)]
impl Catalog for HttpCatalog {
	async fn restaurants(&self) -> Result<Value, FetchError> {
		self.get_json(&self.api.list_url).await
	}

	async fn restaurant(&self, id: &EntityId) -> Result<Value, FetchError> {
		let url = self.api.detail_url_for(id.as_str());
		self.get_json(&url).await
	}
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client(api: &ApiSettings) -> Result<reqwest::Client, FetchError> {
	let client = reqwest::Client::builder()
		.timeout(std::time::Duration::from_secs(api.timeout_secs))
		.build()?;
	Ok(client)
}

#[cfg(target_arch = "wasm32")]
fn build_client(_api: &ApiSettings) -> Result<reqwest::Client, FetchError> {
	// The browser owns request timeouts
	Ok(reqwest::Client::new())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::MockCatalog;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[tokio::test]
	async fn test_fetch_restaurant_extracts_payload() {
		// Arrange
		let catalog = MockCatalog::new().with_restaurant(
			"229",
			json!({ "data": { "cards": [
				{ "card": { "card": { "info": { "name": "Meghana" } } } }
			] } }),
		);

		// Act
		let detail = fetch_restaurant(&catalog, &EntityId::from("229")).await.unwrap();

		// Assert
		assert_eq!(detail.name, "Meghana");
		assert_eq!(catalog.request_count(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_fetch_errors_pass_through() {
		let catalog = MockCatalog::new().with_list_error(FetchError::Status { status: 503 });

		let result = fetch_restaurants(&catalog).await;

		assert_eq!(result, Err(FetchError::Status { status: 503 }));
	}

	#[rstest]
	fn test_http_catalog_uses_settings() {
		let catalog = HttpCatalog::new(ApiSettings::default()).unwrap();

		assert_eq!(
			catalog.settings().detail_url_for("7"),
			"http://localhost:8000/api/menu?restaurantId=7"
		);
	}
}
