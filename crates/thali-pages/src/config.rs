//! Settings for the catalogue client and its views.
//!
//! Settings are plain `serde` structs loaded from TOML. Every field has a
//! default, so an empty file (or no file at all) is a valid configuration.
//!
//! ```toml
//! [api]
//! list_url = "https://catalogue.example.com/restaurants"
//! detail_url = "https://catalogue.example.com/menu?restaurantId={id}"
//! timeout_secs = 10
//!
//! [list]
//! top_rated_threshold = 4.0
//! placeholder_cards = 8
//!
//! [detail]
//! cache = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Placeholder substituted with the restaurant identifier in `api.detail_url`
pub const ID_PLACEHOLDER: &str = "{id}";

/// Environment variable overriding `api.list_url`
pub const LIST_URL_ENV: &str = "THALI_LIST_URL";

/// Environment variable overriding `api.detail_url`
pub const DETAIL_URL_ENV: &str = "THALI_DETAIL_URL";

/// All settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PagesSettings {
	/// Remote endpoints
	pub api: ApiSettings,
	/// Restaurant list view
	pub list: ListSettings,
	/// Restaurant detail view
	pub detail: DetailSettings,
}

/// Remote endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
	/// Endpoint returning the restaurant list payload
	pub list_url: String,
	/// Endpoint returning one restaurant's menu; must contain `{id}`
	pub detail_url: String,
	/// Request timeout (native targets only)
	pub timeout_secs: u64,
}

impl Default for ApiSettings {
	fn default() -> Self {
		Self {
			list_url: "http://localhost:8000/api/restaurants".to_string(),
			detail_url: "http://localhost:8000/api/menu?restaurantId={id}".to_string(),
			timeout_secs: 10,
		}
	}
}

impl ApiSettings {
	/// Detail endpoint for one restaurant
	pub fn detail_url_for(&self, id: &str) -> String {
		self.detail_url.replace(ID_PLACEHOLDER, id)
	}
}

/// Restaurant list view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSettings {
	/// Ratings strictly above this count as top rated
	pub top_rated_threshold: f64,
	/// Number of shimmer cards while loading
	pub placeholder_cards: usize,
}

impl Default for ListSettings {
	fn default() -> Self {
		Self {
			top_rated_threshold: 4.0,
			placeholder_cards: 8,
		}
	}
}

/// Restaurant detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSettings {
	/// Keep fetched details per identifier and skip refetching on revisit
	pub cache: bool,
	/// Number of shimmer rows while loading
	pub placeholder_cards: usize,
}

impl Default for DetailSettings {
	fn default() -> Self {
		Self {
			cache: false,
			placeholder_cards: 4,
		}
	}
}

impl PagesSettings {
	/// Parse and validate settings from TOML text
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		let settings: Self = toml::from_str(text)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Read, parse and validate a TOML settings file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path)?;
		Self::from_toml_str(&text)
	}

	/// Apply `THALI_LIST_URL` / `THALI_DETAIL_URL` when set
	pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
		self.with_overrides(|key| std::env::var(key).ok())
	}

	/// Apply overrides from an arbitrary lookup (environment, CLI flags, tests)
	pub fn with_overrides(
		mut self,
		lookup: impl Fn(&str) -> Option<String>,
	) -> Result<Self, ConfigError> {
		if let Some(url) = lookup(LIST_URL_ENV) {
			self.api.list_url = url;
		}
		if let Some(url) = lookup(DETAIL_URL_ENV) {
			self.api.detail_url = url;
		}
		self.validate()?;
		Ok(self)
	}

	/// Reject values the views cannot work with
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !self.list.top_rated_threshold.is_finite() {
			return Err(ConfigError::Invalid(
				"list.top_rated_threshold must be a finite number".to_string(),
			));
		}
		if !self.api.detail_url.contains(ID_PLACEHOLDER) {
			return Err(ConfigError::Invalid(format!(
				"api.detail_url must contain {ID_PLACEHOLDER}"
			)));
		}
		if self.api.timeout_secs == 0 {
			return Err(ConfigError::Invalid(
				"api.timeout_secs must be at least 1".to_string(),
			));
		}
		Ok(())
	}
}
