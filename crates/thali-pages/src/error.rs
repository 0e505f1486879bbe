//! Error types.
//!
//! Only a failed transport surfaces as an error of the resource itself. A
//! response that resolves with an unexpected shape is absorbed by the payload
//! extractors (missing fields default to empty), and being offline is a render
//! gate handled by the views.

use thiserror::Error;

/// Why a remote fetch did not produce data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
	/// The request was rejected by the transport
	#[error("network failure: {0}")]
	Network(String),

	/// The server answered with a non-success status
	#[error("server responded with status {status}")]
	Status {
		/// HTTP status code
		status: u16,
	},

	/// The request did not complete in time
	#[error("request timed out")]
	Timeout,
}

impl FetchError {
	/// Short, user-facing description for failure views
	pub fn user_message(&self) -> &'static str {
		match self {
			Self::Network(_) => "Could not reach the server.",
			Self::Status { status } if *status >= 500 => "The server is having trouble right now.",
			Self::Status { .. } => "The server could not answer this request.",
			Self::Timeout => "The server took too long to answer.",
		}
	}
}

impl From<reqwest::Error> for FetchError {
	fn from(error: reqwest::Error) -> Self {
		if error.is_timeout() {
			return Self::Timeout;
		}
		match error.status() {
			Some(status) => Self::Status {
				status: status.as_u16(),
			},
			None => Self::Network(error.to_string()),
		}
	}
}

/// A subtree that could not be rendered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not render {component}: {reason}")]
pub struct RenderError {
	/// Name of the subtree that failed
	pub component: String,
	/// What went wrong
	pub reason: String,
}

impl RenderError {
	/// Create a render error for `component`
	pub fn new(component: impl Into<String>, reason: impl Into<String>) -> Self {
		Self {
			component: component.into(),
			reason: reason.into(),
		}
	}
}

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The settings file could not be read
	#[error("failed to read settings file: {0}")]
	Io(#[from] std::io::Error),

	/// The settings file is not valid TOML for [`crate::config::PagesSettings`]
	#[error("failed to parse settings: {0}")]
	Parse(#[from] toml::de::Error),

	/// A value is out of range
	#[error("invalid setting: {0}")]
	Invalid(String),
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(FetchError::Network("dns".into()), "Could not reach the server.")]
	#[case(FetchError::Status { status: 503 }, "The server is having trouble right now.")]
	#[case(FetchError::Status { status: 404 }, "The server could not answer this request.")]
	#[case(FetchError::Timeout, "The server took too long to answer.")]
	fn test_user_message(#[case] error: FetchError, #[case] expected: &str) {
		assert_eq!(error.user_message(), expected);
	}

	#[rstest]
	fn test_display() {
		assert_eq!(
			FetchError::Status { status: 502 }.to_string(),
			"server responded with status 502"
		);
		assert_eq!(
			RenderError::new("menu", "no items").to_string(),
			"could not render menu: no items"
		);
	}
}
