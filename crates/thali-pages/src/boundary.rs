//! Fallback and isolation boundary.
//!
//! A [`FallbackBoundary`] wraps the part of a view that depends on a
//! [`ResourceState`]. While the data is pending it shows a fixed-shape
//! [`Placeholder`]; when the fetch failed or the content could not be
//! rendered it shows a failure view with a retry button. Whatever happens
//! inside stays inside: the boundary always returns a view, so sibling
//! subtrees render normally.
//!
//! Both substitute views are plain presentation. Retrying only happens when
//! the button is clicked.
//!
//! Content reports a failure by returning `Err(RenderError)`. A panic inside
//! the content closure is not caught: it unwinds through the render effect
//! and leaves the thread's reactive runtime unusable.
//!
//! ## Example
//!
//! ```ignore
//! use thali_pages::boundary::{FallbackBoundary, Placeholder};
//!
//! let boundary = FallbackBoundary::new("menu")
//!     .placeholder(Placeholder::cards(4))
//!     .on_retry(retry);
//!
//! let view = boundary.render(&detail.state(), |detail| Ok(menu_view(detail)));
//! ```

use crate::callback::Callback;
use crate::component::{Element, View};
use crate::error::RenderError;
use crate::resource::ResourceState;

/// Label of the retry button
pub const RETRY_LABEL: &str = "Retry";

/// Shimmer shown while data is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
	/// Number of shimmer cards
	pub cards: usize,
}

impl Placeholder {
	/// A shimmer of `cards` cards
	pub fn cards(cards: usize) -> Self {
		Self { cards }
	}

	/// The placeholder view. Always the same shape for the same card count.
	pub fn view(&self) -> View {
		Element::new("div")
			.class("shimmer-container")
			.children((0..self.cards).map(|_| Element::new("div").class("shimmer-card")))
			.into()
	}
}

impl Default for Placeholder {
	fn default() -> Self {
		Self::cards(8)
	}
}

/// Boundary around one resource-backed subtree
#[derive(Debug, Clone)]
pub struct FallbackBoundary {
	name: String,
	placeholder: Placeholder,
	on_retry: Option<Callback>,
}

impl FallbackBoundary {
	/// Create a boundary named `name` (used in logs)
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			placeholder: Placeholder::default(),
			on_retry: None,
		}
	}

	/// Set the pending placeholder
	pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
		self.placeholder = placeholder;
		self
	}

	/// Set the action behind the retry button
	pub fn on_retry(mut self, retry: Callback) -> Self {
		self.on_retry = Some(retry);
		self
	}

	/// Name of the boundary
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Render `state`, substituting the placeholder or the failure view when needed.
	///
	/// `content` must return `Err` instead of panicking for the failure view to show.
	pub fn render<T>(
		&self,
		state: &ResourceState<T>,
		content: impl FnOnce(&T) -> Result<View, RenderError>,
	) -> View {
		let inner = match state {
			ResourceState::Idle | ResourceState::Loading => self.placeholder.view(),
			ResourceState::Failed(error) => {
				tracing::debug!(boundary = %self.name, %error, "showing fetch failure");
				self.failure_view(error.user_message())
			}
			ResourceState::Ready(data) => match content(data) {
				Ok(view) => view,
				Err(error) => {
					tracing::warn!(boundary = %self.name, %error, "content failed to render");
					self.failure_view("Something went wrong while showing this section.")
				}
			},
		};

		Element::new("div").class("fallback-boundary").child(inner).into()
	}

	fn failure_view(&self, message: &str) -> View {
		let mut failure = Element::new("div")
			.class("boundary-failure")
			.child(Element::new("p").class("error-message").child(message));
		if let Some(retry) = &self.on_retry {
			failure = failure.child(
				Element::new("button")
					.class("retry-button")
					.child(RETRY_LABEL)
					.on_click(retry.clone()),
			);
		}
		failure.into()
	}
}
