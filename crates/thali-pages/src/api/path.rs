//! Safe navigation through JSON payloads.
//!
//! A path is a dotted string such as `"data.cards.0.card"`; numeric segments
//! index arrays, everything else looks up object keys. Each step yields an
//! `Option` and the chain short-circuits on the first missing node. The
//! `*_at` accessors then default to an empty value.
//!
//! ## Example
//!
//! ```ignore
//! use thali_pages::api::path::{array_at, str_at};
//!
//! let name = str_at(&payload, "card.card.info.name"); // "" when missing
//! let cards = array_at(&payload, "data.cards");       // &[] when missing
//! ```

use serde_json::Value;

/// One navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
	/// Object member
	Key(&'a str),
	/// Array element
	Index(usize),
}

impl<'a> From<&'a str> for Step<'a> {
	fn from(key: &'a str) -> Self {
		Self::Key(key)
	}
}

impl From<usize> for Step<'_> {
	fn from(index: usize) -> Self {
		Self::Index(index)
	}
}

/// Split a dotted path into steps. An empty path has no steps.
pub fn steps(path: &str) -> impl Iterator<Item = Step<'_>> {
	path.split('.')
		.filter(|segment| !segment.is_empty())
		.map(|segment| match segment.parse::<usize>() {
			Ok(index) => Step::Index(index),
			Err(_) => Step::Key(segment),
		})
}

/// Follow explicit steps
pub fn lookup_steps<'v, 's>(
	value: &'v Value,
	path: impl IntoIterator<Item = Step<'s>>,
) -> Option<&'v Value> {
	path.into_iter().try_fold(value, |node, step| match step {
		Step::Key(key) => node.get(key),
		Step::Index(index) => node.get(index),
	})
}

/// Follow a dotted path
pub fn lookup<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
	lookup_steps(value, steps(path))
}

/// Text at `path`; numbers are rendered as text. Missing or other types yield `None`.
pub fn opt_str_at(value: &Value, path: &str) -> Option<String> {
	match lookup(value, path)? {
		Value::String(text) => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}

/// Text at `path`, or an empty string
pub fn str_at(value: &Value, path: &str) -> String {
	opt_str_at(value, path).unwrap_or_default()
}

/// Non-negative integer at `path`; numeric strings are accepted
pub fn u64_at(value: &Value, path: &str) -> Option<u64> {
	match lookup(value, path)? {
		Value::Number(number) => number
			.as_u64()
			.or_else(|| number.as_f64().filter(|n| n.is_finite() && *n >= 0.0).map(|n| n as u64)),
		Value::String(text) => text.trim().parse().ok(),
		_ => None,
	}
}

/// Array at `path`, or an empty slice
pub fn array_at<'v>(value: &'v Value, path: &str) -> &'v [Value] {
	lookup(value, path)
		.and_then(Value::as_array)
		.map(Vec::as_slice)
		.unwrap_or(&[])
}

/// Every string element of the array at `path`
pub fn strings_at(value: &Value, path: &str) -> Vec<String> {
	array_at(value, path)
		.iter()
		.filter_map(Value::as_str)
		.map(str::to_string)
		.collect()
}
