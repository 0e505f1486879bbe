//! View tree.
//!
//! Components render into a small, inspectable tree of [`View`] nodes. The tree
//! carries structure, classes, text and click handlers; layout and styling are
//! left to whoever turns it into pixels. [`View::to_html`] produces markup for
//! server-side output and snapshots.

use crate::callback::Callback;

/// Rendered output of a component
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
	/// An element with children
	Element(Element),
	/// A text node
	Text(String),
	/// Several sibling nodes without a wrapper
	Fragment(Vec<View>),
	/// Nothing
	#[default]
	Empty,
}

/// An element node
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
	tag: &'static str,
	class: Option<String>,
	children: Vec<View>,
	on_click: Option<Callback>,
}

impl Element {
	/// Create an empty element
	pub fn new(tag: &'static str) -> Self {
		Self {
			tag,
			class: None,
			children: Vec::new(),
			on_click: None,
		}
	}

	/// Set the class attribute
	pub fn class(mut self, class: impl Into<String>) -> Self {
		self.class = Some(class.into());
		self
	}

	/// Append a child
	pub fn child(mut self, child: impl Into<View>) -> Self {
		self.children.push(child.into());
		self
	}

	/// Append several children
	pub fn children<I>(mut self, children: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<View>,
	{
		self.children.extend(children.into_iter().map(Into::into));
		self
	}

	/// Attach a click handler
	pub fn on_click(mut self, handler: Callback) -> Self {
		self.on_click = Some(handler);
		self
	}

	/// Tag name
	pub fn tag(&self) -> &'static str {
		self.tag
	}

	/// Class attribute, if any
	pub fn class_name(&self) -> Option<&str> {
		self.class.as_deref()
	}

	/// Child nodes
	pub fn child_nodes(&self) -> &[View] {
		&self.children
	}

	/// Whether the element has a click handler
	pub fn is_clickable(&self) -> bool {
		self.on_click.is_some()
	}

	/// Invoke the click handler. Returns false when there is none.
	pub fn click(&self) -> bool {
		match &self.on_click {
			Some(handler) => {
				handler.call(());
				true
			}
			None => false,
		}
	}

	/// Concatenated text of the element's subtree
	pub fn text_content(&self) -> String {
		let mut out = String::new();
		for child in &self.children {
			child.collect_text(&mut out);
		}
		out
	}

	fn has_class(&self, class: &str) -> bool {
		self.class
			.as_deref()
			.is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
	}
}

impl View {
	/// A text node
	pub fn text(text: impl Into<String>) -> Self {
		Self::Text(text.into())
	}

	/// Concatenated text of the whole subtree
	pub fn text_content(&self) -> String {
		let mut out = String::new();
		self.collect_text(&mut out);
		out
	}

	fn collect_text(&self, out: &mut String) {
		match self {
			Self::Element(element) => out.push_str(&element.text_content()),
			Self::Text(text) => out.push_str(text),
			Self::Fragment(nodes) => {
				for node in nodes {
					node.collect_text(out);
				}
			}
			Self::Empty => {}
		}
	}

	/// First element (depth-first) carrying `class`
	pub fn find_by_class(&self, class: &str) -> Option<&Element> {
		self.find(&|element| element.has_class(class))
	}

	/// Every element (depth-first) carrying `class`
	pub fn find_all_by_class(&self, class: &str) -> Vec<&Element> {
		let mut found = Vec::new();
		self.visit(&mut |element| {
			if element.has_class(class) {
				found.push(element);
			}
		});
		found
	}

	/// First clickable element whose text is `label`
	pub fn find_button(&self, label: &str) -> Option<&Element> {
		self.find(&|element| {
			element.is_clickable() && element.text_content() == label
		})
	}

	fn find<'a>(&'a self, predicate: &dyn Fn(&Element) -> bool) -> Option<&'a Element> {
		match self {
			Self::Element(element) => {
				if predicate(element) {
					return Some(element);
				}
				element.children.iter().find_map(|child| child.find(predicate))
			}
			Self::Fragment(nodes) => nodes.iter().find_map(|node| node.find(predicate)),
			Self::Text(_) | Self::Empty => None,
		}
	}

	fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Element)) {
		match self {
			Self::Element(element) => {
				f(element);
				for child in &element.children {
					child.visit(f);
				}
			}
			Self::Fragment(nodes) => {
				for node in nodes {
					node.visit(f);
				}
			}
			Self::Text(_) | Self::Empty => {}
		}
	}

	/// Serialize to HTML. Text and attribute values are escaped.
	pub fn to_html(&self) -> String {
		let mut out = String::new();
		self.write_html(&mut out);
		out
	}

	fn write_html(&self, out: &mut String) {
		match self {
			Self::Element(element) => {
				out.push('<');
				out.push_str(element.tag);
				if let Some(class) = &element.class {
					out.push_str(" class=\"");
					escape_into(class, out);
					out.push('"');
				}
				out.push('>');
				for child in &element.children {
					child.write_html(out);
				}
				out.push_str("</");
				out.push_str(element.tag);
				out.push('>');
			}
			Self::Text(text) => escape_into(text, out),
			Self::Fragment(nodes) => {
				for node in nodes {
					node.write_html(out);
				}
			}
			Self::Empty => {}
		}
	}
}

fn escape_into(text: &str, out: &mut String) {
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#x27;"),
			_ => out.push(c),
		}
	}
}

impl From<Element> for View {
	fn from(element: Element) -> Self {
		Self::Element(element)
	}
}

impl From<String> for View {
	fn from(text: String) -> Self {
		Self::Text(text)
	}
}

impl From<&str> for View {
	fn from(text: &str) -> Self {
		Self::Text(text.to_string())
	}
}

impl From<Vec<View>> for View {
	fn from(nodes: Vec<View>) -> Self {
		Self::Fragment(nodes)
	}
}
