//! Owned element tree for configuration documents.
//!
//! The tree keeps element names, attributes in source order, child elements and
//! the concatenated character data of each element. Comments, processing
//! instructions and the XML declaration are dropped.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::DocumentError;

/// A parsed configuration document with exactly one root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
	root: Element,
}

/// One element of a [`Document`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
	name: String,
	attributes: Vec<(String, String)>,
	children: Vec<Element>,
	text: String,
}

impl Document {
	/// Reads and parses the file at `path`.
	pub fn load(path: &Path) -> Result<Self, DocumentError> {
		let text = std::fs::read_to_string(path)?;
		Self::parse(&text)
	}

	/// Parses XML text into an element tree.
	pub fn parse(text: &str) -> Result<Self, DocumentError> {
		let mut reader = Reader::from_str(text);
		reader.config_mut().trim_text(true);

		let mut open: Vec<Element> = Vec::new();
		let mut root: Option<Element> = None;

		loop {
			match reader.read_event()? {
				Event::Start(start) => open.push(Element::from_start(&start)?),
				Event::Empty(start) => {
					let element = Element::from_start(&start)?;
					close(&mut open, &mut root, element)?;
				}
				Event::End(_) => {
					let element = open.pop().ok_or_else(|| DocumentError::Structure("closing tag without an open element".into()))?;
					close(&mut open, &mut root, element)?;
				}
				Event::Text(chars) => {
					let chars = chars.unescape()?;
					match open.last_mut() {
						Some(current) => current.text.push_str(&chars),
						None => return Err(DocumentError::Structure(format!("text outside the root element: {chars:?}"))),
					}
				}
				Event::CData(data) => {
					let data = std::str::from_utf8(&data)?;
					match open.last_mut() {
						Some(current) => current.text.push_str(data),
						None => return Err(DocumentError::Structure("CDATA outside the root element".into())),
					}
				}
				Event::Eof => break,
				_ => {}
			}
		}

		if let Some(unclosed) = open.last() {
			return Err(DocumentError::Structure(format!("element <{}> is never closed", unclosed.name)));
		}

		root.map(|root| Self { root })
			.ok_or_else(|| DocumentError::Structure("document has no root element".into()))
	}

	/// Returns the root element.
	pub fn root(&self) -> &Element {
		&self.root
	}

	/// Returns every element named `tag`, in document order, including the root.
	pub fn elements_by_tag<'a>(&'a self, tag: &str) -> impl Iterator<Item = &'a Element> {
		std::iter::once(&self.root)
			.chain(self.root.descendants())
			.filter(move |element| element.name == tag)
	}
}

/// Attaches a finished element to its parent, or makes it the root.
fn close(open: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<(), DocumentError> {
	if let Some(parent) = open.last_mut() {
		parent.children.push(element);
		return Ok(());
	}
	if root.is_some() {
		return Err(DocumentError::Structure(format!("second root element <{}>", element.name)));
	}
	*root = Some(element);
	Ok(())
}

impl Element {
	/// Creates an empty element. Mostly useful for handler tests.
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into(), ..Self::default() }
	}

	/// Adds an attribute, builder style.
	pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.push((name.into(), value.into()));
		self
	}

	/// Adds a child element, builder style.
	pub fn with_child(mut self, child: Element) -> Self {
		self.children.push(child);
		self
	}

	fn from_start(start: &BytesStart<'_>) -> Result<Self, DocumentError> {
		let name = std::str::from_utf8(start.name().as_ref())?.to_owned();
		let mut attributes = Vec::new();
		for attr in start.attributes() {
			let attr = attr?;
			let key = std::str::from_utf8(attr.key.as_ref())?.to_owned();
			let value = attr.unescape_value()?.into_owned();
			attributes.push((key, value));
		}
		Ok(Self { name, attributes, children: Vec::new(), text: String::new() })
	}

	/// Tag name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Value of the attribute `name`, if present.
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
	}

	/// Attributes in source order.
	pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
		self.attributes.iter().map(|(key, value)| (key.as_str(), value.as_str()))
	}

	/// Direct child elements.
	pub fn children(&self) -> &[Element] {
		&self.children
	}

	/// First direct child named `name`.
	pub fn child(&self, name: &str) -> Option<&Element> {
		self.children.iter().find(|child| child.name == name)
	}

	/// Character data directly inside this element, trimmed per text node.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// All descendant elements in document order, excluding `self`.
	pub fn descendants(&self) -> Descendants<'_> {
		Descendants { stack: self.children.iter().rev().collect() }
	}
}

/// Pre-order iterator returned by [`Element::descendants`].
pub struct Descendants<'a> {
	stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
	type Item = &'a Element;

	fn next(&mut self) -> Option<Self::Item> {
		let next = self.stack.pop()?;
		self.stack.extend(next.children.iter().rev());
		Some(next)
	}
}
