//! Standard section handlers, registered under the `smartconf` module.
//!
//! ```xml
//! <section name="limits" type="NameValueSectionHandler, smartconf" />
//! <section name="owner" type="SingleTagSectionHandler, smartconf" />
//! ```

use indexmap::IndexMap;

use crate::app_settings::AppSettings;
use crate::document::Element;
use crate::handler::{HandlerError, SectionHandler, SectionValue};

/// Module identifier of the handlers in this file.
pub const BUILTIN_MODULE: &str = "smartconf";

/// Error raised by the standard handlers.
#[derive(Debug, thiserror::Error)]
pub enum BuiltinError {
	#[error("<{element}> in section <{section}> has no '{attribute}' attribute")]
	MissingAttribute {
		section: String,
		element: String,
		attribute: &'static str,
	},

	#[error("unexpected <{element}> in section <{section}>")]
	UnexpectedElement { section: String, element: String },
}

/// One `add`/`remove`/`clear` child of a key/value section.
enum Directive<'a> {
	Add(&'a str, &'a str),
	Remove(&'a str),
	Clear,
}

fn directives(section: &Element) -> impl Iterator<Item = Result<Directive<'_>, BuiltinError>> {
	section.children().iter().map(move |child| {
		let key = || {
			child.attribute("key").ok_or_else(|| BuiltinError::MissingAttribute {
				section: section.name().to_owned(),
				element: child.name().to_owned(),
				attribute: "key",
			})
		};
		match child.name() {
			"add" => Ok(Directive::Add(key()?, child.attribute("value").unwrap_or_default())),
			"remove" => Ok(Directive::Remove(key()?)),
			"clear" => Ok(Directive::Clear),
			other => Err(BuiltinError::UnexpectedElement {
				section: section.name().to_owned(),
				element: other.to_owned(),
			}),
		}
	})
}

/// Builds a sealed [`AppSettings`] from `add`, `remove` and `clear` children.
///
/// A missing section yields an empty store.
#[derive(Debug, Default)]
pub struct NameValueSectionHandler;

impl SectionHandler for NameValueSectionHandler {
	fn create(&self, section: Option<&Element>) -> Result<SectionValue, HandlerError> {
		let mut settings = AppSettings::new();
		if let Some(section) = section {
			for directive in directives(section) {
				match directive? {
					Directive::Add(key, value) => settings.add(key, value)?,
					Directive::Remove(key) => settings.remove(key)?,
					Directive::Clear => settings.clear()?,
				}
			}
		}
		settings.seal();
		Ok(SectionValue::new(settings))
	}
}

/// Like [`NameValueSectionHandler`], but keys are unique: a later `add`
/// replaces the value in place. Produces an `IndexMap<String, String>`.
#[derive(Debug, Default)]
pub struct DictionarySectionHandler;

impl SectionHandler for DictionarySectionHandler {
	fn create(&self, section: Option<&Element>) -> Result<SectionValue, HandlerError> {
		let mut map: IndexMap<String, String> = IndexMap::new();
		if let Some(section) = section {
			for directive in directives(section) {
				match directive? {
					Directive::Add(key, value) => {
						map.insert(key.to_owned(), value.to_owned());
					}
					Directive::Remove(key) => {
						map.shift_remove(key);
					}
					Directive::Clear => map.clear(),
				}
			}
		}
		Ok(SectionValue::new(map))
	}
}

/// The section element's own attributes as an `IndexMap<String, String>`.
#[derive(Debug, Default)]
pub struct SingleTagSectionHandler;

impl SectionHandler for SingleTagSectionHandler {
	fn create(&self, section: Option<&Element>) -> Result<SectionValue, HandlerError> {
		let Some(section) = section else {
			return Ok(SectionValue::new(IndexMap::<String, String>::new()));
		};
		if let Some(child) = section.children().first() {
			return Err(BuiltinError::UnexpectedElement {
				section: section.name().to_owned(),
				element: child.name().to_owned(),
			}
			.into());
		}
		let map: IndexMap<String, String> = section.attributes().map(|(k, v)| (k.to_owned(), v.to_owned())).collect();
		Ok(SectionValue::new(map))
	}
}

crate::section_handler!(NameValueSectionHandler, module = BUILTIN_MODULE);
crate::section_handler!(DictionarySectionHandler, module = BUILTIN_MODULE);
crate::section_handler!(SingleTagSectionHandler, module = BUILTIN_MODULE);
