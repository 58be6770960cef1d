//! One-shot parse, resolve and invoke pass over a configuration document.
//!
//! Given a document, the engine:
//!
//! 1. finds the single `<configSections>` block (none: nothing to do),
//! 2. for each declaration child, in document order, reads `name` and `type`,
//!    resolves the type through the [`TypeCatalog`], builds the handler and
//!    passes it the first element tagged `name`,
//! 3. keeps the first result per section name,
//! 4. reads the single `<appSettings>` block into a sealed [`AppSettings`].
//!
//! Declarations whose type is registered but is not a section handler are
//! skipped. Any error stops the pass; results collected before it are kept in
//! the [`ActivationOutcome`].

use std::any::Any;
use std::panic::AssertUnwindSafe;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::app_settings::AppSettings;
use crate::catalog::{TypeCatalog, TypeSpecifier};
use crate::document::{Document, Element};
use crate::error::{ActivationError, AppSettingError, MalformedConfig};
use crate::handler::{HandlerError, SectionValue};
use crate::source::ConfigSource;

/// Tag of the section declarations block.
pub const SECTIONS_TAG: &str = "configSections";
/// Tag of the flat settings block.
pub const APP_SETTINGS_TAG: &str = "appSettings";

const NAME_ATTR: &str = "name";
const TYPE_ATTR: &str = "type";
const KEY_ATTR: &str = "key";
const VALUE_ATTR: &str = "value";

/// Results of an activation pass.
#[derive(Debug, Default)]
pub struct Activation {
	/// Handler results by section name, in declaration order.
	pub sections: IndexMap<String, SectionValue>,
	/// Sealed flat settings, if the document has an `appSettings` block.
	pub app_settings: Option<AppSettings>,
}

/// Everything a pass produced, including partial results of a failed pass.
#[derive(Debug)]
pub struct ActivationOutcome {
	pub activation: Activation,
	pub error: Option<ActivationError>,
}

impl ActivationOutcome {
	/// Drops partial results if the pass failed.
	pub fn into_result(self) -> Result<Activation, ActivationError> {
		match self.error {
			Some(error) => Err(error),
			None => Ok(self.activation),
		}
	}
}

/// Runs activation passes against a type catalog.
pub struct ActivationEngine<'a> {
	catalog: &'a TypeCatalog,
}

impl<'a> ActivationEngine<'a> {
	pub fn new(catalog: &'a TypeCatalog) -> Self {
		Self { catalog }
	}

	/// Loads the document from `source` and activates it.
	///
	/// The document is dropped before returning.
	pub fn activate(&self, source: &ConfigSource) -> ActivationOutcome {
		let span = tracing::info_span!("activate", %source);
		let _guard = span.enter();

		let mut activation = Activation::default();
		let error = match source.load() {
			Ok(document) => self.activate_document(&document, &mut activation).err(),
			Err(cause) => Some(ActivationError::Load { origin: source.to_string(), source: cause }),
		};

		match &error {
			Some(error) => tracing::error!(%error, kept = activation.sections.len(), "activation failed"),
			None => tracing::info!(
				sections = activation.sections.len(),
				app_settings = activation.app_settings.as_ref().map_or(0, AppSettings::len),
				"activation complete"
			),
		}

		ActivationOutcome { activation, error }
	}

	/// Activates an already parsed document, writing results into `activation`.
	pub fn activate_document(&self, document: &Document, activation: &mut Activation) -> Result<(), ActivationError> {
		let Some(block) = singleton(document, SECTIONS_TAG)? else {
			tracing::debug!("no <{SECTIONS_TAG}> block");
			return Ok(());
		};
		if block.children().is_empty() {
			tracing::debug!("empty <{SECTIONS_TAG}> block");
			return Ok(());
		}

		for (index, declaration) in block.children().iter().enumerate() {
			self.activate_section(document, index, declaration, activation)?;
		}

		if let Some(settings) = singleton(document, APP_SETTINGS_TAG)? {
			activation.app_settings = Some(read_app_settings(settings)?);
		}

		Ok(())
	}

	fn activate_section(&self, document: &Document, index: usize, declaration: &Element, activation: &mut Activation) -> Result<(), ActivationError> {
		let name = required_attribute(declaration, index, NAME_ATTR)?;
		let specifier = required_attribute(declaration, index, TYPE_ATTR)?;

		let spec = TypeSpecifier::parse(specifier).ok_or_else(|| MalformedConfig::InvalidTypeSpecifier {
			section: name.to_owned(),
			specifier: specifier.to_owned(),
		})?;

		let def = self.catalog.resolve(&spec).map_err(|source| ActivationError::TypeResolution {
			section: name.to_owned(),
			specifier: specifier.to_owned(),
			source,
		})?;

		let Some(factory) = def.factory() else {
			tracing::debug!(section = name, type_spec = specifier, "not a section handler, skipped");
			return Ok(());
		};

		let handler = guarded(factory).map_err(|source| ActivationError::HandlerInstantiation {
			section: name.to_owned(),
			specifier: specifier.to_owned(),
			source,
		})?;

		let fragment = document.elements_by_tag(name).next();
		if fragment.is_none() {
			tracing::debug!(section = name, "no element for section");
		}

		let value = guarded(|| handler.create(fragment)).map_err(|source| ActivationError::HandlerExecution {
			section: name.to_owned(),
			specifier: specifier.to_owned(),
			source,
		})?;

		match activation.sections.entry(name.to_owned()) {
			Entry::Occupied(_) => {
				tracing::warn!(section = name, type_spec = specifier, "section already registered, result dropped");
			}
			Entry::Vacant(slot) => {
				tracing::debug!(section = name, value = value.type_name(), "section registered");
				slot.insert(value);
			}
		}

		Ok(())
	}
}

/// Returns the only element tagged `tag`, if any.
fn singleton<'d>(document: &'d Document, tag: &'static str) -> Result<Option<&'d Element>, MalformedConfig> {
	let mut matches = document.elements_by_tag(tag);
	let first = matches.next();
	let extra = matches.count();
	if extra > 0 {
		return Err(MalformedConfig::DuplicateBlock { tag, count: extra + 1 });
	}
	Ok(first)
}

/// Reads a non-empty declaration attribute.
fn required_attribute<'e>(declaration: &'e Element, index: usize, attribute: &'static str) -> Result<&'e str, MalformedConfig> {
	declaration
		.attribute(attribute)
		.filter(|value| !value.is_empty())
		.ok_or(MalformedConfig::MissingAttribute { index, attribute })
}

fn read_app_settings(block: &Element) -> Result<AppSettings, MalformedConfig> {
	let mut settings = AppSettings::new();
	for (index, child) in block.children().iter().enumerate() {
		add_setting(&mut settings, child).map_err(|source| MalformedConfig::AppSetting { index, source })?;
	}
	settings.seal();
	Ok(settings)
}

fn add_setting(settings: &mut AppSettings, child: &Element) -> Result<(), AppSettingError> {
	let attr = |attribute: &'static str| {
		child.attribute(attribute).ok_or_else(|| AppSettingError::MissingAttribute {
			element: child.name().to_owned(),
			attribute,
		})
	};
	settings.add(attr(KEY_ATTR)?, attr(VALUE_ATTR)?)?;
	Ok(())
}

/// Runs plugin code, turning a panic into an error.
fn guarded<T>(f: impl FnOnce() -> Result<T, HandlerError>) -> Result<T, HandlerError> {
	std::panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| Err(panic_message(payload).into()))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
	let detail = payload
		.downcast_ref::<&str>()
		.map(|s| (*s).to_owned())
		.or_else(|| payload.downcast_ref::<String>().cloned())
		.unwrap_or_else(|| "non-string payload".to_owned());
	format!("handler panicked: {detail}")
}

#[cfg(test)]
mod tests;
