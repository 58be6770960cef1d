//! Error types for document loading, type resolution and activation.

use crate::handler::HandlerError;

/// Failure to read or parse a configuration document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
	/// The document could not be read.
	#[error("cannot read configuration document: {0}")]
	Io(#[from] std::io::Error),

	/// The document location could not be determined.
	#[error("cannot locate configuration document: {0}")]
	Locate(String),

	/// The XML reader rejected the input.
	#[error("XML syntax error: {0}")]
	Xml(#[from] quick_xml::Error),

	/// An attribute could not be decoded.
	#[error("invalid attribute: {0}")]
	Attribute(#[from] quick_xml::events::attributes::AttrError),

	/// A tag or attribute name is not valid UTF-8.
	#[error("invalid UTF-8 in document: {0}")]
	Utf8(#[from] std::str::Utf8Error),

	/// Well-formed XML events that do not form a single element tree.
	#[error("invalid document structure: {0}")]
	Structure(String),
}

/// Mutation of an [`AppSettings`](crate::AppSettings) store after it was sealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("application settings are read-only")]
pub struct ImmutableStoreError;

/// A declared `(module, type)` pair with no registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
	/// No type was registered under the module identifier.
	#[error("unknown module '{0}'")]
	UnknownModule(String),

	/// The module exists but has no type with this name.
	#[error("module '{module}' has no type '{type_name}'")]
	UnknownType {
		/// Module identifier from the declaration.
		module: String,
		/// Type identifier from the declaration.
		type_name: String,
	},
}

/// Structural violations in an otherwise parseable document.
#[derive(Debug, thiserror::Error)]
pub enum MalformedConfig {
	/// A block that may appear at most once appeared several times.
	#[error("configuration cannot contain more than one <{tag}> element (found {count})")]
	DuplicateBlock {
		/// Tag of the singleton block.
		tag: &'static str,
		/// Number of occurrences.
		count: usize,
	},

	/// A section declaration lacks a required attribute.
	#[error("section declaration #{index} is missing the '{attribute}' attribute")]
	MissingAttribute {
		/// Zero-based position among the declarations.
		index: usize,
		/// Name of the missing attribute.
		attribute: &'static str,
	},

	/// The `type` attribute does not name both a type and a module.
	#[error("invalid type '{specifier}' for section '{section}': expected \"TypeName, module\"")]
	InvalidTypeSpecifier {
		/// Declared section name.
		section: String,
		/// Raw `type` attribute.
		specifier: String,
	},

	/// A child of the flat settings block could not be turned into a pair.
	#[error("invalid application setting #{index}")]
	AppSetting {
		/// Zero-based position among the block's children.
		index: usize,
		/// Underlying cause.
		#[source]
		source: AppSettingError,
	},
}

/// Cause of an [`MalformedConfig::AppSetting`] failure.
#[derive(Debug, thiserror::Error)]
pub enum AppSettingError {
	/// `<{element}>` has no `{attribute}` attribute.
	#[error("<{element}> has no '{attribute}' attribute")]
	MissingAttribute {
		/// Tag of the offending child.
		element: String,
		/// Name of the missing attribute.
		attribute: &'static str,
	},

	/// The store rejected the pair.
	#[error(transparent)]
	Store(#[from] ImmutableStoreError),
}

/// Failure of the one-time activation run.
///
/// Every variant aborts the remaining declarations; results registered before
/// the failure stay visible.
#[derive(Debug, thiserror::Error)]
pub enum ActivationError {
	/// The document is missing or unparsable.
	#[error("failed to load configuration from {origin}")]
	Load {
		/// Where the document was looked for.
		origin: String,
		/// Underlying cause.
		#[source]
		source: DocumentError,
	},

	/// Structural problem in the document.
	#[error("malformed configuration: {0}")]
	Malformed(#[from] MalformedConfig),

	/// The declared module or type is not registered.
	#[error("cannot resolve type '{specifier}' for section '{section}'")]
	TypeResolution {
		/// Declared section name.
		section: String,
		/// Raw `type` attribute.
		specifier: String,
		/// Underlying cause.
		#[source]
		source: ResolveError,
	},

	/// The handler's factory failed.
	#[error("cannot instantiate handler '{specifier}' for section '{section}'")]
	HandlerInstantiation {
		/// Declared section name.
		section: String,
		/// Raw `type` attribute.
		specifier: String,
		/// Underlying cause.
		#[source]
		source: HandlerError,
	},

	/// The handler's `create` failed or panicked.
	#[error("handler '{specifier}' failed to create section '{section}'")]
	HandlerExecution {
		/// Declared section name.
		section: String,
		/// Raw `type` attribute.
		specifier: String,
		/// Underlying cause.
		#[source]
		source: HandlerError,
	},
}

impl ActivationError {
	/// Returns the section being processed when the run failed, if any.
	pub fn section(&self) -> Option<&str> {
		match self {
			Self::TypeResolution { section, .. } | Self::HandlerInstantiation { section, .. } | Self::HandlerExecution { section, .. } => Some(section.as_str()),
			Self::Malformed(MalformedConfig::InvalidTypeSpecifier { section, .. }) => Some(section.as_str()),
			_ => None,
		}
	}
}
