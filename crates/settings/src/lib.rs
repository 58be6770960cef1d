//! Section-handler registry for XML application configuration.
//!
//! A configuration document declares named sections and the handler type that
//! understands each one:
//!
//! ```xml
//! <configuration>
//! 	<configSections>
//! 		<section name="mail" type="MailSettingsHandler, acme-mail" />
//! 	</configSections>
//! 	<mail host="smtp.example.org" port="25" />
//! 	<appSettings>
//! 		<add key="retries" value="3" />
//! 	</appSettings>
//! </configuration>
//! ```
//!
//! On first access a [`SettingsRegistry`] parses the document once, resolves
//! every declared `type` through a [`TypeCatalog`], lets the handler turn its
//! element into a [`SectionValue`], and caches the results for lookup by
//! section name. The `appSettings` block becomes a sealed [`AppSettings`] store.
//!
//! Handlers are registered at link time:
//!
//! ```ignore
//! #[derive(Default)]
//! struct MailSettingsHandler;
//!
//! impl SectionHandler for MailSettingsHandler {
//! 	fn create(&self, section: Option<&Element>) -> Result<SectionValue, HandlerError> {
//! 		/* ... */
//! 	}
//! }
//!
//! smartconf_registry::section_handler!(MailSettingsHandler, module = "acme-mail");
//! ```

pub mod activation;
pub mod app_settings;
#[cfg(feature = "builtins")]
pub mod builtins;
pub mod catalog;
pub mod document;
pub mod error;
pub mod handler;
mod macros;
pub mod settings;
pub mod source;

pub use activation::{Activation, ActivationEngine, ActivationOutcome};
pub use app_settings::AppSettings;
pub use catalog::{TypeCatalog, TypeCatalogBuilder, TypeKind, TypeReg, TypeSpecifier, TypeStatic};
pub use document::{Document, Element};
pub use error::{ActivationError, AppSettingError, DocumentError, ImmutableStoreError, MalformedConfig, ResolveError};
pub use handler::{HandlerError, HandlerFactory, SectionHandler, SectionValue};
pub use settings::{SettingsRegistry, app_settings, get_config, global};
pub use source::ConfigSource;

#[doc(hidden)]
pub mod __private {
	pub use inventory;
}

#[cfg(test)]
mod tests;
