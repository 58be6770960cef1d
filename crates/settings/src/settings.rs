//! Lazily activated, process-wide settings lookup.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::activation::ActivationEngine;
use crate::app_settings::AppSettings;
use crate::catalog::TypeCatalog;
use crate::error::ActivationError;
use crate::handler::SectionValue;
use crate::source::ConfigSource;

/// Read-only view published once activation has run.
#[derive(Debug)]
struct Activated {
	sections: IndexMap<String, SectionValue>,
	app_settings: Arc<AppSettings>,
}

/// Section results and flat settings for one configuration source.
///
/// The first call to any accessor runs the [`ActivationEngine`] exactly once.
/// Concurrent first callers block until that run finishes, and all callers
/// then see its complete results.
///
/// A failed run is not retried. The caller that triggered it receives the
/// error; the registry keeps whatever the run registered before failing and
/// answers later lookups from that.
pub struct SettingsRegistry {
	source: ConfigSource,
	catalog: Arc<TypeCatalog>,
	started: AtomicBool,
	state: OnceLock<Activated>,
}

impl SettingsRegistry {
	pub fn new(source: ConfigSource, catalog: impl Into<Arc<TypeCatalog>>) -> Self {
		Self {
			source,
			catalog: catalog.into(),
			started: AtomicBool::new(false),
			state: OnceLock::new(),
		}
	}

	/// Uses every type registered through `inventory`.
	pub fn from_inventory(source: ConfigSource) -> Self {
		Self::new(source, TypeCatalog::from_inventory())
	}

	pub fn source(&self) -> &ConfigSource {
		&self.source
	}

	/// Whether activation has started. Never resets.
	pub fn is_activated(&self) -> bool {
		self.started.load(Ordering::Acquire)
	}

	/// Runs activation if it has not run yet.
	///
	/// Returns the error only to the caller whose call performed a failed run.
	pub fn activate(&self) -> Result<(), ActivationError> {
		self.ensure_activated().map(|_| ())
	}

	/// Result of the handler for `section`, or `None` if no handler produced one.
	pub fn get_config(&self, section: &str) -> Result<Option<SectionValue>, ActivationError> {
		Ok(self.ensure_activated()?.sections.get(section).cloned())
	}

	/// Like [`get_config`](Self::get_config), downcast to `T`.
	///
	/// A value of another type is reported as `None`.
	pub fn get<T: Any + Send + Sync>(&self, section: &str) -> Result<Option<Arc<T>>, ActivationError> {
		let value = self.get_config(section)?;
		Ok(value.and_then(|value| {
			let typed = value.downcast::<T>();
			if typed.is_none() {
				tracing::debug!(section, stored = value.type_name(), requested = std::any::type_name::<T>(), "section type mismatch");
			}
			typed
		}))
	}

	/// The sealed flat settings; empty when the document has none.
	pub fn app_settings(&self) -> Result<Arc<AppSettings>, ActivationError> {
		Ok(Arc::clone(&self.ensure_activated()?.app_settings))
	}

	/// Names of registered sections, in declaration order.
	pub fn section_names(&self) -> Result<Vec<String>, ActivationError> {
		Ok(self.ensure_activated()?.sections.keys().cloned().collect())
	}

	fn ensure_activated(&self) -> Result<&Activated, ActivationError> {
		if let Some(state) = self.state.get() {
			return Ok(state);
		}

		let mut failure = None;
		let state = self.state.get_or_init(|| {
			self.started.store(true, Ordering::Release);
			let outcome = ActivationEngine::new(&self.catalog).activate(&self.source);
			failure = outcome.error;
			let activation = outcome.activation;
			Activated {
				sections: activation.sections,
				app_settings: Arc::new(activation.app_settings.unwrap_or_else(AppSettings::sealed)),
			}
		});

		match failure {
			Some(error) => Err(error),
			None => Ok(state),
		}
	}
}

impl std::fmt::Debug for SettingsRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingsRegistry")
			.field("source", &self.source)
			.field("types", &self.catalog.len())
			.field("activated", &self.is_activated())
			.finish()
	}
}

static GLOBAL: OnceLock<SettingsRegistry> = OnceLock::new();

/// Process-wide registry reading [`ConfigSource::BesideExecutable`] with every
/// `inventory`-registered type.
pub fn global() -> &'static SettingsRegistry {
	GLOBAL.get_or_init(|| SettingsRegistry::from_inventory(ConfigSource::BesideExecutable))
}

/// [`SettingsRegistry::get_config`] on the [`global`] registry.
pub fn get_config(section: &str) -> Result<Option<SectionValue>, ActivationError> {
	global().get_config(section)
}

/// [`SettingsRegistry::app_settings`] on the [`global`] registry.
pub fn app_settings() -> Result<Arc<AppSettings>, ActivationError> {
	global().app_settings()
}
