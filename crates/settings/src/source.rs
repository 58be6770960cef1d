//! Where the configuration document comes from.

use std::fmt;
use std::path::PathBuf;

use crate::document::Document;
use crate::error::DocumentError;

/// File name looked up next to the running executable.
pub const DEFAULT_FILE_NAME: &str = "SmartConfig.xml";

/// Environment variable overriding [`ConfigSource::BesideExecutable`].
pub const CONFIG_PATH_ENV: &str = "SMARTCONF_CONFIG";

/// Location of a configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
	/// A file on disk.
	File(PathBuf),
	/// In-memory XML text.
	Text(String),
	/// `$SMARTCONF_CONFIG` if set, else [`DEFAULT_FILE_NAME`] in the executable's directory.
	#[default]
	BesideExecutable,
}

impl ConfigSource {
	pub fn file(path: impl Into<PathBuf>) -> Self {
		Self::File(path.into())
	}

	pub fn text(text: impl Into<String>) -> Self {
		Self::Text(text.into())
	}

	/// Resolves the on-disk path, if this source has one.
	pub fn path(&self) -> Result<Option<PathBuf>, DocumentError> {
		match self {
			Self::File(path) => Ok(Some(path.clone())),
			Self::Text(_) => Ok(None),
			Self::BesideExecutable => beside_executable().map(Some),
		}
	}

	/// Reads and parses the document.
	pub fn load(&self) -> Result<Document, DocumentError> {
		match self {
			Self::Text(text) => Document::parse(text),
			_ => match self.path()? {
				Some(path) => Document::load(&path),
				None => Err(DocumentError::Locate("source has no path".into())),
			},
		}
	}
}

impl fmt::Display for ConfigSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::File(path) => write!(f, "{}", path.display()),
			Self::Text(_) => f.write_str("<inline document>"),
			Self::BesideExecutable => match beside_executable() {
				Ok(path) => write!(f, "{}", path.display()),
				Err(_) => write!(f, "<{DEFAULT_FILE_NAME} beside executable>"),
			},
		}
	}
}

fn beside_executable() -> Result<PathBuf, DocumentError> {
	if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
		return Ok(PathBuf::from(path));
	}
	let exe = std::env::current_exe().map_err(|e| DocumentError::Locate(format!("cannot determine executable path: {e}")))?;
	let dir = exe
		.parent()
		.ok_or_else(|| DocumentError::Locate(format!("executable path {} has no parent directory", exe.display())))?;
	Ok(dir.join(DEFAULT_FILE_NAME))
}
