use std::path::PathBuf;

use clap::{Parser, Subcommand};
use smartconf_registry::ConfigSource;

#[derive(Parser, Debug)]
#[command(name = "smartconf")]
#[command(about = "Inspect configuration sections and application settings")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration document (defaults to $SMARTCONF_CONFIG, then SmartConfig.xml next to the executable)
	#[arg(long, short = 'c', value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short = 'v')]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
	/// List activated sections and the type of their value
	Sections,
	/// Print one section's value
	Section {
		/// Section name as declared in <configSections>
		name: String,
	},
	/// Print every application setting
	Settings,
	/// Print one application setting
	Setting {
		/// Setting key (case-insensitive)
		key: String,
	},
}

impl Cli {
	/// Where to read the document from.
	pub fn source(&self) -> ConfigSource {
		self.config.clone().map(ConfigSource::File).unwrap_or_default()
	}
}
