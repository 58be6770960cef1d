//! `smartconf` inspects a configuration document through the section registry.

mod cli;
mod render;

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use smartconf_registry::SettingsRegistry;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let registry = SettingsRegistry::from_inventory(cli.source());
	tracing::debug!(source = %registry.source(), "inspecting configuration");

	let mut stdout = std::io::stdout().lock();
	run(&registry, &cli.command, &mut stdout)
}

fn run(registry: &SettingsRegistry, command: &Command, out: &mut impl Write) -> anyhow::Result<()> {
	match command {
		Command::Sections => {
			for name in registry.section_names()? {
				if let Some(value) = registry.get_config(&name)? {
					writeln!(out, "{name}\t{}", value.type_name())?;
				}
			}
		}
		Command::Section { name } => {
			let value = registry.get_config(name)?.with_context(|| format!("section '{name}' not found"))?;
			out.write_all(render::section(&value).as_bytes())?;
		}
		Command::Settings => {
			for (key, value) in registry.app_settings()?.iter() {
				writeln!(out, "{key}={value}")?;
			}
		}
		Command::Setting { key } => {
			let settings = registry.app_settings()?;
			let value = settings.get(key).with_context(|| format!("setting '{key}' not found"))?;
			writeln!(out, "{value}")?;
		}
	}
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("smartconf_registry=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
