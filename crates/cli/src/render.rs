//! Text rendering of section values produced by the standard handlers.

use std::fmt::Write;

use indexmap::IndexMap;
use smartconf_registry::{AppSettings, SectionValue};

/// Renders `value` as `key=value` lines when its type is known, else a placeholder.
pub fn section(value: &SectionValue) -> String {
	if let Some(settings) = value.downcast_ref::<AppSettings>() {
		return pairs(settings.iter());
	}
	if let Some(map) = value.downcast_ref::<IndexMap<String, String>>() {
		return pairs(map.iter().map(|(k, v)| (k.as_str(), v.as_str())));
	}
	if let Some(text) = value.downcast_ref::<String>() {
		return format!("{text}\n");
	}
	format!("<{}>\n", value.type_name())
}

fn pairs<'a>(iter: impl Iterator<Item = (&'a str, &'a str)>) -> String {
	let mut out = String::new();
	for (key, value) in iter {
		let _ = writeln!(out, "{key}={value}");
	}
	out
}
