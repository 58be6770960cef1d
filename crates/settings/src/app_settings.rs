//! Ordered key/value store that becomes read-only once sealed.

use crate::error::ImmutableStoreError;

/// Flat `key -> value` settings from the `appSettings` block.
///
/// Pairs keep insertion order and keys may repeat. Lookups compare keys
/// ASCII case-insensitively and return the most recently added value. After
/// [`seal`](Self::seal) every mutation fails with [`ImmutableStoreError`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSettings {
	pairs: Vec<(String, String)>,
	sealed: bool,
}

impl AppSettings {
	/// Creates an empty, writable store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty store that is already sealed.
	pub fn sealed() -> Self {
		Self { pairs: Vec::new(), sealed: true }
	}

	/// Appends a pair.
	pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<(), ImmutableStoreError> {
		self.check_writable()?;
		self.pairs.push((key.into(), value.into()));
		Ok(())
	}

	/// Removes every pair with `key`.
	pub fn remove(&mut self, key: &str) -> Result<(), ImmutableStoreError> {
		self.check_writable()?;
		self.pairs.retain(|(k, _)| !k.eq_ignore_ascii_case(key));
		Ok(())
	}

	/// Removes every pair.
	pub fn clear(&mut self) -> Result<(), ImmutableStoreError> {
		self.check_writable()?;
		self.pairs.clear();
		Ok(())
	}

	/// Makes the store permanently read-only. Idempotent.
	pub fn seal(&mut self) {
		self.sealed = true;
	}

	pub fn is_sealed(&self) -> bool {
		self.sealed
	}

	/// Value most recently added under `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.get_all(key).next_back()
	}

	/// Every value added under `key`, oldest first.
	pub fn get_all<'a>(&'a self, key: &str) -> impl DoubleEndedIterator<Item = &'a str> {
		self.pairs
			.iter()
			.filter(move |(k, _)| k.eq_ignore_ascii_case(key))
			.map(|(_, v)| v.as_str())
	}

	/// Pairs in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Distinct keys in order of first appearance.
	pub fn keys(&self) -> Vec<&str> {
		let mut keys: Vec<&str> = Vec::new();
		for (key, _) in &self.pairs {
			if !keys.iter().any(|k| k.eq_ignore_ascii_case(key)) {
				keys.push(key);
			}
		}
		keys
	}

	/// Number of stored pairs, duplicates included.
	pub fn len(&self) -> usize {
		self.pairs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}

	fn check_writable(&self) -> Result<(), ImmutableStoreError> {
		if self.sealed { Err(ImmutableStoreError) } else { Ok(()) }
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AppSettings {
	/// Collects pairs into a writable store.
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
			sealed: false,
		}
	}
}
