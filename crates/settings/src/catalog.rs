//! Registration and lookup of types named by section declarations.
//!
//! A declaration's `type` attribute reads `"TypeName, module"`. Types are
//! registered under that pair, either at link time through
//! [`section_handler!`](crate::section_handler) / [`plain_type!`](crate::plain_type)
//! or explicitly through [`TypeCatalogBuilder`]. Only types registered as
//! [`TypeKind::SectionHandler`] take part in activation; plain types resolve
//! but are skipped.

use rustc_hash::FxHashMap;

use crate::error::ResolveError;
use crate::handler::{HandlerError, HandlerFactory, SectionHandler};

/// Separator between the components of a type specifier.
pub const TYPE_SEPARATOR: char = ',';

/// Static description of a registered type.
#[derive(Debug)]
pub struct TypeStatic {
	/// Type identifier, first component of a specifier.
	pub type_name: &'static str,
	/// Module identifier, second component of a specifier.
	pub module: &'static str,
	pub kind: TypeKind,
}

/// Capabilities of a registered type.
#[derive(Debug, Clone, Copy)]
pub enum TypeKind {
	/// Implements [`SectionHandler`]; constructed through the factory.
	SectionHandler(HandlerFactory),
	/// Resolvable, but not a section handler.
	Plain,
}

impl TypeStatic {
	/// Registers `T`, constructed through [`Default`].
	pub const fn handler<T: SectionHandler + Default + 'static>(type_name: &'static str, module: &'static str) -> Self {
		Self { type_name, module, kind: TypeKind::SectionHandler(default_factory::<T>) }
	}

	/// Registers a handler with a custom, possibly fallible, factory.
	pub const fn handler_with(type_name: &'static str, module: &'static str, factory: HandlerFactory) -> Self {
		Self { type_name, module, kind: TypeKind::SectionHandler(factory) }
	}

	/// Registers a type that does not implement the handler contract.
	pub const fn plain(type_name: &'static str, module: &'static str) -> Self {
		Self { type_name, module, kind: TypeKind::Plain }
	}

	/// The handler factory, if this type is a section handler.
	pub fn factory(&self) -> Option<HandlerFactory> {
		match self.kind {
			TypeKind::SectionHandler(factory) => Some(factory),
			TypeKind::Plain => None,
		}
	}
}

fn default_factory<T: SectionHandler + Default + 'static>() -> Result<Box<dyn SectionHandler>, HandlerError> {
	Ok(Box::new(T::default()))
}

/// Link-time registration entry collected via `inventory`.
pub struct TypeReg(pub &'static TypeStatic);

inventory::collect!(TypeReg);

/// Parsed `type` attribute of a section declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpecifier {
	type_name: String,
	module: String,
	qualifiers: Vec<String>,
}

impl TypeSpecifier {
	/// Splits `raw` on [`TYPE_SEPARATOR`] and trims each component.
	///
	/// Returns `None` unless the type and module components are both present
	/// and non-empty. Components after the module are kept as qualifiers.
	pub fn parse(raw: &str) -> Option<Self> {
		let mut parts = raw.split(TYPE_SEPARATOR).map(str::trim);
		let type_name = parts.next().filter(|s| !s.is_empty())?;
		let module = parts.next().filter(|s| !s.is_empty())?;
		Some(Self {
			type_name: type_name.to_owned(),
			module: module.to_owned(),
			qualifiers: parts.map(str::to_owned).collect(),
		})
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	pub fn module(&self) -> &str {
		&self.module
	}

	/// Trailing components, such as version or culture tags. Not used for lookup.
	pub fn qualifiers(&self) -> &[String] {
		&self.qualifiers
	}
}

/// Lookup table from `(module, type)` to registered types.
#[derive(Debug, Default)]
pub struct TypeCatalog {
	modules: FxHashMap<&'static str, FxHashMap<&'static str, &'static TypeStatic>>,
}

impl TypeCatalog {
	pub fn builder() -> TypeCatalogBuilder {
		TypeCatalogBuilder::default()
	}

	/// Builds a catalog from every [`TypeReg`] linked into the binary.
	pub fn from_inventory() -> Self {
		let mut builder = Self::builder();
		for reg in inventory::iter::<TypeReg> {
			builder.push(reg.0);
		}
		builder.build()
	}

	/// Finds the module named by `spec`, then the type within it.
	pub fn resolve(&self, spec: &TypeSpecifier) -> Result<&'static TypeStatic, ResolveError> {
		let types = self
			.modules
			.get(spec.module())
			.ok_or_else(|| ResolveError::UnknownModule(spec.module().to_owned()))?;
		types.get(spec.type_name()).copied().ok_or_else(|| ResolveError::UnknownType {
			module: spec.module().to_owned(),
			type_name: spec.type_name().to_owned(),
		})
	}

	/// Module identifiers with at least one registered type.
	pub fn modules(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.modules.keys().copied()
	}

	/// Total number of registered types.
	pub fn len(&self) -> usize {
		self.modules.values().map(FxHashMap::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.modules.is_empty()
	}
}

/// Collects registrations for a [`TypeCatalog`].
#[derive(Debug, Default)]
pub struct TypeCatalogBuilder {
	catalog: TypeCatalog,
}

impl TypeCatalogBuilder {
	/// Adds a registration, builder style.
	pub fn register(mut self, def: &'static TypeStatic) -> Self {
		self.push(def);
		self
	}

	/// Adds a registration. A repeated `(module, type)` keeps the first one.
	pub fn push(&mut self, def: &'static TypeStatic) {
		let types = self.catalog.modules.entry(def.module).or_default();
		if types.contains_key(def.type_name) {
			tracing::warn!(module = def.module, type_name = def.type_name, "duplicate type registration ignored");
			return;
		}
		types.insert(def.type_name, def);
	}

	pub fn build(self) -> TypeCatalog {
		self.catalog
	}
}
