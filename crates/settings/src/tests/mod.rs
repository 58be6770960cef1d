//! Consistency checks over link-time registrations.

use std::collections::HashSet;

use crate::catalog::{TYPE_SEPARATOR, TypeReg, TypeSpecifier};

#[test]
fn registrations_are_unique_and_addressable() {
	let mut seen = HashSet::new();
	for reg in inventory::iter::<TypeReg> {
		let def = reg.0;
		assert!(!def.type_name.is_empty() && !def.module.is_empty(), "empty identifier in {def:?}");
		assert!(
			!def.type_name.contains(TYPE_SEPARATOR) && !def.module.contains(TYPE_SEPARATOR),
			"identifier contains '{TYPE_SEPARATOR}': {def:?}"
		);
		assert!(seen.insert((def.module, def.type_name)), "duplicate registration {}, {}", def.type_name, def.module);

		let spec = TypeSpecifier::parse(&format!("{}{TYPE_SEPARATOR} {}", def.type_name, def.module)).unwrap();
		assert_eq!((spec.type_name(), spec.module()), (def.type_name, def.module));
	}
}
