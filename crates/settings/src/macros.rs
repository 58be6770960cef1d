//! Link-time registration macros for declared types.

/// Registers a [`SectionHandler`](crate::SectionHandler) type with the global catalog.
///
/// The type name defaults to the identifier as written and the module to the
/// registering crate's package name, so `section_handler!(MailHandler)` in crate
/// `acme-mail` answers to `type="MailHandler, acme-mail"`.
///
/// Without `factory`, the handler is built through [`Default`].
#[macro_export]
macro_rules! section_handler {
	($ty:path $(,)?) => {
		$crate::section_handler!($ty, name = stringify!($ty), module = env!("CARGO_PKG_NAME"));
	};
	($ty:path, module = $module:expr $(,)?) => {
		$crate::section_handler!($ty, name = stringify!($ty), module = $module);
	};
	($ty:path, name = $name:expr, module = $module:expr $(,)?) => {
		const _: () = {
			static TYPE: $crate::TypeStatic = $crate::TypeStatic::handler::<$ty>($name, $module);
			$crate::__private::inventory::submit!($crate::TypeReg(&TYPE));
		};
	};
	($ty:path, name = $name:expr, module = $module:expr, factory = $factory:expr $(,)?) => {
		const _: () = {
			static TYPE: $crate::TypeStatic = $crate::TypeStatic::handler_with($name, $module, $factory);
			$crate::__private::inventory::submit!($crate::TypeReg(&TYPE));
		};
	};
}

/// Registers a type that can be named in a declaration but is not a section handler.
///
/// Declarations resolving to such a type are skipped during activation.
#[macro_export]
macro_rules! plain_type {
	($ty:path $(,)?) => {
		$crate::plain_type!($ty, name = stringify!($ty), module = env!("CARGO_PKG_NAME"));
	};
	($ty:path, module = $module:expr $(,)?) => {
		$crate::plain_type!($ty, name = stringify!($ty), module = $module);
	};
	($ty:path, name = $name:expr, module = $module:expr $(,)?) => {
		const _: () = {
			const _: ::core::marker::PhantomData<$ty> = ::core::marker::PhantomData;
			static TYPE: $crate::TypeStatic = $crate::TypeStatic::plain($name, $module);
			$crate::__private::inventory::submit!($crate::TypeReg(&TYPE));
		};
	};
}
