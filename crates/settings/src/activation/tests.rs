use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::catalog::TypeStatic;
use crate::error::{DocumentError, ResolveError};
use crate::handler::SectionHandler;

/// Returns the section's `host` attribute, or `"<none>"` without a section.
#[derive(Default)]
struct Host;

impl SectionHandler for Host {
	fn create(&self, section: Option<&Element>) -> Result<SectionValue, HandlerError> {
		let host = section.and_then(|s| s.attribute("host")).unwrap_or("<none>");
		Ok(SectionValue::new(host.to_owned()))
	}
}

#[derive(Default)]
struct Second;

impl SectionHandler for Second {
	fn create(&self, _: Option<&Element>) -> Result<SectionValue, HandlerError> {
		Ok(SectionValue::new(String::from("second")))
	}
}

#[derive(Default)]
struct Failing;

impl SectionHandler for Failing {
	fn create(&self, _: Option<&Element>) -> Result<SectionValue, HandlerError> {
		Err("bad section".into())
	}
}

#[derive(Default)]
struct Exploding;

impl SectionHandler for Exploding {
	fn create(&self, _: Option<&Element>) -> Result<SectionValue, HandlerError> {
		panic!("kaboom")
	}
}

fn refuse() -> Result<Box<dyn SectionHandler>, HandlerError> {
	Err("no default constructor".into())
}

static HOST: TypeStatic = TypeStatic::handler::<Host>("Host", "demo");
static SECOND: TypeStatic = TypeStatic::handler::<Second>("Second", "demo");
static FAILING: TypeStatic = TypeStatic::handler::<Failing>("Failing", "demo");
static EXPLODING: TypeStatic = TypeStatic::handler::<Exploding>("Exploding", "demo");
static REFUSING: TypeStatic = TypeStatic::handler_with("Refusing", "demo", refuse);
static MARKER: TypeStatic = TypeStatic::plain("Marker", "demo");

fn catalog() -> TypeCatalog {
	TypeCatalog::builder()
		.register(&HOST)
		.register(&SECOND)
		.register(&FAILING)
		.register(&EXPLODING)
		.register(&REFUSING)
		.register(&MARKER)
		.build()
}

fn run(xml: &str) -> ActivationOutcome {
	let catalog = catalog();
	ActivationEngine::new(&catalog).activate(&ConfigSource::text(xml))
}

fn section_str<'a>(activation: &'a Activation, name: &str) -> Option<&'a str> {
	activation.sections.get(name).and_then(|v| v.downcast_ref::<String>()).map(String::as_str)
}

#[test]
fn activates_sections_and_app_settings() {
	let outcome = run(r#"
		<configuration>
			<configSections>
				<section name="mail" type="Host, demo" />
				<section name="backup" type="Host, demo" />
			</configSections>
			<mail host="smtp.example.org" />
			<backup host="10.0.0.2" />
			<appSettings>
				<add key="k1" value="v1" />
				<add key="k2" value="v2" />
			</appSettings>
		</configuration>"#);
	let activation = outcome.into_result().unwrap();

	assert_eq!(activation.sections.keys().collect::<Vec<_>>(), vec!["mail", "backup"]);
	assert_eq!(section_str(&activation, "mail"), Some("smtp.example.org"));
	assert_eq!(section_str(&activation, "backup"), Some("10.0.0.2"));

	let settings = activation.app_settings.unwrap();
	assert!(settings.is_sealed());
	assert_eq!(settings.get("k1"), Some("v1"));
	assert_eq!(settings.get("k2"), Some("v2"));
}

#[test]
fn missing_declaration_block_is_a_no_op() {
	let outcome = run(r#"<configuration><appSettings><add key="k" value="v"/></appSettings></configuration>"#);
	let activation = outcome.into_result().unwrap();
	assert!(activation.sections.is_empty());
	assert!(activation.app_settings.is_none());
}

#[test]
fn empty_declaration_block_is_a_no_op() {
	let activation = run("<configuration><configSections/></configuration>").into_result().unwrap();
	assert!(activation.sections.is_empty());
	assert!(activation.app_settings.is_none());
}

#[test]
fn two_declaration_blocks_are_malformed() {
	let err = run("<configuration><configSections/><configSections/></configuration>").into_result().unwrap_err();
	assert!(matches!(
		err,
		ActivationError::Malformed(MalformedConfig::DuplicateBlock { tag: SECTIONS_TAG, count: 2 })
	));
}

#[rstest]
#[case(r#"<section type="Host, demo"/>"#, "name")]
#[case(r#"<section name="" type="Host, demo"/>"#, "name")]
#[case(r#"<section name="mail"/>"#, "type")]
#[case(r#"<section name="mail" type=""/>"#, "type")]
fn declarations_need_name_and_type(#[case] declaration: &str, #[case] missing: &str) {
	let xml = format!("<configuration><configSections>{declaration}</configSections></configuration>");
	match run(&xml).into_result().unwrap_err() {
		ActivationError::Malformed(MalformedConfig::MissingAttribute { index, attribute }) => {
			assert_eq!(index, 0);
			assert_eq!(attribute, missing);
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[rstest]
#[case("Host")]
#[case("Host,")]
#[case(" , demo")]
fn malformed_type_specifier_fails_and_registers_nothing(#[case] specifier: &str) {
	let xml = format!(
		r#"<configuration>
			<configSections><section name="mail" type="{specifier}"/></configSections>
			<mail host="h"/>
		</configuration>"#
	);
	let outcome = run(&xml);
	assert!(outcome.activation.sections.is_empty());
	match outcome.error {
		Some(ActivationError::Malformed(MalformedConfig::InvalidTypeSpecifier { section, specifier: raw })) => {
			assert_eq!(section, "mail");
			assert_eq!(raw, specifier);
		}
		other => panic!("unexpected outcome: {other:?}"),
	}
}

#[test]
fn unknown_module_and_type_fail_resolution() {
	let err = run(r#"<c><configSections><section name="a" type="Host, elsewhere"/></configSections></c>"#)
		.into_result()
		.unwrap_err();
	assert!(matches!(
		err,
		ActivationError::TypeResolution { source: ResolveError::UnknownModule(_), .. }
	));

	let err = run(r#"<c><configSections><section name="a" type="Nope, demo"/></configSections></c>"#)
		.into_result()
		.unwrap_err();
	assert_eq!(err.section(), Some("a"));
	assert!(matches!(
		err,
		ActivationError::TypeResolution { source: ResolveError::UnknownType { .. }, .. }
	));
}

#[test]
fn non_handler_types_are_skipped_silently() {
	let activation = run(r#"
		<configuration>
			<configSections>
				<section name="marker" type="Marker, demo" />
				<section name="mail" type="Host, demo" />
			</configSections>
			<marker host="ignored" />
			<mail host="smtp" />
			<appSettings><add key="k" value="v" /></appSettings>
		</configuration>"#)
	.into_result()
	.unwrap();

	assert!(!activation.sections.contains_key("marker"));
	assert_eq!(section_str(&activation, "mail"), Some("smtp"));
	assert_eq!(activation.app_settings.unwrap().get("k"), Some("v"));
}

#[test]
fn first_declaration_of_a_name_wins() {
	let activation = run(r#"
		<configuration>
			<configSections>
				<section name="a" type="Host, demo" />
				<section name="a" type="Second, demo" />
			</configSections>
			<a host="first" />
		</configuration>"#)
	.into_result()
	.unwrap();

	assert_eq!(activation.sections.len(), 1);
	assert_eq!(section_str(&activation, "a"), Some("first"));
}

#[test]
fn handler_receives_none_without_an_element() {
	let activation = run(r#"<c><configSections><section name="mail" type="Host, demo"/></configSections></c>"#)
		.into_result()
		.unwrap();
	assert_eq!(section_str(&activation, "mail"), Some("<none>"));
}

#[test]
fn fragment_is_the_first_matching_element_anywhere() {
	let activation = run(r#"
		<c>
			<configSections><section name="mail" type="Host, demo"/></configSections>
			<nested><mail host="deep"/></nested>
			<mail host="shallow"/>
		</c>"#)
	.into_result()
	.unwrap();
	assert_eq!(section_str(&activation, "mail"), Some("deep"));
}

#[test]
fn handler_failure_keeps_earlier_sections() {
	let outcome = run(r#"
		<c>
			<configSections>
				<section name="mail" type="Host, demo" />
				<section name="broken" type="Failing, demo" />
				<section name="never" type="Host, demo" />
			</configSections>
			<mail host="smtp" />
			<appSettings><add key="k" value="v" /></appSettings>
		</c>"#);

	assert_eq!(outcome.activation.sections.keys().collect::<Vec<_>>(), vec!["mail"]);
	assert!(outcome.activation.app_settings.is_none());
	match outcome.error {
		Some(ActivationError::HandlerExecution { section, source, .. }) => {
			assert_eq!(section, "broken");
			assert_eq!(source.to_string(), "bad section");
		}
		other => panic!("unexpected outcome: {other:?}"),
	}
}

#[test]
fn handler_panic_becomes_execution_error() {
	let err = run(r#"<c><configSections><section name="boom" type="Exploding, demo"/></configSections></c>"#)
		.into_result()
		.unwrap_err();
	match err {
		ActivationError::HandlerExecution { source, .. } => assert!(source.to_string().contains("kaboom")),
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn factory_failure_is_an_instantiation_error() {
	let err = run(r#"<c><configSections><section name="r" type="Refusing, demo"/></configSections></c>"#)
		.into_result()
		.unwrap_err();
	assert!(matches!(err, ActivationError::HandlerInstantiation { .. }));
}

#[test]
fn two_app_settings_blocks_are_malformed() {
	let outcome = run(r#"
		<c>
			<configSections><section name="mail" type="Host, demo"/></configSections>
			<appSettings><add key="k1" value="v1"/></appSettings>
			<appSettings><add key="k2" value="v2"/></appSettings>
		</c>"#);
	assert!(outcome.activation.app_settings.is_none());
	assert!(matches!(
		outcome.error,
		Some(ActivationError::Malformed(MalformedConfig::DuplicateBlock { tag: APP_SETTINGS_TAG, count: 2 }))
	));
}

#[test]
fn app_setting_without_value_wraps_the_cause() {
	let err = run(r#"
		<c>
			<configSections><section name="mail" type="Host, demo"/></configSections>
			<appSettings><add key="k1" value="v1"/><add key="k2"/></appSettings>
		</c>"#)
	.into_result()
	.unwrap_err();

	match err {
		ActivationError::Malformed(MalformedConfig::AppSetting { index, source }) => {
			assert_eq!(index, 1);
			assert!(matches!(source, AppSettingError::MissingAttribute { attribute: "value", .. }));
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn empty_app_setting_values_are_allowed() {
	let activation = run(r#"
		<c>
			<configSections><section name="mail" type="Host, demo"/></configSections>
			<appSettings><add key="empty" value=""/></appSettings>
		</c>"#)
	.into_result()
	.unwrap();
	assert_eq!(activation.app_settings.unwrap().get("empty"), Some(""));
}

#[test]
fn load_failures_name_the_origin() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("absent.xml");
	let catalog = catalog();
	let outcome = ActivationEngine::new(&catalog).activate(&ConfigSource::file(&path));
	match outcome.error {
		Some(ActivationError::Load { origin, source: DocumentError::Io(_) }) => assert_eq!(origin, path.display().to_string()),
		other => panic!("unexpected outcome: {other:?}"),
	}

	let err = run("<configuration><unclosed></configuration>").into_result().unwrap_err();
	assert!(matches!(err, ActivationError::Load { .. }));
}
