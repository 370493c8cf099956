//! Generated file text through the library API

use decorate::emit::MARKER;
use decorate::{Config, Destination, Error, generate};

fn meter_config() -> Config {
    Config {
        package: "meters".into(),
        function: "decorate_meter".into(),
        base: "api::Meter".into(),
        types: vec![
            "api::Battery,soc,fn() -> Result<f64, api::Error>".into(),
            "api::BatteryRange,range,fn() -> i64".into(),
        ],
        ..Config::default()
    }
}

fn items(text: &str) -> syn::File {
    syn::parse_str(text).expect("generated text parses")
}

// =============================================================================
// Text
// =============================================================================

#[test]
fn repeated_generation_is_byte_identical() {
    let config = meter_config();
    assert_eq!(generate(&config).unwrap(), generate(&config).unwrap());
}

#[test]
fn marker_and_import_lead_the_file() {
    let text = generate(&meter_config()).unwrap();
    assert!(text.starts_with(MARKER));
    assert!(text.contains("\n// Module: meters\n"));
    assert!(text.contains("\nuse crate::api;\n"));
    assert!(text.ends_with('\n') && !text.ends_with("\n\n"));
    assert_eq!(text, format!("{}\n", text.trim()));
}

#[test]
fn custom_api_module_is_imported() {
    let config = Config {
        api: "crate::contracts::api".into(),
        ..meter_config()
    };
    let text = generate(&config).unwrap();
    assert!(text.contains("\nuse crate::contracts::api;\n"));
}

#[test]
fn generated_items_are_complete() {
    let text = generate(&meter_config()).unwrap();
    let file = items(&text);

    let mut structs = Vec::new();
    let mut enums = Vec::new();
    let mut functions = Vec::new();
    for item in &file.items {
        match item {
            syn::Item::Struct(s) => structs.push(s.ident.to_string()),
            syn::Item::Enum(e) => enums.push(e.ident.to_string()),
            syn::Item::Fn(f) => functions.push(f.sig.ident.to_string()),
            _ => {}
        }
    }

    assert_eq!(functions, vec!["decorate_meter"]);
    assert_eq!(enums, vec!["DecorateMeter"]);
    assert_eq!(
        structs,
        vec![
            "DecorateMeterBattery",
            "DecorateMeterBatteryRange",
            "DecorateMeterBatteryBatteryRange",
            "DecorateMeterBatteryImpl",
            "DecorateMeterBatteryRangeImpl",
        ]
    );
}

#[test]
fn dispatcher_matches_full_presence_tuples() {
    let text = generate(&meter_config()).unwrap();
    assert!(text.contains("match (battery, battery_range) {"));
    assert!(text.contains("(None, None) => DecorateMeter::Base(base),"));
    assert!(text.contains("(None, Some(battery_range)) => DecorateMeter::BatteryRange("));
    assert!(text.contains("(Some(battery), Some(battery_range)) => DecorateMeter::BatteryBatteryRange("));
}

#[test]
fn composite_implements_only_its_combination() {
    let file = items(&generate(&meter_config()).unwrap());

    let implemented: Vec<(String, String)> = file
        .items
        .iter()
        .filter_map(|item| match item {
            syn::Item::Impl(imp) => {
                let (_, path, _) = imp.trait_.as_ref()?;
                let self_ty = match imp.self_ty.as_ref() {
                    syn::Type::Path(p) => p.path.segments.last()?.ident.to_string(),
                    _ => return None,
                };
                let trait_name = path.segments.last()?.ident.to_string();
                Some((self_ty, trait_name))
            }
            _ => None,
        })
        .filter(|(_, trait_name)| trait_name != "Deref" && trait_name != "AsRef")
        .collect();

    let traits_of = |ty: &str| -> Vec<&str> {
        implemented
            .iter()
            .filter(|(self_ty, _)| self_ty == ty)
            .map(|(_, t)| t.as_str())
            .collect()
    };

    assert_eq!(traits_of("DecorateMeterBatteryRange"), vec!["BatteryRange"]);
    assert_eq!(traits_of("DecorateMeterBattery"), vec!["Battery"]);
    assert_eq!(
        traits_of("DecorateMeterBatteryBatteryRange"),
        vec!["Battery", "BatteryRange"]
    );
    assert!(traits_of("DecorateMeter").is_empty());
}

#[test]
fn accessor_arguments_are_forwarded() {
    let config = Config {
        types: vec!["api::PhaseCurrents,currents,fn(u8, f64) -> (f64, f64, f64)".into()],
        ..meter_config()
    };
    let text = generate(&config).unwrap();
    assert!(text.contains("fn currents(&self, arg0: u8, arg1: f64) -> (f64, f64, f64) {"));
    assert!(text.contains("(self.phase_currents)(arg0, arg1)"));
}

#[test]
fn overlapping_short_names_generate() {
    let config = Config {
        types: vec![
            "api::Battery,soc,fn() -> Result<f64, api::Error>".into(),
            "api::Range,range,fn() -> i64".into(),
            "api::BatteryRange,limit,fn() -> i64".into(),
        ],
        ..meter_config()
    };
    let file = items(&generate(&config).unwrap());
    let enum_variants: Vec<String> = file
        .items
        .iter()
        .find_map(|item| match item {
            syn::Item::Enum(e) => Some(e.variants.iter().map(|v| v.ident.to_string()).collect()),
            _ => None,
        })
        .unwrap();
    assert_eq!(enum_variants.len(), 8);
    assert!(enum_variants.contains(&"BatteryRange3".to_string()));
    assert!(enum_variants.contains(&"BatteryRange4".to_string()));
}

#[test]
fn keyword_capabilities_use_raw_variables() {
    let config = Config {
        types: vec!["api::Type,kind,fn() -> u8".into()],
        ..meter_config()
    };
    let text = generate(&config).unwrap();
    assert!(text.contains("r#type: Option<Box<dyn Fn() -> u8 + Send + Sync>>"), "{}", text);
    assert!(text.contains("pub fn as_type(&self) -> Option<&dyn api::Type> {"), "{}", text);
    assert!(text.contains("(self.r#type)()"));
}

#[test]
fn generic_parameter_avoids_user_types() {
    let config = Config {
        types: vec!["api::Label,label,fn() -> api::B".into(), "api::Tag,tag,fn(B) -> u8".into()],
        ..meter_config()
    };
    let text = generate(&config).unwrap();
    assert!(text.contains("pub fn decorate_meter<B0: api::Meter>("), "{}", text);
    assert!(text.contains("impl<B0> api::Label for DecorateMeterLabel<B0> {"));
    assert!(text.contains("fn tag(&self, arg0: B) -> u8 {"));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn configuration_errors() {
    let cases = [
        Config { base: String::new(), ..meter_config() },
        Config { package: String::new(), ..meter_config() },
        Config { types: Vec::new(), ..meter_config() },
        Config { types: vec!["api::Battery,soc".into()], ..meter_config() },
        Config { types: vec!["api::Battery,soc,not a type".into()], ..meter_config() },
        Config { function: "fn".into(), ..meter_config() },
    ];
    for config in cases {
        let err = generate(&config).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)), "{:?}: {}", config, err);
    }
}

#[test]
fn run_writes_and_checks_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("decorators");
    let config = Config {
        out: Some(out.clone()),
        ..meter_config()
    };

    decorate::run(&config).unwrap();
    let written = dir.path().join("decorators.rs");
    assert_eq!(Destination::file(&out), Destination::File(written.clone()));
    assert_eq!(std::fs::read_to_string(&written).unwrap(), generate(&config).unwrap());

    let check = Config { check: true, ..config };
    decorate::run(&check).unwrap();

    std::fs::write(&written, "// edited\n").unwrap();
    assert!(matches!(decorate::run(&check), Err(Error::Stale { .. })));
}
