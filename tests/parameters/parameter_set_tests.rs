use peakfit_rs::parameters::{Override, Parameter, ParameterError, ParameterSet, SerializationError};
use std::f64::INFINITY;
use std::path::PathBuf;

fn peak_params() -> ParameterSet {
    let mut params = ParameterSet::new();
    params.add_param("amp", 5.0).unwrap();
    params.add_param_with_bounds("cen", 2.0, 1.3, INFINITY).unwrap();
    params.add(Parameter::fixed("wid", 4.0)).unwrap();
    params
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("peakfit_rs_{}_{}.json", name, std::process::id()))
}

#[test]
fn test_order_and_lookup() {
    let mut params = peak_params();
    assert_eq!(params.names(), vec!["amp", "cen", "wid"]);
    assert_eq!(params.varying().len(), 2);
    assert_eq!(params.fixed().len(), 1);

    let removed = params.remove("amp").unwrap();
    assert_eq!(removed.value(), 5.0);
    assert_eq!(params.names(), vec!["cen", "wid"]);
    assert_eq!(params.get("wid").unwrap().value(), 4.0);

    assert!(matches!(
        params.add_param("cen", 0.0),
        Err(ParameterError::DuplicateParameter { .. })
    ));
}

#[test]
fn test_merge_overrides() {
    let defaults = peak_params();
    let overrides = vec![
        ("amp".to_string(), Override::from(7.0)),
        ("cen".to_string(), Override::from(0.5)),
        ("wid".to_string(), Override::from(Parameter::new("anything", 3.0))),
    ];

    let merged = ParameterSet::merge_overrides(&defaults, &overrides).unwrap();

    assert_eq!(merged.get("amp").unwrap().value(), 7.0);
    // bare values keep bounds and are clamped
    assert_eq!(merged.get("cen").unwrap().value(), 1.3);
    assert_eq!(merged.get("cen").unwrap().min(), 1.3);
    // a full spec replaces the entry, name included
    let wid = merged.get("wid").unwrap();
    assert_eq!(wid.name(), "wid");
    assert!(wid.vary());

    // the defaults are not modified
    assert_eq!(defaults.get("amp").unwrap().value(), 5.0);
}

#[test]
fn test_merge_overrides_unknown_name() {
    let defaults = peak_params();
    let overrides = vec![("sigma".to_string(), Override::Value(1.0))];

    let err = ParameterSet::merge_overrides(&defaults, &overrides).unwrap_err();
    assert_eq!(
        err,
        ParameterError::UnknownParameter {
            name: "sigma".to_string()
        }
    );
}

#[test]
fn test_merge_parameter_set() {
    let mut params = peak_params();
    let mut update = ParameterSet::new();
    update.add(Parameter::fixed("cen", 1.0)).unwrap();
    params.merge(&update).unwrap();

    assert!(!params.get("cen").unwrap().vary());
    assert_eq!(params.names(), vec!["amp", "cen", "wid"]);

    let mut unknown = ParameterSet::new();
    unknown.add_param("sigma", 1.0).unwrap();
    assert!(params.merge(&unknown).is_err());
}

#[test]
fn test_json_file_round_trip() {
    let params = peak_params();
    let path = temp_path("round_trip");

    params.save_json(&path).unwrap();
    let loaded = ParameterSet::load_json(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, params);
    assert_eq!(loaded.get("cen").unwrap().max(), INFINITY);
}

#[test]
fn test_load_missing_file() {
    let err = ParameterSet::load_json(temp_path("does_not_exist")).unwrap_err();
    assert!(matches!(err, SerializationError::Io(_)));
}

#[test]
fn test_from_json_rejects_bad_data() {
    let duplicate = r#"[
        {"name": "amp", "value": 1.0, "vary": true, "bounds": {"min": null, "max": null}},
        {"name": "amp", "value": 2.0, "vary": true, "bounds": {"min": null, "max": null}}
    ]"#;
    assert!(matches!(
        ParameterSet::from_json(duplicate),
        Err(SerializationError::Json(_))
    ));

    let inverted = r#"[
        {"name": "amp", "value": 1.0, "vary": true, "bounds": {"min": 2.0, "max": 0.0}}
    ]"#;
    assert!(ParameterSet::from_json(inverted).is_err());

    assert!(ParameterSet::from_json("not json").is_err());
}

#[test]
fn test_from_json_clamps_stored_values() {
    let json = r#"[
        {"name": "cen", "value": 0.5, "vary": true, "bounds": {"min": 1.3, "max": null}},
        {"name": "wid", "value": null, "vary": true, "bounds": {"min": 0.0, "max": null}}
    ]"#;

    let params = ParameterSet::from_json(json).unwrap();
    assert_eq!(params.get("cen").unwrap().value(), 1.3);
    assert!(!params.get("wid").unwrap().has_value());
}
