//! Tests for record layouts and their JSON form

use crate::test_helpers::Peak;
use fitparams_rs::error::FitParamsError;
use fitparams_rs::fields::bounds::Bounds;
use fitparams_rs::fields::{FieldDecl, FieldKind, RecordLayout};
use fitparams_rs::record::FitRecord;
use fitparams_rs::spec::FitSpecBase;
use std::fs;

#[test]
fn test_save_and_load_file() {
    let layout = Peak::layout();
    let path = std::env::temp_dir().join(format!("fitparams_layout_{}.json", std::process::id()));

    layout.save_json(&path).unwrap();
    let loaded = RecordLayout::load_json(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(loaded, layout);
    assert_eq!(
        loaded.get("width").unwrap().kind,
        FieldKind::Bounded(Bounds::new(0.1, 10.0).unwrap())
    );
    assert_eq!(loaded.get("width").unwrap().default, Some(2.0));
}

#[test]
fn test_loaded_layout_generates_same_spec() {
    let json = Peak::layout().to_json().unwrap();
    let from_code = FitSpecBase::generate(&Peak::layout()).unwrap();
    let from_json = FitSpecBase::generate(&RecordLayout::from_json(&json).unwrap()).unwrap();
    assert_eq!(from_code, from_json);
}

#[test]
fn test_missing_file() {
    let path = std::env::temp_dir().join("fitparams_layout_does_not_exist.json");
    assert!(matches!(
        RecordLayout::load_json(&path),
        Err(FitParamsError::IoError(_))
    ));
}

#[test]
fn test_one_sided_bounds_in_json() {
    let json = r#"{
        "fields": [
            { "name": "lo", "kind": "bounded", "min": 1.0 },
            { "name": "hi", "kind": "bounded", "max": -1.0 },
            { "name": "free", "kind": "bounded" }
        ]
    }"#;
    let layout = RecordLayout::from_json(json).unwrap();

    assert_eq!(
        layout.get("lo").unwrap().kind,
        FieldKind::Bounded(Bounds::min_only(1.0))
    );
    assert_eq!(
        layout.get("hi").unwrap().kind,
        FieldKind::Bounded(Bounds::max_only(-1.0))
    );
    assert_eq!(
        layout.get("free").unwrap().kind,
        FieldKind::Bounded(Bounds::unbounded())
    );
}

#[test]
fn test_duplicate_names_in_json() {
    let json = r#"{
        "fields": [
            { "name": "a", "kind": "regular" },
            { "name": "a", "kind": "const", "value": 1.0 }
        ]
    }"#;
    match RecordLayout::from_json(json) {
        Err(FitParamsError::DuplicateField { name }) => assert_eq!(name, "a"),
        other => panic!("Expected DuplicateField error, got {:?}", other),
    }
}

#[test]
fn test_const_declaration_sets_default() {
    let decl = FieldDecl::constant("offset", 3.0);
    assert_eq!(decl.kind, FieldKind::Const(3.0));
    assert_eq!(decl.default, Some(3.0));
    assert!(!decl.kind.is_fitting());
    assert!(FieldDecl::regular("x").kind.is_fitting());
}
