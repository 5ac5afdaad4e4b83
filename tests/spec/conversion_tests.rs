//! Tests for conversions between records, field values and fitting vectors

use crate::test_helpers::{approx_eq, Mixed, Peak};
use approx::assert_relative_eq;
use fitparams_rs::error::{FitParamsError, Result};
use fitparams_rs::fields::{field_value, FieldDecl, FieldValues, RecordLayout};
use fitparams_rs::record::FitRecord;
use fitparams_rs::spec::{FitSpec, FitSpecBase};
use ndarray::{array, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::thread;

#[test]
fn test_mixed_default_instance() {
    let spec = FitSpec::<Mixed>::generate().unwrap();
    let instance = spec.create_default_instance().unwrap();

    assert_eq!(instance, Mixed { a: 0.0, b: 0.0, c: 7.0 });
}

#[test]
fn test_peak_default_instance() {
    let spec = FitSpec::<Peak>::generate().unwrap();
    let instance = spec.create_default_instance().unwrap();

    // amplitude has only a lower bound of 0, width keeps its in-bounds default
    assert_eq!(instance.amplitude, 1.0);
    assert_eq!(instance.center, 1.0);
    assert_eq!(instance.width, 2.0);
    assert_eq!(instance.height, instance.amplitude);
    assert_eq!(instance.background, 0.5);
}

#[test]
fn test_instance_to_array() {
    let spec = FitSpec::<Peak>::generate().unwrap();
    let instance = Peak {
        amplitude: 3.0,
        center: -1.0,
        width: 0.5,
        height: 3.0,
        background: 0.5,
    };

    let mut out = spec.new_array();
    spec.instance_to_array(&instance, out.as_slice_mut().unwrap())
        .unwrap();
    assert_eq!(out, array![3.0, -1.0, 0.5]);
    assert_eq!(spec.instance_to_vec(&instance).unwrap(), out);
}

#[test]
fn test_array_to_instance_fills_dependents() {
    let spec = FitSpec::<Mixed>::generate().unwrap();
    let instance = spec.array_to_instance(&[4.5]).unwrap();

    assert_eq!(instance.a, 4.5);
    assert_eq!(instance.b, 4.5);
    assert_eq!(instance.c, 7.0);
}

#[test]
fn test_round_trip_random_instances() {
    let spec = FitSpec::<Peak>::generate().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(1234);

    for _ in 0..100 {
        let amplitude = rng.gen_range(0.0..100.0);
        let instance = Peak {
            amplitude,
            center: rng.gen_range(-10.0..10.0),
            width: rng.gen_range(0.1..10.0),
            height: amplitude,
            background: 0.5,
        };

        let vector = spec.instance_to_vec(&instance).unwrap();
        let restored = spec.array_to_instance(vector.as_slice().unwrap()).unwrap();
        assert_eq!(restored, instance);
    }
}

#[test]
fn test_round_trip_derives_dependents() {
    // An inconsistent instance comes back with its same-as field re-derived
    let spec = FitSpec::<Mixed>::generate().unwrap();
    let instance = Mixed { a: 2.0, b: -9.0, c: 7.0 };

    let vector = spec.instance_to_vec(&instance).unwrap();
    let restored = spec.array_to_instance(vector.as_slice().unwrap()).unwrap();
    assert_eq!(restored, Mixed { a: 2.0, b: 2.0, c: 7.0 });
}

#[test]
fn test_shape_mismatch() {
    let spec = FitSpec::<Peak>::generate().unwrap();
    let instance = spec.create_default_instance().unwrap();

    let mut short = [0.0; 2];
    match spec.instance_to_array(&instance, &mut short) {
        Err(FitParamsError::ShapeMismatch { expected, actual }) => {
            assert_eq!(expected, 3);
            assert_eq!(actual, 2);
        }
        other => panic!("Expected ShapeMismatch error, got {:?}", other),
    }
    assert_eq!(short, [0.0; 2]);

    assert!(matches!(
        spec.array_to_instance(&[1.0, 2.0, 3.0, 4.0]),
        Err(FitParamsError::ShapeMismatch {
            expected: 3,
            actual: 4
        })
    ));
    assert!(matches!(
        spec.array_to_instance(&[]),
        Err(FitParamsError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_chained_same_as_values() {
    let layout = RecordLayout::new(vec![
        FieldDecl::same_as("c", "b"),
        FieldDecl::regular("a"),
        FieldDecl::same_as("b", "a"),
    ])
    .unwrap();
    let spec = FitSpecBase::generate(&layout).unwrap();

    let values = spec.array_to_values(&[1.25]).unwrap();
    assert_eq!(values.len(), 3);
    assert_eq!(values["a"], 1.25);
    assert_eq!(values["b"], 1.25);
    assert_eq!(values["c"], 1.25);
}

#[test]
fn test_same_as_const() {
    let layout = RecordLayout::new(vec![
        FieldDecl::constant("k", 3.0),
        FieldDecl::same_as("m", "k"),
        FieldDecl::regular("x"),
    ])
    .unwrap();
    let spec = FitSpecBase::generate(&layout).unwrap();

    assert_eq!(spec.fitting_params(), ["x"]);
    let values = spec.array_to_values(&[-2.0]).unwrap();
    assert_eq!(values["x"], -2.0);
    assert_eq!(values["k"], 3.0);
    assert_eq!(values["m"], 3.0);

    let defaults = spec.default_values().unwrap();
    assert_eq!(defaults["m"], 3.0);
}

#[test]
fn test_values_to_array() {
    let spec = FitSpecBase::generate(&RecordLayout::new(vec![
        FieldDecl::regular("a"),
        FieldDecl::constant("b", 1.0),
        FieldDecl::regular("c"),
    ])
    .unwrap())
    .unwrap();

    let mut values = FieldValues::new();
    values.insert("a".to_string(), 5.0);
    values.insert("c".to_string(), 6.0);

    let mut out = [0.0; 2];
    spec.values_to_array(&values, &mut out).unwrap();
    assert_eq!(out, [5.0, 6.0]);

    values.remove("c");
    let mut out = [0.0; 2];
    match spec.values_to_array(&values, &mut out) {
        Err(FitParamsError::MissingValue { name }) => assert_eq!(name, "c"),
        other => panic!("Expected MissingValue error, got {:?}", other),
    }
    assert_eq!(out, [0.0; 2]);
}

#[test]
fn test_arrays_to_instances() {
    let spec = FitSpec::<Peak>::generate().unwrap();
    let rows = Array2::from_shape_fn((50, 3), |(i, j)| (i * 3 + j) as f64 + 0.1);

    let instances = spec.arrays_to_instances(rows.view()).unwrap();
    assert_eq!(instances.len(), 50);
    for (i, instance) in instances.iter().enumerate() {
        assert_relative_eq!(instance.amplitude, rows[[i, 0]]);
        assert_relative_eq!(instance.center, rows[[i, 1]]);
        assert_relative_eq!(instance.width, rows[[i, 2]]);
        assert_relative_eq!(instance.height, rows[[i, 0]]);
        assert_relative_eq!(instance.background, 0.5);
    }

    let wrong = Array2::<f64>::zeros((4, 2));
    assert!(matches!(
        spec.arrays_to_instances(wrong.view()),
        Err(FitParamsError::ShapeMismatch {
            expected: 3,
            actual: 2
        })
    ));
}

#[test]
fn test_shared_between_threads() {
    let spec = FitSpec::<Peak>::generate().unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let spec = spec.clone();
            thread::spawn(move || {
                for k in 0..100 {
                    let value = (t * 100 + k) as f64;
                    let instance = spec.array_to_instance(&[value, -value, 1.0]).unwrap();
                    assert_eq!(instance.height, value);
                    let vector = spec.instance_to_vec(&instance).unwrap();
                    assert_eq!(vector.to_vec(), vec![value, -value, 1.0]);
                    assert!(spec.create_default_instance().is_ok());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_pin_shares_base() {
    let base = Arc::new(FitSpecBase::generate(&RecordLayout::new(vec![
        FieldDecl::regular("a"),
        FieldDecl::same_as("b", "a"),
        FieldDecl::constant("c", 7.0),
    ])
    .unwrap())
    .unwrap());

    let spec = FitSpec::<Mixed>::pin(Arc::clone(&base)).unwrap();
    assert!(Arc::ptr_eq(spec.base(), &base));
    assert_eq!(spec.clone().fitting_params(), ["a"]);

    let instance = spec.array_to_instance(&[0.3]).unwrap();
    assert!(approx_eq(instance.b, 0.3, 1e-12));
}

/// A record that cannot report its second field
struct Partial {
    a: f64,
}

impl FitRecord for Partial {
    fn layout() -> RecordLayout {
        RecordLayout::new(vec![FieldDecl::regular("a"), FieldDecl::regular("b")]).unwrap()
    }

    fn from_values(values: &FieldValues) -> Result<Self> {
        Ok(Self {
            a: field_value(values, "a")?,
        })
    }

    fn field_value(&self, name: &str) -> Option<f64> {
        match name {
            "a" => Some(self.a),
            _ => None,
        }
    }
}

#[test]
fn test_instance_to_array_leaves_output_on_error() {
    let spec = FitSpec::<Partial>::generate().unwrap();
    let mut out = [9.0, 9.0];

    match spec.instance_to_array(&Partial { a: 1.0 }, &mut out) {
        Err(FitParamsError::MissingValue { name }) => assert_eq!(name, "b"),
        other => panic!("Expected MissingValue error, got {:?}", other),
    }
    assert_eq!(out, [9.0, 9.0]);
}

#[test]
fn test_pin_rejects_foreign_base() {
    let peak_base = Arc::new(FitSpecBase::generate(&Peak::layout()).unwrap());
    assert!(matches!(
        FitSpec::<Mixed>::pin(peak_base),
        Err(FitParamsError::ShapeMismatch {
            expected: 3,
            actual: 5
        })
    ));

    let renamed = Arc::new(FitSpecBase::generate(&RecordLayout::new(vec![
        FieldDecl::regular("a"),
        FieldDecl::same_as("b", "a"),
        FieldDecl::constant("z", 7.0),
    ])
    .unwrap())
    .unwrap());
    match FitSpec::<Mixed>::pin(renamed) {
        Err(FitParamsError::UnknownField { name }) => assert_eq!(name, "z"),
        other => panic!("Expected UnknownField error, got {:?}", other),
    }

    let rekinded = Arc::new(FitSpecBase::generate(&RecordLayout::new(vec![
        FieldDecl::regular("a"),
        FieldDecl::regular("b"),
        FieldDecl::constant("c", 7.0),
    ])
    .unwrap())
    .unwrap());
    assert!(matches!(
        FitSpec::<Mixed>::pin(rekinded),
        Err(FitParamsError::Other(_))
    ));
}
