use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::json;

use super::*;
use crate::model::FeatureValue;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("shapview_input_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn full_payload() -> serde_json::Value {
    json!({
        "report_id": "run-42",
        "importance_data": {"features": ["age", "income", "owner"], "values": [0.5, 0.3, 0.2]},
        "feature_names": ["age", "income", "owner"],
        "shap_values": [[0.2, -0.1, 0.05], [-0.3, 0.4, 0.0]],
        "feature_values": [[31, 52000.5, true], [58, 18000, false]],
        "base_values": [0.4, 0.4],
        "feature_encodings": {"owner": {"0": "rents", "1": "owns"}}
    })
}

#[test]
fn test_importance_only_payload() {
    let report = normalize(&json!({
        "importance_data": {"features": ["a", "b"], "values": [0.6, 0.4]}
    }))
    .unwrap();
    assert_eq!(report.importance_of("a"), Some(0.6));
    assert_eq!(report.importance_of("b"), Some(0.4));
    assert!(report.shap_values.is_empty());
    assert!(report.feature_values.is_empty());
    assert!(report.base_values.is_empty());
    assert!(report.feature_encodings.is_empty());
    assert!(report.feature_names.is_empty());
    assert_eq!(report.observation_count(), 0);
    assert_eq!(report.known_features(), vec!["a", "b"]);
}

#[test]
fn test_importance_length_mismatch_is_malformed() {
    let err = normalize(&json!({
        "importance_data": {"features": ["a"], "values": [1, 2]}
    }))
    .unwrap_err();
    assert!(matches!(err, ReportError::Malformed(_)));
}

#[test]
fn test_missing_importance_fields_are_malformed() {
    for raw in [
        json!({}),
        json!({"importance_data": {"values": [1.0]}}),
        json!({"importance_data": {"features": ["a"]}}),
        json!([1, 2, 3]),
    ] {
        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, ReportError::Malformed(_)), "{raw}");
    }
}

#[test]
fn test_ill_typed_field_is_malformed() {
    let err = normalize(&json!({
        "importance_data": {"features": ["a"], "values": [1.0]},
        "shap_values": [["x"]]
    }))
    .unwrap_err();
    assert!(matches!(err, ReportError::Malformed(_)));
}

#[test]
fn test_duplicate_feature_names_are_malformed() {
    let err = normalize(&json!({
        "importance_data": {"features": ["a", "b"], "values": [1.0, 2.0]},
        "feature_names": ["a", "a"]
    }))
    .unwrap_err();
    assert!(matches!(err, ReportError::Malformed(_)));
}

#[test]
fn test_shap_row_width_mismatch() {
    let err = normalize(&json!({
        "importance_data": {"features": ["a", "b"], "values": [1.0, 2.0]},
        "feature_names": ["a", "b"],
        "shap_values": [[0.1, 0.2], [0.1]]
    }))
    .unwrap_err();
    match err {
        ReportError::ShapeMismatch { field, .. } => assert_eq!(field, "shap_values"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_feature_value_row_width_mismatch() {
    let err = normalize(&json!({
        "importance_data": {"features": ["a", "b"], "values": [1.0, 2.0]},
        "feature_names": ["a", "b"],
        "feature_values": [[1, 2, 3]]
    }))
    .unwrap_err();
    assert!(matches!(
        err,
        ReportError::ShapeMismatch {
            field: "feature_values",
            ..
        }
    ));
}

#[test]
fn test_ragged_rows_without_feature_names() {
    let err = normalize(&json!({
        "importance_data": {"features": ["a", "b"], "values": [1.0, 2.0]},
        "shap_values": [[0.1, 0.2], [0.1, 0.2, 0.3]]
    }))
    .unwrap_err();
    assert!(matches!(err, ReportError::ShapeMismatch { .. }));
}

#[test]
fn test_rows_must_match_importance_features_without_feature_names() {
    for rows in [json!([[0.1, 0.2], [0.3, 0.4]]), json!([[0.1, 0.2, 0.3, 0.4]])] {
        let err = normalize(&json!({
            "importance_data": {"features": ["a", "b", "c"], "values": [1.0, 2.0, 3.0]},
            "shap_values": rows
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            ReportError::ShapeMismatch {
                field: "shap_values",
                ..
            }
        ));
    }

    let err = normalize(&json!({
        "importance_data": {"features": ["a", "b"], "values": [1.0, 2.0]},
        "feature_values": [[1]]
    }))
    .unwrap_err();
    assert!(matches!(
        err,
        ReportError::ShapeMismatch {
            field: "feature_values",
            ..
        }
    ));

    let report = normalize(&json!({
        "importance_data": {"features": ["a", "b"], "values": [1.0, 2.0]},
        "shap_values": [[0.1, 0.2]]
    }))
    .unwrap();
    assert_eq!(report.feature_index("b"), Some(1));
}

#[test]
fn test_observation_count_mismatch() {
    let err = normalize(&json!({
        "importance_data": {"features": ["a"], "values": [1.0]},
        "feature_names": ["a"],
        "shap_values": [[0.1], [0.2]],
        "feature_values": [[1]]
    }))
    .unwrap_err();
    assert!(matches!(err, ReportError::ShapeMismatch { .. }));
}

#[test]
fn test_base_values_length_rules() {
    let base = |base: serde_json::Value| {
        normalize(&json!({
            "importance_data": {"features": ["a"], "values": [1.0]},
            "feature_names": ["a"],
            "shap_values": [[0.1], [0.2], [0.3]],
            "base_values": base
        }))
    };
    assert!(base(json!([])).is_ok());
    assert!(base(json!([0.5])).is_ok());
    assert!(base(json!([0.1, 0.2, 0.3])).is_ok());
    assert!(matches!(
        base(json!([0.1, 0.2])).unwrap_err(),
        ReportError::ShapeMismatch {
            field: "base_values",
            ..
        }
    ));
}

#[test]
fn test_scalar_base_value_is_broadcast() {
    let report = normalize(&json!({
        "importance_data": {"features": ["a"], "values": [1.0]},
        "shap_values": [[0.1], [0.2], [0.3]],
        "base_values": 2.5
    }))
    .unwrap();
    assert_eq!(report.base_values, vec![2.5]);
    for obs in 0..3 {
        assert_eq!(report.base_value(obs), 2.5);
    }
}

#[test]
fn test_full_payload_normalizes() {
    let report = normalize(&full_payload()).unwrap();
    assert_eq!(report.id, "run-42");
    assert_eq!(report.observation_count(), 2);
    assert_eq!(report.feature_index("income"), Some(1));
    assert_eq!(report.base_value(1), 0.4);
    assert_eq!(report.shap_row(1), Some(&[-0.3, 0.4, 0.0][..]));
    assert_eq!(report.feature_value(0, 2), Some(&FeatureValue::Bool(true)));
    assert_eq!(
        report.feature_value(1, 1),
        Some(&FeatureValue::Number(18000.0))
    );
}

#[test]
fn test_display_value_decodes_encodings() {
    let report = normalize(&json!({
        "importance_data": {"features": ["plan"], "values": [1.0]},
        "feature_names": ["plan"],
        "feature_values": [[1], [2], ["3"]],
        "feature_encodings": {"plan": {"1": "basic", "2": "premium"}}
    }))
    .unwrap();
    let value = |obs: usize| report.feature_value(obs, 0).unwrap().clone();
    assert_eq!(report.display_value("plan", &value(0)), "basic");
    assert_eq!(report.display_value("plan", &value(1)), "premium");
    assert_eq!(report.display_value("plan", &value(2)), "3");
    assert_eq!(
        report.display_value("other", &FeatureValue::Number(1.5)),
        "1.5"
    );
}

#[test]
fn test_content_id_is_stable() {
    let raw = json!({"importance_data": {"features": ["a"], "values": [1.0]}});
    let a = normalize(&raw).unwrap();
    let b = normalize(&raw).unwrap();
    assert_eq!(a.id, b.id);
    assert_eq!(a.id.len(), 16);

    let other = normalize(&json!({"importance_data": {"features": ["b"], "values": [1.0]}}))
        .unwrap();
    assert_ne!(a.id, other.id);
}

#[test]
fn test_parse_report_rejects_invalid_json() {
    let err = parse_report("{not json").unwrap_err();
    assert!(matches!(err, ReportError::Malformed(_)));
}

#[test]
fn test_load_report_plain_and_gz() {
    let dir = make_temp_dir();
    let text = full_payload().to_string();

    let plain = dir.join("report.json");
    fs::write(&plain, &text).unwrap();

    let gz = dir.join("report.json.gz");
    let mut encoder = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap();

    let a = load_report(&plain).unwrap();
    let b = load_report(&gz).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.id, "run-42");
}

#[test]
fn test_load_report_missing_file_is_io() {
    let dir = make_temp_dir();
    let err = load_report(&dir.join("absent.json")).unwrap_err();
    assert!(matches!(err, ReportError::Io(_)));
}
