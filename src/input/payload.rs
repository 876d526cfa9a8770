use std::collections::BTreeMap;

use serde::Deserialize;

use crate::model::FeatureValue;

/// Wire shape of a report payload. Every key is optional here; required
/// fields are enforced by the normalizer so the error names the field.
#[derive(Debug, Default, Deserialize)]
pub struct RawPayload {
    #[serde(default)]
    pub report_id: Option<String>,
    #[serde(default)]
    pub importance_data: Option<RawImportance>,
    #[serde(default)]
    pub shap_values: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub feature_values: Option<Vec<Vec<FeatureValue>>>,
    #[serde(default)]
    pub base_values: Option<RawBaseValues>,
    #[serde(default)]
    pub feature_encodings: Option<BTreeMap<String, BTreeMap<String, String>>>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawImportance {
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub values: Option<Vec<f64>>,
}

/// Base values arrive either per observation or as one global scalar.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawBaseValues {
    Scalar(f64),
    PerObservation(Vec<f64>),
}

impl RawBaseValues {
    pub fn into_vec(self) -> Vec<f64> {
        match self {
            RawBaseValues::Scalar(v) => vec![v],
            RawBaseValues::PerObservation(values) => values,
        }
    }
}
