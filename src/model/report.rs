use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One cell of the feature-value matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FeatureValue {
    /// Numeric view used for ranking; booleans rank as 0/1, text has no rank.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(v) => Some(*v),
            FeatureValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FeatureValue::Text(_) => None,
        }
    }

    /// Key under which a categorical code is stored in a feature encoding.
    pub fn encoding_key(&self) -> String {
        match self {
            FeatureValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                format!("{}", *v as i64)
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Bool(b) => write!(f, "{b}"),
            FeatureValue::Number(v) => write!(f, "{v}"),
            FeatureValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub value: f64,
}

/// Immutable, validated snapshot of one explanation run.
///
/// Built only by [`crate::input::normalize`]; every other component assumes
/// the shape invariants hold.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: String,
    pub feature_names: Vec<String>,
    /// Importance per feature, in payload order.
    pub importance: Vec<FeatureImportance>,
    pub shap_values: Vec<Vec<f64>>,
    pub feature_values: Vec<Vec<FeatureValue>>,
    /// Empty, one global value, or one value per observation.
    pub base_values: Vec<f64>,
    pub feature_encodings: BTreeMap<String, BTreeMap<String, String>>,
}

impl Report {
    pub fn observation_count(&self) -> usize {
        if self.shap_values.is_empty() {
            self.feature_values.len()
        } else {
            self.shap_values.len()
        }
    }

    pub fn importance_of(&self, feature: &str) -> Option<f64> {
        self.importance
            .iter()
            .find(|e| e.feature == feature)
            .map(|e| e.value)
    }

    /// Features a view may select: the declared feature names, or the
    /// importance features for importance-only payloads.
    pub fn known_features(&self) -> Vec<&str> {
        if self.feature_names.is_empty() {
            self.importance.iter().map(|e| e.feature.as_str()).collect()
        } else {
            self.feature_names.iter().map(String::as_str).collect()
        }
    }

    pub fn is_known_feature(&self, feature: &str) -> bool {
        self.known_features().contains(&feature)
    }

    /// Column index of `feature` in the SHAP / feature-value matrices.
    pub fn feature_index(&self, feature: &str) -> Option<usize> {
        self.known_features().iter().position(|f| *f == feature)
    }

    pub fn column_name(&self, column: usize) -> Option<&str> {
        self.known_features().get(column).copied()
    }

    /// Base value for one observation. A single stored value is broadcast to
    /// every observation; a report without base values starts at zero.
    pub fn base_value(&self, observation: usize) -> f64 {
        match self.base_values.len() {
            0 => 0.0,
            1 => self.base_values[0],
            _ => self.base_values.get(observation).copied().unwrap_or(0.0),
        }
    }

    pub fn shap_row(&self, observation: usize) -> Option<&[f64]> {
        self.shap_values.get(observation).map(Vec::as_slice)
    }

    pub fn feature_value(&self, observation: usize, column: usize) -> Option<&FeatureValue> {
        self.feature_values.get(observation)?.get(column)
    }

    /// Human-readable rendering of a feature value, decoding categorical
    /// codes through the report's feature encodings.
    pub fn display_value(&self, feature: &str, value: &FeatureValue) -> String {
        self.feature_encodings
            .get(feature)
            .and_then(|codes| codes.get(&value.encoding_key()))
            .cloned()
            .unwrap_or_else(|| value.to_string())
    }
}
