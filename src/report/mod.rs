use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::model::{Report, SelectionState};
use crate::views::RenderedViews;

pub mod json;
pub mod text;

use json::render_json;
use text::render_summary_text;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct FeatureLine {
    pub feature: String,
    pub value: f64,
    pub share: f64,
}

#[derive(Debug, Clone)]
pub struct SummaryData {
    pub tool_name: String,
    pub tool_version: String,
    pub report_id: String,
    pub n_observations: usize,
    pub n_features: usize,
    pub has_shap: bool,
    pub base_value_policy: String,
    pub top_features: Vec<FeatureLine>,
    pub selection: SelectionState,
    pub scatter_points: Option<usize>,
    pub waterfall: Option<(f64, f64)>,
    pub waterfall_top: Vec<(String, f64)>,
}

pub fn build_summary(report: &Report, views: &RenderedViews) -> SummaryData {
    let base_value_policy = match report.base_values.len() {
        0 => "none (waterfalls start at 0)".to_string(),
        1 => "single value broadcast to all observations".to_string(),
        n => format!("{n} per-observation values"),
    };
    SummaryData {
        tool_name: env!("CARGO_PKG_NAME").to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        report_id: report.id.clone(),
        n_observations: report.observation_count(),
        n_features: report.known_features().len(),
        has_shap: !report.shap_values.is_empty(),
        base_value_policy,
        top_features: views
            .importance
            .iter()
            .map(|bar| FeatureLine {
                feature: bar.feature.clone(),
                value: bar.value,
                share: bar.share,
            })
            .collect(),
        selection: views.selection.clone(),
        scatter_points: views.scatter.as_ref().map(|s| s.points.len()),
        waterfall: views.waterfall.as_ref().map(|w| (w.base_value, w.final_value)),
        waterfall_top: views
            .waterfall
            .as_ref()
            .map(|w| {
                w.steps
                    .iter()
                    .take(5)
                    .map(|s| (s.feature.clone(), s.contribution))
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Writes every rendered view plus the text summary into `out_dir` and
/// returns the paths written, in order.
pub fn write_reports(
    report: &Report,
    views: &RenderedViews,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, OutputError> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();

    let importance_path = out_dir.join("importance.json");
    write_text(&importance_path, &render_json(&views.importance)?)?;
    written.push(importance_path);

    if let Some(scatter) = &views.scatter {
        let path = out_dir.join("scatter.json");
        write_text(&path, &render_json(scatter)?)?;
        written.push(path);
    }

    if let Some(waterfall) = &views.waterfall {
        let path = out_dir.join("waterfall.json");
        write_text(&path, &render_json(waterfall)?)?;
        written.push(path);
    }

    let selection_path = out_dir.join("selection.json");
    write_text(&selection_path, &render_json(&views.selection)?)?;
    written.push(selection_path);

    let summary_path = out_dir.join("summary.txt");
    let summary = build_summary(report, views);
    write_text(&summary_path, &render_summary_text(&summary))?;
    written.push(summary_path);

    info!(out_dir = %out_dir.display(), files = written.len(), "wrote report views");
    Ok(written)
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

fn write_text(path: &Path, text: &str) -> std::io::Result<()> {
    fs::write(path, text)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
