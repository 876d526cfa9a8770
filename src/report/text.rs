use crate::model::DrillDepth;
use crate::report::{SummaryData, format_f64_6};

pub fn render_summary_text(data: &SummaryData) -> String {
    let mut out = String::new();

    out.push_str("Model Explanation Summary\n");
    out.push_str("=========================\n\n");
    out.push_str(&format!("Tool: {} {}\n", data.tool_name, data.tool_version));
    out.push_str(&format!("Report id: {}\n\n", data.report_id));

    out.push_str("1. Report contents\n");
    out.push_str(&format!("Observations: {}\n", data.n_observations));
    out.push_str(&format!("Features: {}\n", data.n_features));
    out.push_str(&format!(
        "SHAP values: {}\n",
        if data.has_shap { "present" } else { "absent (importance only)" }
    ));
    out.push_str(&format!("Base values: {}\n\n", data.base_value_policy));

    out.push_str("2. Feature importance\n");
    if data.top_features.is_empty() {
        out.push_str("No importance values.\n");
    }
    for (rank, line) in data.top_features.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {} value={} share={}\n",
            rank + 1,
            line.feature,
            format_f64_6(line.value),
            format_f64_6(line.share)
        ));
    }
    out.push('\n');

    out.push_str("3. Selection\n");
    out.push_str(&format!(
        "Depth: {}\n",
        match data.selection.drill_depth {
            DrillDepth::Overview => "overview",
            DrillDepth::Detail => "detail",
        }
    ));
    out.push_str(&format!(
        "Feature: {}\n",
        data.selection.selected_feature.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!(
        "Observation: {}\n",
        data.selection
            .selected_observation
            .map(|i| i.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    if let Some(points) = data.scatter_points {
        out.push_str(&format!("Scatter points: {}\n", points));
    }
    if let Some((base, fin)) = data.waterfall {
        out.push_str(&format!(
            "Waterfall: base={} final={}\n",
            format_f64_6(base),
            format_f64_6(fin)
        ));
        if !data.waterfall_top.is_empty() {
            let top = data
                .waterfall_top
                .iter()
                .map(|(feature, c)| format!("{}({:+.6})", feature, c))
                .collect::<Vec<_>>();
            out.push_str(&format!("Top contributions: {}\n", top.join(", ")));
        }
    }

    out
}
