use serde_json::json;

use super::*;
use crate::config::ContributionOrder;
use crate::input::normalize;

fn report() -> Report {
    normalize(&json!({
        "report_id": "loans",
        "importance_data": {"features": ["age", "income", "owner"], "values": [0.2, 0.5, 0.3]},
        "feature_names": ["age", "income", "owner"],
        "shap_values": [[0.2, -0.4, 0.1], [-0.1, 0.3, 0.0], [0.05, 0.6, -0.2]],
        "feature_values": [[25, 40000, 1], [61, 85000, 0], [44, 120000, 1]],
        "base_values": [0.3],
        "feature_encodings": {"owner": {"0": "rents", "1": "owns"}}
    }))
    .unwrap()
}

#[test]
fn test_percentile_ranks() {
    let ranks = percentile_ranks(&[Some(3.0), Some(1.0), None, Some(2.0)]);
    assert_eq!(ranks, vec![Some(100.0), Some(0.0), None, Some(50.0)]);
}

#[test]
fn test_percentile_ranks_ties_and_singletons() {
    let ranks = percentile_ranks(&[Some(1.0), Some(1.0), Some(4.0)]);
    assert_eq!(ranks, vec![Some(25.0), Some(25.0), Some(100.0)]);
    assert_eq!(percentile_ranks(&[Some(7.0), None]), vec![Some(50.0), None]);
    assert!(percentile_ranks(&[]).is_empty());
}

#[test]
fn test_render_overview_has_only_importance() {
    let report = report();
    let mut cache = ViewCache::new();
    let selection = SelectionState::overview("loans");
    let views = render_selection(&report, &selection, &ViewConfig::default(), &mut cache).unwrap();
    assert_eq!(views.importance.len(), 3);
    assert!(views.scatter.is_none());
    assert!(views.waterfall.is_none());
}

#[test]
fn test_render_detail_builds_all_views() {
    let report = report();
    let mut cache = ViewCache::new();
    let selection = SelectionState {
        active_report_id: Some("loans".to_string()),
        selected_feature: Some("owner".to_string()),
        selected_observation: Some(2),
        drill_depth: DrillDepth::Detail,
    };
    let config = ViewConfig::default().with_order(ContributionOrder::Payload);
    let views = render_selection(&report, &selection, &config, &mut cache).unwrap();

    let scatter = views.scatter.unwrap();
    assert_eq!(scatter.feature, "owner");
    assert!(scatter.points[2].selected);
    assert_eq!(scatter.points[1].label.as_deref(), Some("rents"));

    let waterfall = views.waterfall.unwrap();
    assert_eq!(waterfall.observation, 2);
    assert_eq!(waterfall.steps.len(), 3);
    assert!(waterfall.steps[2].selected);
    assert_eq!(cache.report_id(), Some("loans"));
}

#[test]
fn test_render_importance_only_report_with_feature() {
    let report = normalize(&json!({
        "importance_data": {"features": ["a", "b"], "values": [0.6, 0.4]}
    }))
    .unwrap();
    let mut cache = ViewCache::new();
    let mut selection = SelectionState::overview(&report.id);
    selection.selected_feature = Some("a".to_string());
    let views = render_selection(&report, &selection, &ViewConfig::default(), &mut cache).unwrap();
    assert!(views.importance[0].selected);
    assert!(views.scatter.is_none());
}

#[test]
fn test_detail_on_feature_values_only_report_skips_waterfall() {
    let report = normalize(&json!({
        "report_id": "values-only",
        "importance_data": {"features": ["a", "b"], "values": [0.6, 0.4]},
        "feature_names": ["a", "b"],
        "feature_values": [[1, 2], [3, 4]]
    }))
    .unwrap();
    let mut coordinator = crate::selection::SelectionCoordinator::new();
    coordinator.load_report(report);
    coordinator.select_feature("b").unwrap();
    coordinator.select_observation(1).unwrap();

    let report = coordinator.active_report().unwrap();
    let mut cache = ViewCache::new();
    let views = render_selection(
        &report,
        coordinator.state(),
        &ViewConfig::default(),
        &mut cache,
    )
    .unwrap();
    assert_eq!(views.selection.drill_depth, DrillDepth::Detail);
    assert_eq!(views.selection.selected_observation, Some(1));
    assert!(views.scatter.is_none());
    assert!(views.waterfall.is_none());
    assert_eq!(views.importance.len(), 2);
}
