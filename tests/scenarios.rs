//! End-to-end scenarios for relationship detection, strategy selection and
//! arrangement.

use canvas_layout::arrange::{arrange_grid, ArrangeOptions};
use canvas_layout::relationship::detect_data_relationships;
use canvas_layout::{
    detect_relationships, plan_batch, suggest_layout_strategy, BatchRequest, DataBinding,
    ElementType, LayoutConfig, LayoutPlan, PendingElement, Point, Relationship, RelationshipKind,
    Strategy,
};
use pretty_assertions::assert_eq;

fn chart(id: &str, dims: &[&str], meas: &[&str]) -> PendingElement {
    PendingElement::new(id, ElementType::Chart)
        .with_data(DataBinding::new(dims.iter().copied(), meas.iter().copied()))
}

fn kpis(n: usize) -> Vec<PendingElement> {
    (0..n)
        .map(|i| PendingElement::new(format!("k{}", i), ElementType::Kpi))
        .collect()
}

/// One line per entry: id, type, position and size
fn describe(plan: &LayoutPlan) -> String {
    plan.iter()
        .map(|e| {
            format!(
                "{} {} ({}, {}) {}x{}",
                e.element_ref, e.element_type, e.position.x, e.position.y, e.size.width, e.size.height
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_shared_dimension_is_a_data_overlap() {
    let charts = vec![
        chart("c1", &["Region"], &["Revenue"]),
        chart("c2", &["Region"], &["Cost"]),
    ];

    let relationships = detect_relationships(&charts);
    assert_eq!(
        relationships,
        vec![Relationship::new(
            "c1",
            "c2",
            RelationshipKind::DataOverlap {
                shared_dimensions: vec!["Region".to_string()],
                shared_measures: vec![],
                strength: 0.5,
            },
        )]
    );
}

#[test]
fn test_shared_columns_do_not_depend_on_order() {
    let forward = vec![
        chart("a", &["Month", "Region", "Store"], &["Revenue", "Cost"]),
        chart("b", &["Store", "Region"], &["Cost", "Units"]),
    ];
    let backward: Vec<_> = forward.iter().rev().cloned().collect();

    let shared = |rels: Vec<Relationship>| match &rels[0].kind {
        RelationshipKind::DataOverlap {
            shared_dimensions,
            shared_measures,
            ..
        } => (shared_dimensions.clone(), shared_measures.clone()),
        other => panic!("expected data overlap, got {:?}", other),
    };

    let expected = (
        vec!["Region".to_string(), "Store".to_string()],
        vec!["Cost".to_string()],
    );
    assert_eq!(shared(detect_data_relationships(&forward)), expected);
    assert_eq!(shared(detect_data_relationships(&backward)), expected);
}

#[test]
fn test_kpis_with_charts_pick_the_dashboard() {
    let mut batch = kpis(4);
    batch.push(chart("trend", &["Month"], &["Revenue"]));
    batch.push(chart("split", &["Channel"], &["Revenue"]));

    let suggestion = suggest_layout_strategy(&batch);
    assert_eq!(suggestion.strategy, Strategy::KpiDashboard);
    assert_eq!(suggestion.reason, "kpi-with-charts");
}

#[test]
fn test_grid_of_three_charts() {
    let config = LayoutConfig::default();
    let charts: Vec<_> = (1..=3)
        .map(|i| PendingElement::new(format!("c{}", i), ElementType::Chart))
        .collect();

    let plan = arrange_grid(&charts, &ArrangeOptions::new().with_cols(2), &config).unwrap();
    let positions: Vec<Point> = plan.iter().map(|e| e.position).collect();
    assert_eq!(
        positions,
        vec![
            Point::new(0.0, 0.0),
            Point::new(850.0, 0.0),
            Point::new(0.0, 450.0),
        ]
    );
}

#[test]
fn test_dashboard_batch_layout() {
    let mut batch = kpis(4);
    batch.push(PendingElement::new("chart", ElementType::Chart));
    batch.push(PendingElement::new("insight", ElementType::Textbox));

    let planned = plan_batch(&batch, &BatchRequest::default(), &LayoutConfig::default()).unwrap();
    assert_eq!(planned.strategy, Strategy::KpiDashboard);
    assert!(planned.plan.is_collision_free());

    insta::assert_snapshot!(describe(&planned.plan), @r###"
    k0 kpi (0, 0) 291x120
    k1 kpi (303, 0) 291x120
    k2 kpi (606, 0) 291x120
    k3 kpi (909, 0) 291x120
    chart chart (0, 132) 888x400
    insight textbox (900, 132) 300x400
    "###);
}

#[test]
fn test_temporal_pair_flows() {
    let batch = vec![
        chart("monthly", &["Order Date"], &["Revenue"]),
        chart("weekly", &["Week"], &["Units"]),
    ];

    let planned = plan_batch(&batch, &BatchRequest::default(), &LayoutConfig::default()).unwrap();
    assert_eq!(planned.strategy, Strategy::Flow);
    assert_eq!(planned.reason, "temporal-sequence");
    assert_eq!(planned.plan.position_of("weekly"), Some(Point::new(850.0, 0.0)));
}

#[test]
fn test_related_pair_gets_a_hero() {
    let batch = vec![
        chart("overview", &["Region", "Product"], &["Revenue"]),
        chart("detail", &["Store", "Product"], &["Revenue"]),
    ];

    let planned = plan_batch(&batch, &BatchRequest::default(), &LayoutConfig::default()).unwrap();
    assert_eq!(planned.strategy, Strategy::Hero);
    assert_eq!(planned.reason, "related-pair");
    assert_eq!(planned.groups.len(), 1);
}

#[test]
fn test_plan_batch_serializes() {
    let batch = vec![
        chart("c1", &["Region"], &["Revenue"]),
        chart("c2", &["Region"], &["Cost"]),
    ];
    let planned = plan_batch(&batch, &BatchRequest::default(), &LayoutConfig::default()).unwrap();

    let json = serde_json::to_value(&planned).unwrap();
    assert_eq!(json["strategy"], "hero");
    assert_eq!(json["relationships"][0]["type"], "data-overlap");
    assert_eq!(json["relationships"][0]["shared_dimensions"][0], "Region");
    assert_eq!(json["plan"]["entries"][1]["element_ref"], "c2");
}
