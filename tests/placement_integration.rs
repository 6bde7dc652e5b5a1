//! Placement and analysis over snapshots as the canvas reports them

use canvas_layout::placement::{find_nearest_drawn_region, place_in_nearest_drawn_region};
use canvas_layout::spatial::has_collision;
use canvas_layout::{
    analyze_canvas, find_optimal_position, place_batch, Anchor, BatchRequest, CanvasSnapshot,
    CanvasSnapshotProvider, ElementType, LayoutConfig, LayoutError, PendingElement,
    PlacementSource, Point, Rect, Size,
};
use pretty_assertions::assert_eq;

const SNAPSHOT: &str = r#"{
    "viewport": {"x": 0, "y": 0, "w": 2000, "h": 1200},
    "elements": [
        {"id": "revenue", "type": "kpi", "x": 0, "y": 0, "w": 240, "h": 120},
        {"id": "orders", "type": "kpi", "x": 290, "y": 0, "w": 240, "h": 120},
        {"id": "trend", "type": "chart", "x": 0, "y": 170, "w": 800, "h": 400,
         "data": {"dimensions": ["Month"], "measures": ["Revenue"]}},
        {"id": "loading", "type": "chart"}
    ],
    "annotations": [
        {"id": "notes", "x": 1200, "y": 700, "width": 600, "height": 400, "text": "commentary goes here"},
        {"id": "covered", "x": 0, "y": 0, "width": 600, "height": 150}
    ]
}"#;

fn snapshot() -> CanvasSnapshot {
    serde_json::from_str(SNAPSHOT).unwrap()
}

#[test]
fn test_partial_records_are_skipped() {
    let elements = snapshot().elements().unwrap();
    let ids: Vec<&str> = elements.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["revenue", "orders", "trend"]);
}

#[test]
fn test_negative_size_is_rejected() {
    let json = r#"{"elements": [{"id": "bad", "type": "kpi", "x": 0, "y": 0, "w": -5, "h": 10}]}"#;
    let snapshot: CanvasSnapshot = serde_json::from_str(json).unwrap();
    match snapshot.elements() {
        Err(LayoutError::InvalidSize { element, .. }) => assert_eq!(element, "bad"),
        other => panic!("expected invalid size, got {:?}", other),
    }
}

#[test]
fn test_analysis_of_snapshot() {
    let config = LayoutConfig::default();
    let snapshot = snapshot();
    let elements = snapshot.elements().unwrap();

    let analysis = analyze_canvas(&elements, snapshot.viewport_bounds(), &config);
    assert_eq!(analysis.occupied_regions.len(), 3);
    assert_eq!(analysis.bounds, Rect::new(0.0, 0.0, 800.0, 570.0));
    assert_eq!(analysis.clusters.len(), 1);
    assert_eq!(analysis.clusters[0].member_ids(), vec!["revenue", "orders", "trend"]);

    // (2 * 240 * 120 + 800 * 400) / (2000 * 1200)
    let expected = (2.0 * 240.0 * 120.0 + 800.0 * 400.0) / (2000.0 * 1200.0);
    assert!((analysis.density - expected).abs() < 1e-12);

    for region in &analysis.empty_regions {
        for element in &elements {
            assert!(!region.intersects(&element.rect), "{:?} overlaps {}", region, element.id);
        }
    }

    assert_eq!(analyze_canvas(&elements, snapshot.viewport_bounds(), &config), analysis);
}

#[test]
fn test_every_anchor_finds_free_space() {
    let config = LayoutConfig::default();
    let snapshot = snapshot();
    let elements = snapshot.elements().unwrap();

    for anchor in Anchor::ALL {
        let placement =
            find_optimal_position(ElementType::Chart, anchor, &elements, &snapshot, &config);
        assert_eq!(placement.source, PlacementSource::EmptyRegion, "{}", anchor);
        assert!(
            !has_collision(placement.position, placement.size, &elements),
            "{} collides at {:?}",
            anchor,
            placement.position
        );
        let viewport = snapshot.viewport_bounds().unwrap();
        assert!(viewport.contains_point(placement.position));
    }
}

#[test]
fn test_top_left_skips_the_occupied_corner() {
    let config = LayoutConfig::default();
    let snapshot = snapshot();
    let elements = snapshot.elements().unwrap();

    let placement =
        find_optimal_position(ElementType::Kpi, Anchor::TopLeft, &elements, &snapshot, &config);
    // The strip right of the KPI row is one scan cell tall, too short for a card
    assert_eq!(placement.position, Point::new(50.0, 600.0));
}

#[test]
fn test_drop_into_drawn_region() {
    let snapshot = snapshot();
    let elements = snapshot.elements().unwrap();
    let annotations = snapshot.annotation_regions();

    let nearest = find_nearest_drawn_region(Point::new(100.0, 100.0), &annotations, &elements);
    assert_eq!(nearest.map(|r| r.id.as_str()), Some("notes"));

    let placement = place_in_nearest_drawn_region(
        Point::new(100.0, 100.0),
        Size::new(400.0, 200.0),
        &annotations,
        &elements,
    )
    .unwrap();
    assert_eq!(placement.position, Point::new(1300.0, 800.0));
    assert_eq!(placement.source, PlacementSource::DrawnRegion);
}

#[test]
fn test_batch_lands_below_existing_content() {
    let config = LayoutConfig::default();
    let elements = snapshot().elements().unwrap();
    let pending = vec![
        PendingElement::new("n1", ElementType::Chart),
        PendingElement::new("n2", ElementType::Table),
        PendingElement::new("n3", ElementType::Textbox),
    ];

    let batch = place_batch(&pending, &BatchRequest::default(), &elements, &config).unwrap();
    assert_eq!(batch.plan.position_of("n1"), Some(Point::new(0.0, 620.0)));
    for entry in batch.plan.iter() {
        assert!(!has_collision(entry.position, entry.size, &elements));
    }
}
