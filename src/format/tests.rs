//! Tests for plan import/export.

use serde_json::json;

use super::*;
use crate::config::EditorConfig;
use crate::error::ImportError;
use crate::geometry::{ImageSize, Point};
use crate::image_info::tests::png_data_uri;
use crate::model::{AreaUpdate, ElementId, MarkerStatus, MarkerUpdate};
use crate::workspace::Workspace;

const IMAGE: &str = "data:image/png;base64,AAAA";

fn sample_workspace() -> Workspace {
    let mut ws = Workspace::new(EditorConfig::default());
    let a = ws.add_marker(Point::new(10.5, 20.25)).id.clone();
    let b = ws.add_marker(Point::new(100.0, 40.0)).id.clone();
    ws.update_marker(
        &b,
        MarkerUpdate::default()
            .with_name("Exit \"B\"")
            .with_area(Some("North".into()))
            .with_status(MarkerStatus::Completed),
    )
    .unwrap();
    let link = ws.link_markers(&a, &b).unwrap().unwrap();
    ws.insert_path_point(&link, Point::new(50.0, 0.0), 1).unwrap();
    ws.add_path_point(None, Point::new(5.0, 5.0)).unwrap();

    let area = ws.add_area(Point::new(200.0, 200.0)).id.clone();
    ws.update_area(&area, AreaUpdate::radius(49.6).with_name("Hall"))
        .unwrap();
    ws
}

#[test]
fn test_export_import_roundtrip() {
    let ws = sample_workspace();
    let json = export_json(&ws, IMAGE).unwrap();
    let plan = import_json(&json, &EditorConfig::default()).unwrap();

    assert_eq!(plan.image, IMAGE);
    let restored = &plan.workspace;
    assert_eq!(
        restored.markers().collect::<Vec<_>>(),
        ws.markers().collect::<Vec<_>>()
    );
    assert_eq!(
        restored.paths().collect::<Vec<_>>(),
        ws.paths().collect::<Vec<_>>()
    );
    assert_eq!(
        restored.areas().collect::<Vec<_>>(),
        ws.areas().collect::<Vec<_>>()
    );
    assert_eq!(restored.filters(), ws.filters());
}

#[test]
fn test_snapshot_field_names() {
    let ws = sample_workspace();
    let value: serde_json::Value =
        serde_json::from_str(&export_json(&ws, IMAGE).unwrap()).unwrap();

    let marker = &value["markers"][0];
    assert_eq!(marker["position"], json!({"x": 10.5, "y": 20.25}));
    assert_eq!(marker["status"], "pending");
    assert!(marker["linkedMarkerIds"].is_array());
    assert!(marker.get("area").is_none());

    let path = &value["paths"][0];
    assert!(path["linkedMarkers"]["startId"].is_string());
    assert!(value["paths"][1].get("linkedMarkers").is_none());

    let area = &value["areas"][0];
    assert_eq!(area["radius"], 49.6);
    assert!(area["topLeft"].is_object());
    assert!(area["bottomRight"].is_object());
}

#[test]
fn test_import_rejects_malformed_plans() {
    let config = EditorConfig::default();

    let missing_image = json!({"markers": [], "paths": []}).to_string();
    assert!(matches!(
        import_json(&missing_image, &config),
        Err(ImportError::MissingImage)
    ));

    let bad_markers = json!({"image": IMAGE, "markers": {}, "paths": []}).to_string();
    assert!(matches!(
        import_json(&bad_markers, &config),
        Err(ImportError::NotASequence { field: "markers" })
    ));

    let no_paths = json!({"image": IMAGE, "markers": []}).to_string();
    assert!(matches!(
        import_json(&no_paths, &config),
        Err(ImportError::NotASequence { field: "paths" })
    ));

    let bad_entry = json!({
        "image": IMAGE,
        "markers": [{"id": "m1", "name": "A", "position": {"x": 0, "y": 0}}, {"id": "m2"}],
        "paths": [],
    })
    .to_string();
    assert!(matches!(
        import_json(&bad_entry, &config),
        Err(ImportError::InvalidEntry { field: "markers", index: 1, .. })
    ));

    assert!(matches!(
        import_json("{not json", &config),
        Err(ImportError::Json(_))
    ));
}

#[test]
fn test_import_normalizes_legacy_areas() {
    let plan = json!({
        "image": IMAGE,
        "markers": [],
        "paths": [],
        "areas": [
            {"id": 17, "name": "Box", "topLeft": {"x": 0, "y": 0}, "bottomRight": {"x": 20, "y": 10}},
            {"name": "Poly", "points": [{"x": 0, "y": 0}, {"x": 10, "y": 0}, {"x": 0, "y": 10}]},
            {"name": "Junk"},
        ],
    })
    .to_string();
    let plan = import_json(&plan, &EditorConfig::default()).unwrap();
    let areas: Vec<_> = plan.workspace.areas().collect();

    assert_eq!(areas.len(), 2);
    assert_eq!(areas[0].id, ElementId::from("17"));
    assert_eq!(areas[0].center, Point::new(10.0, 5.0));
    assert_eq!(areas[0].radius, 10.0);
    assert_eq!(areas[1].name, "Poly");
    // Radius is the farthest vertex from the centroid (10/3, 10/3): sqrt(500)/3.
    assert!((areas[1].radius - 7.4536).abs() < 1e-3);
}

#[test]
fn test_import_clamps_to_decoded_image() {
    let plan = json!({
        "image": png_data_uri(40, 30),
        "markers": [],
        "paths": [],
        "areas": [{"id": "a", "name": "A", "center": {"x": 35, "y": 5}, "radius": 10}],
    })
    .to_string();
    let plan = import_json(&plan, &EditorConfig::default()).unwrap();

    assert_eq!(plan.workspace.image_size(), Some(ImageSize::new(40, 30)));
    let area = plan.workspace.areas().next().unwrap();
    assert_eq!(area.top_left, Point::new(25.0, 0.0));
    assert_eq!(area.bottom_right, Point::new(40.0, 15.0));
}

#[test]
fn test_import_repairs_dangling_links() {
    let plan = json!({
        "image": IMAGE,
        "markers": [
            {"id": "a", "name": "A", "position": {"x": 0, "y": 0}, "status": "active", "linkedMarkerIds": ["b", "ghost"]},
            {"id": "b", "name": "B", "position": {"x": 10, "y": 0}, "status": "pending"},
        ],
        "paths": [
            {"id": "p1", "points": [{"x": 0, "y": 0}, {"x": 10, "y": 0}], "linkedMarkers": {"startId": "a", "endId": "b"}},
            {"id": "p2", "points": [{"x": 0, "y": 0}, {"x": 5, "y": 5}], "linkedMarkers": {"startId": "a", "endId": "ghost"}},
        ],
    })
    .to_string();
    let plan = import_json(&plan, &EditorConfig::default()).unwrap();
    let ws = plan.workspace;

    assert_eq!(
        ws.marker(&"a".into()).unwrap().linked_marker_ids,
        vec![ElementId::from("b")]
    );
    assert_eq!(ws.path_count(), 1);
    assert_eq!(ws.area_count(), 0);
}

#[test]
fn test_script_table_is_deterministic() {
    let ws = sample_workspace();
    let table = script_table(&ws);
    assert_eq!(table, script_table(&ws));

    let expected = "return {\n\
        \x20 markers = {\n\
        \x20   { name = \"New marker\", number = \"1\", x = 11, y = 20 },\n\
        \x20   { name = \"Exit \\\"B\\\"\", number = \"2\", area = \"North\", x = 100, y = 40 },\n\
        \x20 },\n\
        \x20 areas = {\n\
        \x20   { name = \"Hall\", number = \"1\", x = 200, y = 200, radius = 50, left = 150, top = 150, right = 250, bottom = 250 },\n\
        \x20 },\n\
        }\n";
    assert_eq!(table, expected);
}

#[test]
fn test_import_restores_links_from_paths() {
    let plan = json!({
        "image": IMAGE,
        "markers": [
            {"id": "a", "name": "A", "position": {"x": 0, "y": 0}},
            {"id": "b", "name": "B", "position": {"x": 10, "y": 0}},
        ],
        "paths": [
            {"id": "p1", "points": [{"x": 0, "y": 0}, {"x": 10, "y": 0}], "linkedMarkers": {"startId": "a", "endId": "b"}},
        ],
    })
    .to_string();
    let mut ws = import_json(&plan, &EditorConfig::default()).unwrap().workspace;

    assert_eq!(
        ws.marker(&"a".into()).unwrap().linked_marker_ids,
        vec![ElementId::from("b")]
    );
    assert_eq!(ws.link_markers(&"a".into(), &"b".into()).unwrap(), None);
    assert_eq!(ws.path_count(), 1);
}

#[test]
fn test_import_fills_marker_defaults() {
    let config = EditorConfig::default();
    let plan = json!({
        "image": IMAGE,
        "markers": [
            {"id": "a", "position": {"x": 0, "y": 0}, "number": 3, "area": 12.5},
            {"id": "b", "name": "Kept", "position": {"x": 1, "y": 1}, "number": "7", "area": null},
        ],
        "paths": [],
    })
    .to_string();
    let ws = import_json(&plan, &config).unwrap().workspace;

    let a = ws.marker(&"a".into()).unwrap();
    assert_eq!(a.name, config.default_marker_name);
    assert_eq!(a.number_tag(), Some("3"));
    assert_eq!(a.area_tag(), Some("12.5"));

    let b = ws.marker(&"b".into()).unwrap();
    assert_eq!(b.name, "Kept");
    assert_eq!(b.number_tag(), Some("7"));
    assert_eq!(b.area_tag(), None);

    let bad_tag = json!({
        "image": IMAGE,
        "markers": [{"id": "a", "position": {"x": 0, "y": 0}, "number": [1]}],
        "paths": [],
    })
    .to_string();
    assert!(matches!(
        import_json(&bad_tag, &config),
        Err(ImportError::InvalidEntry { field: "markers", index: 0, .. })
    ));
}
