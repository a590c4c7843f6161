//! Whole-pipeline smoke test: survey JSON on disk through to a scene
//! graph and a slot suggestion.

use std::io::Write;
use yardkit::placement::SlotMap;
use yardkit::{suggest, CoordinateSystem, SceneBuilder, SceneOptions, SurveyDocument, Zone};

const SURVEY_JSON: &str = r#"{
    "header": {
        "ext_min": {"x": 0.0, "y": 0.0, "z": 0.0},
        "ext_max": {"x": 400.0, "y": 200.0, "z": 0.0},
        "units_code": 6
    },
    "entities": [
        {
            "type": "polyline",
            "layer": "BOUNDARY",
            "closed": true,
            "vertices": [
                {"point": {"x": 0.0, "y": 0.0}},
                {"point": {"x": 400.0, "y": 0.0}},
                {"point": {"x": 400.0, "y": 200.0}},
                {"point": {"x": 0.0, "y": 200.0}}
            ]
        },
        {
            "type": "insert",
            "layer": "MARKS",
            "block": "CROSS",
            "position": {"x": 200.0, "y": 100.0, "z": 0.0}
        },
        {
            "type": "mtext",
            "layer": "TEXT",
            "value": "\\fArial;ZONE B\\PREEFER ROW",
            "position": {"x": 50.0, "y": 50.0, "z": 0.0},
            "height": 3.0
        }
    ],
    "blocks": {
        "CROSS": {
            "name": "CROSS",
            "entities": [
                {
                    "type": "line",
                    "layer": "MARKS",
                    "start": {"x": -1.0, "y": 0.0, "z": 0.0},
                    "end": {"x": 1.0, "y": 0.0, "z": 0.0}
                },
                {
                    "type": "line",
                    "layer": "MARKS",
                    "start": {"x": 0.0, "y": -1.0, "z": 0.0},
                    "end": {"x": 0.0, "y": 1.0, "z": 0.0}
                }
            ]
        }
    }
}"#;

#[test]
fn survey_file_builds_a_scene_and_suggests_a_slot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("terminal.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(SURVEY_JSON.as_bytes()).unwrap();

    let doc = SurveyDocument::from_json_file(&path).unwrap();
    let cs = CoordinateSystem::derive(&doc.header).unwrap();
    assert_eq!(cs.scale, 1.0);

    let scene = SceneBuilder::new().build(&doc, &cs, &SceneOptions::default());

    let boundary = scene.layer("BOUNDARY").unwrap();
    assert_eq!(boundary.lines.segment_count(), 4);
    let marks = scene.layer("MARKS").unwrap();
    assert_eq!(marks.lines.segment_count(), 2);
    assert_eq!(scene.labels.len(), 1);
    assert_eq!(scene.labels[0].text, "ZONE B\nREEFER ROW");
    assert_eq!(scene.stats.total_skipped(), 0);

    let yard = SlotMap::new();
    let suggestion = suggest(Some(Zone::B), &yard).unwrap();
    assert_eq!(suggestion.slot.zone, Zone::B);
    assert_eq!(suggestion.slot.tier, 1);
    assert_eq!(suggestion.alternatives.len(), 3);
}

#[test]
fn missing_survey_file_reports_the_path() {
    let err = SurveyDocument::from_json_file("/nonexistent/terminal.json").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/terminal.json"));
}
