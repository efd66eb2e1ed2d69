use std::io::Write;

use super::*;

const SAMPLE: &str = r#"
candidates:
  - id: 6f1c1c1e-8d3a-4d6b-9a57-0d3f3a0a0001
    kind: event
    title: Opération Forêt Noire
    location_label: Fontainebleau
    coordinate: { lon: 2.7012, lat: 48.4047 }
    category: woodland
    sub_region: "77"
    country: france
    occurs_on: 2025-05-10
    capacity: 120
    price: "25.00"
  - id: 6f1c1c1e-8d3a-4d6b-9a57-0d3f3a0a0002
    kind: store
    title: Airsoft Lyon Shop
    coordinate: { lon: 4.8357, lat: 45.7640 }
    category: shop
    sub_region: "69"
    country: france
"#;

fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
fn loads_yaml_candidates() {
    let file = write_temp(SAMPLE);
    let loaded = load_candidates(file.path()).expect("sample should load");

    assert_eq!(loaded.candidates.len(), 2);
    let event = &loaded.candidates[0];
    assert_eq!(event.kind, CandidateKind::Event);
    assert_eq!(event.location_label.as_deref(), Some("Fontainebleau"));
    assert_eq!(event.date_label().as_deref(), Some("2025-05-10"));
    assert_eq!(event.capacity, Some(120));
    assert_eq!(event.price, Some(Decimal::new(2500, 2)));

    let store = &loaded.candidates[1];
    assert_eq!(store.kind, CandidateKind::Store);
    assert!(store.location_label.is_none());
    assert!(store.occurs_on.is_none());
}

#[test]
fn loads_json_candidates() {
    let json = serde_json::json!({
        "candidates": [{
            "id": "6f1c1c1e-8d3a-4d6b-9a57-0d3f3a0a0003",
            "kind": "event",
            "title": "CQB Night",
            "coordinate": { "lon": 4.35, "lat": 50.85 },
            "category": "cqb",
            "sub_region": "BRU",
            "country": "belgique"
        }]
    });
    let file = write_temp(&json.to_string());
    let loaded = load_candidates(file.path()).expect("json should load");
    assert_eq!(loaded.candidates[0].title, "CQB Night");
}

#[test]
fn file_source_fetches_all() {
    let file = write_temp(SAMPLE);
    let source = FileCandidateSource::new(file.path());
    assert_eq!(source.fetch_all().unwrap().len(), 2);
}

#[test]
fn missing_file_is_io_error() {
    let err = load_candidates(Path::new("/nonexistent/candidates.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::CandidatesFileIo { .. }));
}

#[test]
fn malformed_yaml_is_parse_error() {
    let file = write_temp("candidates: [ { id: nope } ]");
    let err = load_candidates(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::CandidatesFileParse(_)));
}

#[test]
fn duplicate_ids_fail_validation() {
    let doubled = SAMPLE.replace("0d3f3a0a0002", "0d3f3a0a0001");
    let file = write_temp(&doubled);
    let err = load_candidates(file.path()).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate")),
        "got {err:?}"
    );
}

#[test]
fn out_of_range_coordinate_fails_validation() {
    let bad = SAMPLE.replace("lat: 45.7640", "lat: 145.7640");
    let file = write_temp(&bad);
    let err = load_candidates(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)), "got {err:?}");
}

#[test]
fn empty_title_fails_validation() {
    let bad = SAMPLE.replace("title: Airsoft Lyon Shop", "title: \"  \"");
    let file = write_temp(&bad);
    let err = load_candidates(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)), "got {err:?}");
}

#[test]
fn detail_path_depends_on_kind() {
    let file = write_temp(SAMPLE);
    let loaded = load_candidates(file.path()).unwrap();
    assert_eq!(
        loaded.candidates[0].detail_path(),
        "/events/6f1c1c1e-8d3a-4d6b-9a57-0d3f3a0a0001"
    );
    assert_eq!(
        loaded.candidates[1].detail_path(),
        "/stores/6f1c1c1e-8d3a-4d6b-9a57-0d3f3a0a0002"
    );
}
