use std::collections::BTreeMap;

use xwalk_model::{
    Candidate, ColumnSelections, ConfirmedMatches, DEFAULT_BUCKET, MatchKey, MatchRow, SaveFile,
    SessionState, Table, TableRef, XwalkError,
};

fn sample_session() -> SessionState {
    let mut left = Table::new("left.csv", vec!["ward".to_string()]);
    left.push_row(vec!["Ward 1".to_string()]);
    let mut right = Table::new("right.csv", vec!["precinct".to_string()]);
    right.push_row(vec!["WARD1".to_string()]);

    let row = MatchRow {
        value: "Ward 1".to_string(),
        meta: None,
        original_index: 0,
        source_row: 0,
        ranked_matches: vec![Candidate {
            score: -10,
            value: "WARD1".to_string(),
            meta: None,
            original_index: 0,
            rank: 0,
            source_row: 0,
        }],
    };

    let mut matches = BTreeMap::new();
    matches.insert(DEFAULT_BUCKET.to_string(), vec![row]);

    let mut decisions = ConfirmedMatches::new();
    decisions.set(MatchKey::new(0, 0), true);
    decisions.set(MatchKey::new(1, 0), false);
    let mut confirmed = BTreeMap::new();
    confirmed.insert(DEFAULT_BUCKET.to_string(), decisions);

    SessionState {
        tables: vec![left, right],
        selections: ColumnSelections::new(TableRef::new(0, "ward"), TableRef::new(1, "precinct")),
        matches,
        confirmed,
    }
}

#[test]
fn save_file_round_trips_exactly() {
    let session = sample_session();
    let save = SaveFile::new(session.clone());

    let json = serde_json::to_string(&save).expect("serialize save file");
    let loaded: SaveFile = serde_json::from_str(&json).expect("deserialize save file");
    let restored = loaded.into_session().expect("accept current version");

    assert_eq!(restored, session);
}

#[test]
fn match_keys_serialize_as_composite_strings() {
    let save = SaveFile::new(sample_session());
    let json = serde_json::to_string(&save).expect("serialize save file");

    assert!(json.contains("\"0,0\":true"));
    assert!(json.contains("\"1,0\":false"));
    assert!(json.contains("\"kind\":\"review_session\""));
}

#[test]
fn future_version_is_refused() {
    let save = SaveFile::new(sample_session());
    let mut value = serde_json::to_value(&save).expect("serialize save file");
    value["version"] = serde_json::json!(2);

    let loaded: SaveFile = serde_json::from_value(value).expect("envelope still parses");
    match loaded.into_session() {
        Err(XwalkError::SchemaVersion { found, expected }) => {
            assert_eq!(found, 2);
            assert_eq!(expected, 1);
        }
        other => panic!("expected schema version error, got {other:?}"),
    }
}

#[test]
fn foreign_blob_is_rejected() {
    let result: Result<SaveFile, _> =
        serde_json::from_str("{\"kind\":\"other_state\",\"version\":1}");
    assert!(result.is_err());
}
