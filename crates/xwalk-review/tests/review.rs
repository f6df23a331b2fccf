use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::rc::Rc;

use xwalk_review::{FilteredRows, GridRect, ReviewSession};
use xwalk_model::{
    Candidate, CellRef, ColumnSelections, ConfirmedMatches, DEFAULT_BUCKET, MatchKey, MatchResults,
    MatchRow, Table, TableRef,
};

fn candidate(rank: usize, source_row: usize, value: &str, score: i64) -> Candidate {
    Candidate {
        score,
        value: value.to_string(),
        meta: None,
        original_index: rank,
        rank,
        source_row,
    }
}

fn ward_rows() -> Vec<MatchRow> {
    vec![
        MatchRow {
            value: "Ward 1".to_string(),
            meta: Some("Atlanta".to_string()),
            original_index: 0,
            source_row: 0,
            ranked_matches: vec![
                candidate(0, 0, "WARD 1", -10),
                candidate(1, 0, "Ward Two", -5),
            ],
        },
        MatchRow {
            value: "Ward 2".to_string(),
            meta: Some("Atlanta".to_string()),
            original_index: 1,
            source_row: 1,
            ranked_matches: vec![
                candidate(0, 1, "WARD 1", -7),
                candidate(1, 1, "Ward Two", -5),
            ],
        },
    ]
}

fn ward_session(seed: BTreeMap<String, ConfirmedMatches>) -> ReviewSession {
    let mut matches = MatchResults::new();
    matches.insert(DEFAULT_BUCKET.to_string(), ward_rows());
    ReviewSession::new(
        vec![
            Table::new("left.csv", vec!["ward".to_string()]),
            Table::new("right.csv", vec!["precinct".to_string()]),
        ],
        ColumnSelections::new(TableRef::new(0, "ward"), TableRef::new(1, "precinct")),
        matches,
        seed,
    )
}

#[test]
fn view_rows_are_renumbered_contiguously() {
    let rows = ward_rows();
    let view = FilteredRows::new(
        &rows,
        |row| row.value == "Ward 2",
        |_| true,
        |_, _| Ordering::Equal,
    );

    assert_eq!(view.len(), 1);
    let first = view.row(0).expect("surviving row");
    // View index 0 maps to the stable source row 1.
    assert_eq!(first.source.source_row, 1);
    assert!(view.row(1).is_none());
}

#[test]
fn view_rows_are_memoized() {
    let rows = ward_rows();
    let view = FilteredRows::unfiltered(&rows);

    let first = view.row(0).expect("row");
    let again = view.row(0).expect("row");
    assert!(Rc::ptr_eq(&first, &again));
}

#[test]
fn candidate_filter_and_comparator_apply_per_row() {
    let rows = ward_rows();
    // Drop "WARD 1" and sort what remains by value descending.
    let view = FilteredRows::new(
        &rows,
        |_| true,
        |cell| cell.value != "WARD 1",
        |a, b| b.value.cmp(&a.value),
    );

    let row = view.row(0).expect("row");
    assert_eq!(row.ranked.len(), 1);
    assert_eq!(row.ranked[0].value, "Ward Two");
    // Stored rank survives filtering and re-sorting.
    assert_eq!(row.ranked[0].rank, 1);
}

#[test]
fn out_of_range_access_degrades_to_none() {
    let rows = ward_rows();
    let view = FilteredRows::unfiltered(&rows);
    assert!(view.row(99).is_none());
}

#[test]
fn selections_touching_the_source_column_are_clipped() {
    let rows = ward_rows();
    let view = FilteredRows::unfiltered(&rows);

    // Starts at the source column, two cells wide: only grid column 1
    // (candidate 0) survives.
    let keys = view.resolve_selections(&[GridRect::new(0, 0, 2, 1)]);
    assert_eq!(keys, vec![MatchKey::new(0, 0)]);

    // A selection entirely inside the source column resolves nothing.
    let keys = view.resolve_selections(&[GridRect::new(0, 0, 1, 2)]);
    assert!(keys.is_empty());
}

#[test]
fn selection_resolution_uses_stored_candidate_keys() {
    let rows = ward_rows();
    // Reverse the candidate order; grid column 1 now shows rank 1.
    let view = FilteredRows::new(&rows, |_| true, |_| true, |a, b| b.rank.cmp(&a.rank));

    let keys = view.resolve_selections(&[GridRect::new(1, 0, 1, 2)]);
    assert_eq!(keys, vec![MatchKey::new(1, 0), MatchKey::new(1, 1)]);
}

#[test]
fn toggled_cells_resolve_through_the_active_view() {
    let mut session = ward_session(BTreeMap::new());

    let keys = {
        let rows = session.bucket_rows(DEFAULT_BUCKET).expect("bucket");
        let view = FilteredRows::unfiltered(rows);
        view.resolve_selections(&[GridRect::new(1, 0, 2, 2)])
    };
    session.apply_toggle(DEFAULT_BUCKET, &keys, None);

    for key in [
        MatchKey::new(0, 0),
        MatchKey::new(1, 0),
        MatchKey::new(0, 1),
        MatchKey::new(1, 1),
    ] {
        assert!(session.is_confirmed(DEFAULT_BUCKET, key));
    }
}

#[test]
fn confirmed_elsewhere_is_value_based_across_rows() {
    let mut session = ward_session(BTreeMap::new());
    // Confirm "WARD 1" on both rows.
    session.apply_toggle(
        DEFAULT_BUCKET,
        &[MatchKey::new(0, 0), MatchKey::new(0, 1)],
        Some(true),
    );

    assert!(session.confirmed_elsewhere("WARD 1"));
    assert!(!session.confirmed_elsewhere("Ward Two"));
}

#[test]
fn cell_data_carries_render_state() {
    let mut session = ward_session(BTreeMap::new());
    session.apply_toggle(DEFAULT_BUCKET, &[MatchKey::new(0, 0)], Some(true));

    let rows = session.bucket_rows(DEFAULT_BUCKET).expect("bucket").to_vec();

    let source = session.cell_data(DEFAULT_BUCKET, CellRef::Source(&rows[0]));
    assert_eq!(source.value, "Ward 1");
    assert_eq!(source.meta, Some("Atlanta"));
    assert!(source.confirmed);
    assert_eq!(source.rank, None);

    let confirmed = session.cell_data(DEFAULT_BUCKET, CellRef::Ranked(&rows[0].ranked_matches[0]));
    assert!(confirmed.confirmed);
    assert_eq!(confirmed.rank, Some(0));

    // The same value confirmed on row 0 flags row 1's candidate.
    let duplicate = session.cell_data(DEFAULT_BUCKET, CellRef::Ranked(&rows[1].ranked_matches[0]));
    assert!(!duplicate.confirmed);
    assert!(duplicate.confirmed_elsewhere);

    let unmatched = session.cell_data(DEFAULT_BUCKET, CellRef::Source(&rows[1]));
    assert!(!unmatched.confirmed);
}

#[test]
fn export_groups_by_distinct_source_record() {
    let mut session = ward_session(BTreeMap::new());
    session.apply_toggle(
        DEFAULT_BUCKET,
        &[MatchKey::new(0, 0), MatchKey::new(1, 0), MatchKey::new(1, 1)],
        Some(true),
    );

    let groups = session.export_confirmed();
    assert_eq!(groups.len(), 2);

    let ward1 = groups
        .iter()
        .find(|group| group.value == "Ward 1")
        .expect("ward 1 group");
    let values: Vec<&str> = ward1.matches.iter().map(|m| m.value.as_str()).collect();
    assert_eq!(values, vec!["WARD 1", "Ward Two"]);
    assert_eq!(ward1.bucket, DEFAULT_BUCKET);
    assert_eq!(ward1.meta.as_deref(), Some("Atlanta"));

    let ward2 = groups
        .iter()
        .find(|group| group.value == "Ward 2")
        .expect("ward 2 group");
    let values: Vec<&str> = ward2.matches.iter().map(|m| m.value.as_str()).collect();
    assert_eq!(values, vec!["Ward Two"]);
}

#[test]
fn rejected_cells_do_not_export() {
    let mut session = ward_session(BTreeMap::new());
    session.apply_toggle(DEFAULT_BUCKET, &[MatchKey::new(0, 0)], Some(true));
    session.apply_toggle(DEFAULT_BUCKET, &[MatchKey::new(1, 0)], Some(false));

    let groups = session.export_confirmed();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].matches.len(), 1);
    assert_eq!(groups[0].matches[0].value, "WARD 1");
}

#[test]
fn snapshot_restore_reverts_toggles() {
    let mut session = ward_session(BTreeMap::new());
    session.apply_toggle(DEFAULT_BUCKET, &[MatchKey::new(0, 0)], Some(true));

    let snapshot = session.snapshot();
    session.apply_toggle(DEFAULT_BUCKET, &[MatchKey::new(0, 0), MatchKey::new(1, 1)], None);
    assert!(session.is_confirmed(DEFAULT_BUCKET, MatchKey::new(1, 1)));

    session.restore(snapshot);
    assert!(session.is_confirmed(DEFAULT_BUCKET, MatchKey::new(0, 0)));
    assert!(!session.is_confirmed(DEFAULT_BUCKET, MatchKey::new(1, 1)));
}
