//! The review session: ranked results plus the decisions made over them.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use xwalk_model::{
    Candidate, CellRef, ColumnSelections, ConfirmedMatches, MatchKey, MatchResults, MatchRow,
    SaveFile, SessionState, Table,
};

use crate::board::ReviewBoard;

/// One matching run under review: the immutable ranked results, the table
/// snapshot and column configuration they came from, and the mutable
/// decision board.
#[derive(Debug)]
pub struct ReviewSession {
    tables: Vec<Table>,
    selections: ColumnSelections,
    matches: MatchResults,
    board: ReviewBoard,
}

impl ReviewSession {
    pub fn new(
        tables: Vec<Table>,
        selections: ColumnSelections,
        matches: MatchResults,
        seed: BTreeMap<String, ConfirmedMatches>,
    ) -> Self {
        Self {
            tables,
            selections,
            matches,
            board: ReviewBoard::from_seed(seed),
        }
    }

    pub fn from_state(state: SessionState) -> Self {
        Self::new(state.tables, state.selections, state.matches, state.confirmed)
    }

    pub fn to_state(&self) -> SessionState {
        SessionState {
            tables: self.tables.clone(),
            selections: self.selections.clone(),
            matches: self.matches.clone(),
            confirmed: self.board.to_state(),
        }
    }

    pub fn to_save_file(&self) -> SaveFile {
        SaveFile::new(self.to_state())
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn selections(&self) -> &ColumnSelections {
        &self.selections
    }

    pub fn matches(&self) -> &MatchResults {
        &self.matches
    }

    pub fn bucket_rows(&self, bucket: &str) -> Option<&[MatchRow]> {
        self.matches.get(bucket).map(Vec::as_slice)
    }

    pub fn board(&self) -> &ReviewBoard {
        &self.board
    }

    /// Applies one atomic toggle to resolved cells. Callers resolve grid
    /// selections through the active [`crate::view::FilteredRows`] first.
    pub fn apply_toggle(&mut self, bucket: &str, cells: &[MatchKey], force: Option<bool>) {
        self.board.toggle(bucket, cells, force);
    }

    pub fn is_confirmed(&self, bucket: &str, key: MatchKey) -> bool {
        self.board.is_confirmed(bucket, key)
    }

    /// Whether a source row has at least one confirmed candidate.
    pub fn row_has_match(&self, bucket: &str, source_row: usize) -> bool {
        self.board
            .bucket(bucket)
            .is_some_and(|matches| matches.confirmed_keys().any(|key| key.row == source_row))
    }

    pub fn matched_row_count(&self, bucket: &str) -> usize {
        let Some(rows) = self.bucket_rows(bucket) else {
            return 0;
        };
        rows.iter()
            .filter(|row| self.row_has_match(bucket, row.source_row))
            .count()
    }

    /// A point-in-time snapshot of the decision board for external
    /// undo/redo. Restoring never touches the ranked results.
    pub fn snapshot(&self) -> ReviewBoard {
        self.board.snapshot()
    }

    pub fn restore(&mut self, snapshot: ReviewBoard) {
        self.board.restore(snapshot);
    }

    /// The value texts of every confirmed candidate across all buckets.
    pub fn confirmed_values(&self) -> BTreeSet<&str> {
        let mut values = BTreeSet::new();
        for (bucket, matches) in self.board.iter() {
            for key in matches.confirmed_keys() {
                if let Some(candidate) = self.candidate_at(bucket, key) {
                    values.insert(candidate.value.as_str());
                }
            }
        }
        values
    }

    /// Whether any confirmed candidate anywhere shares this value text.
    /// Cross-bucket and value-based, used to flag ambiguous duplicate
    /// confirmations.
    pub fn confirmed_elsewhere(&self, value: &str) -> bool {
        self.confirmed_values().contains(value)
    }

    /// Everything a presentation layer needs to render one cell.
    pub fn cell_data<'a>(&'a self, bucket: &str, cell: CellRef<'a>) -> CellData<'a> {
        match cell {
            CellRef::Source(row) => CellData {
                value: &row.value,
                meta: row.meta.as_deref(),
                confirmed: self.row_has_match(bucket, row.source_row),
                confirmed_elsewhere: false,
                rank: None,
            },
            CellRef::Ranked(candidate) => {
                let key = MatchKey::new(candidate.rank, candidate.source_row);
                CellData {
                    value: &candidate.value,
                    meta: candidate.meta.as_deref(),
                    confirmed: self.is_confirmed(bucket, key),
                    confirmed_elsewhere: self.confirmed_elsewhere(&candidate.value),
                    rank: Some(candidate.rank),
                }
            }
        }
    }

    /// The confirmed crosswalk: every confirmed pairing across all buckets,
    /// grouped by distinct source record with its confirmed candidates
    /// aggregated. A derived projection, recomputed on demand.
    pub fn export_confirmed(&self) -> Vec<ConfirmedGroup> {
        let mut groups: Vec<ConfirmedGroup> = Vec::new();
        for (bucket, rows) in &self.matches {
            let Some(confirmed) = self.board.bucket(bucket) else {
                continue;
            };
            let bucket_start = groups.len();
            for key in confirmed.confirmed_keys() {
                let Some(row) = rows.get(key.row) else {
                    continue;
                };
                let Some(candidate) = row.ranked_matches.get(key.rank) else {
                    continue;
                };
                let target = ConfirmedTarget {
                    value: candidate.value.clone(),
                    meta: candidate.meta.clone(),
                };
                let existing = groups[bucket_start..]
                    .iter_mut()
                    .find(|group| group.value == row.value && group.meta == row.meta);
                match existing {
                    Some(group) => group.matches.push(target),
                    None => groups.push(ConfirmedGroup {
                        bucket: bucket.clone(),
                        value: row.value.clone(),
                        meta: row.meta.clone(),
                        matches: vec![target],
                    }),
                }
            }
        }
        debug!(groups = groups.len(), "exported confirmed matches");
        groups
    }

    fn candidate_at(&self, bucket: &str, key: MatchKey) -> Option<&Candidate> {
        self.matches
            .get(bucket)?
            .get(key.row)?
            .ranked_matches
            .get(key.rank)
    }
}

/// Render data for one grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellData<'a> {
    pub value: &'a str,
    pub meta: Option<&'a str>,
    pub confirmed: bool,
    pub confirmed_elsewhere: bool,
    pub rank: Option<usize>,
}

/// One distinct confirmed source record with its confirmed candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmedGroup {
    pub bucket: String,
    pub value: String,
    pub meta: Option<String>,
    pub matches: Vec<ConfirmedTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmedTarget {
    pub value: String,
    pub meta: Option<String>,
}
