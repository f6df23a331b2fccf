use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Bucket key used when no join columns are configured.
pub const DEFAULT_BUCKET: &str = "default";

/// A single value extracted from a table column, paired with its optional
/// display metadata and its row position in the source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub value: String,
    pub meta: Option<String>,
    pub original_index: usize,
}

/// One ranked target record proposed as a match for a source record.
///
/// `rank` is the candidate's 0-based position after sorting all candidates
/// for its source row (lower score = better). `source_row` points back at the
/// owning row's position within its bucket; candidates are looked up by
/// `(rank, source_row)` independent of their row context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub score: i64,
    pub value: String,
    pub meta: Option<String>,
    pub original_index: usize,
    pub rank: usize,
    pub source_row: usize,
}

/// One source record with its full candidate ranking, ascending by score.
/// Ties keep the original target order (stable sort).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRow {
    pub value: String,
    pub meta: Option<String>,
    pub original_index: usize,
    pub source_row: usize,
    pub ranked_matches: Vec<Candidate>,
}

impl MatchRow {
    pub fn top_candidate(&self) -> Option<&Candidate> {
        self.ranked_matches.first()
    }
}

/// Ranked match rows grouped by bucket key.
pub type MatchResults = BTreeMap<String, Vec<MatchRow>>;

/// A grid cell resolved to its underlying data, discriminated at
/// construction rather than sniffed structurally at use sites.
#[derive(Debug, Clone, Copy)]
pub enum CellRef<'a> {
    Source(&'a MatchRow),
    Ranked(&'a Candidate),
}

impl<'a> CellRef<'a> {
    pub fn value(&self) -> &'a str {
        match *self {
            Self::Source(row) => &row.value,
            Self::Ranked(candidate) => &candidate.value,
        }
    }

    pub fn meta(&self) -> Option<&'a str> {
        match *self {
            Self::Source(row) => row.meta.as_deref(),
            Self::Ranked(candidate) => candidate.meta.as_deref(),
        }
    }
}
