//! The serializable reviewable-match state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, XwalkError};
use crate::grid::MatchResults;
use crate::key::ConfirmedMatches;
use crate::selections::ColumnSelections;
use crate::table::Table;

/// Bump whenever the shape of [`SessionState`] changes; saved sessions with
/// any other version are refused on load.
pub const SCHEMA_VERSION: u32 = 1;

/// Everything needed to resume a review: the table snapshot, the column
/// configuration, the ranked results, and the decisions made so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub tables: Vec<Table>,
    pub selections: ColumnSelections,
    pub matches: MatchResults,
    pub confirmed: BTreeMap<String, ConfirmedMatches>,
}

/// The tagged on-disk envelope around a session.
///
/// The `kind` tag identifies the blob as reviewable-match state; anything
/// else fails deserialization outright, and a recognized blob with the wrong
/// schema version is refused by [`SaveFile::into_session`] without touching
/// caller state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SaveFile {
    #[serde(rename = "review_session")]
    ReviewSession { version: u32, session: SessionState },
}

impl SaveFile {
    pub fn new(session: SessionState) -> Self {
        Self::ReviewSession {
            version: SCHEMA_VERSION,
            session,
        }
    }

    pub fn into_session(self) -> Result<SessionState> {
        match self {
            Self::ReviewSession { version, session } if version == SCHEMA_VERSION => Ok(session),
            Self::ReviewSession { version, .. } => Err(XwalkError::SchemaVersion {
                found: version,
                expected: SCHEMA_VERSION,
            }),
        }
    }
}
