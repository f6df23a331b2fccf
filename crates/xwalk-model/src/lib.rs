pub mod error;
pub mod grid;
pub mod key;
pub mod selections;
pub mod session;
pub mod table;

pub use error::{Result, XwalkError};
pub use grid::{Candidate, CellRef, DEFAULT_BUCKET, MatchResults, MatchRow, Record};
pub use key::{ConfirmedMatches, MatchKey};
pub use selections::{ColumnSelections, JoinColumns, MetaColumns, TableRef};
pub use session::{SCHEMA_VERSION, SaveFile, SessionState};
pub use table::Table;
