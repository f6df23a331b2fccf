use serde::{Deserialize, Serialize};

/// A column in one of the uploaded tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub table: usize,
    pub column: String,
}

impl TableRef {
    pub fn new(table: usize, column: impl Into<String>) -> Self {
        Self {
            table,
            column: column.into(),
        }
    }
}

/// Join columns come in pairs; selecting only one side is rejected before
/// ranking starts, so the pairing is encoded in the type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinColumns {
    pub left: TableRef,
    pub right: TableRef,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaColumns {
    pub left: Option<TableRef>,
    pub right: Option<TableRef>,
}

/// The column configuration for one matching run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSelections {
    pub left: TableRef,
    pub right: TableRef,
    pub join: Option<JoinColumns>,
    pub meta: MetaColumns,
}

impl ColumnSelections {
    pub fn new(left: TableRef, right: TableRef) -> Self {
        Self {
            left,
            right,
            join: None,
            meta: MetaColumns::default(),
        }
    }
}
