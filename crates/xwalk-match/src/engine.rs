//! The incremental ranking engine.
//!
//! Ranking proceeds bucket by bucket, row by row; one row of scoring is one
//! unit of work. The engine is pull-based: the consumer calls [`Ranker::step`]
//! (or the [`Ranker::run`] driver) and receives progress events between
//! units, keeping the host responsive without threads and keeping scoring
//! order deterministic. A run owns a [`CancelToken`]; each unit checks the
//! token before publishing, so a cancelled run emits nothing further and a
//! superseded run can never observe a newer configuration.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use xwalk_model::{
    Candidate, ColumnSelections, MatchResults, MatchRow, Record, Result, Table, TableRef,
    XwalkError,
};

use crate::partition::{BucketInput, SideInput, partition};
use crate::score::part_distance;

/// Cancels an in-flight ranking run. Clones share the same flag, so the
/// consumer keeps one clone and hands the other to the run. Starting a new
/// run over the same review state requires cancelling the old token first.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// A validated, immutable description of one ranking run.
#[derive(Debug, Clone)]
pub struct RankingPlan {
    buckets: Vec<BucketInput>,
}

impl RankingPlan {
    /// Validates the column selections against the uploaded tables and
    /// partitions the records. Every precondition failure surfaces here,
    /// before any scoring starts; the engine itself cannot fail per row.
    pub fn prepare(tables: &[Table], selections: &ColumnSelections) -> Result<Self> {
        if let Some(join) = &selections.join {
            check_same_table("join", &join.left, &selections.left)?;
            check_same_table("join", &join.right, &selections.right)?;
        }
        if let Some(meta) = &selections.meta.left {
            check_same_table("metadata", meta, &selections.left)?;
        }
        if let Some(meta) = &selections.meta.right {
            check_same_table("metadata", meta, &selections.right)?;
        }

        let left = side_input(
            tables,
            &selections.left,
            selections.join.as_ref().map(|join| &join.left),
            selections.meta.left.as_ref(),
        )?;
        let right = side_input(
            tables,
            &selections.right,
            selections.join.as_ref().map(|join| &join.right),
            selections.meta.right.as_ref(),
        )?;

        let buckets = partition(&left, &right)?;
        debug!(buckets = buckets.len(), "prepared ranking plan");
        Ok(Self { buckets })
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

fn check_same_table(kind: &str, column: &TableRef, paired: &TableRef) -> Result<()> {
    if column.table != paired.table {
        return Err(XwalkError::InvalidSelection(format!(
            "{kind} column '{}' must come from the same table as its paired column '{}'",
            column.column, paired.column
        )));
    }
    Ok(())
}

fn side_input(
    tables: &[Table],
    value_column: &TableRef,
    join_column: Option<&TableRef>,
    meta_column: Option<&TableRef>,
) -> Result<SideInput> {
    Ok(SideInput {
        values: column_values(tables, value_column)?,
        join: join_column
            .map(|column| column_values(tables, column))
            .transpose()?,
        meta: meta_column
            .map(|column| column_values(tables, column))
            .transpose()?,
    })
}

fn column_values(tables: &[Table], column: &TableRef) -> Result<Vec<String>> {
    let table = tables.get(column.table).ok_or_else(|| {
        XwalkError::InvalidSelection(format!("table {} does not exist", column.table))
    })?;
    table.column(&column.column).ok_or_else(|| {
        XwalkError::InvalidSelection(format!(
            "column '{}' not found in table '{}'",
            column.column, table.name
        ))
    })
}

/// Lifecycle of a ranking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Cancelled,
    Completed,
}

/// What one unit of work produced. Progress and completion are mutually
/// exclusive: the final unit yields `Completed` instead of a progress
/// update.
#[derive(Debug)]
pub enum StepEvent {
    /// Strictly increasing progress in `(0, 1)`.
    Progress(f64),
    Completed(MatchResults),
}

/// Terminal outcome of a driven run.
#[derive(Debug)]
pub enum RunStatus {
    Completed(MatchResults),
    Cancelled,
}

/// Scores one prepared plan incrementally. Published rows are never
/// revised; the results map only leaves the engine once, on completion.
#[derive(Debug)]
pub struct Ranker {
    buckets: Vec<BucketInput>,
    bucket_index: usize,
    row_index: usize,
    results: MatchResults,
    state: RunState,
}

impl Ranker {
    pub fn new(plan: RankingPlan) -> Self {
        Self {
            buckets: plan.buckets,
            bucket_index: 0,
            row_index: 0,
            results: MatchResults::new(),
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Performs one row's worth of scoring.
    ///
    /// Returns `None` once the run is cancelled or already completed. The
    /// token is checked before any work: after cancellation no progress and
    /// no terminal event is ever produced.
    pub fn step(&mut self, token: &CancelToken) -> Option<StepEvent> {
        if matches!(self.state, RunState::Cancelled | RunState::Completed) {
            return None;
        }
        if token.is_cancelled() {
            self.state = RunState::Cancelled;
            debug!("ranking run cancelled");
            return None;
        }
        self.state = RunState::Running;

        if self.buckets.is_empty() {
            self.state = RunState::Completed;
            return Some(StepEvent::Completed(MatchResults::new()));
        }

        let bucket = &self.buckets[self.bucket_index];
        let source = &bucket.left[self.row_index];
        let row = rank_row(source, self.row_index, &bucket.right);
        self.results
            .entry(bucket.key.clone())
            .or_default()
            .push(row);

        let bucket_rows = bucket.left.len();
        let last_row = self.row_index + 1 == bucket_rows;
        if last_row && self.bucket_index + 1 == self.buckets.len() {
            self.state = RunState::Completed;
            debug!(buckets = self.results.len(), "ranking run completed");
            return Some(StepEvent::Completed(std::mem::take(&mut self.results)));
        }

        let progress = (self.bucket_index as f64
            + (self.row_index + 1) as f64 / bucket_rows as f64)
            / self.buckets.len() as f64;
        if last_row {
            self.bucket_index += 1;
            self.row_index = 0;
        } else {
            self.row_index += 1;
        }
        Some(StepEvent::Progress(progress))
    }

    /// Drives [`Self::step`] to a terminal state, forwarding progress
    /// updates to the callback.
    pub fn run(mut self, token: &CancelToken, mut on_progress: impl FnMut(f64)) -> RunStatus {
        loop {
            match self.step(token) {
                Some(StepEvent::Progress(progress)) => on_progress(progress),
                Some(StepEvent::Completed(results)) => return RunStatus::Completed(results),
                None => return RunStatus::Cancelled,
            }
        }
    }
}

/// Scores one source record against every target in its bucket and ranks
/// the candidates ascending by score. The sort is stable, so ties keep the
/// original target order.
fn rank_row(source: &Record, source_row: usize, targets: &[Record]) -> MatchRow {
    let mut scored: Vec<(i64, &Record)> = targets
        .iter()
        .map(|target| (part_distance(&source.value, &target.value), target))
        .collect();
    scored.sort_by_key(|(score, _)| *score);

    let ranked_matches = scored
        .into_iter()
        .enumerate()
        .map(|(rank, (score, target))| Candidate {
            score,
            value: target.value.clone(),
            meta: target.meta.clone(),
            original_index: target.original_index,
            rank,
            source_row,
        })
        .collect();

    MatchRow {
        value: source.value.clone(),
        meta: source.meta.clone(),
        original_index: source.original_index,
        source_row,
        ranked_matches,
    }
}
