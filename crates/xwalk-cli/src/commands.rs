//! Command implementations.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use xwalk_ingest::read_table;
use xwalk_match::{CancelToken, Ranker, RankingPlan, RunStatus, automatch};
use xwalk_model::{ColumnSelections, JoinColumns, MetaColumns, SaveFile, TableRef};
use xwalk_review::ReviewSession;

use crate::cli::{ExportArgs, MatchArgs, SummaryArgs};
use crate::summary::print_session_summary;

const PROGRESS_TICKS: u64 = 1000;

pub fn run_match(args: &MatchArgs) -> Result<()> {
    let left = read_table(&args.left)?;
    let right = read_table(&args.right)?;
    let selections = build_selections(args);
    let tables = vec![left, right];

    let plan = RankingPlan::prepare(&tables, &selections)?;
    info!(buckets = plan.bucket_count(), "starting ranking run");

    let bar = ProgressBar::new(PROGRESS_TICKS);
    bar.set_style(ProgressStyle::with_template(
        "{bar:40.cyan/blue} {percent:>3}% ranking",
    )?);

    let token = CancelToken::new();
    let status = Ranker::new(plan).run(&token, |progress| {
        bar.set_position((progress * PROGRESS_TICKS as f64) as u64);
    });
    bar.finish_and_clear();
    let results = match status {
        RunStatus::Completed(results) => results,
        RunStatus::Cancelled => bail!("ranking run was cancelled"),
    };

    let seed = if args.no_automatch {
        BTreeMap::new()
    } else {
        automatch(&results)
    };
    let automatched: usize = seed.values().map(|m| m.confirmed_keys().count()).sum();
    info!(buckets = results.len(), automatched, "ranking complete");

    let session = ReviewSession::new(tables, selections, results, seed);
    write_json(&args.output, &session.to_save_file())?;

    println!("Session written to {}", args.output.display());
    print_session_summary(&session);
    Ok(())
}

pub fn run_export(args: &ExportArgs) -> Result<()> {
    let session = load_session(&args.session)?;
    let groups = session.export_confirmed();
    write_json(&args.output, &groups)?;
    println!(
        "Exported {} confirmed group(s) to {}",
        groups.len(),
        args.output.display()
    );
    Ok(())
}

pub fn run_summary(args: &SummaryArgs) -> Result<()> {
    let session = load_session(&args.session)?;
    print_session_summary(&session);
    Ok(())
}

fn build_selections(args: &MatchArgs) -> ColumnSelections {
    let mut selections = ColumnSelections::new(
        TableRef::new(0, args.left_column.as_str()),
        TableRef::new(1, args.right_column.as_str()),
    );
    if let (Some(left_join), Some(right_join)) = (&args.left_join, &args.right_join) {
        selections.join = Some(JoinColumns {
            left: TableRef::new(0, left_join.as_str()),
            right: TableRef::new(1, right_join.as_str()),
        });
    }
    selections.meta = MetaColumns {
        left: args
            .left_meta
            .as_ref()
            .map(|column| TableRef::new(0, column.as_str())),
        right: args
            .right_meta
            .as_ref()
            .map(|column| TableRef::new(1, column.as_str())),
    };
    selections
}

fn load_session(path: &Path) -> Result<ReviewSession> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read session: {}", path.display()))?;
    let save: SaveFile = serde_json::from_str(&raw)
        .with_context(|| format!("parse session: {}", path.display()))?;
    Ok(ReviewSession::from_state(save.into_session()?))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))
}
