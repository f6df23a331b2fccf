//! File ingestion into a uniform [`Table`].
//!
//! The format is chosen by file extension: `.csv`, `.tsv`, or `.json` (an
//! array of string-keyed objects). Headers and cells are trimmed and
//! BOM-stripped on the way in.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use tracing::debug;

use xwalk_model::Table;

pub fn read_table(path: &Path) -> Result<Table> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let table = match extension.as_deref() {
        Some("csv") => read_delimited(path, b',')?,
        Some("tsv") => read_delimited(path, b'\t')?,
        Some("json") => read_json(path)?,
        _ => bail!("unsupported table format: {}", path.display()),
    };
    debug!(
        table = %table.name,
        columns = table.headers.len(),
        rows = table.rows.len(),
        "ingested table"
    );
    Ok(table)
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read table: {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("read headers: {}", path.display()))?
        .iter()
        .map(normalize_header)
        .collect();

    let mut table = Table::new(table_name(path), headers);
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        table.push_row(record.iter().map(normalize_cell).collect());
    }
    Ok(table)
}

fn read_json(path: &Path) -> Result<Table> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("read table: {}", path.display()))?;
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(&raw)
        .with_context(|| format!("parse json table: {}", path.display()))?;

    let Some(first) = rows.first() else {
        bail!("json table has no rows: {}", path.display());
    };
    let headers: Vec<String> = first.keys().cloned().collect();

    let mut table = Table::new(table_name(path), headers.clone());
    for row in &rows {
        table.push_row(
            headers
                .iter()
                .map(|header| cell_text(row.get(header)))
                .collect(),
        );
    }
    Ok(table)
}

fn table_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn cell_text(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(text)) => normalize_cell(text),
        Some(serde_json::Value::Number(number)) => number.to_string(),
        Some(serde_json::Value::Bool(flag)) => flag.to_string(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
