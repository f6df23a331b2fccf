//! Human-readable session summaries.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use xwalk_review::ReviewSession;

pub fn print_session_summary(session: &ReviewSession) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        header_cell("Bucket"),
        header_cell("Rows"),
        header_cell("Matched"),
        header_cell("Candidates"),
    ]);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_rows = 0usize;
    let mut total_matched = 0usize;
    for (bucket, rows) in session.matches() {
        let matched = session.matched_row_count(bucket);
        total_rows += rows.len();
        total_matched += matched;
        let candidates = rows
            .first()
            .map(|row| row.ranked_matches.len())
            .unwrap_or(0);
        table.add_row(vec![
            Cell::new(bucket),
            Cell::new(rows.len()),
            Cell::new(matched),
            Cell::new(candidates),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL").add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        Cell::new(total_matched).add_attribute(Attribute::Bold),
        Cell::new("-"),
    ]);
    println!("{table}");
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
