//! Markdown pipe-table assembly.

use crate::model::TextRun;
use crate::richtext::render_runs;

/// Assemble a two-dimensional cell grid into a Markdown pipe table.
///
/// The first row is the header; every later row is a body row, padded with
/// empty cells to the header width (ragged rows are never an error). Cell
/// text is rendered as inline Markdown with literal pipes escaped and
/// surrounding whitespace trimmed. A table with no rows renders as an
/// explicit comment instead of failing. A blank line follows the table.
#[must_use]
pub fn render_table(rows: &[&[Vec<TextRun>]]) -> String {
    let Some((header, body)) = rows.split_first() else {
        return "<!-- empty table -->\n\n".to_owned();
    };

    let header_cells: Vec<String> = header.iter().map(|c| render_cell(c)).collect();
    let width = header_cells.len();

    let mut out = String::new();
    push_row(&mut out, &header_cells);
    push_row(&mut out, &vec!["---".to_owned(); width]);
    for row in body {
        let mut cells: Vec<String> = row.iter().map(|c| render_cell(c)).collect();
        cells.resize(width.max(cells.len()), String::new());
        // Never truncate: a row wider than the header keeps its extra cells.
        push_row(&mut out, &cells);
    }
    out.push('\n');
    out
}

fn render_cell(runs: &[TextRun]) -> String {
    render_runs(runs).replace('|', "\\|").trim().to_owned()
}

fn push_row(out: &mut String, cells: &[String]) {
    out.push_str("| ");
    out.push_str(&cells.join(" | "));
    out.push_str(" |\n");
}
