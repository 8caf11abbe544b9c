//! Table rows recovered from the positioned text of a PDF.
//!
//! A table starts at a block of consecutive visual lines that each hold at
//! least two text runs. The widest line of that block fixes the columns;
//! every other run is placed in the column it overlaps most. The columns
//! carry over to later blocks and pages, so a statement that continues on
//! the next page without repeating its header, or a lone row between two
//! page footers, still lands in the same cells.

use lopdf::Document;
use tracing::debug;

use crate::error::Result;
use crate::layout::{read_page_layouts, TextRun};
use crate::types::RawRow;

const MIN_TABLE_LINES: usize = 2;
const MIN_CELLS_PER_LINE: usize = 2;

/// Extract every table row from every page, in page then reading order.
pub fn extract_table_rows(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let doc = Document::load_mem(bytes)?;
    let mut columns = None;
    let mut rows = Vec::new();
    for page in read_page_layouts(&doc)? {
        let page_rows = table_rows_from_lines(&page.lines(), &mut columns);
        debug!(page = page.page_number, rows = page_rows.len(), "table rows");
        rows.extend(page_rows);
    }
    Ok(rows)
}

/// Split a page's lines into blocks and lay each one out in columns.
///
/// `columns` is the layout found so far in the document. Before one exists
/// only blocks of [`MIN_TABLE_LINES`] or more lines count as tables.
pub(crate) fn table_rows_from_lines(
    lines: &[Vec<TextRun>],
    columns: &mut Option<Vec<Column>>,
) -> Vec<RawRow> {
    let mut rows = Vec::new();
    let mut start = 0;
    while start < lines.len() {
        if lines[start].len() < MIN_CELLS_PER_LINE {
            start += 1;
            continue;
        }
        let end = lines[start..]
            .iter()
            .position(|l| l.len() < MIN_CELLS_PER_LINE)
            .map_or(lines.len(), |offset| start + offset);

        let block = &lines[start..end];
        if block.len() >= MIN_TABLE_LINES {
            adopt_widest_line(block, columns);
        }
        if let Some(cols) = columns.as_deref() {
            rows.extend(layout_block(block, cols));
        }
        start = end;
    }
    rows
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Column {
    start: f32,
    end: f32,
}

/// Take the block's widest line as the column layout unless the current
/// layout already has as many columns.
fn adopt_widest_line(block: &[Vec<TextRun>], columns: &mut Option<Vec<Column>>) {
    let Some(widest) = block.iter().reduce(|best, l| if l.len() > best.len() { l } else { best })
    else {
        return;
    };
    if columns.as_ref().is_some_and(|cols| cols.len() >= widest.len()) {
        return;
    }
    debug!(columns = widest.len(), "table columns");
    *columns = Some(
        widest
            .iter()
            .map(|r| Column { start: r.x, end: r.x_end() })
            .collect(),
    );
}

fn layout_block(block: &[Vec<TextRun>], columns: &[Column]) -> Vec<RawRow> {
    block
        .iter()
        .map(|line| {
            let mut cells: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
            for run in line {
                cells[column_for(columns, run)].push(run.text.as_str());
            }
            cells.into_iter().map(|parts| parts.join(" ")).collect::<RawRow>()
        })
        .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .collect()
}

fn column_for(columns: &[Column], run: &TextRun) -> usize {
    let (start, end) = (run.x, run.x_end());
    let mut best = None;
    let mut best_overlap = 0.0;
    for (idx, col) in columns.iter().enumerate() {
        let overlap = end.min(col.end) - start.max(col.start);
        if overlap > best_overlap {
            best_overlap = overlap;
            best = Some(idx);
        }
    }

    best.unwrap_or_else(|| {
        columns
            .iter()
            .rposition(|col| col.start <= start)
            .unwrap_or(0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(x: f32, text: &str) -> TextRun {
        TextRun { x, y: 0.0, font_size: 10.0, text: text.to_string() }
    }

    #[test]
    fn test_columns_follow_widest_line() {
        let lines = vec![
            vec![run(50.0, "Data"), run(120.0, "Descricao"), run(320.0, "Credito"), run(400.0, "Debito")],
            vec![run(50.0, "15/12/2025"), run(120.0, "SALARIO"), run(320.0, "1.350,00")],
            vec![run(50.0, "17/12/2025"), run(120.0, "PIX"), run(150.0, "ENVIADO"), run(400.0, "119,90")],
        ];
        let rows = table_rows_from_lines(&lines, &mut None);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["15/12/2025", "SALARIO", "1.350,00", ""]);
        assert_eq!(rows[2], vec!["17/12/2025", "PIX ENVIADO", "", "119,90"]);
    }

    #[test]
    fn test_single_run_lines_split_tables() {
        let lines = vec![
            vec![run(50.0, "Extrato")],
            vec![run(50.0, "a"), run(200.0, "b")],
            vec![run(50.0, "Pagina 1")],
            vec![run(50.0, "c"), run(200.0, "d")],
            vec![run(50.0, "e"), run(200.0, "f")],
        ];
        let rows = table_rows_from_lines(&lines, &mut None);
        assert_eq!(rows, vec![vec!["c", "d"], vec!["e", "f"]]);
    }

    #[test]
    fn test_columns_carry_over_to_later_pages() {
        let mut columns = None;
        let first_page = vec![
            vec![run(50.0, "Data"), run(120.0, "Descricao"), run(320.0, "Credito"), run(400.0, "Debito")],
            vec![run(50.0, "15/12/2025"), run(120.0, "SALARIO"), run(320.0, "1.350,00")],
        ];
        assert_eq!(table_rows_from_lines(&first_page, &mut columns).len(), 2);

        // No header, fewer runs than the header, and a lone row after a footer.
        let second_page = vec![
            vec![run(50.0, "Extrato - continuacao")],
            vec![run(50.0, "18/12/2025"), run(120.0, "PADARIA"), run(400.0, "12,50")],
            vec![run(50.0, "19/12/2025"), run(120.0, "FARMACIA"), run(400.0, "30,00")],
            vec![run(50.0, "Pagina 2")],
            vec![run(50.0, "20/12/2025"), run(120.0, "MERCADO"), run(400.0, "80,00")],
        ];
        let rows = table_rows_from_lines(&second_page, &mut columns);
        assert_eq!(
            rows,
            vec![
                vec!["18/12/2025", "PADARIA", "", "12,50"],
                vec!["19/12/2025", "FARMACIA", "", "30,00"],
                vec!["20/12/2025", "MERCADO", "", "80,00"],
            ]
        );
    }

    #[test]
    fn test_wider_table_replaces_columns() {
        let mut columns = None;
        let summary = vec![
            vec![run(50.0, "Saldo anterior"), run(400.0, "0,00")],
            vec![run(50.0, "Limite"), run(400.0, "500,00")],
        ];
        table_rows_from_lines(&summary, &mut columns);
        let table = vec![
            vec![run(50.0, "Data"), run(120.0, "Descricao"), run(320.0, "Credito")],
            vec![run(50.0, "15/12/2025"), run(120.0, "SALARIO"), run(320.0, "1.350,00")],
        ];
        let rows = table_rows_from_lines(&table, &mut columns);
        assert_eq!(rows[1], vec!["15/12/2025", "SALARIO", "1.350,00"]);
        assert_eq!(columns.map(|c| c.len()), Some(3));
    }

    #[test]
    fn test_run_without_overlap_goes_to_previous_column() {
        let columns = vec![Column { start: 0.0, end: 20.0 }, Column { start: 100.0, end: 120.0 }];
        assert_eq!(column_for(&columns, &run(60.0, "x")), 0);
        assert_eq!(column_for(&columns, &run(130.0, "x")), 1);
        assert_eq!(column_for(&columns, &run(-50.0, "x")), 0);
    }

    #[test]
    fn test_garbage_bytes_are_an_error() {
        assert!(extract_table_rows(b"not a pdf at all").is_err());
    }
}
