//! Plain-text rendering of a table view.

use std::fmt::Write;

use datagrid::{Cell, DataTable, RenderedRows, SortState, TableView};
use prospect_lib::format::format_count;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Approximate pixel width of one terminal column.
const PX_PER_CHAR: u32 = 8;
const MIN_COLUMN_CHARS: usize = 4;
const GAP: &str = "  ";

pub fn render(table: &DataTable) -> String {
    match table.view() {
        TableView::Loading => "Loading…\n".to_string(),
        TableView::Error { message } => format!("Error: {message}\nRun the command again to retry.\n"),
        TableView::Empty { filtered: true } => format!(
            "{}No rows match the current search and filters.\n",
            search_line(table)
        ),
        TableView::Empty { filtered: false } => "No data.\n".to_string(),
        TableView::Rows(rows) => format!(
            "{}{}",
            search_line(table),
            render_rows(&rows, &table.view_state().sorting)
        ),
    }
}

/// The search box: the current term, or the placeholder when there is none.
fn search_line(table: &DataTable) -> String {
    let config = table.config();
    if !config.enable_search {
        return String::new();
    }
    match table.view_state().global_filter.trim() {
        "" => format!("{}\n", config.search_placeholder),
        term => format!("Search: {term}\n"),
    }
}

fn render_rows(rows: &RenderedRows<'_>, sorting: &SortState) -> String {
    let headers: Vec<String> = rows
        .columns
        .iter()
        .map(|col| match sorting.direction(&col.key) {
            Some(false) => format!("{} ▲", col.label),
            Some(true) => format!("{} ▼", col.label),
            None => col.label.clone(),
        })
        .collect();
    let body: Vec<Vec<String>> = rows
        .cells()
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let widths: Vec<usize> = rows
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let cap = ((col.width / PX_PER_CHAR) as usize).max(MIN_COLUMN_CHARS);
            body.iter()
                .map(|row| row[i].width())
                .chain([headers[i].width()])
                .max()
                .unwrap_or(0)
                .min(cap)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &body {
        push_line(&mut out, row, &widths);
    }
    out.push_str(&footer(rows));
    out.push('\n');
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width))
        .collect();
    out.push_str(line.join(GAP).trim_end());
    out.push('\n');
}

fn cell_text(cell: &Cell) -> String {
    match cell.tone {
        Some(_) => format!("[{}]", cell.text),
        None => cell.text.clone(),
    }
}

fn footer(rows: &RenderedRows<'_>) -> String {
    let offset = rows.page.as_ref().map_or(0, |page| page.range.start);
    let first = offset + rows.window.start + 1;
    let last = offset + rows.window.end;

    let mut footer = format!(
        "Rows {}-{} of {}",
        format_count(first as i64),
        format_count(last as i64),
        format_count(rows.filtered_rows as i64)
    );
    if rows.filtered_rows != rows.total_rows {
        let _ = write!(footer, " (filtered from {})", format_count(rows.total_rows as i64));
    }
    if let Some(page) = &rows.page {
        let _ = write!(footer, " · page {}/{}", page.page_index + 1, page.page_count);
    }
    if rows.column_window.windowed {
        let _ = write!(
            footer,
            " · columns {}-{}",
            rows.column_window.start + 1,
            rows.column_window.end
        );
    }
    if rows.refreshing {
        footer.push_str(" · refreshing");
    }
    footer
}

/// Truncate with an ellipsis to `max_width` terminal columns.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target = max_width - 1;
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > target {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}

fn pad(s: &str, width: usize) -> String {
    let text = truncate_to_width(s, width);
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}
