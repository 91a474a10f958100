use crate::model::{Row, TableResult, dedup_columns};

/// Splits a line on runs of two or more whitespace characters.
pub(crate) fn split_line_into_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut pending = String::new();

    for ch in trimmed.chars() {
        if ch.is_whitespace() {
            pending.push(ch);
            continue;
        }

        if pending.chars().count() >= 2 {
            if !current.trim().is_empty() {
                cells.push(current.trim().to_string());
            }
            current.clear();
        } else {
            current.push_str(&pending);
        }
        pending.clear();
        current.push(ch);
    }

    if !current.trim().is_empty() {
        cells.push(current.trim().to_string());
    }

    cells
}

/// Builds a table from plain text: the first non-blank line is the header and
/// later lines are zipped against it by position.
#[must_use]
pub fn parse_delimited_table(text: &str) -> TableResult {
    let mut lines = text
        .lines()
        .map(split_line_into_cells)
        .filter(|cells| !cells.is_empty());

    let Some(columns) = lines.next() else {
        return TableResult::empty();
    };

    let mut data = Vec::new();
    for cells in lines {
        let row: Row = columns
            .iter()
            .zip(cells)
            .map(|(column, value)| (column.clone(), value))
            .collect();
        if !row.is_empty() {
            data.push(row);
        }
    }

    TableResult {
        header: dedup_columns(columns),
        data,
    }
}
