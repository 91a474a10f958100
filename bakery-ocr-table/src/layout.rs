//! Table reconstruction from token geometry.
//!
//! The first retained line is the header; every later token is placed in the
//! column whose header token starts closest to it horizontally.

use std::collections::BTreeMap;

use crate::model::{Row, TableResult, Token, dedup_columns};

/// Retained tokens grouped by line index, each line sorted left to right.
pub(crate) fn group_lines(tokens: &[Token], min_confidence: u8) -> BTreeMap<u32, Vec<&Token>> {
    let mut lines: BTreeMap<u32, Vec<&Token>> = BTreeMap::new();
    for token in tokens
        .iter()
        .filter(|token| token.confidence > min_confidence && !token.text.trim().is_empty())
    {
        lines.entry(token.line_index).or_default().push(token);
    }

    // Stable sort: equal x keeps recognition order.
    for line in lines.values_mut() {
        line.sort_by_key(|token| token.x);
    }
    lines
}

/// Index of the anchor nearest to `x`; the lowest index wins a tie.
pub(crate) fn nearest_column(anchors: &[&Token], x: u32) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (index, anchor) in anchors.iter().enumerate() {
        let distance = anchor.x.abs_diff(x);
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}

#[must_use]
pub fn reconstruct_from_tokens(tokens: &[Token], min_confidence: u8) -> TableResult {
    let mut lines = group_lines(tokens, min_confidence).into_values();
    let Some(anchors) = lines.next() else {
        return TableResult::empty();
    };

    let header = dedup_columns(anchors.iter().map(|token| token.text.clone()));
    let mut data = Vec::new();

    for line in lines {
        let mut row = Row::new();
        for token in line {
            let Some(column) = nearest_column(&anchors, token.x) else {
                continue;
            };
            let name = &anchors[column].text;
            row.entry(name.clone())
                .and_modify(|value| {
                    value.push(' ');
                    value.push_str(&token.text);
                })
                .or_insert_with(|| token.text.clone());
        }

        if !row.is_empty() {
            data.push(row);
        }
    }

    TableResult { header, data }
}
