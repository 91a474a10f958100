//! Structuring for untabulated price lists.
//!
//! Each line is tried as `name <sep> [$]price` first, then as `key: value`.
//! When no line matches either shape the page is returned as a numbered
//! listing instead.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Row, TableResult};

pub const ITEM_COLUMN: &str = "Item";
pub const PRICE_COLUMN: &str = "Price";
pub const PROPERTY_COLUMN: &str = "Property";
pub const VALUE_COLUMN: &str = "Value";
pub const LINE_NUMBER_COLUMN: &str = "Line Number";
pub const TEXT_COLUMN: &str = "Text";

// The name is greedy and ends on a non-separator, so the last
// separator-and-number that qualifies wins. A colon only separates a price
// when a `$` follows it.
static ITEM_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>[^$]*[^$\s:\-])(?:[\s\-]+\$?\s*|[\s:\-]*\$\s*)(?P<price>\d+\.?\d*)",
    )
    .expect("hardcoded item/price regex is valid")
});

static KEY_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<key>[^:]+):\s*(?P<value>.+)$").expect("hardcoded key/value regex is valid")
});

pub(crate) fn match_item_price(line: &str) -> Option<Row> {
    let captures = ITEM_PRICE_RE.captures(line)?;
    let name = captures.name("name")?.as_str().trim();
    // The currency sign sits in the separator, so the digits never carry one.
    let price = format!("${}", captures.name("price")?.as_str());

    let mut row = Row::new();
    row.insert(ITEM_COLUMN.to_string(), name.to_string());
    row.insert(PRICE_COLUMN.to_string(), price);
    Some(row)
}

pub(crate) fn match_key_value(line: &str) -> Option<Row> {
    let captures = KEY_VALUE_RE.captures(line)?;
    let key = captures.name("key")?.as_str().trim();
    let value = captures.name("value")?.as_str().trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }

    let mut row = Row::new();
    row.insert(PROPERTY_COLUMN.to_string(), key.to_string());
    row.insert(VALUE_COLUMN.to_string(), value.to_string());
    Some(row)
}

fn numbered_listing(lines: &[&str]) -> TableResult {
    let data = lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let mut row = Row::new();
            row.insert(LINE_NUMBER_COLUMN.to_string(), (index + 1).to_string());
            row.insert(TEXT_COLUMN.to_string(), (*line).to_string());
            row
        })
        .collect();

    TableResult {
        header: vec![LINE_NUMBER_COLUMN.to_string(), TEXT_COLUMN.to_string()],
        data,
    }
}

/// Reports whether any line matched a structured pattern alongside the result.
#[must_use]
pub fn structure_text(text: &str) -> (TableResult, bool) {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let data: Vec<Row> = lines
        .iter()
        .filter_map(|line| match_item_price(line).or_else(|| match_key_value(line)))
        .collect();

    if data.is_empty() {
        return (numbered_listing(&lines), false);
    }

    let header: BTreeSet<String> = data.iter().flat_map(|row| row.keys().cloned()).collect();
    let mut result = TableResult {
        header: header.into_iter().collect(),
        data,
    };
    result.pad_rows();
    (result, true)
}
