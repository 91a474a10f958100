use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One text fragment reported by the recognition engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub x: u32,
    pub y: u32,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    pub line_index: u32,
    pub confidence: u8,
}

impl Token {
    #[must_use]
    pub fn new(text: impl Into<String>, x: u32, y: u32, line_index: u32, confidence: u8) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width: 0,
            height: 0,
            line_index,
            confidence,
        }
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Column name to cell value. Rows from the table strategies may omit columns.
pub type Row = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableResult {
    pub header: Vec<String>,
    pub data: Vec<Row>,
}

impl TableResult {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Fills every header column missing from a row with an empty string.
    pub fn pad_rows(&mut self) {
        for row in &mut self.data {
            for column in &self.header {
                row.entry(column.clone()).or_default();
            }
        }
    }
}

/// Keeps the first occurrence of each column name, preserving order.
pub(crate) fn dedup_columns<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut header: Vec<String> = Vec::new();
    for name in names {
        if !header.contains(&name) {
            header.push(name);
        }
    }
    header
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutClass {
    Table,
    FreeText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Layout,
    Delimited,
    FreeText,
}
