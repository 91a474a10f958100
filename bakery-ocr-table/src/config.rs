use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    #[default]
    Auto,
    Table,
    Text,
}

impl ProcessingMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Table => "table",
            Self::Text => "text",
        }
    }
}

impl FromStr for ProcessingMode {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        match spec.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "table" => Ok(Self::Table),
            "text" => Ok(Self::Text),
            other => Err(format!(
                "invalid mode '{other}', expected one of auto, table, text"
            )),
        }
    }
}

/// Thresholds for the straight-line table gate.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    pub canny_low: f32,
    pub canny_high: f32,
    pub hough_votes: u32,
    pub suppression_radius: u32,
    pub min_line_length: u32,
    pub max_line_gap: u32,
    /// Endpoint delta (pixels) under which a segment counts as axis-aligned.
    pub axis_tolerance: u32,
    pub min_segments: usize,
    pub min_horizontal: usize,
    pub min_vertical: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            canny_low: 50.0,
            canny_high: 150.0,
            hough_votes: 100,
            suppression_radius: 8,
            min_line_length: 100,
            max_line_gap: 10,
            axis_tolerance: 10,
            min_segments: 10,
            min_horizontal: 3,
            min_vertical: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Tokens at or below this confidence are ignored by the layout strategy.
    pub min_confidence: u8,
    /// Layout results with fewer data rows fall back to the delimiter parser.
    pub min_data_rows: usize,
    /// Chebyshev radius of the post-threshold dilation; 0 disables it.
    pub dilate_radius: u8,
    pub detector: DetectorConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_confidence: 60,
            min_data_rows: 2,
            dilate_radius: 0,
            detector: DetectorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PipelineConfig, ProcessingMode};
    use std::str::FromStr;

    #[test]
    fn parse_modes_case_insensitively() {
        assert_eq!(ProcessingMode::from_str("TABLE"), Ok(ProcessingMode::Table));
        assert_eq!(ProcessingMode::from_str(" text "), Ok(ProcessingMode::Text));
        assert_eq!(ProcessingMode::from_str(""), Ok(ProcessingMode::Auto));
    }

    #[test]
    fn reject_unknown_mode() {
        let err = ProcessingMode::from_str("grid").expect_err("unknown mode should fail");
        assert!(err.contains("invalid mode 'grid'"));
    }

    #[test]
    fn defaults_match_documented_thresholds() {
        let config = PipelineConfig::default();
        assert_eq!(config.min_confidence, 60);
        assert_eq!(config.min_data_rows, 2);
        assert_eq!(config.detector.axis_tolerance, 10);
        assert_eq!(config.detector.min_segments, 10);
        assert_eq!(config.detector.min_horizontal, 3);
        assert_eq!(config.detector.min_vertical, 3);
    }
}
