//! Recognizer backed by the `tesseract` command-line tool.

use std::collections::HashMap;
use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

use image::{GrayImage, ImageFormat};
use tempfile::NamedTempFile;

use crate::error::RecognitionError;
use crate::model::Token;
use crate::recognition::Recognizer;

const WORD_LEVEL: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesseractConfig {
    pub binary: String,
    pub language: String,
    pub page_segmentation_mode: Option<u32>,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            language: "eng".to_string(),
            page_segmentation_mode: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TesseractRecognizer {
    config: TesseractConfig,
}

impl TesseractRecognizer {
    #[must_use]
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    fn write_temp_png(dir: &Path, image: &GrayImage) -> Result<NamedTempFile, RecognitionError> {
        let mut tmp = tempfile::Builder::new().suffix(".png").tempfile_in(dir)?;
        image
            .write_to(&mut tmp, ImageFormat::Png)
            .map_err(io::Error::other)?;
        tmp.flush()?;
        Ok(tmp)
    }

    fn run(&self, path: &Path, output_format: Option<&str>) -> Result<String, RecognitionError> {
        let mut command = Command::new(&self.config.binary);
        command
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language);
        if let Some(psm) = self.config.page_segmentation_mode {
            command.arg("--psm").arg(psm.to_string());
        }
        if let Some(format) = output_format {
            command.arg(format);
        }

        let output = command
            .output()
            .map_err(|source| RecognitionError::EngineUnavailable {
                engine: self.config.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RecognitionError::EngineFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Recognizer for TesseractRecognizer {
    fn recognize_text(&self, image: &GrayImage) -> Result<String, RecognitionError> {
        let tmp = Self::write_temp_png(&env::temp_dir(), image)?;
        self.run(tmp.path(), None)
    }

    fn recognize_tokens(&self, image: &GrayImage) -> Result<Vec<Token>, RecognitionError> {
        let tmp = Self::write_temp_png(&env::temp_dir(), image)?;
        let tsv = self.run(tmp.path(), Some("tsv"))?;
        parse_tsv_tokens(&tsv)
    }
}

fn field<T: std::str::FromStr>(record: &csv::StringRecord, index: usize) -> Option<T> {
    record.get(index)?.trim().parse().ok()
}

/// Parses Tesseract TSV output into word tokens.
///
/// Line numbers restart inside every block and paragraph, so each distinct
/// `(page, block, paragraph, line)` key gets its own sequential index.
pub fn parse_tsv_tokens(tsv: &str) -> Result<Vec<Token>, RecognitionError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(tsv.as_bytes());

    let mut line_ids: HashMap<(u32, u32, u32, u32), u32> = HashMap::new();
    let mut tokens = Vec::new();

    for record in reader.records() {
        let record =
            record.map_err(|error| RecognitionError::MalformedOutput(error.to_string()))?;
        if record.len() < 12 || field::<u32>(&record, 0) != Some(WORD_LEVEL) {
            continue;
        }

        let Some(confidence) = field::<f32>(&record, 10) else {
            continue;
        };
        let text = record.get(11).unwrap_or_default().trim();
        if confidence < 0.0 || text.is_empty() {
            continue;
        }

        let key = (
            field(&record, 1).unwrap_or(0),
            field(&record, 2).unwrap_or(0),
            field(&record, 3).unwrap_or(0),
            field(&record, 4).unwrap_or(0),
        );
        let next_id = u32::try_from(line_ids.len()).unwrap_or(u32::MAX);
        let line_index = *line_ids.entry(key).or_insert(next_id);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let confidence = confidence.min(100.0) as u8;

        tokens.push(Token {
            text: text.to_string(),
            x: field(&record, 6).unwrap_or(0),
            y: field(&record, 7).unwrap_or(0),
            width: field(&record, 8).unwrap_or(0),
            height: field(&record, 9).unwrap_or(0),
            line_index,
            confidence,
        });
    }

    Ok(tokens)
}
