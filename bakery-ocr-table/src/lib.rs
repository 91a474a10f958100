mod config;
mod csv_out;
mod error;
mod free_text;
mod layout;
mod model;
mod normalize;
mod recognition;
mod table_detect;
mod table_parse;
#[cfg(feature = "tesseract")]
mod tesseract;
mod warning;

use image::{DynamicImage, GrayImage};
use tracing::{debug, warn};

pub use config::{DetectorConfig, PipelineConfig, ProcessingMode};
pub use csv_out::{write_csv, write_csv_to_string};
pub use error::{ExtractError, RecognitionError};
pub use free_text::structure_text;
pub use layout::reconstruct_from_tokens;
pub use model::{LayoutClass, Row, StrategyKind, TableResult, Token};
pub use normalize::{PreparedImage, binarize, decode_image, encode_png, prepare_image};
pub use recognition::{RecognitionSnapshot, Recognizer, TokenSummary, summarize_tokens};
pub use table_detect::{LineStats, Orientation, Segment, detect_layout, detect_segments};
pub use table_parse::parse_delimited_table;
#[cfg(feature = "tesseract")]
pub use tesseract::{TesseractConfig, TesseractRecognizer, parse_tsv_tokens};
pub use warning::{ExtractWarning, WarningCode};

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionReport {
    pub mode: ProcessingMode,
    /// Set only when the line detector ran (auto mode).
    pub layout: Option<LayoutClass>,
    pub strategy: StrategyKind,
    pub row_count: usize,
    pub warnings: Vec<ExtractWarning>,
}

/// Image in, `{header, data}` out. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct Pipeline<R> {
    config: PipelineConfig,
    recognizer: R,
}

impl<R: Recognizer> Pipeline<R> {
    pub fn new(config: PipelineConfig, recognizer: R) -> Self {
        Self { config, recognizer }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    #[must_use]
    pub fn prepare(&self, image: &DynamicImage) -> PreparedImage {
        prepare_image(image, &self.config)
    }

    pub fn process(
        &self,
        image: &DynamicImage,
        mode: ProcessingMode,
    ) -> Result<TableResult, ExtractError> {
        self.process_with_report(image, mode)
            .map(|(result, _)| result)
    }

    pub fn process_bytes(
        &self,
        bytes: &[u8],
        mode: ProcessingMode,
    ) -> Result<(TableResult, ExtractionReport), ExtractError> {
        let image = decode_image(bytes)?;
        self.process_with_report(&image, mode)
    }

    pub fn process_with_report(
        &self,
        image: &DynamicImage,
        mode: ProcessingMode,
    ) -> Result<(TableResult, ExtractionReport), ExtractError> {
        let prepared = self.prepare(image);
        self.process_prepared(&prepared, mode)
    }

    /// Runs the strategy chain for `mode` on an already normalized image.
    pub fn process_prepared(
        &self,
        prepared: &PreparedImage,
        mode: ProcessingMode,
    ) -> Result<(TableResult, ExtractionReport), ExtractError> {
        let mut warnings = Vec::new();
        let mut layout = None;

        let (result, strategy) = match mode {
            ProcessingMode::Text => self.run_free_text(&prepared.binary, &mut warnings)?,
            ProcessingMode::Table => self.run_table_chain(&prepared.binary, false, &mut warnings)?,
            ProcessingMode::Auto => {
                let detected = detect_layout(&prepared.gray, &self.config.detector);
                layout = Some(detected);
                match detected {
                    LayoutClass::Table => {
                        self.run_table_chain(&prepared.binary, true, &mut warnings)?
                    }
                    LayoutClass::FreeText => self.run_free_text(&prepared.binary, &mut warnings)?,
                }
            }
        };

        debug!(
            mode = mode.as_str(),
            ?strategy,
            rows = result.row_count(),
            columns = result.header.len(),
            "extraction finished"
        );

        let report = ExtractionReport {
            mode,
            layout,
            strategy,
            row_count: result.row_count(),
            warnings,
        };
        Ok((result, report))
    }

    /// Layout reconstruction first, delimiter parsing when it comes up short.
    fn run_table_chain(
        &self,
        binary: &GrayImage,
        recover_layout_errors: bool,
        warnings: &mut Vec<ExtractWarning>,
    ) -> Result<(TableResult, StrategyKind), ExtractError> {
        match self.recognizer.recognize_tokens(binary) {
            Ok(tokens) => {
                let result = reconstruct_from_tokens(&tokens, self.config.min_confidence);
                if result.row_count() >= self.config.min_data_rows {
                    return Ok((result, StrategyKind::Layout));
                }
                warn!(
                    rows = result.row_count(),
                    "layout reconstruction produced too few rows; using delimiter parser"
                );
                warnings.push(
                    ExtractWarning::new(
                        WarningCode::LayoutFallback,
                        "layout reconstruction produced too few rows; used delimiter parser",
                    )
                    .with_row_count(result.row_count()),
                );
            }
            Err(error) if recover_layout_errors => {
                warn!(%error, "token recognition failed; using delimiter parser");
                warnings.push(ExtractWarning::new(
                    WarningCode::LayoutRecognitionFailed,
                    format!("token recognition failed: {error}"),
                ));
            }
            Err(error) => return Err(error.into()),
        }

        let text = self.recognizer.recognize_text(binary)?;
        if text.trim().is_empty() {
            warnings.push(ExtractWarning::new(
                WarningCode::EmptyRecognition,
                "recognition returned no text",
            ));
        }
        Ok((parse_delimited_table(&text), StrategyKind::Delimited))
    }

    fn run_free_text(
        &self,
        binary: &GrayImage,
        warnings: &mut Vec<ExtractWarning>,
    ) -> Result<(TableResult, StrategyKind), ExtractError> {
        let text = self.recognizer.recognize_text(binary)?;
        let (result, structured) = structure_text(&text);

        if text.trim().is_empty() {
            warnings.push(ExtractWarning::new(
                WarningCode::EmptyRecognition,
                "recognition returned no text",
            ));
        } else if !structured {
            warnings.push(
                ExtractWarning::new(
                    WarningCode::NoStructuredLines,
                    "no item/price or key/value lines found; returned raw lines",
                )
                .with_row_count(result.row_count()),
            );
        }

        Ok((result, StrategyKind::FreeText))
    }
}
