//! Boundary to the character-recognition engine.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::error::RecognitionError;
use crate::model::Token;

/// A blocking recognition engine. Both calls receive the binarized page.
pub trait Recognizer {
    /// Newline-delimited text, one visual line per line.
    fn recognize_text(&self, image: &GrayImage) -> Result<String, RecognitionError>;

    /// One token per recognized fragment, with geometry and confidence.
    fn recognize_tokens(&self, image: &GrayImage) -> Result<Vec<Token>, RecognitionError>;
}

impl<R: Recognizer + ?Sized> Recognizer for &R {
    fn recognize_text(&self, image: &GrayImage) -> Result<String, RecognitionError> {
        (**self).recognize_text(image)
    }

    fn recognize_tokens(&self, image: &GrayImage) -> Result<Vec<Token>, RecognitionError> {
        (**self).recognize_tokens(image)
    }
}

/// Recognition output captured ahead of time, e.g. from a remote service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionSnapshot {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl RecognitionSnapshot {
    #[must_use]
    pub fn new(text: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            text: text.into(),
            tokens,
        }
    }
}

impl Recognizer for RecognitionSnapshot {
    fn recognize_text(&self, _image: &GrayImage) -> Result<String, RecognitionError> {
        Ok(self.text.clone())
    }

    fn recognize_tokens(&self, _image: &GrayImage) -> Result<Vec<Token>, RecognitionError> {
        Ok(self.tokens.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenSummary {
    pub token_count: usize,
    pub average_confidence: f32,
    pub samples: Vec<Token>,
}

/// Count, mean confidence, and the first `sample_limit` confident tokens.
#[must_use]
pub fn summarize_tokens(tokens: &[Token], min_confidence: u8, sample_limit: usize) -> TokenSummary {
    let total: u32 = tokens.iter().map(|token| u32::from(token.confidence)).sum();
    #[allow(clippy::cast_precision_loss)]
    let average_confidence = if tokens.is_empty() {
        0.0
    } else {
        total as f32 / tokens.len() as f32
    };

    let samples = tokens
        .iter()
        .filter(|token| token.confidence > min_confidence && !token.text.trim().is_empty())
        .take(sample_limit)
        .cloned()
        .collect();

    TokenSummary {
        token_count: tokens.len(),
        average_confidence,
        samples,
    }
}

#[cfg(test)]
mod tests {
    use image::GrayImage;

    use super::{RecognitionSnapshot, Recognizer, summarize_tokens};
    use crate::model::Token;

    #[test]
    fn snapshot_replays_recorded_output() {
        let snapshot = RecognitionSnapshot::new("Item  Price", vec![Token::new("Item", 3, 4, 0, 91)]);
        let page = GrayImage::new(1, 1);

        assert_eq!(snapshot.recognize_text(&page).expect("text"), "Item  Price");
        assert_eq!(snapshot.recognize_tokens(&page).expect("tokens").len(), 1);
    }

    #[test]
    fn snapshot_deserializes_with_missing_fields() {
        let snapshot: RecognitionSnapshot =
            serde_json::from_str(r#"{"text":"Rye  4.00"}"#).expect("payload should parse");
        assert_eq!(snapshot.text, "Rye  4.00");
        assert!(snapshot.tokens.is_empty());
    }

    #[test]
    fn summary_samples_only_confident_tokens() {
        let tokens = vec![
            Token::new("Bagel", 0, 0, 0, 90),
            Token::new("smudge", 0, 0, 0, 20),
            Token::new("Scone", 0, 0, 1, 70),
            Token::new("Tart", 0, 0, 2, 61),
        ];
        let summary = summarize_tokens(&tokens, 60, 2);

        assert_eq!(summary.token_count, 4);
        assert!((summary.average_confidence - 60.25).abs() < f32::EPSILON);
        let texts: Vec<&str> = summary.samples.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Bagel", "Scone"]);
    }
}
