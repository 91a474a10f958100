use std::fmt::{Display, Formatter};

use bakery_ocr_table::ExtractError;
use worker::{Response, Result};

use crate::models::ErrorResponse;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge(String),
    UnsupportedMediaType(String),
    Upstream(String),
    Processing(String),
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::PayloadTooLarge(_) => "payload_too_large",
            Self::UnsupportedMediaType(_) => "unsupported_media_type",
            Self::Upstream(_) => "upstream_error",
            Self::Processing(_) => "processing_error",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::PayloadTooLarge(message)
            | Self::UnsupportedMediaType(message)
            | Self::Upstream(message)
            | Self::Processing(message)
            | Self::Internal(message) => message,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) | Self::UnsupportedMediaType(_) => 400,
            Self::PayloadTooLarge(_) => 413,
            Self::Upstream(_) => 502,
            Self::Processing(_) | Self::Internal(_) => 500,
        }
    }

    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            error: self.message().to_string(),
            code: self.code().to_string(),
        }
    }

    pub fn into_response(self) -> Result<Response> {
        let mut response = Response::from_json(&self.to_body())?;
        response.headers_mut().set("Cache-Control", "no-store")?;
        Ok(response.with_status(self.status_code()))
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<worker::Error> for ApiError {
    fn from(error: worker::Error) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<ExtractError> for ApiError {
    fn from(error: ExtractError) -> Self {
        match error {
            ExtractError::ImageDecode(_) => Self::BadRequest(error.to_string()),
            ExtractError::Recognition(_) => Self::Upstream(error.to_string()),
            other => Self::Processing(other.to_string()),
        }
    }
}
