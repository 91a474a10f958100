//! Checks applied to an upload before any image work starts.

use std::path::Path;

use bakery_ocr_table::ProcessingMode;

use crate::error::ApiError;
use crate::models::{ALLOWED_EXTENSIONS, MAX_UPLOAD_BYTES};

/// True when the file name carries one of the accepted image extensions.
pub fn allowed_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| extension.eq_ignore_ascii_case(allowed))
        })
}

/// Absent or blank fields select auto mode.
pub fn parse_mode_field(value: Option<&str>) -> Result<ProcessingMode, ApiError> {
    value
        .unwrap_or_default()
        .parse::<ProcessingMode>()
        .map_err(ApiError::BadRequest)
}

pub fn validate_upload_size(len: usize) -> Result<(), ApiError> {
    if len == 0 {
        return Err(ApiError::BadRequest("uploaded file is empty".to_string()));
    }
    if len > MAX_UPLOAD_BYTES {
        return Err(ApiError::PayloadTooLarge(format!(
            "uploaded file is {len} bytes; the limit is {MAX_UPLOAD_BYTES} bytes"
        )));
    }
    Ok(())
}
