use bakery_ocr_table::TableResult;
use serde::{Deserialize, Serialize};

pub const SERVICE_BANNER: &str = "Bakery OCR API is running!";
pub const OCR_SERVICE_URL_VAR: &str = "OCR_SERVICE_URL";
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResponse {
    pub success: bool,
    pub data: TableResult,
}

impl UploadResponse {
    pub fn new(data: TableResult) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}
