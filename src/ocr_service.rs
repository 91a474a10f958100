use bakery_ocr_table::RecognitionSnapshot;
use url::Url;
use worker::js_sys::Uint8Array;
use worker::{Fetch, Headers, Method, Request, RequestInit};

use crate::error::ApiError;

/// Sends the binarized page to the recognition service and returns its
/// text and token output.
pub async fn recognize_page(service_url: &str, png: &[u8]) -> Result<RecognitionSnapshot, ApiError> {
    let parsed = Url::parse(service_url).map_err(|error| {
        ApiError::Internal(format!("invalid recognition service url: {error}"))
    })?;

    let headers = Headers::new();
    headers.set("Content-Type", "image/png")?;
    let mut init = RequestInit::new();
    init.with_method(Method::Post)
        .with_headers(headers)
        .with_body(Some(Uint8Array::from(png).into()));

    let request = Request::new_with_init(parsed.as_str(), &init)?;
    let mut response = Fetch::Request(request).send().await?;
    let status = response.status_code();
    if status >= 400 {
        return Err(ApiError::Upstream(format!(
            "recognition service returned status {status}"
        )));
    }

    let body = response.text().await?;
    parse_recognition_payload(&body)
}

/// Decodes `{"text": ..., "tokens": [...]}`; either field may be absent.
pub fn parse_recognition_payload(body: &str) -> Result<RecognitionSnapshot, ApiError> {
    serde_json::from_str(body).map_err(|error| {
        ApiError::Upstream(format!("malformed recognition payload: {error}"))
    })
}
