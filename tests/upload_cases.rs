use bakery_ocr_table::{ProcessingMode, Token};
use pretty_assertions::assert_eq;

use bakery_ocr_worker::error::ApiError;
use bakery_ocr_worker::models::{MAX_UPLOAD_BYTES, UploadResponse};
use bakery_ocr_worker::ocr_service::parse_recognition_payload;
use bakery_ocr_worker::upload::{allowed_file, parse_mode_field, validate_upload_size};

#[test]
fn accepts_only_image_extensions() {
    assert!(allowed_file("menu.png"));
    assert!(allowed_file("menu.JPG"));
    assert!(allowed_file("scan.final.jpeg"));
    assert!(allowed_file("anim.gif"));
    assert!(!allowed_file("menu.pdf"));
    assert!(!allowed_file("png"));
    assert!(!allowed_file("menu."));
    assert!(!allowed_file(""));
}

#[test]
fn mode_field_defaults_to_auto() {
    assert_eq!(parse_mode_field(None).expect("absent"), ProcessingMode::Auto);
    assert_eq!(parse_mode_field(Some("  ")).expect("blank"), ProcessingMode::Auto);
    assert_eq!(parse_mode_field(Some("Table")).expect("table"), ProcessingMode::Table);
    assert_eq!(parse_mode_field(Some("text")).expect("text"), ProcessingMode::Text);
}

#[test]
fn unknown_mode_is_a_bad_request() {
    let error = parse_mode_field(Some("poster")).expect_err("unknown mode");
    assert_eq!(error.status_code(), 400);
    assert_eq!(error.code(), "bad_request");
    assert!(error.message().contains("poster"));
}

#[test]
fn upload_size_limits() {
    assert!(validate_upload_size(1).is_ok());
    assert!(validate_upload_size(MAX_UPLOAD_BYTES).is_ok());

    let too_large = validate_upload_size(MAX_UPLOAD_BYTES + 1).expect_err("over the limit");
    assert_eq!(too_large.status_code(), 413);
    assert_eq!(too_large.code(), "payload_too_large");

    let empty = validate_upload_size(0).expect_err("empty upload");
    assert_eq!(empty.status_code(), 400);
}

#[test]
fn parses_recognition_payload() {
    let body = r#"{
        "text": "Item  Price\nBread  2.50",
        "tokens": [
            {"text": "Item", "x": 20, "y": 10, "line_index": 0, "confidence": 93},
            {"text": "Price", "x": 300, "y": 10, "width": 48, "height": 16, "line_index": 0, "confidence": 88}
        ]
    }"#;

    let snapshot = parse_recognition_payload(body).expect("payload should parse");
    assert_eq!(snapshot.text, "Item  Price\nBread  2.50");
    assert_eq!(
        snapshot.tokens,
        vec![
            Token::new("Item", 20, 10, 0, 93),
            Token::new("Price", 300, 10, 0, 88).with_size(48, 16),
        ]
    );
}

#[test]
fn malformed_payload_is_an_upstream_error() {
    let error = parse_recognition_payload("<html>bad gateway</html>").expect_err("not json");
    assert_eq!(error.status_code(), 502);
    assert_eq!(error.code(), "upstream_error");
}

#[test]
fn error_body_shape() {
    let body = ApiError::UnsupportedMediaType("unsupported file type".to_string()).to_body();
    let json = serde_json::to_value(&body).expect("body should serialize");
    assert_eq!(
        json,
        serde_json::json!({
            "success": false,
            "error": "unsupported file type",
            "code": "unsupported_media_type"
        })
    );
}

#[test]
fn success_body_wraps_table_result() {
    let response = UploadResponse::new(bakery_ocr_table::TableResult::empty());
    let json = serde_json::to_string(&response).expect("response should serialize");
    assert_eq!(json, r#"{"success":true,"data":{"header":[],"data":[]}}"#);
}
