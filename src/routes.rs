use bakery_ocr_table::{
    Pipeline, PipelineConfig, ProcessingMode, decode_image, encode_png, prepare_image,
};
use serde::Serialize;
use worker::{Context, Env, FormEntry, Request, Response, Result, RouteContext, Router};

use crate::error::ApiError;
use crate::models::{OCR_SERVICE_URL_VAR, SERVICE_BANNER, UploadResponse};
use crate::ocr_service;
use crate::upload::{allowed_file, parse_mode_field, validate_upload_size};

#[derive(Debug, Clone)]
pub struct AppState {
    pub ocr_service_url: Option<String>,
}

pub async fn handle(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    let ocr_service_url = env
        .var(OCR_SERVICE_URL_VAR)
        .ok()
        .map(|value| value.to_string());

    let state = AppState { ocr_service_url };

    Router::with_data(state)
        .get("/", |_, _| Response::ok(SERVICE_BANNER))
        .post_async("/upload", upload_route)
        .run(req, env)
        .await
}

async fn upload_route(mut req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    match upload_response(&mut req, &ctx.data).await {
        Ok(response) => json_response(&response),
        Err(error) => {
            worker::console_error!("upload failed: {error}");
            error.into_response()
        }
    }
}

async fn upload_response(req: &mut Request, state: &AppState) -> Result<UploadResponse, ApiError> {
    let form = req
        .form_data()
        .await
        .map_err(|error| ApiError::BadRequest(format!("expected multipart form data: {error}")))?;

    let mode = match form.get("mode") {
        Some(FormEntry::Field(value)) => parse_mode_field(Some(value.as_str()))?,
        _ => ProcessingMode::Auto,
    };

    let Some(FormEntry::File(file)) = form.get("file") else {
        return Err(ApiError::BadRequest("no file part in the request".to_string()));
    };
    let filename = file.name();
    if filename.is_empty() {
        return Err(ApiError::BadRequest("no file selected".to_string()));
    }
    if !allowed_file(&filename) {
        return Err(ApiError::UnsupportedMediaType(format!(
            "unsupported file type for '{filename}'; expected png, jpg, jpeg or gif"
        )));
    }
    validate_upload_size(file.size())?;
    let bytes = file.bytes().await?;
    validate_upload_size(bytes.len())?;

    let service_url = state.ocr_service_url.as_deref().ok_or_else(|| {
        ApiError::Internal(format!("{OCR_SERVICE_URL_VAR} is not configured"))
    })?;

    let image = decode_image(&bytes)?;
    let config = PipelineConfig::default();
    let prepared = prepare_image(&image, &config);
    let png = encode_png(&prepared.binary)?;

    let snapshot = ocr_service::recognize_page(service_url, &png).await?;
    let pipeline = Pipeline::new(config, snapshot);
    let (table, report) = pipeline.process_prepared(&prepared, mode)?;

    worker::console_log!(
        "upload processed: file={}, mode={}, strategy={:?}, rows={}, warnings={}",
        filename,
        mode.as_str(),
        report.strategy,
        report.row_count,
        report.warnings.len()
    );

    Ok(UploadResponse::new(table))
}

fn json_response<T>(payload: &T) -> Result<Response>
where
    T: Serialize,
{
    let mut response = Response::from_json(payload)?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}
