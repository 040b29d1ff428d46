use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::review::report::{render, ReviewView};
use crate::review::session::{ReviewState, Upload, UploadedFile};
use crate::state::AppState;

/// Multipart field carrying the résumé.
const FILE_FIELD: &str = "file";

fn view_of(state: &AppState, review: &ReviewState) -> ReviewView {
    let orchestrator = &state.review;
    render(review, orchestrator.is_ai_ready(), orchestrator.settings())
}

fn malformed(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge("The uploaded file is too large.".to_string());
    }
    AppError::InvalidUpload(format!("Malformed upload: {e}"))
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or("resume.pdf").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(malformed)?;
        return Ok(Upload {
            file: UploadedFile {
                name,
                content_type,
                size: data.len(),
            },
            data,
        });
    }
    Err(AppError::InvalidUpload("No file was uploaded.".to_string()))
}

/// GET /api/v1/review
pub async fn handle_get_review(State(state): State<AppState>) -> Json<ReviewView> {
    let review = state.review.snapshot().await;
    Json(view_of(&state, &review))
}

/// POST /api/v1/review
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ReviewView>, AppError> {
    if !state.review.is_ai_ready() {
        return Err(AppError::NotReady);
    }
    let upload = read_upload(multipart).await?;
    let review = state.review.submit(upload).await?;
    Ok(Json(view_of(&state, &review)))
}

/// POST /api/v1/review/reset
pub async fn handle_reset(State(state): State<AppState>) -> Result<Json<ReviewView>, AppError> {
    let review = state.review.reset().await?;
    Ok(Json(view_of(&state, &review)))
}
