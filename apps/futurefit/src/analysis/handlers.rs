//! Axum route handler for the synchronous JSON analysis API.

use axum::{extract::Multipart, extract::State, Json};

use crate::analysis::schema::AnalysisResult;
use crate::errors::AppError;
use crate::intake::read_resume;
use crate::state::AppState;

/// POST /api/v1/analyze
///
/// Multipart upload with a single `resume` PDF. Runs the whole pipeline and
/// returns the sanitized `AnalysisResult`. Failures use the generic message.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let upload = read_resume(&mut multipart).await?;
    let result = state.analyzer.analyze(&upload).await?;
    Ok(Json(result))
}
