//! Axum route handlers for the browser UI.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::intake::read_resume;
use crate::render;
use crate::session::UploadState;
use crate::state::AppState;

fn session_url(id: Uuid) -> String {
    format!("/sessions/{id}")
}

/// Browser form posts refused because the session is busy, showing results
/// or gone land back on the session page, which renders whatever phase it is
/// in (or starts over). Other errors pass through.
fn back_to_session(id: Uuid, err: AppError) -> Result<Response, AppError> {
    match err {
        AppError::Conflict(reason) | AppError::NotFound(reason) => {
            debug!("Session {id}: request refused: {reason}");
            Ok(Redirect::to(&session_url(id)).into_response())
        }
        other => Err(other),
    }
}

/// GET /
///
/// Starts a fresh session and redirects to it.
pub async fn handle_index(State(state): State<AppState>) -> Redirect {
    let id = state.orchestrator.new_session().await;
    Redirect::to(&session_url(id))
}

/// GET /sessions/:id
///
/// Renders the page for the session's current phase. Unknown or expired
/// sessions start over.
pub async fn handle_show(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.orchestrator.sessions().get(id).await {
        Some(session) => Html(render::page_for(id, &session)).into_response(),
        None => Redirect::to("/").into_response(),
    }
}

/// POST /sessions/:id/upload
///
/// Accepts one PDF and starts the analysis. Intake errors re-render the
/// intake widget with the message and leave the session untouched. Uploads
/// while busy or while results are shown redirect back to the session page.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    if let Err(e) = state.orchestrator.ensure_accepting(id).await {
        return back_to_session(id, e);
    }

    let upload = match read_resume(&mut multipart).await {
        Ok(upload) => upload,
        Err(e) => {
            let page = render::layout(&render::intake_page(id, Some(&e.to_string())), None);
            return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
        }
    };

    if let Err(e) = state.orchestrator.start(id, upload).await {
        return back_to_session(id, e);
    }
    Ok(Redirect::to(&session_url(id)).into_response())
}

/// GET /sessions/:id/progress
pub async fn handle_progress(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UploadState>, AppError> {
    let session = state.orchestrator.session(id).await?;
    Ok(Json(session.upload))
}

/// POST /sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    if let Err(e) = state.orchestrator.reset(id).await {
        return back_to_session(id, e);
    }
    Ok(Redirect::to(&session_url(id)).into_response())
}
