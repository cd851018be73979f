//! services/api/src/web/learn.rs
//!
//! The lesson player. Each logged-in user drives a single `LearningSession`
//! held in memory; starting another course resets it.

use crate::web::middleware::CurrentUser;
use crate::web::{catalog::LessonView, port_error, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use marketplace_core::navigation::{LearningSession, NavigationError};
use marketplace_core::util::calculate_progress;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use utoipa::ToSchema;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectLessonRequest {
    pub module_index: usize,
    pub lesson_index: usize,
}

/// Snapshot of the player after an operation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LearningStateResponse {
    pub course_id: String,
    pub course_title: String,
    pub module_index: usize,
    pub lesson_index: usize,
    pub module_title: Option<String>,
    pub lesson: Option<LessonView>,
    /// 1-based position across the whole course.
    pub lesson_number: Option<usize>,
    pub total_lessons: usize,
    pub completed_lessons: Vec<String>,
    pub progress_percent: f64,
    /// `progress_percent` rounded for display.
    pub progress_rounded: u32,
    pub is_first: bool,
    pub is_last: bool,
    /// Whether the last operation changed anything.
    pub changed: bool,
}

impl LearningStateResponse {
    fn snapshot(session: &LearningSession, changed: bool) -> Self {
        let cursor = session.cursor();
        let course = session.course();
        Self {
            course_id: course.id.clone(),
            course_title: course.title.clone(),
            module_index: cursor.module_index,
            lesson_index: cursor.lesson_index,
            module_title: session.current_module().map(|m| m.title.clone()),
            lesson: session.current_lesson().map(LessonView::from),
            lesson_number: session.current_lesson_number(),
            total_lessons: session.total_lessons(),
            completed_lessons: session.completed().iter().cloned().collect(),
            progress_percent: session.progress_percent(),
            progress_rounded: calculate_progress(session.completed().len(), session.total_lessons()),
            is_first: session.is_first(),
            is_last: session.is_last(),
            changed,
        }
    }
}

async fn active_session(
    state: &AppState,
    user_id: &str,
) -> Result<Arc<Mutex<LearningSession>>, (StatusCode, String)> {
    state.learning.get(user_id).await.ok_or((
        StatusCode::NOT_FOUND,
        "No active learning session".to_string(),
    ))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /learn/{course_id} - Open a course in the player, resetting progress
#[utoipa::path(
    post,
    path = "/learn/{course_id}",
    params(("course_id" = String, Path, description = "Course to open")),
    responses(
        (status = 200, description = "Session started", body = LearningStateResponse),
        (status = 404, description = "Course not found")
    )
)]
pub async fn start_learning_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(course_id): Path<String>,
) -> Result<Json<LearningStateResponse>, (StatusCode, String)> {
    let course = state
        .courses
        .get_course_by_id(&course_id)
        .await
        .map_err(|e| port_error(e, "Failed to load course"))?;

    info!("User {} opened course {}", current.user_id, course.id);
    let session = state.learning.start(&current.user_id, course).await;
    let session = session.lock().await;
    Ok(Json(LearningStateResponse::snapshot(&session, true)))
}

/// GET /learn - Current player state
#[utoipa::path(
    get,
    path = "/learn",
    responses(
        (status = 200, description = "Current state", body = LearningStateResponse),
        (status = 404, description = "No active learning session")
    )
)]
pub async fn learning_state_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<LearningStateResponse>, (StatusCode, String)> {
    let session = active_session(&state, &current.user_id).await?;
    let session = session.lock().await;
    Ok(Json(LearningStateResponse::snapshot(&session, false)))
}

/// POST /learn/next - Advance to the next lesson
#[utoipa::path(
    post,
    path = "/learn/next",
    responses(
        (status = 200, description = "State after advancing", body = LearningStateResponse),
        (status = 404, description = "No active learning session")
    )
)]
pub async fn next_lesson_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<LearningStateResponse>, (StatusCode, String)> {
    let session = active_session(&state, &current.user_id).await?;
    let mut session = session.lock().await;
    let moved = session.advance();
    debug!("advance for {} moved={}", current.user_id, moved);
    Ok(Json(LearningStateResponse::snapshot(&session, moved)))
}

/// POST /learn/previous - Go back to the previous lesson
#[utoipa::path(
    post,
    path = "/learn/previous",
    responses(
        (status = 200, description = "State after retreating", body = LearningStateResponse),
        (status = 404, description = "No active learning session")
    )
)]
pub async fn previous_lesson_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<LearningStateResponse>, (StatusCode, String)> {
    let session = active_session(&state, &current.user_id).await?;
    let mut session = session.lock().await;
    let moved = session.retreat();
    debug!("retreat for {} moved={}", current.user_id, moved);
    Ok(Json(LearningStateResponse::snapshot(&session, moved)))
}

/// POST /learn/select - Jump to a specific lesson
#[utoipa::path(
    post,
    path = "/learn/select",
    request_body = SelectLessonRequest,
    responses(
        (status = 200, description = "State after jumping", body = LearningStateResponse),
        (status = 400, description = "No lesson at those coordinates"),
        (status = 404, description = "No active learning session")
    )
)]
pub async fn select_lesson_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<SelectLessonRequest>,
) -> Result<Json<LearningStateResponse>, (StatusCode, String)> {
    let session = active_session(&state, &current.user_id).await?;
    let mut session = session.lock().await;
    session
        .select_lesson(req.module_index, req.lesson_index)
        .map_err(|e: NavigationError| (StatusCode::BAD_REQUEST, e.to_string()))?;
    Ok(Json(LearningStateResponse::snapshot(&session, true)))
}

/// POST /learn/complete - Mark the current lesson as completed
#[utoipa::path(
    post,
    path = "/learn/complete",
    responses(
        (status = 200, description = "State after marking", body = LearningStateResponse),
        (status = 404, description = "No active learning session")
    )
)]
pub async fn complete_lesson_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<LearningStateResponse>, (StatusCode, String)> {
    let session = active_session(&state, &current.user_id).await?;
    let mut session = session.lock().await;
    let added = session.mark_current_complete();
    Ok(Json(LearningStateResponse::snapshot(&session, added)))
}
