//! Axum route handlers for the pipeline API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::document::resolve_media_type;
use crate::evaluation::CvDocument;
use crate::models::{Candidate, JobDescription};
use crate::pipeline::batch::BatchReport;
use crate::pipeline::phase::Phase;
use crate::pipeline::ranking::{
    chart_series, final_ranking, partition_by_qualification, ChartPoint, QualificationPartition,
};
use crate::pipeline::session::SessionState;
use crate::pipeline::workflow::{self, InterviewSubmission, ScanOutcome};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PhaseRequest {
    pub phase: Phase,
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub candidate_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeJdRequest {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuestionsRequest {
    #[serde(default)]
    pub candidate_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize)]
pub struct InterviewsRequest {
    pub submissions: Vec<InterviewSubmission>,
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionState> {
    Json(state.session.snapshot().await)
}

/// POST /api/v1/session/reset
pub async fn handle_reset_session(State(state): State<AppState>) -> Json<SessionState> {
    state.session.reset().await;
    Json(state.session.snapshot().await)
}

/// POST /api/v1/session/phase
///
/// Guarded navigation: any earlier phase, or the next one once its inputs exist.
pub async fn handle_set_phase(
    State(state): State<AppState>,
    Json(request): Json<PhaseRequest>,
) -> Result<Json<SessionState>, AppError> {
    state.session.transition_to(request.phase).await?;
    Ok(Json(state.session.snapshot().await))
}

/// PUT /api/v1/session/selection
pub async fn handle_select_candidate(
    State(state): State<AppState>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<SessionState>, AppError> {
    workflow::select_candidate(&state.session, request.candidate_id).await?;
    Ok(Json(state.session.snapshot().await))
}

// ────────────────────────────────────────────────────────────────────────────
// Job description
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/job-description/analyze
///
/// Returns a draft rubric for review. Nothing is stored until confirm.
pub async fn handle_analyze_jd(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeJdRequest>,
) -> Result<Json<JobDescription>, AppError> {
    let jd = workflow::analyze_job_description(
        &state.session,
        state.evaluator.as_ref(),
        &request.text,
    )
    .await?;
    Ok(Json(jd))
}

/// POST /api/v1/job-description/confirm
pub async fn handle_confirm_jd(
    State(state): State<AppState>,
    Json(jd): Json<JobDescription>,
) -> Result<Json<SessionState>, AppError> {
    workflow::confirm_job_description(&state.session, jd).await?;
    Ok(Json(state.session.snapshot().await))
}

// ────────────────────────────────────────────────────────────────────────────
// Candidates
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/candidates/cvs
///
/// Multipart upload; every part with a file name is treated as one CV.
pub async fn handle_upload_cvs(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScanOutcome>, AppError> {
    let mut documents = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let media_type = resolve_media_type(field.content_type(), &file_name);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("could not read {file_name}: {e}")))?;
        documents.push(CvDocument {
            file_name,
            media_type,
            bytes,
        });
    }

    let outcome = workflow::scan_cvs(&state.session, state.evaluator.as_ref(), documents).await?;
    Ok(Json(outcome))
}

/// GET /api/v1/candidates/partition
pub async fn handle_partition(State(state): State<AppState>) -> Json<QualificationPartition> {
    let snapshot = state.session.snapshot().await;
    Json(partition_by_qualification(&snapshot.candidates))
}

// ────────────────────────────────────────────────────────────────────────────
// Batches
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screening
pub async fn handle_screening(
    State(state): State<AppState>,
) -> Result<Json<BatchReport>, AppError> {
    let outcome = workflow::screen_candidates(&state.session, state.evaluator.as_ref()).await?;
    Ok(Json(outcome))
}

/// POST /api/v1/questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(request): Json<QuestionsRequest>,
) -> Result<Json<BatchReport>, AppError> {
    let outcome = workflow::generate_questions(
        &state.session,
        state.evaluator.as_ref(),
        request.candidate_ids,
    )
    .await?;
    Ok(Json(outcome))
}

/// POST /api/v1/interviews
pub async fn handle_submit_interviews(
    State(state): State<AppState>,
    Json(request): Json<InterviewsRequest>,
) -> Result<Json<BatchReport>, AppError> {
    let outcome = workflow::submit_interviews(
        &state.session,
        state.evaluator.as_ref(),
        request.submissions,
    )
    .await?;
    Ok(Json(outcome))
}

/// POST /api/v1/reports
pub async fn handle_generate_reports(
    State(state): State<AppState>,
) -> Result<Json<BatchReport>, AppError> {
    let outcome = workflow::generate_reports(&state.session, state.evaluator.as_ref()).await?;
    Ok(Json(outcome))
}

// ────────────────────────────────────────────────────────────────────────────
// Reporting views
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/reports/chart
pub async fn handle_chart(State(state): State<AppState>) -> Json<Vec<ChartPoint>> {
    let snapshot = state.session.snapshot().await;
    Json(chart_series(
        &snapshot.candidates,
        state.config.interview_score_scale,
    ))
}

/// GET /api/v1/reports/ranking
pub async fn handle_ranking(State(state): State<AppState>) -> Json<Vec<Candidate>> {
    let snapshot = state.session.snapshot().await;
    Json(final_ranking(&snapshot.candidates))
}
