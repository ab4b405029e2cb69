//! Evaluation service — the black box that does all domain judgment.
//!
//! The pipeline only knows the `Evaluator` trait. `LlmEvaluator` is the
//! production backend; tests use `mock::ScriptedEvaluator`.
//!
//! `AppState` holds an `Arc<dyn Evaluator>`.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::models::{
    Candidate, CandidateProfile, FinalReport, InterviewAnswer, InterviewEvaluation,
    InterviewQuestion, JobDescription, RubricItem, ScreeningResult,
};

pub mod document;
pub mod llm_evaluator;
pub mod prompts;

#[cfg(test)]
pub mod mock;

pub use llm_evaluator::LlmEvaluator;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Why the evaluation service produced no value for one call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Network, auth, or API failure reaching the service.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service answered but the payload did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// No evaluation is possible for this input.
    #[error("declined: {0}")]
    Declined(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalErrorKind {
    Transport,
    Malformed,
    Declined,
}

impl EvalError {
    pub fn kind(&self) -> EvalErrorKind {
        match self {
            EvalError::Transport(_) => EvalErrorKind::Transport,
            EvalError::Malformed(_) => EvalErrorKind::Malformed,
            EvalError::Declined(_) => EvalErrorKind::Declined,
        }
    }
}

impl From<LlmError> for EvalError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Parse(_) | LlmError::EmptyContent => EvalError::Malformed(err.to_string()),
            LlmError::Http(_) | LlmError::Api { .. } | LlmError::RateLimited { .. } => {
                EvalError::Transport(err.to_string())
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

/// An uploaded CV, as received.
#[derive(Debug, Clone)]
pub struct CvDocument {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The six operations of the evaluation service. Each call is independent and
/// idempotent; none of them touch session state.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn analyze_job_description(&self, text: &str) -> Result<JobDescription, EvalError>;

    async fn parse_cv(&self, document: &CvDocument) -> Result<CandidateProfile, EvalError>;

    async fn screen_candidate(
        &self,
        profile: &CandidateProfile,
        rubric: &[RubricItem],
    ) -> Result<ScreeningResult, EvalError>;

    async fn generate_interview_questions(
        &self,
        profile: &CandidateProfile,
        job_text: &str,
    ) -> Result<InterviewQuestion, EvalError>;

    async fn evaluate_interview(
        &self,
        answers: &[InterviewAnswer],
        profile: &CandidateProfile,
        job_text: &str,
    ) -> Result<InterviewEvaluation, EvalError>;

    async fn generate_final_report(&self, candidate: &Candidate)
        -> Result<FinalReport, EvalError>;
}
