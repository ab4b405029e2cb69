//! Phase workflows: snapshot → evaluate (outside any lock) → one atomic write-back.
//!
//! Each batch operation belongs to exactly one phase and is refused elsewhere.
//! The write-back merges each result onto the record as it is stored at write
//! time, so a batch only ever sets its own field. A batch where every call fails
//! writes nothing and surfaces as `BatchFailed`.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::document::is_supported;
use crate::evaluation::{CvDocument, EvalError, Evaluator};
use crate::models::{Candidate, InterviewAnswer, InterviewEvaluation, JobDescription};
use crate::pipeline::batch::{fan_out, run_batch, run_batch_where, BatchFailure, BatchOutcome, BatchReport};
use crate::pipeline::phase::Phase;
use crate::pipeline::session::{SessionCommand, SessionError, SessionState, SessionStore};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Answers for one candidate, in the order of `InterviewQuestion::all()`.
#[derive(Debug, Clone, Deserialize)]
pub struct InterviewSubmission {
    pub candidate_id: Uuid,
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    /// Distinct files sent to the parser.
    pub attempted: usize,
    pub parsed: usize,
    pub failures: Vec<BatchFailure>,
    /// Repeated file names; only the first upload of each was parsed.
    pub duplicates: Vec<String>,
    pub candidates: Vec<Candidate>,
}

// ────────────────────────────────────────────────────────────────────────────
// Job description
// ────────────────────────────────────────────────────────────────────────────

/// Drafts a rubric for `text`. Nothing is stored; the caller confirms separately.
pub async fn analyze_job_description(
    session: &SessionStore,
    evaluator: &dyn Evaluator,
    text: &str,
) -> Result<JobDescription, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "job description text cannot be empty".to_string(),
        ));
    }
    if session.snapshot().await.job_description.is_some() {
        return Err(SessionError::JobDescriptionFrozen.into());
    }

    Ok(evaluator.analyze_job_description(text).await?)
}

/// Stores the job description and advances to CV scanning. Once stored it is
/// frozen until the session is reset.
pub async fn confirm_job_description(
    session: &SessionStore,
    jd: JobDescription,
) -> Result<(), AppError> {
    if jd.text.trim().is_empty() {
        return Err(AppError::Validation(
            "job description text cannot be empty".to_string(),
        ));
    }
    if jd.rubric.is_empty() {
        return Err(AppError::Validation(
            "rubric must have at least one criterion".to_string(),
        ));
    }
    let out_of_range = jd.out_of_range_criteria();
    if !out_of_range.is_empty() {
        return Err(AppError::Validation(format!(
            "rubric weights must be within 0..=1: {}",
            out_of_range.join(", ")
        )));
    }
    if !jd.weights_are_normalized() {
        warn!("confirming rubric with weight sum {:.3}", jd.total_weight());
    }

    let criteria = jd.rubric.len();
    session
        .dispatch_guarded(|state| -> Result<(Vec<SessionCommand>, ()), SessionError> {
            if state.job_description.is_some() {
                return Err(SessionError::JobDescriptionFrozen);
            }
            state.require_phase(Phase::JobDescription)?;
            Ok((
                vec![
                    SessionCommand::SetJobDescription(jd),
                    SessionCommand::SetPhase(Phase::CvScanning),
                ],
                (),
            ))
        })
        .await?;

    info!("job description confirmed with {criteria} criteria");
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// CV scanning
// ────────────────────────────────────────────────────────────────────────────

/// Parses every CV concurrently and replaces the candidate collection with the
/// successes, in upload order. Advances to screening when at least one parsed.
pub async fn scan_cvs(
    session: &SessionStore,
    evaluator: &dyn Evaluator,
    documents: Vec<CvDocument>,
) -> Result<ScanOutcome, AppError> {
    if documents.is_empty() {
        return Err(AppError::Validation("no CV files were uploaded".to_string()));
    }
    let unsupported: Vec<String> = documents
        .iter()
        .filter(|d| !is_supported(&d.media_type))
        .map(|d| format!("{} ({})", d.file_name, d.media_type))
        .collect();
    if !unsupported.is_empty() {
        return Err(AppError::UnprocessableEntity(format!(
            "unsupported CV file types: {}",
            unsupported.join(", ")
        )));
    }

    session.snapshot().await.require_phase(Phase::CvScanning)?;

    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    let mut unique = Vec::with_capacity(documents.len());
    for document in documents {
        if seen.insert(document.file_name.clone()) {
            unique.push(document);
        } else {
            duplicates.push(document.file_name);
        }
    }
    if !duplicates.is_empty() {
        info!("ignoring duplicate CV uploads: {}", duplicates.join(", "));
    }

    let file_names: Vec<String> = unique.iter().map(|d| d.file_name.clone()).collect();
    let results = fan_out(unique, |document| async move {
        evaluator.parse_cv(&document).await
    })
    .await;

    let mut candidates = Vec::new();
    let mut failures = Vec::new();
    for (file_name, result) in file_names.into_iter().zip(results) {
        match result {
            Ok(profile) => candidates.push(Candidate::new(profile)),
            Err(err) => {
                warn!("CV parsing failed for {file_name}: {err}");
                failures.push(BatchFailure {
                    candidate_id: None,
                    name: file_name,
                    kind: err.kind(),
                    message: err.to_string(),
                });
            }
        }
    }

    if candidates.is_empty() {
        return Err(AppError::BatchFailed {
            operation: "CV parsing".to_string(),
            failures,
        });
    }

    let stored = candidates.clone();
    session
        .dispatch_guarded(|state| {
            state.require_phase(Phase::CvScanning)?;
            Ok::<_, SessionError>((
                vec![
                    SessionCommand::SetCandidates(stored),
                    SessionCommand::SetSelectedCandidate(None),
                    SessionCommand::SetPhase(Phase::Screening),
                ],
                (),
            ))
        })
        .await?;

    info!(
        "CV scan: {}/{} parsed, phase -> {:?}",
        candidates.len(),
        candidates.len() + failures.len(),
        Phase::Screening
    );

    Ok(ScanOutcome {
        attempted: candidates.len() + failures.len(),
        parsed: candidates.len(),
        failures,
        duplicates,
        candidates,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Batches over existing candidates
// ────────────────────────────────────────────────────────────────────────────

/// Screens every candidate against the confirmed rubric.
pub async fn screen_candidates(
    session: &SessionStore,
    evaluator: &dyn Evaluator,
) -> Result<BatchReport, AppError> {
    let state = session.snapshot().await;
    state.require_phase(Phase::Screening)?;
    let jd = confirmed_job(&state)?;
    let rubric = jd.rubric.as_slice();

    let outcome = run_batch(
        "screening",
        state.candidates.clone(),
        |c| async move { evaluator.screen_candidate(&c.profile, rubric).await },
        Candidate::with_screening,
    )
    .await;

    write_back(
        session,
        "screening",
        outcome,
        Candidate::with_screening,
        |_| vec![],
    )
    .await
}

/// Generates interview questions for qualified candidates, optionally only the
/// ones listed. Selects the first qualified candidate if nothing is selected.
pub async fn generate_questions(
    session: &SessionStore,
    evaluator: &dyn Evaluator,
    candidate_ids: Option<Vec<Uuid>>,
) -> Result<BatchReport, AppError> {
    let state = session.snapshot().await;
    state.require_phase(Phase::QuestionGeneration)?;
    let job_text = confirmed_job(&state)?.text.as_str();

    let only: Option<HashSet<Uuid>> = match candidate_ids {
        Some(ids) => {
            for id in &ids {
                state
                    .candidate(*id)
                    .ok_or(SessionError::UnknownCandidate(*id))?;
            }
            Some(ids.into_iter().collect())
        }
        None => None,
    };

    let outcome = run_batch_where(
        "question generation",
        state.candidates.clone(),
        |c| c.is_qualified() && only.as_ref().map_or(true, |ids| ids.contains(&c.id)),
        |c| async move {
            evaluator
                .generate_interview_questions(&c.profile, job_text)
                .await
        },
        Candidate::with_questions,
    )
    .await;

    write_back(
        session,
        "question generation",
        outcome,
        Candidate::with_questions,
        |state| match state.selected_candidate_id {
            Some(_) => vec![],
            None => state
                .candidates
                .iter()
                .find(|c| c.is_qualified())
                .map(|c| vec![SessionCommand::SetSelectedCandidate(Some(c.id))])
                .unwrap_or_default(),
        },
    )
    .await
}

/// Evaluates submitted interview answers. Every submission must target a
/// qualified candidate with questions and answer each question.
pub async fn submit_interviews(
    session: &SessionStore,
    evaluator: &dyn Evaluator,
    submissions: Vec<InterviewSubmission>,
) -> Result<BatchReport, AppError> {
    if submissions.is_empty() {
        return Err(AppError::Validation(
            "at least one interview submission is required".to_string(),
        ));
    }

    let state = session.snapshot().await;
    state.require_phase(Phase::Interview)?;
    let job_text = confirmed_job(&state)?.text.as_str();

    let mut answers_by_id: HashMap<Uuid, Vec<InterviewAnswer>> = HashMap::new();
    for submission in submissions {
        let answers = pair_answers(&state, &submission)?;
        if answers_by_id.insert(submission.candidate_id, answers).is_some() {
            return Err(AppError::Validation(format!(
                "candidate {} was submitted more than once",
                submission.candidate_id
            )));
        }
    }

    let outcome = run_batch_where(
        "interview evaluation",
        state.candidates.clone(),
        |c| answers_by_id.contains_key(&c.id),
        |c| {
            let answers = answers_by_id.get(&c.id).cloned().unwrap_or_default();
            async move {
                let evaluation = evaluator
                    .evaluate_interview(&answers, &c.profile, job_text)
                    .await?;
                Ok::<_, EvalError>((answers, evaluation))
            }
        },
        |c, (answers, evaluation): (Vec<InterviewAnswer>, InterviewEvaluation)| {
            c.with_interview(answers, evaluation)
        },
    )
    .await;

    write_back(
        session,
        "interview evaluation",
        outcome,
        |c: Candidate, (answers, evaluation): (Vec<InterviewAnswer>, InterviewEvaluation)| {
            c.with_interview(answers, evaluation)
        },
        |_| vec![],
    )
    .await
}

/// Writes final reports for interviewed candidates that do not have one yet.
pub async fn generate_reports(
    session: &SessionStore,
    evaluator: &dyn Evaluator,
) -> Result<BatchReport, AppError> {
    let state = session.snapshot().await;
    state.require_phase(Phase::Report)?;

    let outcome = run_batch_where(
        "final report",
        state.candidates,
        |c| c.has_interview_evaluation() && !c.has_final_report(),
        |c| async move { evaluator.generate_final_report(&c).await },
        Candidate::with_final_report,
    )
    .await;

    write_back(
        session,
        "final report",
        outcome,
        Candidate::with_final_report,
        |_| vec![],
    )
    .await
}

// ────────────────────────────────────────────────────────────────────────────
// Selection
// ────────────────────────────────────────────────────────────────────────────

pub async fn select_candidate(session: &SessionStore, id: Option<Uuid>) -> Result<(), AppError> {
    session
        .dispatch_guarded(|state| {
            if let Some(id) = id {
                state
                    .candidate(id)
                    .ok_or(SessionError::UnknownCandidate(id))?;
            }
            Ok::<_, SessionError>((vec![SessionCommand::SetSelectedCandidate(id)], ()))
        })
        .await?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn confirmed_job(state: &SessionState) -> Result<&JobDescription, AppError> {
    state
        .job_description
        .as_ref()
        .ok_or_else(|| AppError::Conflict("no job description has been confirmed".to_string()))
}

/// Matches answers to the candidate's questions by position.
fn pair_answers(
    state: &SessionState,
    submission: &InterviewSubmission,
) -> Result<Vec<InterviewAnswer>, AppError> {
    let id = submission.candidate_id;
    let candidate = state
        .candidate(id)
        .ok_or(SessionError::UnknownCandidate(id))?;
    if !candidate.is_qualified() {
        return Err(AppError::Conflict(format!(
            "candidate {id} is not qualified for an interview"
        )));
    }
    let questions = candidate
        .questions
        .as_ref()
        .ok_or_else(|| AppError::Conflict(format!("candidate {id} has no interview questions")))?;

    if submission.answers.len() != questions.len() {
        return Err(AppError::Validation(format!(
            "candidate {id}: expected {} answers, got {}",
            questions.len(),
            submission.answers.len()
        )));
    }
    if let Some(blank) = submission.answers.iter().position(|a| a.trim().is_empty()) {
        return Err(AppError::Validation(format!(
            "candidate {id}: answer {} is blank",
            blank + 1
        )));
    }

    Ok(questions
        .all()
        .zip(&submission.answers)
        .map(|(question, answer)| InterviewAnswer {
            question: question.clone(),
            answer: answer.trim().to_string(),
        })
        .collect())
}

/// Merges the batch results onto the current records and applies `follow_up`
/// in the same dispatch. `follow_up` sees the state after the merge.
async fn write_back<T>(
    session: &SessionStore,
    operation: &str,
    mut outcome: BatchOutcome<T>,
    merge: impl Fn(Candidate, T) -> Candidate,
    follow_up: impl FnOnce(&SessionState) -> Vec<SessionCommand>,
) -> Result<BatchReport, AppError> {
    if outcome.all_failed() {
        return Err(AppError::BatchFailed {
            operation: operation.to_string(),
            failures: outcome.failures,
        });
    }

    let results = std::mem::take(&mut outcome.results);
    let stored = session
        .dispatch_guarded(|state| {
            let merged = state.merge_results(results, merge);
            let updated = state
                .clone()
                .apply(SessionCommand::UpdateCandidates(merged.clone()));
            let mut commands = vec![SessionCommand::UpdateCandidates(merged)];
            commands.extend(follow_up(&updated));
            Ok::<_, SessionError>((commands, updated.candidates))
        })
        .await?;

    Ok(outcome.into_report(stored))
}
