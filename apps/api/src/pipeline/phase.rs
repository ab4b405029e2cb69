//! Phase state machine — the six ordered evaluation phases and their entry guards.
//!
//! Moving backward is always allowed and never clears data. Moving forward is
//! allowed one phase at a time, and only once the previous phase has produced
//! what the next one consumes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::session::SessionState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    JobDescription,
    CvScanning,
    Screening,
    QuestionGeneration,
    Interview,
    Report,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot move from {from:?} to {to:?}: phases must be entered in order")]
    SkipsAhead { from: Phase, to: Phase },

    #[error("cannot enter {phase:?}: {requirement}")]
    MissingPrerequisite {
        phase: Phase,
        requirement: &'static str,
    },
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::JobDescription,
        Phase::CvScanning,
        Phase::Screening,
        Phase::QuestionGeneration,
        Phase::Interview,
        Phase::Report,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Phase> {
        Phase::ALL.get(self.index() + 1).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Phase::JobDescription => "Job Description",
            Phase::CvScanning => "CV Scanning",
            Phase::Screening => "AI Screening",
            Phase::QuestionGeneration => "Question Generation",
            Phase::Interview => "AI Interview",
            Phase::Report => "Final Report",
        }
    }

    /// Checks that `state` holds everything this phase needs on entry.
    pub fn check_entry(self, state: &SessionState) -> Result<(), TransitionError> {
        let requirement = match self {
            Phase::JobDescription => None,
            Phase::CvScanning => state
                .job_description
                .is_none()
                .then_some("a job description must be confirmed first"),
            Phase::Screening => state
                .candidates
                .is_empty()
                .then_some("at least one CV must be parsed first"),
            Phase::QuestionGeneration => (!state.candidates.iter().any(|c| c.is_qualified()))
                .then_some("at least one candidate must be qualified by screening"),
            Phase::Interview => (!state
                .candidates
                .iter()
                .any(|c| c.is_qualified() && c.has_questions()))
            .then_some("at least one qualified candidate needs generated questions"),
            Phase::Report => (!state
                .candidates
                .iter()
                .any(|c| c.is_qualified() && c.has_interview_evaluation()))
            .then_some("at least one qualified candidate needs an evaluated interview"),
        };

        match requirement {
            Some(requirement) => Err(TransitionError::MissingPrerequisite {
                phase: self,
                requirement,
            }),
            None => Ok(()),
        }
    }
}

/// Validates a move from the state's current phase to `target`.
///
/// Backward (or same-phase) moves always succeed. Forward moves must target the
/// immediately next phase and satisfy its entry guard.
pub fn validate_transition(state: &SessionState, target: Phase) -> Result<(), TransitionError> {
    let current = state.current_phase;
    if target <= current {
        return Ok(());
    }
    if current.next() != Some(target) {
        return Err(TransitionError::SkipsAhead {
            from: current,
            to: target,
        });
    }
    target.check_entry(state)
}
