//! One candidate's record, accreting phase outputs as the pipeline runs.
//!
//! Records are never mutated in place. Every `with_*` transform consumes the old
//! record and returns a new one, so a snapshot handed to a reader stays valid
//! while the session moves on.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::evaluation::{
    FinalReport, InterviewAnswer, InterviewEvaluation, InterviewQuestion, ScreeningResult,
};
use crate::models::profile::CandidateProfile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub profile: CandidateProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screening: Option<ScreeningResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<InterviewQuestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_answers: Option<Vec<InterviewAnswer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_evaluation: Option<InterviewEvaluation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_report: Option<FinalReport>,
}

impl Candidate {
    /// A freshly parsed candidate with a new id and no phase outputs.
    pub fn new(profile: CandidateProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile,
            screening: None,
            questions: None,
            interview_answers: None,
            interview_evaluation: None,
            final_report: None,
        }
    }

    pub fn with_screening(self, screening: ScreeningResult) -> Self {
        Self {
            screening: Some(screening),
            ..self
        }
    }

    pub fn with_questions(self, questions: InterviewQuestion) -> Self {
        Self {
            questions: Some(questions),
            ..self
        }
    }

    /// Stores the submitted answers alongside their evaluation.
    pub fn with_interview(
        self,
        answers: Vec<InterviewAnswer>,
        evaluation: InterviewEvaluation,
    ) -> Self {
        Self {
            interview_answers: Some(answers),
            interview_evaluation: Some(evaluation),
            ..self
        }
    }

    pub fn with_final_report(self, report: FinalReport) -> Self {
        Self {
            final_report: Some(report),
            ..self
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.screening.as_ref().is_some_and(|s| s.is_qualified())
    }

    pub fn has_questions(&self) -> bool {
        self.questions.is_some()
    }

    pub fn has_interview_evaluation(&self) -> bool {
        self.interview_evaluation.is_some()
    }

    pub fn has_final_report(&self) -> bool {
        self.final_report.is_some()
    }
}
