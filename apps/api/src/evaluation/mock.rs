//! Scripted `Evaluator` for workflow and HTTP tests.
//!
//! Results are keyed by CV file name (for `parse_cv`) or by candidate name
//! (everything else). Unscripted candidates get neutral defaults.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::evaluation::{CvDocument, EvalError, Evaluator};
use crate::models::{
    Candidate, CandidateProfile, FinalReport, InterviewAnswer, InterviewEvaluation,
    InterviewQuestion, JobDescription, QuestionScore, Recommendation, RubricItem,
    ScreeningResult, ScreeningScore, ScreeningStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptedOp {
    AnalyzeJobDescription,
    ParseCv,
    Screen,
    Questions,
    EvaluateInterview,
    FinalReport,
}

#[derive(Default)]
pub struct ScriptedEvaluator {
    rubric: Vec<RubricItem>,
    profiles: HashMap<String, CandidateProfile>,
    screening: HashMap<String, (f64, ScreeningStatus)>,
    interview_scores: HashMap<String, Vec<f64>>,
    recommendations: HashMap<String, Recommendation>,
    failures: HashMap<(ScriptedOp, String), EvalError>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(ScriptedOp, String)>>,
}

pub fn rubric_item(criterion: &str, weight: f64) -> RubricItem {
    RubricItem {
        criterion: criterion.to_string(),
        weight,
        description: format!("{criterion} fit for the role"),
    }
}

/// skillMatch 0.4, experience 0.3, education 0.2, keywords 0.1.
pub fn standard_rubric() -> Vec<RubricItem> {
    vec![
        rubric_item("skillMatch", 0.4),
        rubric_item("experience", 0.3),
        rubric_item("education", 0.2),
        rubric_item("keywords", 0.1),
    ]
}

pub fn profile(name: &str) -> CandidateProfile {
    CandidateProfile {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        skills: vec!["Rust".to_string(), "SQL".to_string()],
        ..Default::default()
    }
}

impl ScriptedEvaluator {
    pub fn new() -> Self {
        Self {
            rubric: standard_rubric(),
            ..Default::default()
        }
    }

    pub fn with_rubric(mut self, rubric: Vec<RubricItem>) -> Self {
        self.rubric = rubric;
        self
    }

    /// `parse_cv` for `file_name` yields a profile named `name`.
    pub fn with_cv(mut self, file_name: &str, name: &str) -> Self {
        self.profiles.insert(file_name.to_string(), profile(name));
        self
    }

    pub fn with_screening(mut self, name: &str, total_score: f64, status: ScreeningStatus) -> Self {
        self.screening
            .insert(name.to_string(), (total_score, status));
        self
    }

    pub fn with_interview_scores(mut self, name: &str, scores: Vec<f64>) -> Self {
        self.interview_scores.insert(name.to_string(), scores);
        self
    }

    pub fn with_recommendation(mut self, name: &str, recommendation: Recommendation) -> Self {
        self.recommendations.insert(name.to_string(), recommendation);
        self
    }

    /// `key` is the file name for `ParseCv`, the candidate name otherwise.
    pub fn failing(mut self, op: ScriptedOp, key: &str, err: EvalError) -> Self {
        self.failures.insert((op, key.to_string()), err);
        self
    }

    /// Delays every call made for `key` (file or candidate name).
    pub fn with_delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    pub fn calls(&self, op: ScriptedOp) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(o, _)| *o == op)
            .map(|(_, key)| key.clone())
            .collect()
    }

    async fn enter(&self, op: ScriptedOp, key: &str) -> Result<(), EvalError> {
        self.calls.lock().unwrap().push((op, key.to_string()));
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
        match self.failures.get(&(op, key.to_string())) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Evaluator for ScriptedEvaluator {
    async fn analyze_job_description(&self, text: &str) -> Result<JobDescription, EvalError> {
        self.enter(ScriptedOp::AnalyzeJobDescription, "").await?;
        Ok(JobDescription {
            text: text.to_string(),
            rubric: self.rubric.clone(),
        })
    }

    async fn parse_cv(&self, document: &CvDocument) -> Result<CandidateProfile, EvalError> {
        self.enter(ScriptedOp::ParseCv, &document.file_name).await?;
        self.profiles
            .get(&document.file_name)
            .cloned()
            .ok_or_else(|| EvalError::Declined(format!("no text in {}", document.file_name)))
    }

    async fn screen_candidate(
        &self,
        profile: &CandidateProfile,
        rubric: &[RubricItem],
    ) -> Result<ScreeningResult, EvalError> {
        self.enter(ScriptedOp::Screen, &profile.name).await?;
        let (total_score, status) = self
            .screening
            .get(&profile.name)
            .copied()
            .unwrap_or((50.0, ScreeningStatus::Disqualified));
        Ok(ScreeningResult {
            scores: rubric
                .iter()
                .map(|item| ScreeningScore {
                    criterion: item.criterion.clone(),
                    score: total_score / 10.0,
                    justification: "scripted".to_string(),
                })
                .collect(),
            total_score,
            summary: format!("{} screened", profile.name),
            status,
        })
    }

    async fn generate_interview_questions(
        &self,
        profile: &CandidateProfile,
        _job_text: &str,
    ) -> Result<InterviewQuestion, EvalError> {
        self.enter(ScriptedOp::Questions, &profile.name).await?;
        Ok(InterviewQuestion {
            technical_questions: vec![
                format!("{}: describe a Rust project", profile.name),
                format!("{}: how do you tune SQL?", profile.name),
            ],
            culture_fit_questions: vec![format!("{}: how do you handle review?", profile.name)],
        })
    }

    async fn evaluate_interview(
        &self,
        answers: &[InterviewAnswer],
        profile: &CandidateProfile,
        _job_text: &str,
    ) -> Result<InterviewEvaluation, EvalError> {
        self.enter(ScriptedOp::EvaluateInterview, &profile.name)
            .await?;
        let scores = self.interview_scores.get(&profile.name);
        Ok(InterviewEvaluation {
            evaluation: answers
                .iter()
                .enumerate()
                .map(|(i, a)| QuestionScore {
                    question: a.question.clone(),
                    answer: a.answer.clone(),
                    score: scores.and_then(|s| s.get(i)).copied().unwrap_or(7.0),
                    feedback: "scripted".to_string(),
                })
                .collect(),
            overall_summary: format!("{} interviewed", profile.name),
        })
    }

    async fn generate_final_report(
        &self,
        candidate: &Candidate,
    ) -> Result<FinalReport, EvalError> {
        let name = &candidate.profile.name;
        self.enter(ScriptedOp::FinalReport, name).await?;
        Ok(FinalReport {
            recommendation: self
                .recommendations
                .get(name)
                .copied()
                .unwrap_or(Recommendation::Consider),
            ceo_summary: format!("{name} report"),
            strengths: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            weaknesses: vec!["x".to_string(), "y".to_string(), "z".to_string()],
        })
    }
}
