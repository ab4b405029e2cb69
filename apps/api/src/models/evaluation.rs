//! Phase outputs produced by the evaluation service. Stored as received.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreeningStatus {
    Qualified,
    Disqualified,
}

/// Score for a single rubric criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningScore {
    pub criterion: String,
    /// 1 – 10
    pub score: f64,
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub scores: Vec<ScreeningScore>,
    /// Weighted 0 – 100
    pub total_score: f64,
    pub summary: String,
    pub status: ScreeningStatus,
}

impl ScreeningResult {
    pub fn is_qualified(&self) -> bool {
        self.status == ScreeningStatus::Qualified
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub technical_questions: Vec<String>,
    pub culture_fit_questions: Vec<String>,
}

impl InterviewQuestion {
    /// Technical questions first, then culture fit, in generation order.
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.technical_questions
            .iter()
            .chain(self.culture_fit_questions.iter())
    }

    pub fn len(&self) -> usize {
        self.technical_questions.len() + self.culture_fit_questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewAnswer {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionScore {
    pub question: String,
    pub answer: String,
    /// 1 – 10
    pub score: f64,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewEvaluation {
    pub evaluation: Vec<QuestionScore>,
    pub overall_summary: String,
}

impl InterviewEvaluation {
    /// Mean per-question score; 0 for an empty evaluation.
    pub fn mean_score(&self) -> f64 {
        if self.evaluation.is_empty() {
            return 0.0;
        }
        let total: f64 = self.evaluation.iter().map(|e| e.score).sum();
        total / self.evaluation.len() as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    Recommend,
    Consider,
    Reject,
}

impl Recommendation {
    /// Sort key for the final ranking, best first.
    pub fn rank(self) -> u8 {
        match self {
            Recommendation::Recommend => 1,
            Recommendation::Consider => 2,
            Recommendation::Reject => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalReport {
    pub recommendation: Recommendation,
    pub ceo_summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}
