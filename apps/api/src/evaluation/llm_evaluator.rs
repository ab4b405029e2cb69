//! `Evaluator` backed by Claude through `LlmClient`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::evaluation::document::extract_text;
use crate::evaluation::prompts::{
    CV_PARSE_PROMPT, CV_PARSE_SYSTEM, FINAL_REPORT_PROMPT, FINAL_REPORT_SYSTEM,
    INTERVIEW_EVALUATION_PROMPT, INTERVIEW_EVALUATION_SYSTEM, JD_ANALYSIS_PROMPT,
    JD_ANALYSIS_SYSTEM, QUESTIONS_PROMPT, QUESTIONS_SYSTEM, SCREENING_PROMPT, SCREENING_SYSTEM,
};
use crate::evaluation::{CvDocument, EvalError, Evaluator};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::LlmClient;
use crate::models::{
    Candidate, CandidateProfile, FinalReport, InterviewAnswer, InterviewEvaluation,
    InterviewQuestion, JobDescription, RubricItem, ScreeningResult,
};

#[derive(Debug, Deserialize)]
struct RubricReply {
    rubric: Vec<RubricItem>,
}

pub struct LlmEvaluator {
    llm: LlmClient,
}

impl LlmEvaluator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Evaluator for LlmEvaluator {
    async fn analyze_job_description(&self, text: &str) -> Result<JobDescription, EvalError> {
        let prompt = fill_template(JD_ANALYSIS_PROMPT, &[("jd_text", text)]);
        let reply: RubricReply = self.llm.call_json(&prompt, JD_ANALYSIS_SYSTEM).await?;
        let jd = validate_rubric(JobDescription {
            text: text.to_string(),
            rubric: reply.rubric,
        })?;
        info!(
            "JD analyzed: {} criteria, total weight {:.2}",
            jd.rubric.len(),
            jd.total_weight()
        );
        Ok(jd)
    }

    async fn parse_cv(&self, document: &CvDocument) -> Result<CandidateProfile, EvalError> {
        let cv_text = extract_text(document).await?;
        let prompt = fill_template(
            CV_PARSE_PROMPT,
            &[
                ("file_name", document.file_name.as_str()),
                ("cv_text", cv_text.as_str()),
            ],
        );
        let profile: CandidateProfile = self.llm.call_json(&prompt, CV_PARSE_SYSTEM).await?;
        Ok(profile.normalized())
    }

    async fn screen_candidate(
        &self,
        profile: &CandidateProfile,
        rubric: &[RubricItem],
    ) -> Result<ScreeningResult, EvalError> {
        let rubric = to_json(rubric)?;
        let profile = to_json(profile)?;
        let prompt = fill_template(
            SCREENING_PROMPT,
            &[("rubric", rubric.as_str()), ("profile", profile.as_str())],
        );
        Ok(self.llm.call_json(&prompt, SCREENING_SYSTEM).await?)
    }

    async fn generate_interview_questions(
        &self,
        profile: &CandidateProfile,
        job_text: &str,
    ) -> Result<InterviewQuestion, EvalError> {
        let profile = to_json(profile)?;
        let prompt = fill_template(
            QUESTIONS_PROMPT,
            &[("profile", profile.as_str()), ("jd_text", job_text)],
        );
        let questions: InterviewQuestion = self.llm.call_json(&prompt, QUESTIONS_SYSTEM).await?;
        if questions.is_empty() {
            return Err(EvalError::Malformed(
                "no interview questions were generated".to_string(),
            ));
        }
        Ok(questions)
    }

    async fn evaluate_interview(
        &self,
        answers: &[InterviewAnswer],
        profile: &CandidateProfile,
        job_text: &str,
    ) -> Result<InterviewEvaluation, EvalError> {
        let profile = to_json(profile)?;
        let answers = to_json(answers)?;
        let prompt = fill_template(
            INTERVIEW_EVALUATION_PROMPT,
            &[
                ("profile", profile.as_str()),
                ("jd_text", job_text),
                ("answers", answers.as_str()),
            ],
        );
        Ok(self
            .llm
            .call_json(&prompt, INTERVIEW_EVALUATION_SYSTEM)
            .await?)
    }

    async fn generate_final_report(
        &self,
        candidate: &Candidate,
    ) -> Result<FinalReport, EvalError> {
        let data = json!({
            "profile": candidate.profile,
            "screening": candidate.screening,
            "interview_evaluation": candidate.interview_evaluation,
        });
        let data = to_json(&data)?;
        let prompt = fill_template(FINAL_REPORT_PROMPT, &[("candidate", data.as_str())]);
        Ok(self.llm.call_json(&prompt, FINAL_REPORT_SYSTEM).await?)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, EvalError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| EvalError::Malformed(format!("could not serialize prompt input: {e}")))
}

/// Rejects rubrics the pipeline cannot score against. A weight sum away from 1
/// is only logged; the weights are passed through as produced.
fn validate_rubric(jd: JobDescription) -> Result<JobDescription, EvalError> {
    if jd.rubric.is_empty() {
        return Err(EvalError::Malformed("rubric has no criteria".to_string()));
    }
    let out_of_range = jd.out_of_range_criteria();
    if !out_of_range.is_empty() {
        return Err(EvalError::Malformed(format!(
            "rubric weights outside 0..=1 for: {}",
            out_of_range.join(", ")
        )));
    }
    if !jd.weights_are_normalized() {
        warn!(
            "rubric weights sum to {:.3}, expected 1.0",
            jd.total_weight()
        );
    }
    Ok(jd)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(criterion: &str, weight: f64) -> RubricItem {
        RubricItem {
            criterion: criterion.to_string(),
            weight,
            description: String::new(),
        }
    }

    fn jd(rubric: Vec<RubricItem>) -> JobDescription {
        JobDescription {
            text: "Data engineer".to_string(),
            rubric,
        }
    }

    #[test]
    fn test_validate_rubric_accepts_normalized_weights() {
        let rubric = vec![item("skillMatch", 0.5), item("experience", 0.5)];
        assert_eq!(validate_rubric(jd(rubric.clone())).unwrap().rubric, rubric);
    }

    #[test]
    fn test_validate_rubric_passes_unnormalized_weights_through() {
        let rubric = vec![item("skillMatch", 0.5), item("experience", 0.9)];
        assert!(validate_rubric(jd(rubric)).is_ok());
    }

    #[test]
    fn test_validate_rubric_rejects_empty() {
        assert!(matches!(
            validate_rubric(jd(vec![])),
            Err(EvalError::Malformed(_))
        ));
    }

    #[test]
    fn test_validate_rubric_rejects_out_of_range_weight() {
        let err = validate_rubric(jd(vec![item("keywords", 2.0)])).unwrap_err();
        assert!(err.to_string().contains("keywords"));
    }

    #[test]
    fn test_rubric_reply_deserializes() {
        let json = r#"{"rubric": [{"criterion": "education", "weight": 0.2, "description": "BSc or equivalent"}]}"#;
        let reply: RubricReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.rubric[0].criterion, "education");
    }
}
