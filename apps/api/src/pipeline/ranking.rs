//! Pure views over the candidate collection.
//! Nothing here is cached; callers recompute from a fresh snapshot.

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Candidate, ScreeningStatus};

/// Maps the 1 – 10 per-question interview scale onto 0 – 100.
pub const DEFAULT_INTERVIEW_SCORE_SCALE: f64 = 10.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QualificationPartition {
    pub qualified: Vec<Candidate>,
    pub disqualified: Vec<Candidate>,
}

/// One bar pair in the screening-vs-interview comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub candidate_id: Uuid,
    pub name: String,
    pub screening_score: f64,
    pub interview_score: f64,
}

impl ChartPoint {
    pub fn combined(&self) -> f64 {
        self.screening_score + self.interview_score
    }
}

/// Splits screened candidates by status. Unscreened candidates land in neither list.
pub fn partition_by_qualification(candidates: &[Candidate]) -> QualificationPartition {
    let mut partition = QualificationPartition::default();
    for candidate in candidates {
        match candidate.screening.as_ref().map(|s| s.status) {
            Some(ScreeningStatus::Qualified) => partition.qualified.push(candidate.clone()),
            Some(ScreeningStatus::Disqualified) => partition.disqualified.push(candidate.clone()),
            None => {}
        }
    }
    partition
}

/// Chart data for every candidate with an interview evaluation, best combined score first.
/// Equal totals keep their input order.
pub fn chart_series(candidates: &[Candidate], interview_scale: f64) -> Vec<ChartPoint> {
    let mut series: Vec<ChartPoint> = candidates
        .iter()
        .filter_map(|c| {
            let evaluation = c.interview_evaluation.as_ref()?;
            Some(ChartPoint {
                candidate_id: c.id,
                name: c.profile.display_name().to_string(),
                screening_score: c.screening.as_ref().map_or(0.0, |s| s.total_score),
                interview_score: evaluation.mean_score() * interview_scale,
            })
        })
        .collect();
    series.sort_by(|a, b| b.combined().total_cmp(&a.combined()));
    series
}

/// Candidates with a final report: Recommend, then Consider, then Reject.
/// Equal recommendations keep their input order.
pub fn final_ranking(candidates: &[Candidate]) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = candidates
        .iter()
        .filter(|c| c.has_final_report())
        .cloned()
        .collect();
    ranked.sort_by_key(|c| c.final_report.as_ref().map(|r| r.recommendation.rank()));
    ranked
}
