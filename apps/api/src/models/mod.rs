pub mod candidate;
pub mod evaluation;
pub mod job;
pub mod profile;

pub use candidate::Candidate;
pub use evaluation::{
    FinalReport, InterviewAnswer, InterviewEvaluation, InterviewQuestion, QuestionScore,
    Recommendation, ScreeningResult, ScreeningScore, ScreeningStatus,
};
pub use job::{JobDescription, RubricItem};
pub use profile::CandidateProfile;
