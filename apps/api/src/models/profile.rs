use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Structured extraction of one CV.
///
/// Every field falls back to an empty string or list when the extractor omits it,
/// so downstream code never sees a missing value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub job_title: String,
    pub company: String,
    pub duration: String,
    pub responsibilities: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub university: String,
    pub graduation_year: String,
}

impl CandidateProfile {
    /// Skills are a set: drops blanks and case-insensitive duplicates, keeping the first spelling.
    pub fn normalized(mut self) -> Self {
        let mut seen = HashSet::new();
        self.skills = self
            .skills
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
            .collect();
        self
    }

    /// First word of the candidate's name, used as a short chart label.
    pub fn display_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or_default()
    }
}
