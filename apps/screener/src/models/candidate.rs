use serde::{Deserialize, Serialize};

use crate::models::skill::normalize_skill;

/// Name used when extraction could not determine the candidate's name.
pub const UNKNOWN_CANDIDATE: &str = "Unknown";

fn unknown_candidate() -> String {
    UNKNOWN_CANDIDATE.to_string()
}

/// One candidate's extracted skills, as produced by the extraction step.
///
/// `skills` keeps the extracted order for display; matching treats it as a set.
/// `error` is set when the resume could not be processed — such candidates are
/// scored zero without being matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSkillProfile {
    #[serde(default = "unknown_candidate")]
    pub name: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CandidateSkillProfile {
    pub fn new(name: impl Into<String>, file: impl Into<String>, skills: Vec<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            skills,
            error: None,
        }
    }

    /// A profile for a resume that failed before skills could be extracted.
    pub fn failed(file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: unknown_candidate(),
            file: file.into(),
            skills: vec![],
            error: Some(error.into()),
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Skills in canonical form, blanks removed, extracted order kept.
    pub fn normalized_skills(&self) -> Vec<String> {
        self.skills
            .iter()
            .map(|s| normalize_skill(s))
            .filter(|s| !s.is_empty())
            .collect()
    }
}
