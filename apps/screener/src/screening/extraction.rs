//! Resume skill extraction — turns resume text into a `CandidateSkillProfile`
//! via the classifier.
//!
//! Text extraction from PDFs happens upstream. A resume that arrives empty, or whose
//! classifier call fails, becomes a profile carrying an extraction error rather than
//! an `Err`, so one bad resume never aborts a batch.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::candidate::{CandidateSkillProfile, UNKNOWN_CANDIDATE};
use crate::models::skill::normalize_skill;
use crate::screening::classifier::SkillClassifier;
use crate::screening::prompts::{RESUME_EXTRACTION_SYSTEM, RESUME_EXTRACTION_TEMPLATE};

pub const EMPTY_RESUME_ERROR: &str = "Failed to extract text from resume";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedResume {
    pub name: String,
    pub skills: Vec<String>,
}

/// Parses a `NAME: ...` / `SKILLS: a, b, c` answer. Missing name → "Unknown";
/// `SKILLS: none` or a missing line → no skills.
pub fn parse_extraction_response(response: &str) -> ExtractedResume {
    let mut name = UNKNOWN_CANDIDATE.to_string();
    let mut skills = Vec::new();

    for line in response.lines() {
        let line = line.trim();
        if let Some(rest) = strip_label(line, "NAME:") {
            let rest = rest.trim();
            if !rest.is_empty() {
                name = rest.to_string();
            }
        } else if let Some(rest) = strip_label(line, "SKILLS:") {
            let rest = rest.trim();
            if !rest.eq_ignore_ascii_case("none") {
                skills = rest
                    .split(',')
                    .map(normalize_skill)
                    .filter(|s| !s.is_empty())
                    .collect();
            }
        }
    }

    ExtractedResume { name, skills }
}

fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    head.eq_ignore_ascii_case(label)
        .then(|| &line[label.len()..])
}

/// Extracts a candidate profile from resume text. Never fails.
pub async fn extract_profile(
    classifier: &dyn SkillClassifier,
    resume_text: &str,
    file: &str,
) -> CandidateSkillProfile {
    info!("Processing resume: {file}");

    if resume_text.trim().is_empty() {
        warn!("Failed to extract text from {file}");
        return CandidateSkillProfile::failed(file, EMPTY_RESUME_ERROR);
    }

    let payload = RESUME_EXTRACTION_TEMPLATE.replace("{resume_text}", resume_text.trim());
    match classifier.classify(RESUME_EXTRACTION_SYSTEM, &payload).await {
        Ok(response) => {
            let extracted = parse_extraction_response(&response);
            info!("Extracted {} skills from {file}", extracted.skills.len());
            CandidateSkillProfile::new(extracted.name, file, extracted.skills)
        }
        Err(e) => {
            warn!("Error processing {file}: {e}");
            CandidateSkillProfile::failed(file, e.to_string())
        }
    }
}
