//! Report rows, run summary and threshold selection.
//!
//! `ScreeningRecord` carries exactly the tabular columns the reporting layer
//! persists; this module never writes files itself.

use serde::{Deserialize, Serialize};

use crate::screening::fit::round2;
use crate::screening::pipeline::ScreenedCandidate;

pub const DEFAULT_SELECTION_THRESHOLD: f64 = 70.0;

/// One row of the screening report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningRecord {
    #[serde(rename = "Candidate Name")]
    pub candidate_name: String,
    #[serde(rename = "Resume File")]
    pub resume_file: String,
    #[serde(rename = "Matched Skills")]
    pub matched_skills: String,
    #[serde(rename = "Missing Skills")]
    pub missing_skills: String,
    #[serde(rename = "Fit Score (%)")]
    pub fit_score: f64,
    #[serde(rename = "Base Score (%)")]
    pub base_score: f64,
    #[serde(rename = "Bonus Score (%)")]
    pub bonus_score: f64,
    #[serde(rename = "Total Skills")]
    pub total_skills: usize,
    #[serde(rename = "Extra Skills Count")]
    pub extra_skills_count: usize,
    #[serde(rename = "Error")]
    pub error: String,
}

impl From<&ScreenedCandidate> for ScreeningRecord {
    fn from(candidate: &ScreenedCandidate) -> Self {
        let profile = &candidate.profile;
        Self {
            candidate_name: profile.name.clone(),
            resume_file: if profile.file.is_empty() {
                "N/A".to_string()
            } else {
                profile.file.clone()
            },
            matched_skills: candidate.result.matched.join(", "),
            missing_skills: candidate.result.missing.join(", "),
            fit_score: candidate.fit.fit_score,
            base_score: candidate.fit.base_score,
            bonus_score: candidate.fit.bonus_score,
            total_skills: profile.skills.len(),
            extra_skills_count: candidate.fit.extra_skills_count,
            error: profile.error.clone().unwrap_or_else(|| "None".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCandidate {
    pub name: String,
    pub fit_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub required_skills: usize,
    /// Mean over successfully processed candidates; `None` when there are none.
    pub average_fit_score: Option<f64>,
    pub top_candidate: Option<TopCandidate>,
}

impl ScreeningSummary {
    pub fn from_candidates(candidates: &[ScreenedCandidate], required_skills: usize) -> Self {
        let successful: Vec<&ScreenedCandidate> = candidates
            .iter()
            .filter(|c| !c.profile.has_error())
            .collect();

        let average_fit_score = (!successful.is_empty()).then(|| {
            let sum: f64 = successful.iter().map(|c| c.fit.fit_score).sum();
            round2(sum / successful.len() as f64)
        });

        // First maximum wins, matching the ranked order.
        let top_candidate = successful
            .iter()
            .copied()
            .fold(None::<&ScreenedCandidate>, |best, c| match best {
                Some(b) if b.fit.fit_score >= c.fit.fit_score => Some(b),
                _ => Some(c),
            })
            .map(|c| TopCandidate {
                name: c.profile.name.clone(),
                fit_score: c.fit.fit_score,
            });

        Self {
            total: candidates.len(),
            successful: successful.len(),
            failed: candidates.len() - successful.len(),
            required_skills,
            average_fit_score,
            top_candidate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub threshold: f64,
    pub total: usize,
    pub selected: Vec<ScreeningRecord>,
    /// Percentage of rows meeting the threshold; 0 for an empty report.
    pub selection_rate: f64,
}

/// Keeps rows with `fit_score >= threshold`, ranked by descending fit score.
pub fn filter_by_threshold(records: &[ScreeningRecord], threshold: f64) -> Selection {
    let mut selected: Vec<ScreeningRecord> = records
        .iter()
        .filter(|r| r.fit_score >= threshold)
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.fit_score.total_cmp(&a.fit_score));

    let selection_rate = if records.is_empty() {
        0.0
    } else {
        round2(selected.len() as f64 / records.len() as f64 * 100.0)
    };

    Selection {
        threshold,
        total: records.len(),
        selected,
        selection_rate,
    }
}
