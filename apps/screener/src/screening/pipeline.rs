//! Screening pipeline — requirements → matcher → calculator for a batch of candidates.
//!
//! Candidates are processed one at a time against the same immutable skill set. A
//! candidate whose extraction failed is not matched; it is reported with every
//! required skill missing and a zero score. No single candidate aborts the batch.

use serde::Serialize;
use tracing::info;

use crate::models::candidate::CandidateSkillProfile;
use crate::models::skill::RequiredSkillSet;
use crate::screening::fit::{FitCalculator, FitScore};
use crate::screening::matcher::{MatchResult, MatchSource, SkillMatcher};

#[derive(Debug, Clone, Serialize)]
pub struct ScreenedCandidate {
    pub profile: CandidateSkillProfile,
    #[serde(flatten)]
    pub result: MatchResult,
    pub match_source: Option<MatchSource>,
    pub fit: FitScore,
}

/// Screens every profile and returns them ranked by descending fit score.
pub async fn screen_candidates(
    matcher: &SkillMatcher,
    calculator: &FitCalculator,
    requirements: &RequiredSkillSet,
    profiles: Vec<CandidateSkillProfile>,
) -> Vec<ScreenedCandidate> {
    info!("Screening {} candidate(s)", profiles.len());
    let required = requirements.required();

    let mut screened = Vec::with_capacity(profiles.len());
    for profile in profiles {
        let (result, match_source) = if profile.has_error() {
            (MatchResult::all_missing(required), None)
        } else {
            let (result, source) = matcher
                .match_skills_traced(requirements, &profile.skills)
                .await;
            (result, Some(source))
        };

        let fit = calculator.score_candidate(&profile, &result, required);
        info!(
            "{}: {}/{} skills matched, fit score = {:.1}%",
            profile.name,
            result.matched.len(),
            required.len(),
            fit.fit_score
        );

        screened.push(ScreenedCandidate {
            profile,
            result,
            match_source,
            fit,
        });
    }

    rank_by_fit(&mut screened);
    screened
}

/// Stable sort by descending fit score; equal scores keep input order.
pub fn rank_by_fit(candidates: &mut [ScreenedCandidate]) {
    candidates.sort_by(|a, b| b.fit.fit_score.total_cmp(&a.fit.fit_score));
}
