//! Fit Calculator — deterministic, auditable score for one candidate.
//!
//! Algorithm:
//! 1. base  = 100 × |matched| / |required|
//! 2. extra = normalized(all candidate skills) − normalized(required), capped at
//!    `max_extra_skills_bonus`
//! 3. bonus = 100 × capped_extra / max_extra_skills_bonus (0 when the cap is 0)
//! 4. fit   = clamp(base × match_weight + bonus × extra_weight, 0, 100)
//!
//! No LLM call anywhere in this module.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::candidate::CandidateSkillProfile;
use crate::models::skill::skill_set;
use crate::screening::matcher::MatchResult;

pub const NO_REQUIREMENTS_EXPLANATION: &str = "No required skills defined";
pub const PROCESSING_FAILED_EXPLANATION: &str = "Resume processing failed";

#[derive(Debug, Error, PartialEq)]
pub enum FitWeightsError {
    #[error("{name} must be a non-negative number, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
}

/// Omitted fields take their default when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitWeights {
    pub match_weight: f64,
    pub extra_weight: f64,
    /// Extra skills beyond this count earn no further bonus.
    pub max_extra_skills_bonus: usize,
}

impl Default for FitWeights {
    fn default() -> Self {
        Self {
            match_weight: 0.7,
            extra_weight: 0.3,
            max_extra_skills_bonus: 10,
        }
    }
}

impl FitWeights {
    /// Weights must be finite and non-negative; they need not sum to 1.
    pub fn validate(&self) -> Result<(), FitWeightsError> {
        for (name, value) in [
            ("match_weight", self.match_weight),
            ("extra_weight", self.extra_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FitWeightsError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitScore {
    pub fit_score: f64,
    pub base_score: f64,
    pub bonus_score: f64,
    pub matched_count: usize,
    pub required_count: usize,
    pub extra_skills_count: usize,
    pub explanation: String,
}

impl FitScore {
    fn zero(required_count: usize, explanation: &str) -> Self {
        Self {
            fit_score: 0.0,
            base_score: 0.0,
            bonus_score: 0.0,
            matched_count: 0,
            required_count,
            extra_skills_count: 0,
            explanation: explanation.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FitCalculator {
    weights: FitWeights,
}

impl FitCalculator {
    pub fn new(weights: FitWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &FitWeights {
        &self.weights
    }

    /// Scores a candidate from its match outcome. `missing` does not enter the
    /// formula; it is accepted so callers pass the full match result.
    pub fn score(
        &self,
        matched: &[String],
        _missing: &[String],
        all_candidate_skills: &[String],
        required: &[String],
    ) -> FitScore {
        let total_required = required.len();
        let num_matched = matched.len();

        if total_required == 0 {
            warn!("No required skills to calculate fit against");
            return FitScore::zero(0, NO_REQUIREMENTS_EXPLANATION);
        }

        let base_percentage = num_matched as f64 / total_required as f64 * 100.0;

        let required_set = skill_set(required);
        let extra_skills = skill_set(all_candidate_skills)
            .into_iter()
            .filter(|s| !required_set.contains(s))
            .count();
        let cap = self.weights.max_extra_skills_bonus;
        let num_extra = extra_skills.min(cap);

        let bonus_percentage = if cap > 0 {
            num_extra as f64 / cap as f64 * 100.0
        } else {
            0.0
        };

        let final_score = (base_percentage * self.weights.match_weight
            + bonus_percentage * self.weights.extra_weight)
            .clamp(0.0, 100.0);

        FitScore {
            fit_score: round2(final_score),
            base_score: round2(base_percentage),
            bonus_score: round2(bonus_percentage),
            matched_count: num_matched,
            required_count: total_required,
            extra_skills_count: num_extra,
            explanation: build_explanation(
                num_matched,
                total_required,
                num_extra,
                base_percentage,
                bonus_percentage,
                final_score,
            ),
        }
    }

    /// Scores one candidate record. A profile carrying an extraction error is
    /// overridden to zero without running the formula.
    pub fn score_candidate(
        &self,
        profile: &CandidateSkillProfile,
        result: &MatchResult,
        required: &[String],
    ) -> FitScore {
        if profile.has_error() {
            warn!(
                "Skipping fit calculation for {} due to error",
                profile.name
            );
            return FitScore::zero(required.len(), PROCESSING_FAILED_EXPLANATION);
        }
        self.score(&result.matched, &result.missing, &profile.skills, required)
    }
}

/// Rounds to two decimals, the precision every reported percentage uses.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Human-readable, stable explanation of a score.
fn build_explanation(
    matched: usize,
    total: usize,
    extra: usize,
    base_pct: f64,
    bonus_pct: f64,
    final_pct: f64,
) -> String {
    format!(
        "Matched {matched}/{total} required skills ({base_pct:.1}% base score). \
         Has {extra} additional relevant skills ({bonus_pct:.1}% bonus). \
         Final weighted score: {final_pct:.1}%"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn extras(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("extra-{i}")).collect()
    }

    #[test]
    fn test_two_of_three_with_two_extras() {
        let required = skills(&["python", "sql", "java"]);
        let mut all = skills(&["Python", "SQL"]);
        all.extend(skills(&["docker", "aws"]));

        let score = FitCalculator::default().score(
            &skills(&["python", "sql"]),
            &skills(&["java"]),
            &all,
            &required,
        );

        assert_eq!(score.base_score, 66.67);
        assert_eq!(score.bonus_score, 20.0);
        assert_eq!(score.fit_score, 52.67);
        assert_eq!(score.matched_count, 2);
        assert_eq!(score.required_count, 3);
        assert_eq!(score.extra_skills_count, 2);
    }

    #[test]
    fn test_explanation_is_stable() {
        let score = FitCalculator::default().score(
            &skills(&["python", "sql"]),
            &skills(&["java"]),
            &skills(&["python", "sql", "docker", "aws"]),
            &skills(&["python", "sql", "java"]),
        );
        assert_eq!(
            score.explanation,
            "Matched 2/3 required skills (66.7% base score). \
             Has 2 additional relevant skills (20.0% bonus). \
             Final weighted score: 52.7%"
        );
    }

    #[test]
    fn test_zero_requirements() {
        let score = FitCalculator::default().score(&[], &[], &skills(&["python"]), &[]);
        assert_eq!(score.fit_score, 0.0);
        assert_eq!(score.base_score, 0.0);
        assert_eq!(score.bonus_score, 0.0);
        assert_eq!(score.explanation, NO_REQUIREMENTS_EXPLANATION);
    }

    #[test]
    fn test_bonus_is_capped() {
        let calc = FitCalculator::default();
        let required = skills(&["rust"]);
        let at_cap = calc.score(&[], &required, &extras(10), &required);
        let over_cap = calc.score(&[], &required, &extras(50), &required);
        assert_eq!(at_cap.bonus_score, 100.0);
        assert_eq!(over_cap.bonus_score, at_cap.bonus_score);
        assert_eq!(over_cap.extra_skills_count, 10);
        assert_eq!(over_cap.fit_score, at_cap.fit_score);
    }

    #[test]
    fn test_extra_skills_ignore_case_and_duplicates() {
        let required = skills(&["python"]);
        let score = FitCalculator::default().score(
            &required,
            &[],
            &skills(&["PYTHON", "Docker", "docker ", "AWS"]),
            &required,
        );
        assert_eq!(score.extra_skills_count, 2);
    }

    #[test]
    fn test_zero_cap_gives_no_bonus() {
        let calc = FitCalculator::new(FitWeights {
            max_extra_skills_bonus: 0,
            ..FitWeights::default()
        });
        let required = skills(&["go"]);
        let score = calc.score(&required, &[], &extras(5), &required);
        assert_eq!(score.bonus_score, 0.0);
        assert_eq!(score.extra_skills_count, 0);
        assert_eq!(score.fit_score, 70.0);
    }

    #[test]
    fn test_score_clamped_for_heavy_weights() {
        let calc = FitCalculator::new(FitWeights {
            match_weight: 2.0,
            extra_weight: 5.0,
            max_extra_skills_bonus: 10,
        });
        let required = skills(&["go"]);
        let score = calc.score(&required, &[], &extras(20), &required);
        assert_eq!(score.fit_score, 100.0);
    }

    #[test]
    fn test_score_bounds_across_inputs() {
        let calc = FitCalculator::default();
        let required = skills(&["a1", "b2", "c3", "d4"]);
        for matched in 0..=required.len() {
            for extra in [0, 3, 10, 40] {
                let score = calc.score(&required[..matched], &required[matched..], &extras(extra), &required);
                assert!((0.0..=100.0).contains(&score.fit_score), "{score:?}");
            }
        }
    }

    #[test]
    fn test_error_override_ignores_skills() {
        let mut profile = CandidateSkillProfile::new("Jane", "jane.pdf", skills(&["python", "sql"]));
        profile.error = Some("Failed to extract text from PDF".to_string());
        let result = MatchResult {
            matched: skills(&["python", "sql"]),
            missing: vec![],
        };
        let score = FitCalculator::default().score_candidate(&profile, &result, &skills(&["python", "sql"]));
        assert_eq!(score.fit_score, 0.0);
        assert_eq!(score.base_score, 0.0);
        assert_eq!(score.bonus_score, 0.0);
        assert_eq!(score.explanation, PROCESSING_FAILED_EXPLANATION);
    }

    #[test]
    fn test_weights_validation() {
        assert!(FitWeights::default().validate().is_ok());
        let zero = FitWeights {
            match_weight: 0.0,
            extra_weight: 0.0,
            max_extra_skills_bonus: 0,
        };
        assert!(zero.validate().is_ok());
        let negative = FitWeights {
            extra_weight: -0.1,
            ..FitWeights::default()
        };
        assert_eq!(
            negative.validate(),
            Err(FitWeightsError::InvalidWeight {
                name: "extra_weight",
                value: -0.1
            })
        );
        let nan = FitWeights {
            match_weight: f64::NAN,
            ..FitWeights::default()
        };
        assert!(nan.validate().is_err());
    }
}
