//! Axum route handlers for the Screening API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::CandidateSkillProfile;
use crate::models::skill::{dedupe_skills, RequiredSkillSet};
use crate::screening::extraction::extract_profile;
use crate::screening::fit::{FitCalculator, FitScore, FitWeights};
use crate::screening::matcher::{MatchResult, MatchSource};
use crate::screening::pipeline::{screen_candidates, ScreenedCandidate};
use crate::screening::report::{
    filter_by_threshold, ScreeningRecord, ScreeningSummary, Selection,
};
use crate::screening::requirements::{ParsedRequirements, RequirementsFormat};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseRequirementsRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct MatchSkillsRequest {
    pub required_skills: Vec<String>,
    pub candidate_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchSkillsResponse {
    #[serde(flatten)]
    pub result: MatchResult,
    pub source: MatchSource,
}

#[derive(Debug, Deserialize)]
pub struct FitScoreRequest {
    pub matched: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
    pub all_skills: Vec<String>,
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub extraction_error: Option<String>,
    /// Overrides the configured weights for this request only.
    #[serde(default)]
    pub weights: Option<FitWeights>,
}

/// A candidate is either an already-extracted profile or raw resume text that still
/// needs extraction.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CandidateInput {
    Resume {
        #[serde(default)]
        file: String,
        resume_text: String,
    },
    Profile(CandidateSkillProfile),
}

#[derive(Debug, Deserialize)]
pub struct ScreeningRequest {
    #[serde(default)]
    pub requirements_text: Option<String>,
    #[serde(default)]
    pub required_skills: Option<Vec<String>>,
    /// Only read alongside `required_skills`.
    #[serde(default)]
    pub nice_to_have: Vec<String>,
    pub candidates: Vec<CandidateInput>,
    #[serde(default)]
    pub threshold: Option<f64>,
    /// Overrides the configured weights for this run only.
    #[serde(default)]
    pub weights: Option<FitWeights>,
}

#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub cleared: usize,
}

#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub classifier: &'static str,
    pub requirements: ParsedRequirements,
    pub weights: FitWeights,
    pub candidates: Vec<ScreenedCandidate>,
    pub records: Vec<ScreeningRecord>,
    pub summary: ScreeningSummary,
    pub selection: Selection,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/requirements/parse
///
/// Parses a skill list or job description into required and nice-to-have skills.
pub async fn handle_parse_requirements(
    State(state): State<AppState>,
    Json(request): Json<ParseRequirementsRequest>,
) -> Result<Json<ParsedRequirements>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    Ok(Json(state.parser.parse(&request.text).await))
}

/// POST /api/v1/skills/match
///
/// Partitions the required skills into matched and missing for one candidate.
pub async fn handle_match_skills(
    State(state): State<AppState>,
    Json(request): Json<MatchSkillsRequest>,
) -> Result<Json<MatchSkillsResponse>, AppError> {
    let required = RequiredSkillSet::from_required(&request.required_skills);
    let (result, source) = state
        .matcher
        .match_skills_traced(&required, &request.candidate_skills)
        .await;

    Ok(Json(MatchSkillsResponse { result, source }))
}

/// POST /api/v1/fit/score
///
/// Scores an already-computed match outcome. No classifier call.
pub async fn handle_fit_score(
    State(state): State<AppState>,
    Json(request): Json<FitScoreRequest>,
) -> Result<Json<FitScore>, AppError> {
    let calculator = calculator_for(&state, request.weights)?;
    let required = RequiredSkillSet::from_required(&request.required_skills);
    if let Some(stray) = request.matched.iter().find(|s| !required.contains(s)) {
        return Err(AppError::Validation(format!(
            "matched skill '{stray}' is not in required_skills"
        )));
    }

    let mut profile = CandidateSkillProfile::new("", "", request.all_skills);
    profile.error = request.extraction_error;
    let result = MatchResult {
        matched: dedupe_skills(&request.matched),
        missing: dedupe_skills(&request.missing),
    };

    let score = calculator.score_candidate(&profile, &result, required.required());
    Ok(Json(score))
}

/// DELETE /api/v1/skills/match/cache
///
/// Drops every memoized match result, e.g. after the classifier prompt changes.
pub async fn handle_clear_match_cache(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    let cache = state.matcher.cache();
    let cleared = cache.len();
    cache.clear();
    info!("Cleared {cleared} cached match result(s)");
    Json(ClearCacheResponse { cleared })
}

/// POST /api/v1/screenings
///
/// Full batch run: requirements → extraction (for raw resumes) → match → score → rank
/// → report rows, summary and threshold selection.
pub async fn handle_screening(
    State(state): State<AppState>,
    Json(mut request): Json<ScreeningRequest>,
) -> Result<Json<ScreeningResponse>, AppError> {
    if request.candidates.is_empty() {
        return Err(AppError::Validation("candidates cannot be empty".to_string()));
    }
    let calculator = calculator_for(&state, request.weights.take())?;
    let threshold = request
        .threshold
        .unwrap_or(state.config.selection_threshold);
    if !(0.0..=100.0).contains(&threshold) {
        return Err(AppError::Validation(format!(
            "threshold must be between 0 and 100, got {threshold}"
        )));
    }

    let requirements = resolve_requirements(&state, &request).await?;
    let skill_set = requirements.skill_set();
    if skill_set.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "no required skills could be determined".to_string(),
        ));
    }

    let mut profiles = Vec::with_capacity(request.candidates.len());
    for candidate in request.candidates {
        let profile = match candidate {
            CandidateInput::Resume { file, resume_text } => {
                extract_profile(state.classifier.as_ref(), &resume_text, &file).await
            }
            CandidateInput::Profile(mut profile) => {
                profile.skills = profile.normalized_skills();
                profile
            }
        };
        profiles.push(profile);
    }

    let run_id = Uuid::new_v4();
    info!(
        "Screening run {run_id}: {} candidate(s) against {} required skill(s)",
        profiles.len(),
        skill_set.len()
    );

    let candidates =
        screen_candidates(&state.matcher, &calculator, &skill_set, profiles).await;
    let records: Vec<ScreeningRecord> = candidates.iter().map(ScreeningRecord::from).collect();
    let summary = ScreeningSummary::from_candidates(&candidates, skill_set.len());
    let selection = filter_by_threshold(&records, threshold);

    info!(
        "Screening run {run_id} complete: {}/{} selected at {threshold:.1}%",
        selection.selected.len(),
        selection.total
    );

    Ok(Json(ScreeningResponse {
        run_id,
        generated_at: Utc::now(),
        classifier: state.classifier.backend(),
        requirements,
        weights: calculator.weights().clone(),
        candidates,
        records,
        summary,
        selection,
    }))
}

/// Request weights, validated, or the configured calculator when none are given.
fn calculator_for(
    state: &AppState,
    weights: Option<FitWeights>,
) -> Result<FitCalculator, AppError> {
    match weights {
        Some(weights) => {
            weights
                .validate()
                .map_err(|e| AppError::Validation(e.to_string()))?;
            Ok(FitCalculator::new(weights))
        }
        None => Ok(state.calculator.clone()),
    }
}

/// At most one of `requirements_text` and `required_skills` may be supplied; with
/// neither, the startup requirements (if any) apply.
async fn resolve_requirements(
    state: &AppState,
    request: &ScreeningRequest,
) -> Result<ParsedRequirements, AppError> {
    match (&request.requirements_text, &request.required_skills) {
        (Some(text), None) => {
            if text.trim().is_empty() {
                return Err(AppError::Validation(
                    "requirements_text cannot be empty".to_string(),
                ));
            }
            Ok(state.parser.parse(text).await)
        }
        (None, Some(skills)) => {
            let skill_set = RequiredSkillSet::new(skills, &request.nice_to_have);
            let mut all = skill_set.required().to_vec();
            all.extend_from_slice(skill_set.nice_to_have());
            Ok(ParsedRequirements {
                skills: all,
                required_skills: skill_set.required().to_vec(),
                nice_to_have: skill_set.nice_to_have().to_vec(),
                format: RequirementsFormat::SimpleList,
            })
        }
        (None, None) => state
            .default_requirements
            .as_deref()
            .cloned()
            .ok_or_else(|| {
                AppError::Validation(
                    "provide requirements_text or required_skills".to_string(),
                )
            }),
        (Some(_), Some(_)) => Err(AppError::Validation(
            "provide only one of requirements_text or required_skills".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Config;
    use crate::screening::classifier::testing::ScriptedClassifier;
    use crate::screening::classifier::OfflineClassifier;

    fn offline_state() -> AppState {
        AppState::new(Config::default(), Arc::new(OfflineClassifier))
    }

    fn profile_input(name: &str, skills: &[&str]) -> CandidateInput {
        CandidateInput::Profile(CandidateSkillProfile::new(
            name,
            format!("{name}.pdf"),
            skills.iter().map(|s| s.to_string()).collect(),
        ))
    }

    fn list_request(required: &[&str], candidates: Vec<CandidateInput>) -> ScreeningRequest {
        ScreeningRequest {
            requirements_text: None,
            required_skills: Some(required.iter().map(|s| s.to_string()).collect()),
            nice_to_have: vec![],
            candidates,
            threshold: None,
            weights: None,
        }
    }

    #[tokio::test]
    async fn test_parse_requirements_rejects_blank_text() {
        let err = handle_parse_requirements(
            State(offline_state()),
            Json(ParseRequirementsRequest {
                text: "   ".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_parse_requirements_simple_list() {
        let Json(parsed) = handle_parse_requirements(
            State(offline_state()),
            Json(ParseRequirementsRequest {
                text: "Python, SQL, Docker".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(parsed.required_skills, vec!["python", "sql", "docker"]);
        assert_eq!(parsed.format, RequirementsFormat::SimpleList);
    }

    #[tokio::test]
    async fn test_match_skills_reports_source() {
        let Json(response) = handle_match_skills(
            State(offline_state()),
            Json(MatchSkillsRequest {
                required_skills: vec!["Python".to_string(), "Go".to_string()],
                candidate_skills: vec!["python 3".to_string()],
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.result.matched, vec!["python"]);
        assert_eq!(response.result.missing, vec!["go"]);
        assert_eq!(response.source, MatchSource::Fallback);
    }

    #[tokio::test]
    async fn test_fit_score_rejects_foreign_matched_skill() {
        let err = handle_fit_score(
            State(offline_state()),
            Json(FitScoreRequest {
                matched: vec!["cobol".to_string()],
                missing: vec![],
                all_skills: vec!["cobol".to_string()],
                required_skills: vec!["python".to_string()],
                extraction_error: None,
                weights: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_fit_score_extraction_error_overrides() {
        let Json(score) = handle_fit_score(
            State(offline_state()),
            Json(FitScoreRequest {
                matched: vec!["python".to_string()],
                missing: vec![],
                all_skills: vec!["python".to_string()],
                required_skills: vec!["python".to_string()],
                extraction_error: Some("Failed to extract text from PDF".to_string()),
                weights: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(score.fit_score, 0.0);
        assert_eq!(score.required_count, 1);
    }

    fn two_of_three_request(weights: Option<FitWeights>) -> FitScoreRequest {
        FitScoreRequest {
            matched: vec!["python".to_string(), "sql".to_string()],
            missing: vec!["java".to_string()],
            all_skills: ["python", "sql", "docker", "aws"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            required_skills: vec!["python".to_string(), "sql".to_string(), "java".to_string()],
            extraction_error: None,
            weights,
        }
    }

    #[tokio::test]
    async fn test_fit_score_uses_request_weights() {
        let Json(configured) =
            handle_fit_score(State(offline_state()), Json(two_of_three_request(None)))
                .await
                .unwrap();
        assert_eq!(configured.fit_score, 52.67);

        let coverage_only = FitWeights {
            match_weight: 1.0,
            extra_weight: 0.0,
            max_extra_skills_bonus: 10,
        };
        let Json(score) = handle_fit_score(
            State(offline_state()),
            Json(two_of_three_request(Some(coverage_only))),
        )
        .await
        .unwrap();
        assert_eq!(score.fit_score, 66.67);
    }

    #[tokio::test]
    async fn test_fit_score_rejects_negative_weights() {
        let negative = FitWeights {
            match_weight: -1.0,
            ..FitWeights::default()
        };
        let err = handle_fit_score(
            State(offline_state()),
            Json(two_of_three_request(Some(negative))),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_partial_weights_take_defaults() {
        let request: FitScoreRequest = serde_json::from_str(
            r#"{"matched": [], "all_skills": [], "required_skills": ["go"],
                "weights": {"match_weight": 1.0}}"#,
        )
        .unwrap();
        let weights = request.weights.unwrap();
        assert_eq!(weights.match_weight, 1.0);
        assert_eq!(weights.extra_weight, 0.3);
    }

    #[tokio::test]
    async fn test_screening_applies_request_weights() {
        let mut request = list_request(
            &["python", "sql", "java"],
            vec![profile_input("Jane", &["python", "sql", "docker", "aws"])],
        );
        request.weights = Some(FitWeights {
            match_weight: 1.0,
            extra_weight: 0.0,
            max_extra_skills_bonus: 10,
        });
        let Json(response) = handle_screening(State(offline_state()), Json(request))
            .await
            .unwrap();
        assert_eq!(response.records[0].fit_score, 66.67);
        assert_eq!(response.weights.match_weight, 1.0);
    }

    #[tokio::test]
    async fn test_screening_requires_one_requirements_source() {
        let mut request = list_request(&["python"], vec![profile_input("a", &["python"])]);
        request.requirements_text = Some("python, sql".to_string());
        let err = handle_screening(State(offline_state()), Json(request))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_screening_falls_back_to_default_requirements() {
        let without_requirements = || {
            let mut request = list_request(&[], vec![profile_input("a", &["go"])]);
            request.required_skills = None;
            request
        };

        let err = handle_screening(State(offline_state()), Json(without_requirements()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let defaults = ParsedRequirements {
            skills: vec!["go".to_string()],
            required_skills: vec!["go".to_string()],
            nice_to_have: vec![],
            format: RequirementsFormat::SimpleList,
        };
        let state = offline_state().with_default_requirements(defaults);
        let Json(response) = handle_screening(State(state), Json(without_requirements()))
            .await
            .unwrap();
        assert_eq!(response.records[0].matched_skills, "go");
    }

    #[tokio::test]
    async fn test_clear_match_cache() {
        let state = offline_state();
        let _ = handle_match_skills(
            State(state.clone()),
            Json(MatchSkillsRequest {
                required_skills: vec!["go".to_string()],
                candidate_skills: vec!["go".to_string()],
            }),
        )
        .await
        .unwrap();
        let Json(cleared) = handle_clear_match_cache(State(state.clone())).await;
        assert_eq!(cleared.cleared, 1);
        assert!(state.matcher.cache().is_empty());
    }

    #[tokio::test]
    async fn test_screening_rejects_out_of_range_threshold() {
        let mut request = list_request(&["python"], vec![profile_input("a", &["python"])]);
        request.threshold = Some(120.0);
        let err = handle_screening(State(offline_state()), Json(request))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_screening_with_no_extractable_requirements() {
        let request = ScreeningRequest {
            requirements_text: Some(
                "Job Title: Engineer\nResponsibilities: build things for the role".to_string(),
            ),
            required_skills: None,
            nice_to_have: vec![],
            candidates: vec![profile_input("a", &["python"])],
            threshold: None,
            weights: None,
        };
        let err = handle_screening(State(offline_state()), Json(request))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[tokio::test]
    async fn test_screening_end_to_end_offline() {
        let request = list_request(
            &["Python", "SQL"],
            vec![
                profile_input("Partial", &["Python"]),
                profile_input("Full", &[" python ", "SQL", "Docker"]),
                CandidateInput::Resume {
                    file: "blank.pdf".to_string(),
                    resume_text: "   ".to_string(),
                },
            ],
        );
        let Json(response) = handle_screening(State(offline_state()), Json(request))
            .await
            .unwrap();

        assert_eq!(response.classifier, "offline");
        let names: Vec<&str> = response
            .records
            .iter()
            .map(|r| r.candidate_name.as_str())
            .collect();
        assert_eq!(names, vec!["Full", "Partial", "Unknown"]);

        // Full: base 100, one extra skill → 100·0.7 + 10·0.3 = 73
        assert_eq!(response.records[0].fit_score, 73.0);
        assert_eq!(response.records[1].fit_score, 35.0);
        assert_eq!(response.records[2].fit_score, 0.0);

        assert_eq!(response.summary.total, 3);
        assert_eq!(response.summary.failed, 1);
        assert_eq!(response.selection.selected.len(), 1);
        assert_eq!(response.selection.selected[0].candidate_name, "Full");
    }

    #[tokio::test]
    async fn test_screening_extracts_raw_resumes() {
        let classifier = Arc::new(ScriptedClassifier::replying(
            "NAME: Ana Lima\nSKILLS: rust, tokio",
        ));
        let state = AppState::new(Config::default(), classifier.clone());
        let request = list_request(
            &["rust"],
            vec![CandidateInput::Resume {
                file: "ana.pdf".to_string(),
                resume_text: "Ana Lima. Rust, Tokio.".to_string(),
            }],
        );
        let Json(response) = handle_screening(State(state), Json(request)).await.unwrap();
        assert_eq!(response.records[0].candidate_name, "Ana Lima");
        assert_eq!(response.records[0].matched_skills, "rust");
        assert_eq!(response.classifier, "scripted");
    }

    #[test]
    fn test_candidate_input_shapes() {
        let resume: CandidateInput =
            serde_json::from_str(r#"{"file": "a.pdf", "resume_text": "hello"}"#).unwrap();
        assert!(matches!(resume, CandidateInput::Resume { .. }));

        let profile: CandidateInput =
            serde_json::from_str(r#"{"name": "Bo", "file": "b.pdf", "skills": ["go"]}"#).unwrap();
        assert!(matches!(profile, CandidateInput::Profile(_)));
    }
}
