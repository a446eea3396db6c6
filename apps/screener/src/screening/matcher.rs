//! Skill Matcher — partitions the required skills into matched / missing for one
//! candidate.
//!
//! Primary path: the classifier oracle, prompted with synonym and
//! framework-implies-language rules. Its answer is untrusted and always goes through
//! `parse_matching_response`, which repairs it so that
//! `matched ∪ missing == required` and `matched ∩ missing == ∅`.
//!
//! Fallback path: on any classifier error, `simple_match` (exact or substring match).
//! Results from either path are memoized in the injected `MatchCache`.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::models::skill::{normalize_skill, RequiredSkillSet};
use crate::screening::cache::{MatchCache, MatchCacheKey};
use crate::screening::classifier::{ClassifierError, SkillClassifier};
use crate::screening::prompts::{SKILL_MATCHING_SYSTEM, SKILL_MATCHING_TEMPLATE};

const MATCHED_LABEL: &str = "MATCHED";
const MISSING_LABEL: &str = "MISSING";
const NONE_VALUE: &str = "none";

/// Partition of the required skills. Both lists follow required-skill order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

impl MatchResult {
    /// Every required skill missing.
    pub fn all_missing(required: &[String]) -> Self {
        Self {
            matched: vec![],
            missing: required.to_vec(),
        }
    }

    /// Same partition, listed in `required` order. Cache keys are order-free, so a
    /// hit may carry another caller's ordering.
    fn reordered(&self, required: &[String]) -> Self {
        let matched: HashSet<&str> = self.matched.iter().map(String::as_str).collect();
        let (matched, missing): (Vec<String>, Vec<String>) = required
            .iter()
            .cloned()
            .partition(|r| matched.contains(r.as_str()));
        Self { matched, missing }
    }
}

/// How a match result was produced — surfaced for transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Degenerate,
    Cache,
    Classifier,
    Fallback,
}

pub struct SkillMatcher {
    classifier: Arc<dyn SkillClassifier>,
    cache: MatchCache,
}

impl SkillMatcher {
    pub fn new(classifier: Arc<dyn SkillClassifier>, cache: MatchCache) -> Self {
        Self { classifier, cache }
    }

    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }

    pub async fn match_skills(
        &self,
        required: &RequiredSkillSet,
        candidate_skills: &[String],
    ) -> MatchResult {
        self.match_skills_traced(required, candidate_skills).await.0
    }

    /// Same as `match_skills`, also reporting which path produced the result.
    pub async fn match_skills_traced(
        &self,
        required: &RequiredSkillSet,
        candidate_skills: &[String],
    ) -> (MatchResult, MatchSource) {
        let required = required.required();

        if required.is_empty() {
            warn!("No required skills provided");
            return (MatchResult::default(), MatchSource::Degenerate);
        }

        let candidate: Vec<&String> = candidate_skills
            .iter()
            .filter(|s| !s.trim().is_empty())
            .collect();
        if candidate.is_empty() {
            warn!("Candidate has no skills");
            return (MatchResult::all_missing(required), MatchSource::Degenerate);
        }

        let key = MatchCacheKey::new(required, &candidate);
        if let Some(hit) = self.cache.get(&key) {
            debug!("Match cache hit ({} required skills)", required.len());
            return (hit.reordered(required), MatchSource::Cache);
        }

        let (result, source) = match self.classify(required, &candidate).await {
            Ok(result) => (result, MatchSource::Classifier),
            Err(e) => {
                error!("Error matching skills via classifier, using simple match: {e}");
                (simple_match(required, &candidate), MatchSource::Fallback)
            }
        };

        self.cache.insert(key, result.clone());
        (result, source)
    }

    async fn classify(
        &self,
        required: &[String],
        candidate: &[&String],
    ) -> Result<MatchResult, ClassifierError> {
        let candidate_joined = candidate
            .iter()
            .map(|s| s.trim())
            .collect::<Vec<_>>()
            .join(", ");
        let payload = SKILL_MATCHING_TEMPLATE
            .replace("{required_skills}", &required.join(", "))
            .replace("{candidate_skills}", &candidate_joined);

        let response = self
            .classifier
            .classify(SKILL_MATCHING_SYSTEM, &payload)
            .await?;
        Ok(parse_matching_response(&response, required))
    }
}

/// Parses a `MATCHED: ...` / `MISSING: ...` answer and repairs it against `required`.
///
/// - Section keywords are case-insensitive; sections may come in any order or be
///   omitted (treated as empty); `none` means an empty section.
/// - Tokens not in `required` are discarded and logged.
/// - A skill claimed by both sections is treated as missing.
/// - Required skills the answer never mentions are appended to `missing`.
pub fn parse_matching_response(response: &str, required: &[String]) -> MatchResult {
    let mut matched_raw = Vec::new();
    let mut missing_raw = Vec::new();

    for line in response.lines() {
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let label = label
            .trim_matches(|c: char| c.is_whitespace() || matches!(c, '*' | '#' | '-' | '_'))
            .to_ascii_uppercase();
        let target = match label.as_str() {
            MATCHED_LABEL => &mut matched_raw,
            MISSING_LABEL => &mut missing_raw,
            _ => continue,
        };
        target.extend(split_section_values(value));
    }

    let required_set: HashSet<&str> = required.iter().map(String::as_str).collect();
    let foreign: Vec<&String> = matched_raw
        .iter()
        .chain(missing_raw.iter())
        .filter(|s| !required_set.contains(s.as_str()))
        .collect();
    if !foreign.is_empty() {
        warn!("Classifier returned non-required skills, discarding: {foreign:?}");
    }

    let matched_set: HashSet<&str> = matched_raw.iter().map(String::as_str).collect();
    let missing_set: HashSet<&str> = missing_raw.iter().map(String::as_str).collect();

    let contradictory: Vec<&String> = required
        .iter()
        .filter(|r| matched_set.contains(r.as_str()) && missing_set.contains(r.as_str()))
        .collect();
    if !contradictory.is_empty() {
        warn!("Classifier listed skills as both matched and missing, treating as missing: {contradictory:?}");
    }

    let unaccounted: Vec<&String> = required
        .iter()
        .filter(|r| !matched_set.contains(r.as_str()) && !missing_set.contains(r.as_str()))
        .collect();
    if !unaccounted.is_empty() {
        warn!("Some required skills were not in classifier response, adding to missing: {unaccounted:?}");
    }

    let (matched, missing): (Vec<String>, Vec<String>) = required
        .iter()
        .cloned()
        .partition(|r| matched_set.contains(r.as_str()) && !missing_set.contains(r.as_str()));

    MatchResult { matched, missing }
}

fn split_section_values(value: &str) -> Vec<String> {
    let value = value
        .trim()
        .trim_matches('*')
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim();
    if value.is_empty() || value.eq_ignore_ascii_case(NONE_VALUE) {
        return vec![];
    }
    value
        .split(',')
        .map(|s| normalize_skill(s.trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '`'))))
        .filter(|s| !s.is_empty() && s != NONE_VALUE)
        .collect()
}

/// Deterministic fallback: a required skill is matched when it equals a candidate
/// skill or is a substring of one (so "java" matches "javascript").
pub fn simple_match<S: AsRef<str>>(required: &[String], candidate: &[S]) -> MatchResult {
    let candidate: Vec<String> = candidate
        .iter()
        .map(|s| normalize_skill(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect();

    let (matched, missing) = required.iter().cloned().partition(|req| {
        let req = normalize_skill(req);
        candidate.iter().any(|c| c.contains(req.as_str()))
    });

    MatchResult { matched, missing }
}
