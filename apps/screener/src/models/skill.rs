//! Skill tokens and the per-run required-skill set.
//!
//! A skill is a plain string canonicalized by trimming and lower-casing; equality
//! is equality of the canonical form. No stemming or synonym table lives here —
//! synonym resolution belongs to the classifier oracle.

use std::collections::HashSet;

use serde::Serialize;

/// Canonical form of a skill token.
pub fn normalize_skill(skill: &str) -> String {
    skill.trim().to_lowercase()
}

/// Normalizes every token, drops empties and keeps the first occurrence of each
/// skill in input order.
pub fn dedupe_skills<I, S>(skills: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    skills
        .into_iter()
        .map(|s| normalize_skill(s.as_ref()))
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Set view of a skill list in canonical form.
pub fn skill_set<S: AsRef<str>>(skills: &[S]) -> HashSet<String> {
    skills
        .iter()
        .map(|s| normalize_skill(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Ordered, de-duplicated required skills for one screening run, split into
/// required and nice-to-have. The two subsets are disjoint; a skill listed in both
/// stays required.
///
/// Built once from the requirements parser output and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequiredSkillSet {
    required: Vec<String>,
    nice_to_have: Vec<String>,
}

impl RequiredSkillSet {
    pub fn new<R, N>(required: R, nice_to_have: N) -> Self
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        let required = dedupe_skills(required);
        let taken: HashSet<&str> = required.iter().map(String::as_str).collect();
        let nice_to_have = dedupe_skills(nice_to_have)
            .into_iter()
            .filter(|s| !taken.contains(s.as_str()))
            .collect();
        Self {
            required,
            nice_to_have,
        }
    }

    pub fn from_required<R>(required: R) -> Self
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        Self::new(required, std::iter::empty::<&str>())
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn nice_to_have(&self) -> &[String] {
        &self.nice_to_have
    }

    pub fn len(&self) -> usize {
        self.required.len()
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    /// Case-insensitive membership in the required subset.
    pub fn contains(&self, skill: &str) -> bool {
        let skill = normalize_skill(skill);
        self.required.iter().any(|r| *r == skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize_skill("  Spring Boot \t"), "spring boot");
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence_order() {
        let skills = dedupe_skills(["Python", "sql", "PYTHON ", "", "  ", "Docker", "SQL"]);
        assert_eq!(skills, vec!["python", "sql", "docker"]);
    }

    #[test]
    fn test_required_set_subsets_are_disjoint() {
        let set = RequiredSkillSet::new(["Java", "SQL", "java"], ["sql", "Kafka", "kafka"]);
        assert_eq!(set.required(), ["java", "sql"]);
        assert_eq!(set.nice_to_have(), ["kafka"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let set = RequiredSkillSet::from_required(["Rust"]);
        assert!(set.contains(" RUST"));
        assert!(!set.contains("rustc"));
    }

    #[test]
    fn test_empty_set() {
        let set = RequiredSkillSet::from_required(Vec::<String>::new());
        assert!(set.is_empty());
        assert!(set.nice_to_have().is_empty());
    }

    #[test]
    fn test_skill_set_ignores_case_and_blanks() {
        let set = skill_set(&["Go", "go", " "]);
        assert_eq!(set.len(), 1);
        assert!(set.contains("go"));
    }
}
