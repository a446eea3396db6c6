//! In-process memo of match results, keyed by the (required, candidate) skill pair.
//!
//! Owned by one `SkillMatcher`. Purely an optimization: a miss recomputes what a hit
//! would have returned, modulo classifier non-determinism.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::models::skill::dedupe_skills;
use crate::screening::matcher::MatchResult;

/// Sorted, canonical required and candidate skills.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchCacheKey {
    required: Vec<String>,
    candidate: Vec<String>,
}

impl MatchCacheKey {
    pub fn new<R: AsRef<str>, C: AsRef<str>>(required: &[R], candidate: &[C]) -> Self {
        Self {
            required: sorted(required),
            candidate: sorted(candidate),
        }
    }
}

fn sorted<S: AsRef<str>>(skills: &[S]) -> Vec<String> {
    let mut skills = dedupe_skills(skills);
    skills.sort_unstable();
    skills
}

/// The lock is held only for the map operation itself, never across a classifier call.
#[derive(Debug, Default)]
pub struct MatchCache {
    entries: Mutex<HashMap<MatchCacheKey, MatchResult>>,
}

impl MatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &MatchCacheKey) -> Option<MatchResult> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn insert(&self, key: MatchCacheKey, result: MatchResult) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, result);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(matched: &[&str], missing: &[&str]) -> MatchResult {
        MatchResult {
            matched: matched.iter().map(|s| s.to_string()).collect(),
            missing: missing.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_key_ignores_order_case_and_duplicates() {
        let a = MatchCacheKey::new(&["SQL", "java"], &["Spring", "python", "python"]);
        let b = MatchCacheKey::new(&["java", "sql"], &["python", " spring"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_distinguishes_sides() {
        let a = MatchCacheKey::new(&["java"], &["sql"]);
        let b = MatchCacheKey::new(&["sql"], &["java"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_insert_then_get() {
        let cache = MatchCache::new();
        let key = MatchCacheKey::new(&["java"], &["spring"]);
        assert!(cache.get(&key).is_none());

        cache.insert(key.clone(), result(&["java"], &[]));
        assert_eq!(cache.get(&key), Some(result(&["java"], &[])));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
