use std::sync::Arc;

use crate::config::Config;
use crate::screening::cache::MatchCache;
use crate::screening::classifier::SkillClassifier;
use crate::screening::fit::FitCalculator;
use crate::screening::matcher::SkillMatcher;
use crate::screening::requirements::{ParsedRequirements, RequirementsParser};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Live LLM or offline backend, chosen at startup from `ANTHROPIC_API_KEY`.
    pub classifier: Arc<dyn SkillClassifier>,
    pub parser: Arc<RequirementsParser>,
    /// Owns the match cache, shared by every request for the life of the process.
    pub matcher: Arc<SkillMatcher>,
    pub calculator: FitCalculator,
    /// Loaded from `REQUIREMENTS_FILE` at startup, if configured.
    pub default_requirements: Option<Arc<ParsedRequirements>>,
}

impl AppState {
    pub fn new(config: Config, classifier: Arc<dyn SkillClassifier>) -> Self {
        let parser = Arc::new(RequirementsParser::new(classifier.clone()));
        let matcher = Arc::new(SkillMatcher::new(classifier.clone(), MatchCache::new()));
        let calculator = FitCalculator::new(config.fit_weights.clone());
        Self {
            config,
            classifier,
            parser,
            matcher,
            calculator,
            default_requirements: None,
        }
    }

    pub fn with_default_requirements(mut self, requirements: ParsedRequirements) -> Self {
        self.default_requirements = Some(Arc::new(requirements));
        self
    }
}
