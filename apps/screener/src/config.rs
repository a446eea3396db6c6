use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{ensure, Context, Result};

use crate::screening::fit::FitWeights;
use crate::screening::report::DEFAULT_SELECTION_THRESHOLD;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RUST_LOG: &str = "info";

/// Application configuration loaded from environment variables.
/// Every variable is optional; without `ANTHROPIC_API_KEY` the service runs with the
/// offline classifier.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub fit_weights: FitWeights,
    pub selection_threshold: f64,
    /// Requirements parsed once at startup and used by screenings that bring none.
    pub requirements_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            port: DEFAULT_PORT,
            rust_log: DEFAULT_RUST_LOG.to_string(),
            fit_weights: FitWeights::default(),
            selection_threshold: DEFAULT_SELECTION_THRESHOLD,
            requirements_file: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let fit_weights = FitWeights {
            match_weight: parse_or(&get, "FIT_MATCH_WEIGHT", defaults.fit_weights.match_weight)?,
            extra_weight: parse_or(&get, "FIT_EXTRA_WEIGHT", defaults.fit_weights.extra_weight)?,
            max_extra_skills_bonus: parse_or(
                &get,
                "FIT_MAX_EXTRA_SKILLS_BONUS",
                defaults.fit_weights.max_extra_skills_bonus,
            )?,
        };
        fit_weights.validate().context("Invalid fit weights")?;

        let selection_threshold =
            parse_or(&get, "SELECTION_THRESHOLD", defaults.selection_threshold)?;
        ensure!(
            (0.0..=100.0).contains(&selection_threshold),
            "SELECTION_THRESHOLD must be between 0 and 100, got {selection_threshold}"
        );

        Ok(Config {
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            port: parse_or(&get, "PORT", defaults.port)
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or(defaults.rust_log),
            fit_weights,
            selection_threshold,
            requirements_file: get("REQUIREMENTS_FILE").map(PathBuf::from),
        })
    }
}

fn parse_or<T, F>(get: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
