//! Requirements Parser — turns raw requirement text (a flat skill list or a free-form
//! job description) into an ordered, de-duplicated required-skill list split into
//! required and nice-to-have.
//!
//! Never fails past this boundary: empty input, an unreadable file, or a classifier
//! failure all yield `ParsedRequirements::empty()`.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::models::skill::{dedupe_skills, normalize_skill, RequiredSkillSet};
use crate::screening::classifier::SkillClassifier;
use crate::screening::prompts::{SKILL_EXTRACTION_SYSTEM, SKILL_EXTRACTION_TEMPLATE};

/// Phrases that mark text as a job description. Two distinct hits are enough.
const JD_MARKERS: &[&str] = &[
    "job title",
    "job summary",
    "responsibilities",
    "qualifications",
    "we are looking",
    "the ideal candidate",
    "years of experience",
    "bachelor",
    "degree",
    "role",
    "position",
];

const MIN_JD_MARKERS: usize = 2;
/// A list needs more non-empty lines than this to qualify by line shape.
const LIST_LINE_THRESHOLD: usize = 3;
const MAX_LIST_MEAN_LINE_LEN: f64 = 50.0;
const MAX_COMMA_LIST_LEN: usize = 500;

/// Phrases that, found shortly before a skill, mark it as nice-to-have.
const NICE_TO_HAVE_INDICATORS: &[&str] = &["nice to have", "preferred", "bonus", "plus", "optional"];

/// How many characters before each occurrence are inspected for indicators.
const CONTEXT_WINDOW_CHARS: usize = 200;

/// Line prefixes skipped in newline-separated lists (comments, headers, markdown bullets).
const SKIPPED_LINE_PREFIXES: &[char] = &['#', '*', '-'];
const BULLET_GLYPHS: &[char] = &['*', '-', '•'];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementsFormat {
    SimpleList,
    JobDescription,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedRequirements {
    /// Every extracted skill, in extraction order.
    pub skills: Vec<String>,
    pub required_skills: Vec<String>,
    pub nice_to_have: Vec<String>,
    pub format: RequirementsFormat,
}

impl ParsedRequirements {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// The immutable skill set consumed by the matcher and the fit calculator.
    pub fn skill_set(&self) -> RequiredSkillSet {
        RequiredSkillSet::new(&self.required_skills, &self.nice_to_have)
    }
}

pub struct RequirementsParser {
    classifier: Arc<dyn SkillClassifier>,
}

impl RequirementsParser {
    pub fn new(classifier: Arc<dyn SkillClassifier>) -> Self {
        Self { classifier }
    }

    /// Reads a requirements file and parses it. Unreadable files yield the empty result.
    pub async fn parse_file(&self, path: &Path) -> ParsedRequirements {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => self.parse(&text).await,
            Err(e) => {
                error!("Error reading requirements file {}: {e}", path.display());
                ParsedRequirements::empty()
            }
        }
    }

    pub async fn parse(&self, text: &str) -> ParsedRequirements {
        let content = text.trim();
        if content.is_empty() {
            error!("Requirements text is empty");
            return ParsedRequirements::empty();
        }

        match detect_format(content) {
            RequirementsFormat::SimpleList => {
                info!("Detected simple skill list format");
                let skills = parse_simple_list(content);
                ParsedRequirements {
                    required_skills: skills.clone(),
                    skills,
                    nice_to_have: vec![],
                    format: RequirementsFormat::SimpleList,
                }
            }
            _ => {
                info!("Detected job description format, extracting skills via classifier");
                self.parse_job_description(content).await
            }
        }
    }

    async fn parse_job_description(&self, content: &str) -> ParsedRequirements {
        let payload = SKILL_EXTRACTION_TEMPLATE.replace("{job_description}", content);
        let response = match self
            .classifier
            .classify(SKILL_EXTRACTION_SYSTEM, &payload)
            .await
        {
            Ok(r) => r,
            Err(e) => {
                error!("Skill extraction from job description failed: {e}");
                return ParsedRequirements::empty();
            }
        };

        let skills = dedupe_skills(response.trim().split(','));
        let (required_skills, nice_to_have) = categorize_skills(content, &skills);

        info!(
            "Extracted {} total skills ({} required, {} nice-to-have)",
            skills.len(),
            required_skills.len(),
            nice_to_have.len()
        );

        ParsedRequirements {
            skills,
            required_skills,
            nice_to_have,
            format: RequirementsFormat::JobDescription,
        }
    }
}

/// Classifies requirement text. Marker phrases take precedence over length heuristics.
pub fn detect_format(content: &str) -> RequirementsFormat {
    let lower = content.to_lowercase();

    let marker_count = JD_MARKERS.iter().filter(|m| lower.contains(*m)).count();
    if marker_count >= MIN_JD_MARKERS {
        return RequirementsFormat::JobDescription;
    }

    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.len() > LIST_LINE_THRESHOLD {
        let total: usize = lines.iter().map(|l| l.chars().count()).sum();
        let mean = total as f64 / lines.len() as f64;
        if mean < MAX_LIST_MEAN_LINE_LEN {
            return RequirementsFormat::SimpleList;
        }
    }

    if content.contains(',') && content.chars().count() < MAX_COMMA_LIST_LEN {
        return RequirementsFormat::SimpleList;
    }

    RequirementsFormat::JobDescription
}

/// Parses a comma- or newline-separated skill list.
pub fn parse_simple_list(content: &str) -> Vec<String> {
    let tokens: Vec<&str> = if content.contains(',') {
        content.split(',').collect()
    } else {
        content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with(SKIPPED_LINE_PREFIXES))
            .collect()
    };

    dedupe_skills(tokens.into_iter().map(strip_bullet))
        .into_iter()
        .filter(|s| s.chars().count() > 1)
        .collect()
}

fn strip_bullet(token: &str) -> &str {
    let token = token.trim();
    match token.strip_prefix(BULLET_GLYPHS) {
        Some(rest) => rest.trim_start(),
        None => token,
    }
}

/// Splits skills into (required, nice_to_have) by textual proximity.
///
/// A skill is nice-to-have when the window before ANY of its occurrences holds an
/// indicator phrase. Skills that never occur in the text stay required. If both
/// buckets come out empty every skill is required.
pub fn categorize_skills(content: &str, skills: &[String]) -> (Vec<String>, Vec<String>) {
    let lower = content.to_lowercase();
    let mut required = Vec::new();
    let mut nice_to_have = Vec::new();

    for skill in skills {
        let needle = normalize_skill(skill);
        if needle.is_empty() {
            continue;
        }

        let positions: Vec<usize> = lower.match_indices(needle.as_str()).map(|(i, _)| i).collect();
        if positions.is_empty() {
            warn!("Extracted skill '{needle}' does not occur in the text, treating as required");
            required.push(skill.clone());
            continue;
        }

        let is_nice = positions.iter().any(|&pos| {
            let window = preceding_window(&lower, pos, CONTEXT_WINDOW_CHARS);
            NICE_TO_HAVE_INDICATORS.iter().any(|ind| window.contains(ind))
        });

        if is_nice {
            nice_to_have.push(skill.clone());
        } else {
            required.push(skill.clone());
        }
    }

    if required.is_empty() && nice_to_have.is_empty() {
        required = skills.to_vec();
    }

    (required, nice_to_have)
}

/// The `chars` characters of `text` ending at byte offset `end`.
fn preceding_window(text: &str, end: usize, chars: usize) -> &str {
    let head = &text[..end];
    let start = head
        .char_indices()
        .rev()
        .nth(chars - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &head[start..]
}
