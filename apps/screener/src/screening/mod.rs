// Skill screening: requirements parsing, skill matching, fit scoring and batch reports.
// All classifier calls go through the `SkillClassifier` seam; nothing here talks to
// Anthropic directly.

pub mod cache;
pub mod classifier;
pub mod extraction;
pub mod fit;
pub mod handlers;
pub mod matcher;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod requirements;
