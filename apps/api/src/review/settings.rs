//! Review configuration: the ATS checklist definitions and the performance
//! metrics shown in the report. Both are plain data; built-in defaults can be
//! replaced by a JSON file.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::review::checklist::{CheckDefinition, Detector};

/// A performance metric the AI is asked to score, with the value shown when
/// the reply omits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricConfig {
    pub key: String,
    pub label: String,
    pub default: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSettings {
    pub checks: Vec<CheckDefinition>,
    pub metrics: Vec<MetricConfig>,
}

impl ReviewSettings {
    /// Loads settings from a JSON file and validates them.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read review config '{}'", path.display()))?;
        let settings: ReviewSettings = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid review config '{}'", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check labels and metric keys must be unique; metric defaults are 0–10.
    pub fn validate(&self) -> Result<()> {
        let mut labels = HashSet::new();
        for check in &self.checks {
            if !labels.insert(check.label.as_str()) {
                bail!("Duplicate checklist label '{}'", check.label);
            }
        }

        let mut keys = HashSet::new();
        for metric in &self.metrics {
            if !keys.insert(metric.key.as_str()) {
                bail!("Duplicate metric key '{}'", metric.key);
            }
            if metric.default > 10 {
                bail!(
                    "Metric '{}' default must be between 0 and 10, got {}",
                    metric.key,
                    metric.default
                );
            }
        }
        Ok(())
    }
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            checks: default_checks(),
            metrics: default_metrics(),
        }
    }
}

fn any_of(label: &str, keywords: &[&str]) -> CheckDefinition {
    CheckDefinition {
        label: label.to_string(),
        detector: Detector::AnyKeyword {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        },
    }
}

fn default_checks() -> Vec<CheckDefinition> {
    vec![
        any_of("Contact email", &["@"]),
        any_of("LinkedIn profile", &["linkedin"]),
        any_of("GitHub or portfolio link", &["github", "portfolio", "gitlab"]),
        any_of("Professional summary", &["summary", "profile", "objective"]),
        any_of("Work experience section", &["experience", "employment", "work history"]),
        any_of("Education section", &["education", "university", "degree"]),
        any_of("Skills section", &["skills", "technologies", "tech stack"]),
        any_of("Projects section", &["projects"]),
        any_of("Certifications", &["certification", "certified", "certificate"]),
        any_of(
            "Action verbs",
            &["led", "built", "designed", "developed", "implemented", "delivered"],
        ),
    ]
}

fn metric(key: &str, label: &str, default: u8) -> MetricConfig {
    MetricConfig {
        key: key.to_string(),
        label: label.to_string(),
        default,
    }
}

fn default_metrics() -> Vec<MetricConfig> {
    vec![
        metric("formatting", "Formatting", 7),
        metric("contentQuality", "Content Quality", 6),
        metric("keywordUsage", "Keyword Usage", 5),
        metric("atsCompatibility", "ATS Compatibility", 6),
        metric("quantifiableAchievements", "Quantifiable Achievements", 4),
    ]
}
