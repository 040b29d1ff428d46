//! ATS checklist — case-insensitive presence tests over the extracted résumé text.
//!
//! Pure and deterministic: one item per configured check, in configured order.

use serde::{Deserialize, Serialize};

/// How a check decides whether the résumé covers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Detector {
    /// Present when `needle` occurs anywhere in the text.
    Substring { needle: String },
    /// Present when any keyword occurs anywhere in the text.
    AnyKeyword { keywords: Vec<String> },
}

impl Detector {
    /// `text_lower` must already be lowercased.
    fn matches(&self, text_lower: &str) -> bool {
        match self {
            Detector::Substring { needle } => text_lower.contains(&needle.to_lowercase()),
            Detector::AnyKeyword { keywords } => keywords
                .iter()
                .any(|kw| text_lower.contains(&kw.to_lowercase())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckDefinition {
    pub label: String,
    pub detector: Detector,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub label: String,
    pub present: bool,
}

pub fn build_checklist(text: &str, checks: &[CheckDefinition]) -> Vec<ChecklistItem> {
    let text_lower = text.to_lowercase();
    checks
        .iter()
        .map(|check| ChecklistItem {
            label: check.label.clone(),
            present: check.detector.matches(&text_lower),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn substring(label: &str, needle: &str) -> CheckDefinition {
        CheckDefinition {
            label: label.to_string(),
            detector: Detector::Substring {
                needle: needle.to_string(),
            },
        }
    }

    #[test]
    fn test_python_present_go_absent() {
        let checks = vec![substring("Python", "Python"), substring("Go", "Go")];
        let items = build_checklist("Python Java SQL", &checks);
        assert_eq!(
            items,
            vec![
                ChecklistItem {
                    label: "Python".to_string(),
                    present: true
                },
                ChecklistItem {
                    label: "Go".to_string(),
                    present: false
                },
            ]
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let checks = vec![substring("Rust", "rUsT")];
        assert!(build_checklist("Senior RUST engineer", &checks)[0].present);
    }

    #[test]
    fn test_any_keyword_detector() {
        let checks = vec![CheckDefinition {
            label: "Cloud".to_string(),
            detector: Detector::AnyKeyword {
                keywords: vec!["AWS".to_string(), "Azure".to_string()],
            },
        }];
        assert!(build_checklist("deployed on azure functions", &checks)[0].present);
        assert!(!build_checklist("bare metal only", &checks)[0].present);
    }

    #[test]
    fn test_empty_keyword_set_never_matches() {
        let checks = vec![CheckDefinition {
            label: "Nothing".to_string(),
            detector: Detector::AnyKeyword { keywords: vec![] },
        }];
        assert!(!build_checklist("anything", &checks)[0].present);
    }

    #[test]
    fn test_output_preserves_order_and_cardinality() {
        let checks: Vec<_> = ["z", "a", "m", "b"]
            .iter()
            .map(|l| substring(l, l))
            .collect();
        for text in ["", "zam", "nothing relevant", "B"] {
            let items = build_checklist(text, &checks);
            assert_eq!(items.len(), checks.len());
            let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
            assert_eq!(labels, vec!["z", "a", "m", "b"]);
        }
    }

    #[test]
    fn test_empty_text_marks_everything_absent() {
        let checks = vec![substring("Python", "python"), substring("SQL", "sql")];
        assert!(build_checklist("", &checks).iter().all(|i| !i.present));
    }

    #[test]
    fn test_no_checks_yields_no_items() {
        assert!(build_checklist("Python", &[]).is_empty());
    }
}
