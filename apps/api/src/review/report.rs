//! Report Renderer — a stateless view of the session for clients.
//!
//! Display defaults live here, not in the parser: scores are clamped to 0–10
//! and missing metric values fall back to their configured default.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::review::analysis::{score_from_value, AnalysisResult};
use crate::review::checklist::ChecklistItem;
use crate::review::session::{ReviewState, UploadedFile};
use crate::review::settings::{MetricConfig, ReviewSettings};

const MAX_SCORE: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub ai_ready: bool,
    /// Whether the upload control should be enabled.
    pub accepting_uploads: bool,
    #[serde(flatten)]
    pub state: StateView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StateView {
    Idle,
    Loading { file: UploadedFile },
    Complete { file: UploadedFile, report: ReportView },
    Failed { error: ErrorView },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorView {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricScore {
    pub key: String,
    pub label: String,
    pub score: u8,
    /// True when the model omitted the metric and the default was used.
    pub defaulted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistSummary {
    pub items: Vec<ChecklistItem>,
    pub passed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub overall_score: u8,
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub metrics: Vec<MetricScore>,
    pub keywords: Vec<String>,
    pub action_items: Vec<String>,
    pub pro_tips: Vec<String>,
    pub checklist: ChecklistSummary,
    pub resume_text: String,
    pub completed_at: DateTime<Utc>,
}

fn clamp_score(score: i64) -> u8 {
    score.clamp(0, MAX_SCORE) as u8
}

pub fn render_metrics(analysis: &AnalysisResult, metrics: &[MetricConfig]) -> Vec<MetricScore> {
    metrics
        .iter()
        .map(|metric| {
            let reported = analysis
                .performance_metrics
                .get(&metric.key)
                .and_then(score_from_value);
            MetricScore {
                key: metric.key.clone(),
                label: metric.label.clone(),
                score: reported.map(clamp_score).unwrap_or(metric.default),
                defaulted: reported.is_none(),
            }
        })
        .collect()
}

pub fn summarize_checklist(items: &[ChecklistItem]) -> ChecklistSummary {
    ChecklistSummary {
        items: items.to_vec(),
        passed: items.iter().filter(|i| i.present).count(),
        total: items.len(),
    }
}

pub fn render(state: &ReviewState, ai_ready: bool, settings: &ReviewSettings) -> ReviewView {
    let state_view = match state {
        ReviewState::Idle => StateView::Idle,
        ReviewState::Loading { file, .. } => StateView::Loading { file: file.clone() },
        ReviewState::Complete {
            file,
            resume_text,
            checklist,
            analysis,
            completed_at,
            ..
        } => StateView::Complete {
            file: file.clone(),
            report: ReportView {
                overall_score: analysis.overall_score.map(clamp_score).unwrap_or(0),
                summary: analysis.summary.clone(),
                strengths: analysis.strengths.clone(),
                improvements: analysis.improvements.clone(),
                metrics: render_metrics(analysis, &settings.metrics),
                keywords: analysis.keywords.clone(),
                action_items: analysis.action_items.clone().unwrap_or_default(),
                pro_tips: analysis.pro_tips.clone().unwrap_or_default(),
                checklist: summarize_checklist(checklist),
                resume_text: resume_text.clone(),
                completed_at: *completed_at,
            },
        },
        ReviewState::Failed { code, error } => StateView::Failed {
            error: ErrorView {
                code: code.clone(),
                message: error.clone(),
            },
        },
    };

    ReviewView {
        ai_ready,
        accepting_uploads: ai_ready && !state.is_loading(),
        state: state_view,
    }
}
