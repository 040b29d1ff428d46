//! Upload Orchestrator — owns the single review session.
//!
//! States: Idle → Loading → Complete | Failed. A cycle's state is replaced
//! wholesale, never patched. The lock is never held across extraction or the
//! chat call.

use std::sync::Arc;

use anyhow::anyhow;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::readiness::ReadinessGate;
use crate::review::analysis::AnalysisResult;
use crate::review::analyzer::ResumeAnalyzer;
use crate::review::checklist::{build_checklist, ChecklistItem};
use crate::review::extractor::TextExtractor;
use crate::review::settings::ReviewSettings;

pub const PDF_MIME: &str = "application/pdf";
pub const INVALID_FILE_MESSAGE: &str = "Please upload a PDF file.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub file: UploadedFile,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReviewState {
    Idle,
    Loading {
        cycle_id: Uuid,
        file: UploadedFile,
        started_at: DateTime<Utc>,
    },
    Complete {
        cycle_id: Uuid,
        file: UploadedFile,
        resume_text: String,
        checklist: Vec<ChecklistItem>,
        analysis: AnalysisResult,
        completed_at: DateTime<Utc>,
    },
    /// Idle after a failed cycle; carries the message shown to the user.
    Failed { code: String, error: String },
}

impl ReviewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ReviewState::Loading { .. })
    }
}

/// Only `application/pdf` is accepted; MIME parameters are ignored.
pub fn validate_upload(file: &UploadedFile) -> Result<(), AppError> {
    let essence = file.content_type.split(';').next().unwrap_or("").trim();
    if essence.eq_ignore_ascii_case(PDF_MIME) {
        Ok(())
    } else {
        Err(AppError::InvalidUpload(INVALID_FILE_MESSAGE.to_string()))
    }
}

struct CycleOutput {
    resume_text: String,
    checklist: Vec<ChecklistItem>,
    analysis: AnalysisResult,
}

#[derive(Clone)]
pub struct ReviewOrchestrator {
    extractor: TextExtractor,
    analyzer: ResumeAnalyzer,
    settings: Arc<ReviewSettings>,
    gate: ReadinessGate,
    state: Arc<RwLock<ReviewState>>,
}

impl ReviewOrchestrator {
    pub fn new(
        extractor: TextExtractor,
        analyzer: ResumeAnalyzer,
        settings: Arc<ReviewSettings>,
        gate: ReadinessGate,
    ) -> Self {
        Self {
            extractor,
            analyzer,
            settings,
            gate,
            state: Arc::new(RwLock::new(ReviewState::Idle)),
        }
    }

    pub fn is_ai_ready(&self) -> bool {
        self.gate.is_ready()
    }

    pub fn settings(&self) -> &ReviewSettings {
        &self.settings
    }

    pub async fn snapshot(&self) -> ReviewState {
        self.state.read().await.clone()
    }

    /// Runs one upload cycle to completion and returns the resulting state.
    ///
    /// Rejections (AI not ready, wrong file type, cycle already running) leave
    /// the state untouched. Any later failure moves the session to `Failed`.
    pub async fn submit(&self, upload: Upload) -> Result<ReviewState, AppError> {
        if !self.gate.is_ready() {
            return Err(AppError::NotReady);
        }
        validate_upload(&upload.file)?;
        let cycle_id = self.begin(&upload.file).await?;

        // Detached so a dropped request cannot leave the session stuck in Loading.
        let this = self.clone();
        let task = tokio::spawn(async move { this.run_cycle(cycle_id, upload.data).await });
        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                let err = AppError::Internal(anyhow!("review task failed: {e}"));
                self.fail(&err).await;
                Err(err)
            }
        }
    }

    /// Returns the session to Idle. Refused while a cycle is running.
    pub async fn reset(&self) -> Result<ReviewState, AppError> {
        let mut state = self.state.write().await;
        if state.is_loading() {
            return Err(AppError::Conflict(
                "A review is in progress; wait for it to finish".to_string(),
            ));
        }
        *state = ReviewState::Idle;
        info!("Review session reset");
        Ok(ReviewState::Idle)
    }

    async fn begin(&self, file: &UploadedFile) -> Result<Uuid, AppError> {
        let mut state = self.state.write().await;
        if state.is_loading() {
            return Err(AppError::Conflict(
                "A review is already in progress".to_string(),
            ));
        }
        let cycle_id = Uuid::new_v4();
        *state = ReviewState::Loading {
            cycle_id,
            file: file.clone(),
            started_at: Utc::now(),
        };
        info!(%cycle_id, file = %file.name, bytes = file.size, "Review started");
        Ok(cycle_id)
    }

    async fn run_cycle(&self, cycle_id: Uuid, data: Bytes) -> Result<ReviewState, AppError> {
        match self.review(data).await {
            Ok(output) => {
                let mut state = self.state.write().await;
                let file = match &*state {
                    ReviewState::Loading { file, .. } => file.clone(),
                    _ => return Err(AppError::Internal(anyhow!("review state changed mid-cycle"))),
                };
                let next = ReviewState::Complete {
                    cycle_id,
                    file,
                    resume_text: output.resume_text,
                    checklist: output.checklist,
                    analysis: output.analysis,
                    completed_at: Utc::now(),
                };
                *state = next.clone();
                info!(%cycle_id, "Review complete");
                Ok(next)
            }
            Err(err) => {
                warn!(%cycle_id, "Review failed: {err}");
                self.fail(&err).await;
                Err(err)
            }
        }
    }

    async fn review(&self, data: Bytes) -> Result<CycleOutput, AppError> {
        let resume_text = self.extractor.extract(data).await;
        if resume_text.is_empty() {
            warn!("No text extracted from upload; sending empty document");
        }
        let checklist = build_checklist(&resume_text, &self.settings.checks);
        let analysis = self.analyzer.analyze(&resume_text).await?;
        Ok(CycleOutput {
            resume_text,
            checklist,
            analysis,
        })
    }

    async fn fail(&self, err: &AppError) {
        *self.state.write().await = ReviewState::Failed {
            code: err.code().to_string(),
            error: err.user_message(),
        };
    }
}
