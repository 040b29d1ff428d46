// Résumé review: PDF text extraction, ATS checklist, AI analysis and the
// single-session upload orchestrator.
// All chat calls go through llm_client — no direct provider calls here.

pub mod analysis;
pub mod analyzer;
pub mod checklist;
pub mod extractor;
pub mod handlers;
pub mod prompts;
pub mod report;
pub mod session;
pub mod settings;
