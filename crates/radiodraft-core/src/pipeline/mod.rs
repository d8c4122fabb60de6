//! Three-call study pipeline.
//!
//! Stages: Triage -> Select -> Findings -> Report

pub mod cost;
pub mod findings;
pub mod llm_adapter;
pub mod orchestrator;
pub mod report;
pub mod selector;
pub mod traits;
pub mod triage;

pub use cost::{CostLedger, Stage};
pub use findings::{FindingsError, FindingsGenerator, FindingsResult};
pub use llm_adapter::{BuildError, ProviderInvoker, build_live_pipeline};
pub use orchestrator::{PipelineError, PipelineOrchestrator};
pub use report::{DraftFailure, FALLBACK_REPORT, ReportDrafter, ReportOutcome, ReportResult};
pub use selector::{ModelChoice, ModelSelector};
pub use traits::ModelInvoker;
pub use triage::{TriageClassifier, TriageOutcome};
