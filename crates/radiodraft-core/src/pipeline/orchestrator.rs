//! Pipeline orchestration.
//!
//! Runs the stages strictly in order:
//!
//! ```text
//! Start -> Triaged -> FindingsDrafted -> ReportDrafted -> Done
//! ```
//!
//! Triage and drafting degrade on their own. Findings failure is the only
//! way a run ends without a [`PipelineResult`]; it is returned unchanged
//! inside [`PipelineError::Findings`].

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use radiodraft_types::{ImageType, PipelineResult, Settings, StudyRequest, XrayImage};

use super::cost::{CostLedger, Stage};
use super::findings::{FindingsError, FindingsGenerator};
use super::report::ReportDrafter;
use super::selector::ModelSelector;
use super::traits::ModelInvoker;
use super::triage::TriageClassifier;
use crate::prompts::PromptSource;

/// A pipeline run that produced no result.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Findings generation failed.
    #[error(transparent)]
    Findings(#[from] FindingsError),
}

/// Sequences triage, routing, findings and drafting for one study at a time.
///
/// Holds no per-run state, so one instance can serve concurrent runs from
/// behind an `Arc`.
pub struct PipelineOrchestrator {
    triage: TriageClassifier,
    selector: ModelSelector,
    findings: FindingsGenerator,
    report: ReportDrafter,
    max_cost_per_study: f64,
}

impl PipelineOrchestrator {
    /// Wire the stages from settings, an invoker and a prompt source.
    ///
    /// # Errors
    ///
    /// Rejects a confidence threshold outside `[0, 1]` and any negative or
    /// non-finite cost estimate, since either would break routing or the
    /// cost total. Upstream keys are not checked here.
    pub fn new(
        settings: &Settings,
        invoker: Arc<dyn ModelInvoker>,
        prompts: Arc<dyn PromptSource>,
    ) -> radiodraft_types::Result<Self> {
        settings.routing.validate()?;
        settings.costs.validate()?;

        Ok(Self {
            triage: TriageClassifier::new(
                Arc::clone(&invoker),
                Arc::clone(&prompts),
                settings.costs.triage,
            ),
            selector: ModelSelector::from_settings(&settings.routing, &settings.costs),
            findings: FindingsGenerator::new(Arc::clone(&invoker), Arc::clone(&prompts)),
            report: ReportDrafter::new(invoker, prompts, settings.costs.report),
            max_cost_per_study: settings.costs.max_per_study,
        })
    }

    /// The routing policy in use.
    pub fn selector(&self) -> &ModelSelector {
        &self.selector
    }

    /// Analyse an image with optional patient context.
    pub async fn analyze(
        &self,
        image: XrayImage,
        image_type: ImageType,
        patient_age: Option<u32>,
        clinical_indications: Option<String>,
    ) -> Result<PipelineResult, PipelineError> {
        let mut study = StudyRequest::new(image, image_type);
        if let Some(age) = patient_age {
            study = study.with_patient_age(age);
        }
        if let Some(text) = clinical_indications {
            study = study.with_clinical_indications(text);
        }
        self.run(&study).await
    }

    /// Run the full pipeline for one study.
    pub async fn run(&self, study: &StudyRequest) -> Result<PipelineResult, PipelineError> {
        let span = info_span!("study", id = %Uuid::new_v4(), image_type = %study.image_type);
        self.run_inner(study).instrument(span).await
    }

    async fn run_inner(&self, study: &StudyRequest) -> Result<PipelineResult, PipelineError> {
        let started = Instant::now();
        let mut ledger = CostLedger::new();

        info!("triaging");
        let verdict = self
            .triage
            .triage(&study.image, study.image_type)
            .await
            .into_verdict();
        ledger.record(Stage::Triage, verdict.cost);

        let choice = self.selector.select(&verdict);
        info!(tier = %choice.tier, urgency = %verdict.urgency, "generating findings");
        let findings = self
            .findings
            .generate_findings(study, &verdict, &choice)
            .await?;
        ledger.record(Stage::Findings, findings.cost);

        info!("drafting report");
        let report = self
            .report
            .draft_report(&findings.findings, study.image_type, &findings.triage)
            .await
            .into_result();
        ledger.record(Stage::Report, report.cost);

        let total_cost = ledger.total();
        let processing_time = started.elapsed().as_secs_f64();

        if total_cost > self.max_cost_per_study {
            warn!(
                total_cost,
                budget = self.max_cost_per_study,
                overrun = total_cost - self.max_cost_per_study,
                "study exceeded cost budget"
            );
        }

        info!(
            model_used = %findings.model_used,
            total_cost,
            processing_time,
            "analysis complete"
        );

        Ok(PipelineResult {
            triage: report.triage,
            findings: findings.findings,
            report: report.report,
            model_used: findings.model_used,
            total_cost,
            processing_time,
        })
    }
}
