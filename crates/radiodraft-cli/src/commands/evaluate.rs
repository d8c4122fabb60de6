//! `radiodraft evaluate` -- score drafted reports against known diagnoses.
//!
//! The manifest is a JSON array of cases:
//!
//! ```text
//! [
//!   {"path": "normal/001.png", "diagnosis": "normal"},
//!   {"path": "fracture/017.jpg", "diagnosis": "fracture", "image_type": "limb"}
//! ]
//! ```
//!
//! Image paths are resolved relative to the manifest. Cases run one at a
//! time; a case whose pipeline run fails counts as incorrect at zero cost.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Deserialize;
use tracing::{info, warn};

use radiodraft_core::{PipelineOrchestrator, build_live_pipeline};
use radiodraft_types::{ImageType, ModelTier, StudyRequest};

use super::analyze::read_image;
use super::{load_validated_config, resolve_image_type};

/// Arguments for the `radiodraft evaluate` subcommand.
#[derive(Args)]
pub struct EvaluateArgs {
    /// Path to the JSON case manifest.
    pub manifest: PathBuf,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,
}

/// One labelled case from the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct EvalCase {
    /// Image path, relative to the manifest.
    pub path: PathBuf,
    /// Expected diagnosis keyword.
    pub diagnosis: String,
    /// Study kind; lenient, defaults to single chest.
    #[serde(default, alias = "imageType")]
    pub image_type: Option<String>,
}

/// Result of running one case.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseOutcome {
    pub diagnosis: String,
    /// `None` if the pipeline run failed.
    pub model_used: Option<ModelTier>,
    pub correct: bool,
    pub cost: f64,
}

/// Aggregate over all cases.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub correct: usize,
    pub failed: usize,
    pub accuracy: f64,
    pub average_cost: f64,
}

/// Run the evaluate command.
pub async fn run(args: EvaluateArgs) -> anyhow::Result<()> {
    let cases = read_manifest(&args.manifest)?;
    if cases.is_empty() {
        anyhow::bail!("manifest {} contains no cases", args.manifest.display());
    }
    let base = args.manifest.parent().unwrap_or_else(|| Path::new("."));

    let settings = load_validated_config(args.config.as_deref())?;
    let pipeline = build_live_pipeline(&settings)?;

    let mut outcomes = Vec::with_capacity(cases.len());
    for (i, case) in cases.iter().enumerate() {
        let outcome = run_case(&pipeline, base, case).await;
        println!(
            "[{}/{}] {:<20} model={:<7} correct={:<5} cost=${:.3}",
            i + 1,
            cases.len(),
            outcome.diagnosis,
            outcome.model_used.map_or("failed", ModelTier::as_str),
            outcome.correct,
            outcome.cost
        );
        outcomes.push(outcome);
    }

    let summary = summarize(&outcomes);
    println!();
    println!("Cases:        {}", summary.total);
    println!("Correct:      {}", summary.correct);
    println!("Failed runs:  {}", summary.failed);
    println!("Accuracy:     {:.1}%", summary.accuracy * 100.0);
    println!("Average cost: ${:.4}", summary.average_cost);
    Ok(())
}

/// Parse the case manifest.
pub fn read_manifest(path: &Path) -> anyhow::Result<Vec<EvalCase>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read manifest {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse manifest {}: {e}", path.display()))
}

async fn run_case(pipeline: &PipelineOrchestrator, base: &Path, case: &EvalCase) -> CaseOutcome {
    let failed = || CaseOutcome {
        diagnosis: case.diagnosis.clone(),
        model_used: None,
        correct: false,
        cost: 0.0,
    };

    let image_path = base.join(&case.path);
    let image = match read_image(&image_path) {
        Ok(image) => image,
        Err(e) => {
            warn!(case = %case.path.display(), error = %e, "skipping unreadable case");
            return failed();
        }
    };
    let image_type = case
        .image_type
        .as_deref()
        .map_or(ImageType::default(), resolve_image_type);

    match pipeline.run(&StudyRequest::new(image, image_type)).await {
        Ok(result) => {
            let correct = is_correct(&result.report, &case.diagnosis);
            info!(case = %case.path.display(), correct, "case evaluated");
            CaseOutcome {
                diagnosis: case.diagnosis.clone(),
                model_used: Some(result.model_used),
                correct,
                cost: result.total_cost,
            }
        }
        Err(e) => {
            warn!(case = %case.path.display(), error = %e, "pipeline run failed");
            failed()
        }
    }
}

/// A report matches if it mentions the diagnosis, or says "no acute" for a
/// normal study. Case-insensitive.
pub fn is_correct(report: &str, diagnosis: &str) -> bool {
    let report = report.to_lowercase();
    let diagnosis = diagnosis.trim().to_lowercase();
    if diagnosis == "normal" && report.contains("no acute") {
        return true;
    }
    !diagnosis.is_empty() && report.contains(&diagnosis)
}

/// Accuracy over all cases; average cost over all cases, failures at zero.
pub fn summarize(outcomes: &[CaseOutcome]) -> Summary {
    let total = outcomes.len();
    let correct = outcomes.iter().filter(|o| o.correct).count();
    let failed = outcomes.iter().filter(|o| o.model_used.is_none()).count();
    let cost: f64 = outcomes.iter().map(|o| o.cost).sum();
    let (accuracy, average_cost) = if total == 0 {
        (0.0, 0.0)
    } else {
        (correct as f64 / total as f64, cost / total as f64)
    };
    Summary {
        total,
        correct,
        failed,
        accuracy,
        average_cost,
    }
}
