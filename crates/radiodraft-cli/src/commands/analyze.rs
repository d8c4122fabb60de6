//! `radiodraft analyze` -- run the pipeline on one radiograph.
//!
//! Reads and validates the image before touching configuration, so a bad
//! input fails fast without needing upstream credentials.
//!
//! # Example
//!
//! ```text
//! radiodraft analyze chest.png --age 61 --indication "chest pain" --pretty
//! radiodraft analyze wrist.jpg --image-type limb --view "PA and Lateral"
//! ```

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use radiodraft_core::build_live_pipeline;
use radiodraft_types::{PipelineResult, StudyRequest, XrayImage};

use super::{load_validated_config, resolve_image_type};

/// Arguments for the `radiodraft analyze` subcommand.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a JPEG or PNG radiograph.
    pub image: PathBuf,

    /// Study kind: chest_single, chest_pa_lateral or limb.
    #[arg(long, default_value = "chest_single")]
    pub image_type: String,

    /// Patient age in years.
    #[arg(long)]
    pub age: Option<u32>,

    /// Clinical indication for the study.
    #[arg(long)]
    pub indication: Option<String>,

    /// Projection or view hint (e.g. PA, AP, "AP and Lateral").
    #[arg(long)]
    pub view: Option<String>,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long)]
    pub config: Option<String>,

    /// Pretty-print the JSON result.
    #[arg(long)]
    pub pretty: bool,
}

/// Run the analyze command.
pub async fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let image = read_image(&args.image)?;
    let study = build_study(image, &args);

    let settings = load_validated_config(args.config.as_deref())?;
    let pipeline = build_live_pipeline(&settings)?;

    info!(image = %args.image.display(), image_type = %study.image_type, "analyzing study");
    let result = pipeline.run(&study).await?;

    println!("{}", render_result(&result, args.pretty)?);
    Ok(())
}

/// Read `path` and check it is an image the upstream accepts.
pub fn read_image(path: &Path) -> anyhow::Result<XrayImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("failed to read image {}: {e}", path.display()))?;
    XrayImage::from_bytes(bytes).map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
}

fn build_study(image: XrayImage, args: &AnalyzeArgs) -> StudyRequest {
    let mut study = StudyRequest::new(image, resolve_image_type(&args.image_type));
    if let Some(age) = args.age {
        study = study.with_patient_age(age);
    }
    if let Some(ref indication) = args.indication {
        study = study.with_clinical_indications(indication.as_str());
    }
    if let Some(ref view) = args.view {
        study = study.with_view(view.as_str());
    }
    study
}

fn render_result(result: &PipelineResult, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(json)
}
