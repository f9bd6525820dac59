//! Job orchestration
//!
//! Loads each input, builds the page plans, drives the rendering
//! backend and saves the outputs. Per-page backend failures become
//! error-marker pages and warnings; everything else aborts the job.

mod io;

pub use io::{load_image, load_pdf, save_pdf};

use crate::assets::{ImageAssetReader, PdfAssetReader};
use crate::options::{InputSpec, JobOptions};
use crate::plan::build_page_plans;
use crate::render::{LopdfBackend, RenderBackend, SourceContent};
use crate::types::{BleedError, JobWarning, Result};
use std::path::PathBuf;

/// Paths written plus the warnings gathered across all inputs
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOutcome {
    pub outputs: Vec<PathBuf>,
    pub warnings: Vec<JobWarning>,
}

/// Run a whole job: one output document per input
pub async fn compose(options: &JobOptions) -> Result<ComposeOutcome> {
    options.validate()?;

    tokio::fs::create_dir_all(&options.output.dir).await?;

    let mut outputs = Vec::new();
    let mut warnings = Vec::new();

    for input in &options.inputs {
        if !input.path.exists() {
            return Err(BleedError::MissingInput(input.path.clone()));
        }
        let source = load_source(input).await?;
        let out_path = output_path(options, input);

        let job_options = options.clone();
        let job_input = input.clone();
        let (document, input_warnings) =
            tokio::task::spawn_blocking(move || compose_input(&job_options, &job_input, source))
                .await??;
        warnings.extend(input_warnings);

        save_pdf(document, &out_path).await?;
        outputs.push(out_path);
    }

    #[cfg(feature = "serde")]
    if options.emit_job {
        let job_path = options
            .output
            .dir
            .join(format!("{}.job.json", options.output.basename));
        options.save(&job_path).await?;
    }

    Ok(ComposeOutcome { outputs, warnings })
}

async fn load_source(input: &InputSpec) -> Result<SourceContent> {
    let extension = input
        .path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => Ok(SourceContent::Pdf {
            document: load_pdf(&input.path).await?,
            pdf_box: input.pdf_box,
        }),
        Some("png") | Some("jpg") | Some("jpeg") => Ok(SourceContent::Raster {
            image: load_image(&input.path).await?,
        }),
        other => Err(BleedError::UnsupportedInput(format!(
            "{} ({})",
            input.path.display(),
            other.unwrap_or("no extension")
        ))),
    }
}

/// Single input writes `<basename>.pdf`; multiple inputs write
/// `<basename>__<input-stem>.pdf` each
fn output_path(options: &JobOptions, input: &InputSpec) -> PathBuf {
    if options.inputs.len() == 1 {
        options
            .output
            .dir
            .join(format!("{}.pdf", options.output.basename))
    } else {
        let stem = input
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("input");
        options
            .output
            .dir
            .join(format!("{}__{}.pdf", options.output.basename, stem))
    }
}

fn compose_input(
    options: &JobOptions,
    input: &InputSpec,
    source: SourceContent,
) -> Result<(lopdf::Document, Vec<JobWarning>)> {
    let outcome = match &source {
        SourceContent::Pdf { document, pdf_box } => {
            let reader = PdfAssetReader::new(document, *pdf_box);
            build_page_plans(options, input, &reader)?
        }
        SourceContent::Raster { image } => {
            use image::GenericImageView;
            let (width_px, height_px) = image.dimensions();
            let reader = ImageAssetReader::from_dimensions(width_px, height_px);
            build_page_plans(options, input, &reader)?
        }
    };

    let mut warnings = outcome.warnings;
    let mut backend = LopdfBackend::new(source);
    backend.reset_origin();
    for plan in &outcome.plans {
        if let Err(error) = backend.render_page(plan) {
            let reason = error.to_string();
            backend.render_error_page(plan, &reason)?;
            warnings.push(JobWarning::PlacementFailure {
                page_index: plan.page_index,
                reason,
            });
        }
    }

    Ok((backend.finish()?, warnings))
}
