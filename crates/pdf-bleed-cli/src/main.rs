use anyhow::Result;
use clap::{Parser, ValueEnum};
use pdf_bleed::{
    build_page_plans, compose, load_pdf, parse_bleed, parse_size, ImageAssetReader, InputSpec,
    JobOptions, OutputSpec, PdfAssetReader,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfbleed", about = "Prepare print-ready pages with bleed", version)]
struct Cli {
    /// Input file(s): pdf/png/jpg/jpeg - can specify multiple
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Page selection, 1-based: "1", "1-4", "1,3,5-7", "all"
    #[arg(long, default_value = "1")]
    pages: String,

    /// Trim size, e.g. 4x6in, 3.5x2in, 101.6x152.4mm
    #[arg(long)]
    trim: String,

    /// Bleed in the trim's unit: single value or "t,r,b,l"
    #[arg(long, default_value = "0.125")]
    bleed: String,

    /// Fit mode
    #[arg(long, default_value = "fill-bleed-proportional", value_enum)]
    fit: FitArg,

    /// Content anchor within the target box
    #[arg(long, default_value = "center", value_enum)]
    anchor: AnchorArg,

    /// Synthesize bleed by extending the trimmed content's edges
    #[arg(long, default_value = "none", value_enum)]
    bleed_gen: BleedGenArg,

    /// Which PDF box to use as the content source
    #[arg(long, default_value = "auto", value_enum)]
    pdf_box: PdfBoxArg,

    /// Draw crop marks
    #[arg(long)]
    crop_marks: bool,

    /// Output directory
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Base output filename (default = first input's filename)
    #[arg(long)]
    basename: Option<String>,

    /// Also write the resolved job as <basename>.job.json
    #[arg(long)]
    emit_job: bool,

    /// Print the page plans without writing output
    #[arg(long)]
    plan_only: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FitArg {
    FitTrimProportional,
    FitBleedProportional,
    FillBleedProportional,
    StretchTrim,
    StretchBleed,
}

#[derive(Clone, Copy, ValueEnum)]
enum AnchorArg {
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Clone, Copy, ValueEnum)]
enum BleedGenArg {
    None,
    Mirror,
    Smear,
}

#[derive(Clone, Copy, ValueEnum)]
enum PdfBoxArg {
    Auto,
    Trim,
    Bleed,
    Crop,
    Media,
}

impl From<FitArg> for pdf_bleed::FitMode {
    fn from(arg: FitArg) -> Self {
        match arg {
            FitArg::FitTrimProportional => Self::FitTrimProportional,
            FitArg::FitBleedProportional => Self::FitBleedProportional,
            FitArg::FillBleedProportional => Self::FillBleedProportional,
            FitArg::StretchTrim => Self::StretchTrim,
            FitArg::StretchBleed => Self::StretchBleed,
        }
    }
}

impl From<AnchorArg> for pdf_bleed::Anchor {
    fn from(arg: AnchorArg) -> Self {
        match arg {
            AnchorArg::Center => Self::Center,
            AnchorArg::Top => Self::Top,
            AnchorArg::Bottom => Self::Bottom,
            AnchorArg::Left => Self::Left,
            AnchorArg::Right => Self::Right,
            AnchorArg::TopLeft => Self::TopLeft,
            AnchorArg::TopRight => Self::TopRight,
            AnchorArg::BottomLeft => Self::BottomLeft,
            AnchorArg::BottomRight => Self::BottomRight,
        }
    }
}

impl From<BleedGenArg> for pdf_bleed::BleedGenerator {
    fn from(arg: BleedGenArg) -> Self {
        match arg {
            BleedGenArg::None => Self::None,
            BleedGenArg::Mirror => Self::Mirror,
            BleedGenArg::Smear => Self::Smear,
        }
    }
}

impl From<PdfBoxArg> for pdf_bleed::PdfBoxKind {
    fn from(arg: PdfBoxArg) -> Self {
        match arg {
            PdfBoxArg::Auto => Self::Auto,
            PdfBoxArg::Trim => Self::Trim,
            PdfBoxArg::Bleed => Self::Bleed,
            PdfBoxArg::Crop => Self::Crop,
            PdfBoxArg::Media => Self::Media,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let trim = parse_size(&cli.trim)?;
    let bleed = parse_bleed(&cli.bleed, trim.width.unit)?;

    let basename = cli
        .basename
        .clone()
        .filter(|b| !b.trim().is_empty())
        .unwrap_or_else(|| {
            cli.input[0]
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output")
                .to_string()
        });

    let options = JobOptions {
        inputs: cli
            .input
            .iter()
            .map(|path| InputSpec {
                path: path.clone(),
                pages: cli.pages.clone(),
                pdf_box: cli.pdf_box.into(),
            })
            .collect(),
        trim,
        bleed,
        fit_mode: cli.fit.into(),
        anchor: cli.anchor.into(),
        bleed_generator: cli.bleed_gen.into(),
        crop_marks: cli.crop_marks,
        output: OutputSpec {
            dir: cli.out_dir.clone(),
            basename,
        },
        emit_job: cli.emit_job,
    };

    if cli.plan_only {
        print_plans(&options).await?;
        return Ok(());
    }

    let outcome = compose(&options).await?;
    for path in &outcome.outputs {
        println!("Wrote: {}", path.display());
    }
    for warning in &outcome.warnings {
        println!("Warning: {}", warning);
    }
    if cli.emit_job {
        let job_path = options
            .output
            .dir
            .join(format!("{}.job.json", options.output.basename));
        println!("Wrote job: {}", job_path.display());
    }

    Ok(())
}

async fn print_plans(options: &JobOptions) -> Result<()> {
    options.validate()?;

    for input in &options.inputs {
        let extension = input
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let outcome = if extension.as_deref() == Some("pdf") {
            let document = load_pdf(&input.path).await?;
            let reader = PdfAssetReader::new(&document, input.pdf_box);
            build_page_plans(options, input, &reader)?
        } else {
            let reader = ImageAssetReader::open(&input.path)?;
            build_page_plans(options, input, &reader)?
        };

        println!("{}:", input.path.display());
        for plan in &outcome.plans {
            let placement = &plan.placement;
            println!(
                "  page {}: media {:.2}x{:.2} pt, scale {:.4}x{:.4}, offset ({:.2}, {:.2}), clip {}, edge strips {}{}",
                plan.page_index + 1,
                plan.boxes.media.width,
                plan.boxes.media.height,
                placement.scale_x,
                placement.scale_y,
                placement.offset_x,
                placement.offset_y,
                if placement.clip.is_some() { "yes" } else { "no" },
                plan.edges.len(),
                if plan.marks.is_some() { ", crop marks" } else { "" },
            );
        }
        for warning in &outcome.warnings {
            println!("  Warning: {}", warning);
        }
    }

    Ok(())
}
