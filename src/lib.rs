//! bbox-buddy: bounding-box annotation editing and conversion.
//!
//! The crate holds the geometry and format-conversion core of a
//! rectangular box annotation editor, plus a UI-agnostic editing session
//! that a host (desktop shell, web view, or the bundled CLI) drives with
//! pointer events.
//!
//! # Modules
//!
//! - [`model`]: Box, image and dataset types, raw wire types, JSON I/O
//! - [`geometry`]: Box creation, drag and resize transforms
//! - [`conversion`]: Raw ⇄ internal conversion and conversion reports
//! - [`import`]: Decoding either accepted JSON layout
//! - [`edit`]: Pure box-list edits and the editor session state machine
//! - [`service`]: The host file capability
//! - [`validation`]: Dataset validation and error reporting
//! - [`config`]: YAML configuration
//! - [`error`]: Error types for bbox-buddy operations

pub mod config;
pub mod conversion;
pub mod edit;
pub mod error;
pub mod geometry;
pub mod import;
pub mod model;
pub mod service;
pub mod validation;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use config::EditorConfig;
use conversion::{ConversionCounts, ConversionReport, RawExportOptions, Schema};
use model::{ColorPolicy, LabelPalette};
use service::{FileService, FsFileService};

pub use error::BboxError;

/// The bbox-buddy CLI application.
#[derive(Parser)]
#[command(name = "bbox-buddy")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// YAML config file (label colors, color policy, export options).
    #[arg(long, global = true, env = "BBOX_BUDDY_CONFIG")]
    config: Option<PathBuf>,

    /// Color policy for labels without a reserved color.
    #[arg(long, global = true, value_enum, env = "BBOX_BUDDY_COLOR_POLICY")]
    color_policy: Option<ColorPolicyArg>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert a dataset between the raw and internal layouts.
    Convert(ConvertArgs),
    /// Validate a dataset for errors and warnings.
    Validate(ValidateArgs),
    /// List label suggestions with their display colors.
    Labels(LabelsArgs),
    /// Check that every image referenced by a dataset exists.
    Images(ImagesArgs),
    /// Write the built-in demo dataset.
    Demo(DemoArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ColorPolicyArg {
    Hashed,
    Random,
}

impl From<ColorPolicyArg> for ColorPolicy {
    fn from(arg: ColorPolicyArg) -> Self {
        match arg {
            ColorPolicyArg::Hashed => ColorPolicy::Hashed,
            ColorPolicyArg::Random => ColorPolicy::Random,
        }
    }
}

/// Target layout for written datasets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SchemaArg {
    /// Array of `{file, annotation: {bboxes, labels}}` items.
    Raw,
    /// `{images: [...]}` with ids and colors.
    Internal,
}

impl From<SchemaArg> for Schema {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Raw => Schema::Raw,
            SchemaArg::Internal => Schema::Internal,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Input dataset (raw or internal layout, detected automatically).
    input: PathBuf,

    /// Output file. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Layout to write.
    #[arg(long, value_enum, default_value = "raw")]
    to: SchemaArg,

    /// Restore original directory prefixes when writing raw files.
    #[arg(long)]
    preserve_source_paths: bool,

    /// Conversion report format.
    #[arg(long, value_enum, default_value = "text")]
    report: ReportFormat,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Input file to validate.
    input: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report.
    #[arg(long, value_enum, default_value = "text")]
    output: ReportFormat,
}

#[derive(clap::Args)]
struct LabelsArgs {
    /// Input dataset.
    input: PathBuf,
}

#[derive(clap::Args)]
struct ImagesArgs {
    /// Input dataset.
    input: PathBuf,

    /// Directory relative image names resolve against. Defaults to the
    /// dataset's directory.
    #[arg(long)]
    base_dir: Option<PathBuf>,
}

#[derive(clap::Args)]
struct DemoArgs {
    /// Output file. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Layout to write.
    #[arg(long, value_enum, default_value = "raw")]
    to: SchemaArg,
}

/// Settings after merging the config file with CLI and env overrides.
struct Settings {
    config: EditorConfig,
    palette: LabelPalette,
}

impl Settings {
    fn load(cli: &Cli) -> Result<Self, BboxError> {
        let mut config = match &cli.config {
            Some(path) => EditorConfig::from_yaml_file(path)?,
            None => EditorConfig::default(),
        };
        if let Some(policy) = cli.color_policy {
            config.color_policy = policy.into();
        }
        let palette = config.palette();
        Ok(Self { config, palette })
    }
}

/// Run the bbox-buddy CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), BboxError> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli)?;

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args, &settings),
        Some(Commands::Validate(args)) => run_validate(args, &settings),
        Some(Commands::Labels(args)) => run_labels(args, &settings),
        Some(Commands::Images(args)) => run_images(args, &settings),
        Some(Commands::Demo(args)) => run_demo(args),
        None => {
            println!("bbox-buddy {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Bounding-box annotation editing and conversion.");
            println!();
            println!("Run 'bbox-buddy --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs, settings: &Settings) -> Result<(), BboxError> {
    let decoded = import::read_dataset(&args.input, &settings.palette)?;
    let target: Schema = args.to.into();

    let mut opts = settings.config.export_options();
    opts.preserve_source_paths |= args.preserve_source_paths;

    let mut report = match target {
        Schema::Raw => conversion::build_export_report(&decoded.dataset, &opts),
        Schema::Internal => {
            let mut report = ConversionReport::new(decoded.shape.to_string(), target.name());
            report.input = ConversionCounts {
                images: decoded.dataset.images.len(),
                boxes: decoded.dataset.box_count(),
            };
            report.output = report.input.clone();
            report
        }
    };
    if let Some(raw) = &decoded.raw {
        // Raw input: the import step's losses come first.
        let import_report = conversion::build_import_report(raw);
        report.input = import_report.input;
        let mut issues = import_report.issues;
        issues.append(&mut report.issues);
        report.issues = issues;
    }
    report.from = decoded.shape.to_string();

    for issue in &report.issues {
        log::debug!("conversion issue {:?}: {}", issue.code, issue.message);
    }

    let written = write_dataset(&decoded.dataset, target, &opts, args.output.as_deref())?;

    let rendered = match args.report {
        ReportFormat::Text => report.to_string(),
        ReportFormat::Json => serde_json::to_string_pretty(&report).map_err(|source| {
            BboxError::JsonWrite {
                path: PathBuf::from("<report>"),
                source,
            }
        })?,
    };

    // Keep stdout clean for the dataset when no output file was given.
    match written {
        Some(path) => {
            println!("{}", rendered.trim_end());
            println!("Wrote {}", path.display());
        }
        None => eprintln!("{}", rendered.trim_end()),
    }

    Ok(())
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs, settings: &Settings) -> Result<(), BboxError> {
    let decoded = import::read_dataset(&args.input, &settings.palette)?;

    let opts = validation::ValidateOptions {
        strict: args.strict,
    };
    let report = validation::validate_dataset(&decoded.dataset, &opts);

    match args.output {
        ReportFormat::Json => {
            let summary = serde_json::json!({
                "error_count": report.error_count(),
                "warning_count": report.warning_count(),
                "issues": report.issues,
            });
            let text = serde_json::to_string_pretty(&summary).map_err(|source| {
                BboxError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", text);
        }
        ReportFormat::Text => print!("{}", report),
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(BboxError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

/// Execute the labels subcommand.
fn run_labels(args: LabelsArgs, settings: &Settings) -> Result<(), BboxError> {
    let decoded = import::read_dataset(&args.input, &settings.palette)?;

    for label in edit::label_suggestions(&decoded.dataset, &settings.palette) {
        println!("{}\t{}", settings.palette.resolve(&label), label);
    }
    Ok(())
}

/// Execute the images subcommand.
fn run_images(args: ImagesArgs, settings: &Settings) -> Result<(), BboxError> {
    let decoded = import::read_dataset(&args.input, &settings.palette)?;

    let base_dir = args.base_dir.or_else(|| {
        args.input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
    });
    let service = match base_dir {
        Some(dir) => FsFileService::new().with_image_dir(dir),
        None => FsFileService::new(),
    };

    let total = decoded.dataset.images.len();
    let mut found = 0;
    for image in &decoded.dataset.images {
        let name = image.source_file.as_deref().unwrap_or(&image.filename);
        match service.load_image(name) {
            Ok(path) => {
                found += 1;
                println!("ok       {}  ({})", image.filename, path.display());
            }
            Err(_) => println!("missing  {}", image.filename),
        }
    }
    println!();
    println!("{} of {} image(s) found", found, total);
    Ok(())
}

/// Execute the demo subcommand.
fn run_demo(args: DemoArgs) -> Result<(), BboxError> {
    let dataset = model::demo_dataset();
    write_dataset(
        &dataset,
        args.to.into(),
        &RawExportOptions::default(),
        args.output.as_deref(),
    )?;
    Ok(())
}

/// Writes `dataset` in `schema` to `output`, or to stdout when `None`.
///
/// Returns the written path.
fn write_dataset(
    dataset: &model::Dataset,
    schema: Schema,
    opts: &RawExportOptions,
    output: Option<&Path>,
) -> Result<Option<PathBuf>, BboxError> {
    match (schema, output) {
        (Schema::Raw, Some(path)) => {
            let raw = conversion::internal_to_raw_with(dataset, opts);
            model::io_json::write_raw_json(path, &raw)?;
        }
        (Schema::Internal, Some(path)) => {
            model::io_json::write_internal_json(path, dataset)?;
        }
        (schema, None) => {
            let to_stdout = |source| BboxError::JsonWrite {
                path: PathBuf::from("<stdout>"),
                source,
            };
            let text = match schema {
                Schema::Raw => {
                    conversion::format_for_export(&conversion::internal_to_raw_with(dataset, opts))
                        .map_err(to_stdout)?
                }
                Schema::Internal => conversion::format_for_export(dataset).map_err(to_stdout)?,
            };
            println!("{}", text);
        }
    }
    Ok(output.map(Path::to_path_buf))
}
