use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use bakery_ocr_table::{
    ExtractionReport, Pipeline, PipelineConfig, ProcessingMode, Recognizer, TableResult,
    TesseractConfig, TesseractRecognizer, decode_image, summarize_tokens, write_csv,
    write_csv_to_string,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

const PROBE_SAMPLES: usize = 10;

#[derive(Debug, Parser)]
#[command(
    name = "img2table",
    version,
    about = "Turn photographed price lists into tables"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract a table and write it as JSON or CSV.
    Extract(ExtractArgs),
    /// Print raw recognition output for an image.
    Probe(ProbeArgs),
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Args)]
struct EngineArgs {
    /// Tesseract language code.
    #[arg(long, default_value = "eng")]
    lang: String,

    /// Tokens at or below this confidence are ignored.
    #[arg(long, default_value_t = 60)]
    min_confidence: u8,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input image path (png, jpg, gif).
    #[arg(short, long)]
    input: PathBuf,

    /// Output path; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Processing mode: auto, table or text.
    #[arg(long, default_value = "auto")]
    mode: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    #[command(flatten)]
    engine: EngineArgs,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct ProbeArgs {
    /// Input image path.
    #[arg(short, long)]
    input: PathBuf,

    #[command(flatten)]
    engine: EngineArgs,
}

fn build_pipeline(engine: &EngineArgs) -> Pipeline<TesseractRecognizer> {
    let config = PipelineConfig {
        min_confidence: engine.min_confidence,
        ..PipelineConfig::default()
    };
    let recognizer = TesseractRecognizer::new(TesseractConfig {
        language: engine.lang.clone(),
        ..TesseractConfig::default()
    });
    Pipeline::new(config, recognizer)
}

fn render(result: &TableResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(result).context("failed to serialize table as JSON")
        }
        OutputFormat::Csv => Ok(write_csv_to_string(result, b',')?),
    }
}

fn log_report(report: &ExtractionReport, verbose: bool) {
    if report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", report.warnings.len());
    if verbose {
        for warning in &report.warnings {
            eprintln!(
                "  - {:?} rows={:?}: {}",
                warning.code, warning.row_count, warning.message
            );
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<ExtractionReport> {
    let mode = args
        .mode
        .parse::<ProcessingMode>()
        .map_err(|error| anyhow!(error))
        .context("failed to parse --mode")?;

    let bytes = fs::read(&args.input)
        .with_context(|| format!("failed to read '{}'", args.input.display()))?;
    let pipeline = build_pipeline(&args.engine);
    let (result, report) = pipeline
        .process_bytes(&bytes, mode)
        .with_context(|| format!("failed to extract a table from '{}'", args.input.display()))?;

    match (&args.output, args.format) {
        (Some(path), OutputFormat::Csv) => write_csv(path, &result, b',')
            .with_context(|| format!("failed to write '{}'", path.display()))?,
        (Some(path), format) => fs::write(path, render(&result, format)? + "\n")
            .with_context(|| format!("failed to write '{}'", path.display()))?,
        (None, format) => {
            let rendered = render(&result, format)?;
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", rendered.trim_end())?;
        }
    }

    Ok(report)
}

fn run_probe(args: &ProbeArgs) -> Result<()> {
    let bytes = fs::read(&args.input)
        .with_context(|| format!("failed to read '{}'", args.input.display()))?;
    let image = decode_image(&bytes)?;
    let pipeline = build_pipeline(&args.engine);
    let prepared = pipeline.prepare(&image);

    let text = pipeline.recognizer().recognize_text(&prepared.binary)?;
    let tokens = pipeline.recognizer().recognize_tokens(&prepared.binary)?;
    let summary = summarize_tokens(&tokens, pipeline.config().min_confidence, PROBE_SAMPLES);

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "Raw text:\n{}", text.trim_end())?;
    writeln!(stdout, "Total tokens: {}", summary.token_count)?;
    writeln!(
        stdout,
        "Average confidence: {:.1}",
        summary.average_confidence
    )?;
    for token in &summary.samples {
        writeln!(
            stdout,
            "  '{}' line={} x={} y={} conf={}",
            token.text, token.line_index, token.x, token.y, token.confidence
        )?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bakery_ocr_table=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(report) => {
                log_report(&report, args.verbose);
                if report.row_count > 0 {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::from(2)
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
        Commands::Probe(args) => match run_probe(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
