//! Parse command - extract fields from one recognized label text.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use tracing::{debug, info};

use pallet_core::{LabelParser, LayeredLabelParser, PalletRecord};

use super::output::{format_output, styled_confidence, LabelOutput, OutputFormat};
use super::{load_config, resolve_operator};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Recognized label text file ("-" reads stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Emit a pending capture record instead of the bare result
    #[arg(long)]
    record: bool,

    /// Operator name stored in the record
    #[arg(long, requires = "record")]
    operator: Option<String>,

    /// Stored photograph path attached to the record
    #[arg(long, requires = "record")]
    image: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Show per-field confidence on stderr
    #[arg(long)]
    show_confidence: bool,
}

/// Read label text from a file, or stdin for `-`.
pub fn read_label_text(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    Ok(fs::read_to_string(input)?)
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let text = read_label_text(&args.input)?;
    info!("Parsing label text from {}", args.input.display());

    let parser = LayeredLabelParser::from_config(&config.extraction);
    let result = parser.parse(&text);
    debug!("Parsed in {:?}", start.elapsed());

    let record = args.record.then(|| {
        let operator = resolve_operator(args.operator.as_deref(), &config);
        let record = PalletRecord::from_extraction(&result, text.as_str(), operator, Local::now());
        match &args.image {
            Some(image) => record.with_image_path(image.as_str()),
            None => record,
        }
    });

    let label_output = match &record {
        Some(record) => LabelOutput::Record(record, &result),
        None => LabelOutput::Result(&result),
    };
    let output = format_output(&label_output, args.format, args.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        eprintln!();
        eprintln!(
            "{} {}/{} fields filled",
            style("ℹ").blue(),
            result.parsed.filled(),
            result.confidence.len()
        );
        for (field, level) in &result.confidence {
            eprintln!("  {:<22} {}", field.as_str(), styled_confidence(*level));
        }
        if !result.warnings.is_empty() {
            eprintln!("{}", style("Structured pass warnings:").yellow());
            for warning in &result.warnings {
                eprintln!("  - {}", warning);
            }
        }
    }

    Ok(())
}
