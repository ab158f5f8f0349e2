//! Batch command - parse many recognized label texts concurrently.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use pallet_core::{
    Confidence, ExtractionResult, LabelField, LabelParser, LayeredLabelParser, PalletRecord,
};

use super::output::{format_output, LabelOutput, OutputFormat};
use super::{load_config, resolve_operator};

/// Extensions accepted as recognized label text.
const TEXT_EXTENSIONS: [&str; 3] = ["txt", "text", "ocr"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for label text files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Write capture records instead of bare results
    #[arg(long)]
    record: bool,

    /// Operator name stored in records
    #[arg(long, requires = "record")]
    operator: Option<String>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// A parsed label file.
struct ParsedLabel {
    text: String,
    result: ExtractionResult,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    label: Option<ParsedLabel>,
    error: Option<String>,
    processing_time_ms: u64,
}

fn is_label_text(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    TEXT_EXTENSIONS.contains(&ext.as_str())
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_label_text(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files",
            )?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(LayeredLabelParser::from_config(&config.extraction));
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let parser = Arc::clone(&parser);
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let file_start = Instant::now();
            let blocking_path = path.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                process_single_file(&blocking_path, parser.as_ref())
            })
            .await?;
            let processing_time_ms = file_start.elapsed().as_millis() as u64;
            anyhow::Ok((index, path, outcome, processing_time_ms))
        });
    }

    let mut results: Vec<(usize, ProcessResult)> = Vec::new();

    while let Some(joined) = tasks.join_next().await {
        let (index, path, outcome, processing_time_ms) = joined??;

        let result = match outcome {
            Ok(label) => ProcessResult {
                path,
                label: Some(label),
                error: None,
                processing_time_ms,
            },
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    ProcessResult {
                        path,
                        label: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    }
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    tasks.abort_all();
                    pb.abandon();
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        };

        results.push((index, result));
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    results.sort_by_key(|(index, _)| *index);
    let results: Vec<ProcessResult> = results.into_iter().map(|(_, r)| r).collect();

    if let Some(output_dir) = &args.output_dir {
        let operator = resolve_operator(args.operator.as_deref(), &config);
        for result in &results {
            if let Some(label) = &result.label {
                write_label_output(output_dir, result, label, &args, &operator)?;
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(path: &Path, parser: &dyn LabelParser) -> anyhow::Result<ParsedLabel> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes)
        .map_err(|_| anyhow::anyhow!("File is not valid UTF-8 text"))?;

    if text.trim().is_empty() {
        debug!("{} holds no recognized text", path.display());
    }

    let result = parser.parse(&text);
    Ok(ParsedLabel { text, result })
}

fn write_label_output(
    output_dir: &Path,
    result: &ProcessResult,
    label: &ParsedLabel,
    args: &BatchArgs,
    operator: &str,
) -> anyhow::Result<()> {
    let output_name = result
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("label");
    let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));

    let content = if args.record {
        let text = label.text.as_str();
        let record = PalletRecord::from_extraction(&label.result, text, operator, Local::now());
        format_output(&LabelOutput::Record(&record, &label.result), args.format, false)?
    } else {
        format_output(&LabelOutput::Result(&label.result), args.format, false)?
    };

    fs::write(&output_path, content)?;
    debug!("Wrote output to {}", output_path.display());
    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename".to_string(), "status".to_string()];
    header.extend(LabelField::ALL.iter().map(|f| f.to_string()));
    header.extend(
        ["low_confidence_fields", "warnings", "processing_time_ms", "error"]
            .iter()
            .map(|s| s.to_string()),
    );
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let mut row = vec![filename];
        match &result.label {
            Some(label) => {
                let low = label
                    .result
                    .confidence
                    .values()
                    .filter(|level| **level == Confidence::Low)
                    .count();

                row.push("success".to_string());
                row.extend(label.result.parsed.iter().map(|(_, v)| v.to_string()));
                row.push(low.to_string());
                row.push(label.result.warnings.len().to_string());
                row.push(result.processing_time_ms.to_string());
                row.push(String::new());
            }
            None => {
                row.push("error".to_string());
                row.extend(LabelField::ALL.iter().map(|_| String::new()));
                row.push(String::new());
                row.push(String::new());
                row.push(result.processing_time_ms.to_string());
                row.push(result.error.clone().unwrap_or_default());
            }
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_text_extensions() {
        assert!(is_label_text(Path::new("scans/label_01.txt")));
        assert!(is_label_text(Path::new("scans/label_01.OCR")));
        assert!(!is_label_text(Path::new("scans/label_01.png")));
        assert!(!is_label_text(Path::new("scans/README")));
    }

    #[test]
    fn test_summary_rows() {
        let dir = tempfile::tempdir().unwrap();
        let parser = LayeredLabelParser::new();
        let file = dir.path().join("a.txt");
        fs::write(&file, "BATCH NO: 284019").unwrap();

        let results = vec![
            ProcessResult {
                path: file.clone(),
                label: Some(process_single_file(&file, &parser).unwrap()),
                error: None,
                processing_time_ms: 1,
            },
            ProcessResult {
                path: dir.path().join("b.txt"),
                label: None,
                error: Some("boom".to_string()),
                processing_time_ms: 0,
            },
        ];

        let summary = dir.path().join("summary.csv");
        write_summary(&summary, &results).unwrap();

        let mut reader = csv::Reader::from_path(&summary).unwrap();
        let header = reader.headers().unwrap().clone();
        assert_eq!(header.len(), 16);
        assert_eq!(&header[4], "batch_no");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][1], "success");
        assert_eq!(&rows[0][4], "284019");
        assert_eq!(&rows[0][12], "9");
        assert_eq!(&rows[0][13], "9");
        assert_eq!(&rows[1][1], "error");
        assert_eq!(&rows[1][15], "boom");
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.txt");
        fs::write(&file, [0xff, 0xfe, 0x00]).unwrap();

        let parser = LayeredLabelParser::new();
        assert!(process_single_file(&file, &parser).is_err());
    }
}
