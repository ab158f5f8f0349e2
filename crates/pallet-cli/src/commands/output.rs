//! Output formatting shared by the parse and batch commands.

use std::fmt::Write as _;

use console::style;

use pallet_core::{Confidence, ExtractionResult, LabelField, PalletRecord, RECORD_COLUMNS};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for per-file outputs.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// What a command emits for one label.
pub enum LabelOutput<'a> {
    /// The bare parse result.
    Result(&'a ExtractionResult),
    /// A capture record built from it.
    Record(&'a PalletRecord, &'a ExtractionResult),
}

pub fn format_output(
    output: &LabelOutput<'_>,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match (output, format) {
        (LabelOutput::Result(result), OutputFormat::Json) => to_json(result, pretty),
        (LabelOutput::Record(record, _), OutputFormat::Json) => to_json(record, pretty),
        (LabelOutput::Result(result), OutputFormat::Csv) => format_result_csv(result),
        (LabelOutput::Record(record, _), OutputFormat::Csv) => format_record_csv(record),
        (LabelOutput::Result(result), OutputFormat::Text) => Ok(format_text(result, None)),
        (LabelOutput::Record(record, result), OutputFormat::Text) => {
            Ok(format_text(result, Some(*record)))
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

fn format_result_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Value columns, then one confidence column per field
    let mut header: Vec<String> = LabelField::ALL.iter().map(|f| f.to_string()).collect();
    header.extend(LabelField::ALL.iter().map(|f| format!("{}_confidence", f)));
    wtr.write_record(&header)?;

    let mut row: Vec<String> = result.parsed.iter().map(|(_, v)| v.to_string()).collect();
    row.extend(LabelField::ALL.iter().map(|f| result.confidence_of(*f).to_string()));
    wtr.write_record(&row)?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_record_csv(record: &PalletRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(RECORD_COLUMNS)?;
    wtr.write_record(record.to_row())?;
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(result: &ExtractionResult, record: Option<&PalletRecord>) -> String {
    let mut output = String::new();

    if let Some(record) = record {
        let _ = writeln!(output, "Captured: {}", record.timestamp.format("%Y-%m-%d %H:%M:%S"));
        let _ = writeln!(output, "Operator: {}", record.operator);
        let _ = writeln!(output, "Status:   {}", record.status);
        if let Some(image) = &record.image_path {
            let _ = writeln!(output, "Image:    {}", image);
        }
        output.push('\n');
    }

    for (field, value) in result.parsed.iter() {
        let shown = if value.is_empty() { "-" } else { value };
        let _ = writeln!(
            output,
            "{:<22} {:<40} [{}]",
            field.as_str(),
            shown,
            result.confidence_of(field)
        );
    }

    if !result.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &result.warnings {
            let _ = writeln!(output, "  - {}", warning);
        }
    }

    output
}

/// Styled confidence level for terminal summaries.
pub fn styled_confidence(level: Confidence) -> String {
    match level {
        Confidence::High => style(level).green().to_string(),
        Confidence::Medium => style(level).yellow().to_string(),
        Confidence::Low => style(level).red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pallet_core::label::parse_label;

    #[test]
    fn test_result_csv_has_value_and_confidence_columns() {
        let result = parse_label("BATCH NO: 284019");
        let csv = format_result_csv(&result).unwrap();
        let mut lines = csv.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("item_number,item_description,batch_no"));
        assert!(header.ends_with("handwritten_number_confidence"));

        let row = lines.next().unwrap();
        assert!(row.contains("284019"));
        assert!(row.contains("high"));
    }

    #[test]
    fn test_text_marks_missing_fields() {
        let result = parse_label("");
        let text = format_text(&result, None);
        assert!(text.contains("sscc"));
        assert!(text.contains("[low]"));
        assert!(text.contains("'sscc' not found"));
    }
}
