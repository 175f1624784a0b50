//! Extract command - pull card fields out of a single OCR dump.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use idcard_core::ExtractionResult;
use idcard_core::api::resolve_threshold;

use super::{build_pipeline, extract_dump};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// OCR dump (JSON with `tokens` and optional `entities`)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Minimum field confidence (default from config)
    #[arg(short, long)]
    threshold: Option<f32>,

    /// Show per-field confidence scores
    #[arg(long)]
    show_confidence: bool,
}

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
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let pipeline = build_pipeline(config_path)?;
    let threshold = resolve_threshold(args.threshold, pipeline.default_threshold())?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let input = args.input.clone();
    let result =
        tokio::task::spawn_blocking(move || extract_dump(&input, pipeline, threshold)).await??;

    let output = format_result(&result, args.format)?;

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
        println!();
        for (field, score) in &result.confidence_scores {
            println!("{} {}: {:.1}%", style("ℹ").blue(), field, score * 100.0);
        }
        println!(
            "{} Overall confidence: {:.1}%",
            style("ℹ").blue(),
            result.overall_confidence * 100.0
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_result_csv(result),
        OutputFormat::Text => Ok(format_result_text(result)),
    }
}

fn format_result_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["field", "value", "confidence"])?;
    for (field, value) in &result.extracted_fields {
        let confidence = result
            .confidence_scores
            .get(field)
            .copied()
            .unwrap_or_default();
        wtr.write_record([field.as_str(), value.as_str(), &format!("{:.3}", confidence)])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_result_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    if result.is_empty() {
        output.push_str("No fields above threshold\n");
    }
    for (field, value) in &result.extracted_fields {
        output.push_str(&format!("{:<14} {}\n", format!("{}:", label(field.as_str())), value));
    }

    output.push_str(&format!(
        "\nOverall confidence: {:.1}%\n",
        result.overall_confidence * 100.0
    ));

    output
}

/// "date_of_birth" -> "Date of birth"
fn label(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idcard_core::FieldName;

    fn sample() -> ExtractionResult {
        let mut result = ExtractionResult::empty("NAME: JOHN DOE 123456789");
        result
            .extracted_fields
            .insert(FieldName::Name, "JOHN DOE".to_string());
        result.confidence_scores.insert(FieldName::Name, 0.855);
        result
            .extracted_fields
            .insert(FieldName::IdNumber, "123456789".to_string());
        result.confidence_scores.insert(FieldName::IdNumber, 0.8);
        result.overall_confidence = 0.8275;
        result
    }

    #[test]
    fn test_csv_rows_follow_field_order() {
        let csv = format_result(&sample(), OutputFormat::Csv).unwrap();
        assert_eq!(
            csv,
            "field,value,confidence\nname,JOHN DOE,0.855\nid_number,123456789,0.800\n"
        );
    }

    #[test]
    fn test_text_output() {
        let text = format_result(&sample(), OutputFormat::Text).unwrap();
        assert!(text.contains("Name:          JOHN DOE"));
        assert!(text.contains("Id number:     123456789"));
        assert!(text.contains("Overall confidence: 82."));
    }

    #[test]
    fn test_empty_text_output() {
        let text = format_result(&ExtractionResult::empty(""), OutputFormat::Text).unwrap();
        assert!(text.starts_with("No fields above threshold"));
    }

    #[test]
    fn test_label() {
        assert_eq!(label("date_of_birth"), "Date of birth");
        assert_eq!(label(""), "");
    }
}
