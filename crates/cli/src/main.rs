//! CLI tool for extracting docket numbers and due dates from PowerPoint files.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use docket_core::{
    render_table, write_csv, write_json, DocketExtractor, ExtractOptions, Record,
    MAX_MONTHS_BACK,
};
use docket_pptx::{is_pptx_magic, PptxParser};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Extract docket, application, PCT and WIPO numbers with upcoming due dates
/// from PowerPoint textboxes.
#[derive(Parser, Debug)]
#[command(name = "docket-extract")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PowerPoint file(s) (.pptx)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Include due dates up to this many months (30 days each) in the past
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=MAX_MONTHS_BACK as i64))]
    months_back: u32,

    /// Output file (default: print to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from the output extension, else table)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Additional phrase marking textboxes to skip (repeatable)
    #[arg(long = "skip-phrase")]
    skip_phrases: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Csv,
    Json,
    Table,
}

impl OutputFormat {
    /// Pick a format from an explicit choice or the output file extension.
    fn resolve(explicit: Option<Self>, output: Option<&Path>) -> Self {
        if let Some(format) = explicit {
            return format;
        }
        match output
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("csv") => Self::Csv,
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let options = ExtractOptions::new()
        .with_months_back(args.months_back)
        .with_extra_skip_phrases(args.skip_phrases.clone());
    let extractor = DocketExtractor::new(options)?;

    log::debug!(
        "Reporting due dates on or after {}",
        docket_core::cutoff_date(extractor.options().today(), args.months_back)
    );

    let mut all_records: Vec<Record> = Vec::new();
    let mut files_with_records = 0usize;
    let mut failures = 0usize;

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        match process_file(input_path, &extractor) {
            Ok(records) if records.is_empty() => {
                eprintln!("No extractable data found in {}.", display_name(input_path));
            }
            Ok(records) => {
                if args.verbose {
                    eprintln!("  Found {} entries", records.len());
                }
                files_with_records += 1;
                all_records.extend(records);
            }
            Err(e) => {
                log::error!("{}: {:#}", input_path.display(), e);
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
                failures += 1;
            }
        }
    }

    if failures == args.input.len() {
        anyhow::bail!("No input file could be processed");
    }

    if !all_records.is_empty() {
        eprintln!(
            "Extracted {} entries from {} file(s).",
            all_records.len(),
            files_with_records
        );
    }

    let format = OutputFormat::resolve(args.format, args.output.as_deref());
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_output(BufWriter::new(file), &all_records, format)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            if args.verbose {
                eprintln!("Written to: {}", path.display());
            }
        }
        None => {
            let stdout = std::io::stdout();
            write_output(stdout.lock(), &all_records, format)?;
        }
    }

    Ok(())
}

/// Extract the records of a single PowerPoint file.
fn process_file(input_path: &Path, extractor: &DocketExtractor) -> Result<Vec<Record>> {
    let file = File::open(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?;
    let mut reader = BufReader::new(file);

    // Read magic bytes to detect format
    let mut magic = [0u8; 4];
    reader
        .read_exact(&mut magic)
        .with_context(|| "Failed to read file header")?;

    if !is_pptx_magic(&magic) {
        return Err(docket_core::Error::UnsupportedFormat(format!(
            "{} is not a .pptx file",
            display_name(input_path)
        ))
        .into());
    }

    // Re-open file for parsing (readers are not seekable after initial read in some cases)
    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let presentation = PptxParser::new()
        .parse(reader, &display_name(input_path))
        .with_context(|| format!("Failed to parse {}", input_path.display()))?;

    log::debug!("  Found {} slides", presentation.slides.len());

    Ok(extractor.extract(&presentation))
}

/// Write the combined records in the chosen format.
fn write_output<W: Write>(mut writer: W, records: &[Record], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(records, &mut writer)?,
        OutputFormat::Json => write_json(records, &mut writer)?,
        OutputFormat::Table => writer.write_all(render_table(records).as_bytes())?,
    }
    writer.flush()?;
    Ok(())
}

/// The file name used to tag records.
fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            OutputFormat::resolve(None, Some(Path::new("out/dockets.CSV"))),
            OutputFormat::Csv
        );
        assert_eq!(
            OutputFormat::resolve(None, Some(Path::new("dockets.json"))),
            OutputFormat::Json
        );
        assert_eq!(OutputFormat::resolve(None, None), OutputFormat::Table);
        assert_eq!(
            OutputFormat::resolve(Some(OutputFormat::Json), Some(Path::new("a.csv"))),
            OutputFormat::Json
        );
    }

    #[test]
    fn test_months_back_range() {
        assert!(Args::try_parse_from(["docket-extract", "a.pptx", "-m", "24"]).is_ok());
        assert!(Args::try_parse_from(["docket-extract", "a.pptx", "-m", "25"]).is_err());
        assert!(Args::try_parse_from(["docket-extract"]).is_err());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/tmp/decks/family.pptx")), "family.pptx");
    }

    #[test]
    fn test_write_output_csv_header_only() {
        let mut buf = Vec::new();
        write_output(&mut buf, &[], OutputFormat::Csv).unwrap();

        assert!(String::from_utf8(buf).unwrap().starts_with("Slide,Textbox Content"));
    }
}
