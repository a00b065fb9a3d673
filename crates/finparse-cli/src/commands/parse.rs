use finparse_core::assemble::{ColumnLayout, StatementTable};
use finparse_core::error::FinparseError;
use finparse_core::export::{self, ExportFormat};
use finparse_core::extraction::pdftotext::PdftotextExtractor;
use finparse_core::extraction::CellGrid;
use finparse_core::model::StatementFormat;
use finparse_core::privacy::{self, builtin, PrivacyLevel};
use finparse_core::ParseOptions;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::output;

pub fn run(
    input_file: PathBuf,
    format: &str,
    output_format: &str,
    privacy_level: &str,
    out_dir: PathBuf,
    policy_file: Option<PathBuf>,
    layout: &str,
) -> Result<(), FinparseError> {
    let format: StatementFormat = format.parse()?;
    let level = PrivacyLevel::from_str_loose(privacy_level);
    let options = ParseOptions {
        layout: ColumnLayout::from_str_loose(layout).unwrap_or_default(),
    };

    let mut table = read_statement(&input_file, format, &options)?;
    if table.is_empty() {
        warn!(input = %input_file.display(), %format, "no transactions found");
    }

    let policy = match policy_file {
        Some(path) => privacy::load_policy(&path)?,
        None => builtin::preset_for(format)?,
    };
    privacy::sanitize(&mut table, level, &policy);

    let export_format = match output_format {
        "table" => {
            output::table::print(&table);
            return Ok(());
        }
        "json" => ExportFormat::Json,
        _ => ExportFormat::Csv,
    };

    let stem = input_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "statement".into());
    let path = export::write_file(&table, &out_dir, &format!("{stem}_{level}"), export_format)?;
    eprintln!(
        "Parsed {} transaction(s), written to {}",
        table.len(),
        path.display()
    );

    Ok(())
}

/// Pick the input path by extension: PDF through pdftotext, JSON as cell
/// grids, anything else as already-extracted text.
fn read_statement(
    input_file: &Path,
    format: StatementFormat,
    options: &ParseOptions,
) -> Result<StatementTable, FinparseError> {
    let extension = input_file
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => {
            let pdf_bytes = std::fs::read(input_file)?;
            let extractor = PdftotextExtractor::new();
            finparse_core::parse_pdf(&pdf_bytes, &extractor, format, options)
        }
        "json" => {
            if format != StatementFormat::Table {
                return Err(FinparseError::UnsupportedInput(format!(
                    "cell grid JSON can only be parsed as the table format, not '{}'",
                    format
                )));
            }
            let content = std::fs::read_to_string(input_file)?;
            let grids: Vec<CellGrid> = serde_json::from_str(&content)?;
            Ok(finparse_core::parse_tables_with(&grids, options))
        }
        _ => {
            let text = std::fs::read_to_string(input_file)?;
            Ok(finparse_core::parse_text_with(&text, format, options))
        }
    }
}
