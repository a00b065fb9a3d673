use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::assemble::StatementTable;
use crate::error::FinparseError;

/// Spreadsheet apps need the byte order mark to read non-ASCII text as UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// File formats a statement can be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Write the table as CSV: BOM, a header row of column names, one row per
/// record. Null values become empty cells.
pub fn write_csv<W: Write>(table: &StatementTable, mut writer: W) -> Result<(), FinparseError> {
    writer.write_all(UTF8_BOM)?;
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.columns.iter().map(|f| f.as_str()))?;
    for record in &table.records {
        wtr.write_record(table.row(record).into_iter().map(|v| v.unwrap_or("")))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(table: &StatementTable) -> Result<String, FinparseError> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Pretty JSON array of records; keys in column order, nulls kept.
pub fn to_json_string(table: &StatementTable) -> Result<String, FinparseError> {
    Ok(serde_json::to_string_pretty(table)?)
}

/// Write `<dir>/<stem>.<ext>`, creating `dir` if needed. Returns the path written.
pub fn write_file(
    table: &StatementTable,
    dir: &Path,
    stem: &str,
    format: ExportFormat,
) -> Result<PathBuf, FinparseError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.{}", stem, format.extension()));
    match format {
        ExportFormat::Csv => write_csv(table, fs::File::create(&path)?)?,
        ExportFormat::Json => fs::write(&path, to_json_string(table)?)?,
    }
    info!(path = %path.display(), records = table.len(), "wrote statement");
    Ok(path)
}
