pub mod assemble;
pub mod error;
pub mod export;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod privacy;

use assemble::{ColumnLayout, RecordAssembler, StatementTable};
use error::FinparseError;
use extraction::{join_pages, table, CellGrid, PdfExtractor};
use model::StatementFormat;
use tracing::info;

/// Options that shape the assembled table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub layout: ColumnLayout,
}

/// Parse already-extracted statement text (all pages concatenated).
pub fn parse_text(text: &str, format: StatementFormat) -> StatementTable {
    parse_text_with(text, format, &ParseOptions::default())
}

pub fn parse_text_with(
    text: &str,
    format: StatementFormat,
    options: &ParseOptions,
) -> StatementTable {
    let records = parsing::parse_records(text, format);
    RecordAssembler::new(options.layout).assemble(format, records)
}

/// Parse table-row statements from cell grids, one grid per table.
pub fn parse_tables(grids: &[CellGrid]) -> StatementTable {
    parse_tables_with(grids, &ParseOptions::default())
}

pub fn parse_tables_with(grids: &[CellGrid], options: &ParseOptions) -> StatementTable {
    let records = parsing::parse_grids(grids);
    RecordAssembler::new(options.layout).assemble(StatementFormat::Table, records)
}

/// Main API entry point: extract a PDF statement and parse it as `format`.
///
/// Only extraction can fail; a statement with no recognizable transactions
/// yields an empty table.
pub fn parse_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    format: StatementFormat,
    options: &ParseOptions,
) -> Result<StatementTable, FinparseError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    info!(
        backend = extractor.backend_name(),
        pages = pages.len(),
        format = %format,
        "extracted statement"
    );

    let table = match format {
        StatementFormat::Table => parse_tables_with(&table::extract_grids(&pages), options),
        _ => parse_text_with(&join_pages(&pages), format, options),
    };
    Ok(table)
}
