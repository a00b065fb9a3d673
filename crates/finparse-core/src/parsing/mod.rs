pub mod ledger;
pub mod normalize;
pub mod rules;
pub mod segment;
pub mod table_row;
pub mod values;
pub mod wallet;

use crate::extraction::{table, CellGrid, PageContent};
use crate::model::{StatementFormat, TransactionRecord};
use ledger::parse_ledger_text;
use table_row::TableRowFieldExtractor;
use wallet::WalletFieldExtractor;

/// Run the extractor for `format` over already-extracted statement text.
///
/// Table statements have no cell structure in plain text, so their grids are
/// rebuilt from the column layout first.
pub fn parse_records(text: &str, format: StatementFormat) -> Vec<TransactionRecord> {
    match format {
        StatementFormat::Ledger => parse_ledger_text(text),
        StatementFormat::Wallet => WalletFieldExtractor.extract_all(text),
        StatementFormat::Table => {
            let page = PageContent {
                page_number: 1,
                lines: text.lines().map(|l| l.to_string()).collect(),
            };
            TableRowFieldExtractor.extract_all(&table::extract_grids(&[page]))
        }
    }
}

/// Records from cell grids, one grid per statement table.
pub fn parse_grids(grids: &[CellGrid]) -> Vec<TransactionRecord> {
    TableRowFieldExtractor.extract_all(grids)
}
