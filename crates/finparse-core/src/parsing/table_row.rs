use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

use super::values::{normalize_human_date, normalize_time, strip_currency};
use crate::extraction::CellGrid;
use crate::model::{TransactionRecord, TxnType};

/// Raw table rows that make up one transaction.
pub const ROWS_PER_TRANSACTION: usize = 3;

/// Date and time share column 0; the split point is the whitespace after the year.
static DATE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<date>.*?\d{4})\s+(?P<time>.*)$").unwrap());

static DETAILS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)(?P<direction>Paid\s+to|Received\s+from)\s+",
        r"(?P<party>[A-Za-z\s.]+?)\s+",
        r"UPI\s+Transaction\s+ID:\s*(?P<upi_id>\w+)\s+",
        r"Paid\s+(?:to|by)\s+(?P<account>.+)$",
    ))
    .unwrap()
});

/// Column-1 text decomposed into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDetails {
    pub direction: TxnType,
    pub party: String,
    pub upi_id: String,
    pub account: String,
}

/// Extracts records from wallet-app tables where three raw rows form one
/// transaction: date/time, details, amount.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRowFieldExtractor;

impl TableRowFieldExtractor {
    /// Records from every grid, in table order. Row 0 of each grid is its header.
    pub fn extract_all(&self, grids: &[CellGrid]) -> Vec<TransactionRecord> {
        let mut records = Vec::new();
        let mut dropped = 0;
        for grid in grids {
            for group in group_rows(grid) {
                match self.extract(&group) {
                    Some(record) => records.push(record),
                    None => dropped += 1,
                }
            }
        }
        info!(records = records.len(), dropped, "parsed table statement");
        records
    }

    /// Build one record from a merged transaction group (one string per column).
    ///
    /// Returns None when any required field is missing.
    pub fn extract(&self, columns: &[String]) -> Option<TransactionRecord> {
        let cell = |i: usize| columns.get(i).map(String::as_str).unwrap_or("");

        let (date, time) = split_date_time(cell(0));
        let details = parse_details(cell(1));
        let amount = Some(strip_currency(cell(2))).filter(|a| !a.is_empty());

        let (Some(date), Some(time), Some(details), Some(amount)) = (date, time, details, amount)
        else {
            debug!(columns = ?columns, "dropping incomplete table transaction");
            return None;
        };

        Some(TransactionRecord {
            date: Some(date),
            time: Some(time),
            txn_type: details.direction,
            direction: Some(details.direction.as_str().to_string()),
            party: Some(details.party),
            upi_id: Some(details.upi_id),
            account: Some(details.account),
            amount: Some(amount),
            ..Default::default()
        })
    }
}

/// Merge every [`ROWS_PER_TRANSACTION`] rows, starting at row 1, into one
/// logical row: each column's non-empty cells joined with a space.
pub fn group_rows(grid: &CellGrid) -> Vec<Vec<String>> {
    grid.iter()
        .skip(1)
        .collect::<Vec<_>>()
        .chunks(ROWS_PER_TRANSACTION)
        .map(|rows| {
            let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
            (0..width)
                .map(|col| {
                    rows.iter()
                        .filter_map(|r| r.get(col))
                        .map(|c| c.trim())
                        .filter(|c| !c.is_empty())
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .collect()
        })
        .collect()
}

/// Split "12 Jan, 2024 10:15 AM" into a `DD-MM-YYYY` date and a time.
///
/// An unparseable date is None. The time is normalized to `HH:MM:SS` when it
/// looks like a clock time, otherwise kept as printed.
pub fn split_date_time(cell: &str) -> (Option<String>, Option<String>) {
    let cell = cell.trim();
    match DATE_TIME_RE.captures(cell) {
        Some(caps) => {
            let date = normalize_human_date(&caps["date"]);
            let raw_time = caps["time"].trim();
            let time = if raw_time.is_empty() {
                None
            } else {
                Some(normalize_time(raw_time).unwrap_or_else(|| raw_time.to_string()))
            };
            (date, time)
        }
        None => (normalize_human_date(cell), None),
    }
}

/// Decompose the details column. None when the direction phrase or any of the
/// other parts is missing.
pub fn parse_details(cell: &str) -> Option<TransactionDetails> {
    let caps = DETAILS_RE.captures(cell.trim())?;
    let direction = if caps["direction"].to_lowercase().starts_with("paid") {
        TxnType::Debit
    } else {
        TxnType::Credit
    };
    let party = caps["party"].split_whitespace().collect::<Vec<_>>().join(" ");
    if party.is_empty() {
        return None;
    }
    Some(TransactionDetails {
        direction,
        party,
        upi_id: caps["upi_id"].to_string(),
        account: caps["account"].trim().to_string(),
    })
}
