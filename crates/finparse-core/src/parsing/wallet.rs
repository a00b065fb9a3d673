use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::{debug, info};

use super::values::{validate_dmy, MONEY_PATTERN};
use crate::model::{TransactionRecord, TxnType};

/// One wallet transaction, from the compound type token to the cheque marker.
///
/// Between the UPI handle and the date any junk is tolerated (lazy gap); the
/// handle's domain is letters and dots only so a date glued to it stays out.
static WALLET_TXN_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        concat!(
            r"(?P<kind>UPI/(?:DR|CR))/",
            r"(?P<txn_id>[A-Za-z0-9]+)/",
            r"(?P<party>[A-Za-z0-9][A-Za-z0-9 .]*?)[\s/]+",
            r"(?P<bank_code>[A-Z]{{4}})/",
            r"(?P<upi_id>[A-Za-z0-9._\-]+@[A-Za-z][A-Za-z.]*)",
            r".*?",
            r"(?P<date>\d{{2}}-\d{{2}}-\d{{4}})\s*",
            r"(?P<amount>{money})\s*",
            r"(?P<balance>{money})\s*",
            r"(?P<time>\d{{2}}:\d{{2}}:\d{{2}})\s*",
            r"Chq:[ \t]*(?P<cheque>\d*)",
        ),
        money = MONEY_PATTERN
    );
    Regex::new(&pattern).unwrap()
});

/// Start of a wallet transaction; candidates never run past the next one.
static TXN_START_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"UPI/(?:DR|CR)/").unwrap());

/// Extracts records straight from a UPI wallet text stream.
///
/// The stream is cut into candidates at every compound type token and the
/// composite pattern is matched inside each candidate. A candidate that does
/// not complete a match yields nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalletFieldExtractor;

impl WalletFieldExtractor {
    pub fn extract_all(&self, text: &str) -> Vec<TransactionRecord> {
        let stream = to_stream(text);
        let mut records = Vec::new();
        let mut skipped = 0;
        for candidate in candidates(&stream) {
            match WALLET_TXN_RE.captures(candidate) {
                Some(caps) => records.push(record_from_captures(&caps)),
                None => {
                    debug!(candidate, "skipping incomplete wallet transaction");
                    skipped += 1;
                }
            }
        }
        info!(records = records.len(), skipped, "parsed wallet statement");
        records
    }
}

/// Slices of the stream from one transaction start up to the next.
fn candidates(stream: &str) -> Vec<&str> {
    let starts: Vec<usize> = TXN_START_RE.find_iter(stream).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(stream.len());
            &stream[start..end]
        })
        .collect()
}

/// Join lines into one stream. Line breaks become single spaces so names
/// wrapped across lines keep a separator.
fn to_stream(text: &str) -> String {
    text.lines().map(str::trim_end).collect::<Vec<_>>().join(" ")
}

fn record_from_captures(caps: &Captures<'_>) -> TransactionRecord {
    let text = |name: &str| {
        caps.name(name)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let kind = &caps["kind"];
    let (transaction, direction) = match kind.split_once('/') {
        Some((t, d)) => (Some(t.to_string()), Some(d.to_string())),
        None => (Some(kind.to_string()), None),
    };

    TransactionRecord {
        date: text("date").and_then(|d| validate_dmy(&d)),
        time: text("time"),
        txn_type: TxnType::from_code(kind),
        transaction,
        direction,
        txn_id: text("txn_id"),
        party: text("party"),
        bank_code: text("bank_code"),
        upi_id: text("upi_id"),
        amount: text("amount"),
        balance: text("balance"),
        cheque_no: text("cheque"),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_wallet_record() {
        let text = "header junk UPI/DR/TXN1/Jane Doe SBIN/jane@okaxis ref 991 02-02-2024 250.00 10,250.00 10:15:30Chq:0007 trailer";
        let records = WalletFieldExtractor.extract_all(text);
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r.party.as_deref(), Some("Jane Doe"));
        assert_eq!(r.upi_id.as_deref(), Some("jane@okaxis"));
        assert_eq!(r.bank_code.as_deref(), Some("SBIN"));
        assert_eq!(r.amount.as_deref(), Some("250.00"));
        assert_eq!(r.balance.as_deref(), Some("10,250.00"));
        assert_eq!(r.date.as_deref(), Some("02-02-2024"));
        assert_eq!(r.time.as_deref(), Some("10:15:30"));
        assert_eq!(r.txn_id.as_deref(), Some("TXN1"));
        assert_eq!(r.cheque_no.as_deref(), Some("0007"));
        assert_eq!(r.txn_type, TxnType::UpiDr);
        assert_eq!(r.transaction.as_deref(), Some("UPI"));
        assert_eq!(r.direction.as_deref(), Some("DR"));
    }

    #[test]
    fn test_multiple_records_in_order_across_lines() {
        let text = "UPI/CR/401/RAVI\nKUMAR/HDFC/ravi.k@oksbi\n03-02-2024 1,000.00 11,250.00 09:00:01 Chq: \n\
                    UPI/DR/402/TEA STALL/PYTM/teastall@paytm 04-02-2024 20.00 11,230.00 18:45:00 Chq: 12";
        let records = WalletFieldExtractor.extract_all(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].party.as_deref(), Some("RAVI KUMAR"));
        assert_eq!(records[0].direction.as_deref(), Some("CR"));
        assert_eq!(records[0].cheque_no, None);
        assert_eq!(records[0].upi_id.as_deref(), Some("ravi.k@oksbi"));
        assert_eq!(records[1].party.as_deref(), Some("TEA STALL"));
        assert_eq!(records[1].bank_code.as_deref(), Some("PYTM"));
        assert_eq!(records[1].cheque_no.as_deref(), Some("12"));
    }

    #[test]
    fn test_partial_match_is_skipped() {
        // No bank code / handle: the composite pattern never completes.
        let text = "UPI/DR/77/SOMEONE 05-02-2024 10.00 20.00 10:00:00 Chq: 1";
        assert!(WalletFieldExtractor.extract_all(text).is_empty());
    }

    #[test]
    fn test_incomplete_transaction_does_not_swallow_the_next() {
        let text = "UPI/DR/TXN1/ALICE SBIN/alice@okaxis 01-02-2024 10.00 90.00 Chq: 1 \
                    UPI/CR/TXN2/BOB HDFC/bob@oksbi 02-02-2024 20.00 110.00 11:00:00 Chq: 2";
        let records = WalletFieldExtractor.extract_all(text);
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r.party.as_deref(), Some("BOB"));
        assert_eq!(r.txn_id.as_deref(), Some("TXN2"));
        assert_eq!(r.txn_type, TxnType::UpiCr);
        assert_eq!(r.date.as_deref(), Some("02-02-2024"));
        assert_eq!(r.amount.as_deref(), Some("20.00"));
        assert_eq!(r.balance.as_deref(), Some("110.00"));
    }

    #[test]
    fn test_candidates_split_at_type_tokens() {
        let spans = candidates("junk UPI/DR/1/A x UPI/CR/2/B y");
        assert_eq!(spans, vec!["UPI/DR/1/A x ", "UPI/CR/2/B y"]);
    }

    #[test]
    fn test_missing_time_is_skipped() {
        let text = "UPI/DR/78/SHOP SBIN/shop@ybl 05-02-2024 10.00 20.00 Chq: 1";
        assert!(WalletFieldExtractor.extract_all(text).is_empty());
    }

    #[test]
    fn test_handle_domain_does_not_absorb_date() {
        let text = "UPI/DR/79/SHOP SBIN/shop@ybl05-02-2024 10.00 20.00 10:00:00Chq:5";
        let records = WalletFieldExtractor.extract_all(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].upi_id.as_deref(), Some("shop@ybl"));
        assert_eq!(records[0].date.as_deref(), Some("05-02-2024"));
    }
}
