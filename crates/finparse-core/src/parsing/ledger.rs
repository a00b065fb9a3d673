use tracing::{debug, info};

use super::normalize::TextNormalizer;
use super::rules::LedgerRuleSet;
use super::segment::BlockSegmenter;
use super::values::{collapse_whitespace, money_figures};
use crate::model::{Field, TransactionRecord, TxnType};

/// Parses ledger blocks into records using a [`LedgerRuleSet`].
#[derive(Debug, Clone, Copy)]
pub struct LedgerFieldExtractor<'r> {
    rules: &'r LedgerRuleSet,
}

impl Default for LedgerFieldExtractor<'static> {
    fn default() -> Self {
        LedgerFieldExtractor {
            rules: LedgerRuleSet::canara_default(),
        }
    }
}

impl<'r> LedgerFieldExtractor<'r> {
    pub fn new(rules: &'r LedgerRuleSet) -> Self {
        LedgerFieldExtractor { rules }
    }

    /// Parse one transaction block. Never fails: every miss is a null field.
    pub fn extract(&self, block: &str) -> TransactionRecord {
        let rules = self.rules;

        let date = rules.capture(Field::Date, block);
        let cheque_no = rules.capture(Field::ChequeNo, block);

        let figures = money_figures(block);
        let amounts = rules.amounts.assign(&figures);

        let txn_type = rules
            .capture(Field::TxnType, block)
            .map(|code| TxnType::from_code(&code))
            .unwrap_or_default();

        let time = rules.capture(Field::Time, block);

        let stripped = collapse_whitespace(&rules.strip_noise(block));
        let party = rules.party(txn_type, block, &stripped);
        if party.is_none() && rules.party.iter().any(|r| r.applies_to(txn_type)) {
            debug!(%txn_type, block, "party segment missing; leaving party empty");
        }
        let particulars = if stripped.is_empty() {
            None
        } else {
            Some(stripped)
        };

        TransactionRecord {
            date,
            time,
            txn_type,
            party,
            particulars,
            amount: amounts.amount,
            balance: amounts.balance,
            cheque_no,
            ..Default::default()
        }
    }
}

/// Full ledger path: strip page boilerplate, segment, extract every block.
pub fn parse_ledger_text(text: &str) -> Vec<TransactionRecord> {
    let cleaned = TextNormalizer::ledger().clean(text);
    let blocks = BlockSegmenter.segment(&cleaned);
    let extractor = LedgerFieldExtractor::default();
    let records: Vec<TransactionRecord> = blocks.iter().map(|b| extractor.extract(b)).collect();
    info!(blocks = blocks.len(), "parsed ledger statement");
    records
}
