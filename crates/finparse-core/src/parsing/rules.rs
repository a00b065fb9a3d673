//! Named extraction rules.
//!
//! A rule set is an ordered list of rules per statement format. For a given
//! field the first rule that yields a value wins; when every rule for a field
//! misses, the field stays null. Supporting a new bank layout means building a
//! new rule set rather than editing the patterns of an existing one.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use super::values::{validate_dmy, MONEY_PATTERN};
use crate::model::{Field, TxnType};

/// Ledger transaction codes, leftmost occurrence wins.
const LEDGER_VOCABULARY: &str =
    r"\b(UPI/DR|UPI/CR|NEFT CR|NEFT DR|SBINT|IMPS/CR|IMPS/DR|ATM/DR|POS/DR|INT/CR)\b";

static CANARA: LazyLock<LedgerRuleSet> = LazyLock::new(LedgerRuleSet::canara);

/// A regex bound to the field it fills.
///
/// The value is capture group 1 when the pattern has one, otherwise the whole
/// match. An optional validator can reject a syntactically matching token.
pub struct CaptureRule {
    pub name: &'static str,
    pub field: Field,
    pattern: Regex,
    validate: Option<fn(&str) -> Option<String>>,
}

impl CaptureRule {
    pub fn new(name: &'static str, field: Field, pattern: &str) -> Result<Self, regex::Error> {
        Ok(CaptureRule {
            name,
            field,
            pattern: Regex::new(pattern)?,
            validate: None,
        })
    }

    pub fn with_validator(mut self, validate: fn(&str) -> Option<String>) -> Self {
        self.validate = Some(validate);
        self
    }

    /// First match in `text`. A validator rejection yields None rather than
    /// moving on to a later match.
    pub fn apply(&self, text: &str) -> Option<String> {
        let caps = self.pattern.captures(text)?;
        let m = caps.get(1).or_else(|| caps.get(0))?;
        let value = m.as_str().trim();
        if value.is_empty() {
            return None;
        }
        match self.validate {
            Some(validate) => validate(value),
            None => Some(value.to_string()),
        }
    }
}

impl fmt::Debug for CaptureRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureRule")
            .field("name", &self.name)
            .field("field", &self.field)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// Amount and running balance picked out of a block's monetary figures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountBalance {
    pub amount: Option<String>,
    pub balance: Option<String>,
}

/// Decides which monetary figures of a block are the amount and the balance.
pub trait AmountBalancePolicy: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// `figures` are all monetary numbers of one block, in source order.
    fn assign(&self, figures: &[&str]) -> AmountBalance;
}

/// Balance is the last figure, amount the one right before it.
///
/// Holds for ledgers that print `... <amount> <balance>` at the end of every
/// row once the column alignment is lost in text extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalAmountBalanceRule;

impl AmountBalancePolicy for PositionalAmountBalanceRule {
    fn name(&self) -> &str {
        "positional-amount-balance"
    }

    fn assign(&self, figures: &[&str]) -> AmountBalance {
        match figures {
            [] => AmountBalance::default(),
            [balance] => AmountBalance {
                amount: None,
                balance: Some(balance.to_string()),
            },
            [.., amount, balance] => AmountBalance {
                amount: Some(amount.to_string()),
                balance: Some(balance.to_string()),
            },
        }
    }
}

/// Where a segment-based rule reads its text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentSource {
    /// The whole block, with newlines removed.
    Block,
    /// The cleaned particulars text.
    Particulars,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentPosition {
    /// Zero-based index from the start.
    FromStart(usize),
    /// One-based index from the end (1 = last).
    FromEnd(usize),
}

/// Picks the counterparty out of a delimited segment for one family of
/// transaction codes.
#[derive(Debug, Clone)]
pub struct SegmentRule {
    pub name: &'static str,
    pub type_prefix: &'static str,
    pub source: SegmentSource,
    pub delimiter: char,
    pub position: SegmentPosition,
    /// Fewer segments than this means the layout is not the expected one.
    pub min_segments: usize,
}

impl SegmentRule {
    pub fn applies_to(&self, txn_type: TxnType) -> bool {
        txn_type.as_str().starts_with(self.type_prefix)
    }

    pub fn apply(&self, block: &str, particulars: &str) -> Option<String> {
        let source = match self.source {
            SegmentSource::Block => block.replace(['\n', '\r'], ""),
            SegmentSource::Particulars => particulars.to_string(),
        };
        let segments: Vec<&str> = source.split(self.delimiter).collect();
        if segments.len() < self.min_segments {
            return None;
        }
        let segment = match self.position {
            SegmentPosition::FromStart(i) => segments.get(i)?,
            SegmentPosition::FromEnd(n) => segments
                .len()
                .checked_sub(n)
                .and_then(|i| segments.get(i))?,
        };
        let segment = segment.trim();
        if segment.is_empty() {
            None
        } else {
            Some(segment.to_string())
        }
    }
}

/// All rules needed to turn one ledger block into a record.
#[derive(Debug)]
pub struct LedgerRuleSet {
    pub name: &'static str,
    /// Field captures in priority order.
    pub captures: Vec<CaptureRule>,
    pub amounts: Box<dyn AmountBalancePolicy>,
    /// Tokens removed from a block to leave its particulars.
    pub noise: Vec<Regex>,
    /// Party rules, first applicable one wins.
    pub party: Vec<SegmentRule>,
}

impl LedgerRuleSet {
    /// Shared rule set for Canara-style ledgers.
    pub fn canara_default() -> &'static LedgerRuleSet {
        &CANARA
    }

    /// Canara Bank ledger rules.
    pub fn canara() -> Self {
        let rule = |name, field, pattern: &str| {
            CaptureRule::new(name, field, pattern).expect("built-in ledger pattern compiles")
        };

        LedgerRuleSet {
            name: "canara",
            captures: vec![
                rule("dmy-date", Field::Date, r"\b(\d{2}-\d{2}-\d{4})\b")
                    .with_validator(validate_dmy),
                rule("cheque-token", Field::ChequeNo, r"Chq:\s*(\S+)"),
                rule("txn-vocabulary", Field::TxnType, LEDGER_VOCABULARY),
                rule("hms-time", Field::Time, r"\d{2}:\d{2}:\d{2}"),
            ],
            amounts: Box::new(PositionalAmountBalanceRule),
            noise: vec![
                Regex::new(r"\b\d{2}-\d{2}-\d{4}\b").expect("built-in ledger pattern compiles"),
                Regex::new(r"Chq:\s*\S*").expect("built-in ledger pattern compiles"),
                Regex::new(MONEY_PATTERN).expect("built-in ledger pattern compiles"),
            ],
            party: vec![
                SegmentRule {
                    name: "upi-fourth-slash-segment",
                    type_prefix: "UPI",
                    source: SegmentSource::Block,
                    delimiter: '/',
                    position: SegmentPosition::FromStart(3),
                    min_segments: 4,
                },
                SegmentRule {
                    name: "neft-second-to-last-dash-segment",
                    type_prefix: "NEFT",
                    source: SegmentSource::Particulars,
                    delimiter: '-',
                    position: SegmentPosition::FromEnd(2),
                    min_segments: 3,
                },
            ],
        }
    }

    /// First capture for `field`, in rule order.
    pub fn capture(&self, field: Field, text: &str) -> Option<String> {
        self.captures
            .iter()
            .filter(|r| r.field == field)
            .find_map(|r| r.apply(text))
    }

    /// Block text with every noise token removed.
    pub fn strip_noise(&self, text: &str) -> String {
        self.noise
            .iter()
            .fold(text.to_string(), |acc, re| re.replace_all(&acc, "").into_owned())
    }

    pub fn party(&self, txn_type: TxnType, block: &str, particulars: &str) -> Option<String> {
        self.party
            .iter()
            .find(|r| r.applies_to(txn_type))
            .and_then(|r| r.apply(block, particulars))
    }
}
