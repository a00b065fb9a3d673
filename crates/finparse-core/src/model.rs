use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FinparseError;

/// The statement layouts the engine knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementFormat {
    /// Bank ledger with an opening/closing balance envelope (e.g. Canara Bank).
    Ledger,
    /// UPI-app text stream matched transaction by transaction.
    Wallet,
    /// Cell grid where three raw rows make one transaction (e.g. Google Pay).
    Table,
}

impl StatementFormat {
    pub const ALL: [StatementFormat; 3] = [
        StatementFormat::Ledger,
        StatementFormat::Wallet,
        StatementFormat::Table,
    ];

    pub fn from_str_loose(s: &str) -> Option<StatementFormat> {
        match s.trim().to_lowercase().as_str() {
            "ledger" | "canara" | "bank" => Some(StatementFormat::Ledger),
            "wallet" | "upi" => Some(StatementFormat::Wallet),
            "table" | "table-row" | "gpay" => Some(StatementFormat::Table),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementFormat::Ledger => "ledger",
            StatementFormat::Wallet => "wallet",
            StatementFormat::Table => "table",
        }
    }

    /// Columns this format actually produces, in canonical relative order.
    pub fn native_columns(&self) -> &'static [Field] {
        match self {
            StatementFormat::Ledger => &[
                Field::Date,
                Field::Time,
                Field::TxnType,
                Field::Party,
                Field::Particulars,
                Field::Amount,
                Field::Balance,
                Field::ChequeNo,
            ],
            StatementFormat::Wallet => &[
                Field::Date,
                Field::Time,
                Field::Transaction,
                Field::Direction,
                Field::TxnId,
                Field::Party,
                Field::BankCode,
                Field::UpiId,
                Field::Amount,
                Field::Balance,
                Field::ChequeNo,
            ],
            StatementFormat::Table => &[
                Field::Date,
                Field::Time,
                Field::Direction,
                Field::Party,
                Field::UpiId,
                Field::Account,
                Field::Amount,
            ],
        }
    }
}

impl fmt::Display for StatementFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementFormat {
    type Err = FinparseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatementFormat::from_str_loose(s).ok_or_else(|| FinparseError::UnsupportedFormat(s.into()))
    }
}

/// Transaction type vocabulary. `Unknown` is the sentinel for "no term matched".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TxnType {
    UpiDr,
    UpiCr,
    NeftCr,
    NeftDr,
    Sbint,
    ImpsCr,
    ImpsDr,
    AtmDr,
    PosDr,
    IntCr,
    Credit,
    Debit,
    #[default]
    Unknown,
}

impl TxnType {
    pub const VOCABULARY: [TxnType; 12] = [
        TxnType::UpiDr,
        TxnType::UpiCr,
        TxnType::NeftCr,
        TxnType::NeftDr,
        TxnType::Sbint,
        TxnType::ImpsCr,
        TxnType::ImpsDr,
        TxnType::AtmDr,
        TxnType::PosDr,
        TxnType::IntCr,
        TxnType::Credit,
        TxnType::Debit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TxnType::UpiDr => "UPI/DR",
            TxnType::UpiCr => "UPI/CR",
            TxnType::NeftCr => "NEFT CR",
            TxnType::NeftDr => "NEFT DR",
            TxnType::Sbint => "SBINT",
            TxnType::ImpsCr => "IMPS/CR",
            TxnType::ImpsDr => "IMPS/DR",
            TxnType::AtmDr => "ATM/DR",
            TxnType::PosDr => "POS/DR",
            TxnType::IntCr => "INT/CR",
            TxnType::Credit => "Credit",
            TxnType::Debit => "Debit",
            TxnType::Unknown => "UNKNOWN",
        }
    }

    /// Exact lookup of a vocabulary code. Anything else maps to `Unknown`.
    pub fn from_code(code: &str) -> TxnType {
        TxnType::VOCABULARY
            .iter()
            .copied()
            .find(|t| t.as_str() == code.trim())
            .unwrap_or(TxnType::Unknown)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TxnType::Unknown)
    }
}

impl fmt::Display for TxnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TxnType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TxnType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(TxnType::from_code(&s))
    }
}

/// One output column. The declaration order is the canonical column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Date,
    Time,
    TxnType,
    Transaction,
    /// Serialized as `type`.
    Direction,
    TxnId,
    Party,
    Particulars,
    BankCode,
    UpiId,
    Account,
    Amount,
    Balance,
    ChequeNo,
}

impl Field {
    pub const CANONICAL: [Field; 14] = [
        Field::Date,
        Field::Time,
        Field::TxnType,
        Field::Transaction,
        Field::Direction,
        Field::TxnId,
        Field::Party,
        Field::Particulars,
        Field::BankCode,
        Field::UpiId,
        Field::Account,
        Field::Amount,
        Field::Balance,
        Field::ChequeNo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Time => "time",
            Field::TxnType => "txn_type",
            Field::Transaction => "transaction",
            Field::Direction => "type",
            Field::TxnId => "txn_id",
            Field::Party => "party",
            Field::Particulars => "particulars",
            Field::BankCode => "bank_code",
            Field::UpiId => "upi_id",
            Field::Account => "account",
            Field::Amount => "amount",
            Field::Balance => "balance",
            Field::ChequeNo => "cheque_no",
        }
    }

    /// Parse a column name. `cheque` is accepted for `cheque_no`.
    pub fn from_name(name: &str) -> Option<Field> {
        let name = name.trim();
        if name == "cheque" {
            return Some(Field::ChequeNo);
        }
        Field::CANONICAL.iter().copied().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single parsed transaction. Identifier fields stay as source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: Option<String>,
    pub time: Option<String>,
    pub txn_type: TxnType,
    pub transaction: Option<String>,
    #[serde(rename = "type")]
    pub direction: Option<String>,
    pub txn_id: Option<String>,
    pub party: Option<String>,
    pub particulars: Option<String>,
    pub bank_code: Option<String>,
    pub upi_id: Option<String>,
    pub account: Option<String>,
    pub amount: Option<String>,
    pub balance: Option<String>,
    pub cheque_no: Option<String>,
}

impl TransactionRecord {
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::TxnType => Some(self.txn_type.as_str()),
            other => self.slot(other).and_then(|v| v.as_deref()),
        }
    }

    /// Overwrite a field. Setting `txn_type` goes through the vocabulary, so a
    /// value outside it (or `None`) becomes `UNKNOWN`.
    pub fn set(&mut self, field: Field, value: Option<String>) {
        match field {
            Field::TxnType => {
                self.txn_type = value
                    .as_deref()
                    .map(TxnType::from_code)
                    .unwrap_or_default();
            }
            other => {
                if let Some(slot) = self.slot_mut(other) {
                    *slot = value;
                }
            }
        }
    }

    fn slot(&self, field: Field) -> Option<&Option<String>> {
        Some(match field {
            Field::Date => &self.date,
            Field::Time => &self.time,
            Field::TxnType => return None,
            Field::Transaction => &self.transaction,
            Field::Direction => &self.direction,
            Field::TxnId => &self.txn_id,
            Field::Party => &self.party,
            Field::Particulars => &self.particulars,
            Field::BankCode => &self.bank_code,
            Field::UpiId => &self.upi_id,
            Field::Account => &self.account,
            Field::Amount => &self.amount,
            Field::Balance => &self.balance,
            Field::ChequeNo => &self.cheque_no,
        })
    }

    fn slot_mut(&mut self, field: Field) -> Option<&mut Option<String>> {
        Some(match field {
            Field::Date => &mut self.date,
            Field::Time => &mut self.time,
            Field::TxnType => return None,
            Field::Transaction => &mut self.transaction,
            Field::Direction => &mut self.direction,
            Field::TxnId => &mut self.txn_id,
            Field::Party => &mut self.party,
            Field::Particulars => &mut self.particulars,
            Field::BankCode => &mut self.bank_code,
            Field::UpiId => &mut self.upi_id,
            Field::Account => &mut self.account,
            Field::Amount => &mut self.amount,
            Field::Balance => &mut self.balance,
            Field::ChequeNo => &mut self.cheque_no,
        })
    }
}
