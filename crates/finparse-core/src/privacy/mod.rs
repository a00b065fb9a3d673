pub mod builtin;
pub mod mask;
pub mod schema;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::assemble::StatementTable;
use crate::error::FinparseError;
use crate::model::Field;
use mask::mask_value;
use schema::{FieldHandling, PrivacyPolicy};

/// How much of a statement's sensitive data survives export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    /// Records untouched.
    Full,
    /// Weight-1 fields removed, every other sensitive field masked.
    #[default]
    Masked,
    /// Every sensitive field removed.
    Anonymized,
}

impl PrivacyLevel {
    /// Unrecognized names fall back to `Full`.
    pub fn from_str_loose(s: &str) -> PrivacyLevel {
        match s.trim().to_lowercase().as_str() {
            "masked" | "mask" => PrivacyLevel::Masked,
            "clean" | "anonymized" | "anonymised" => PrivacyLevel::Anonymized,
            _ => PrivacyLevel::Full,
        }
    }

    /// Name used on the command line and in output file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyLevel::Full => "raw",
            PrivacyLevel::Masked => "masked",
            PrivacyLevel::Anonymized => "clean",
        }
    }
}

impl fmt::Display for PrivacyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apply `level` to every record of the table.
///
/// Removed fields also leave the table's columns, so exports never carry a
/// column that is empty by policy. Record order and count are preserved.
pub fn sanitize(table: &mut StatementTable, level: PrivacyLevel, policy: &PrivacyPolicy) {
    if level == PrivacyLevel::Full {
        return;
    }

    for (field, handling) in policy.sensitive_fields() {
        match (level, handling) {
            (PrivacyLevel::Masked, FieldHandling::Mask) if field != Field::TxnType => {
                mask_column(table, field);
            }
            _ => table.drop_column(field),
        }
    }

    debug!(
        policy = %policy.name,
        level = %level,
        columns = table.columns.len(),
        "sanitized statement"
    );
}

fn mask_column(table: &mut StatementTable, field: Field) {
    for record in &mut table.records {
        if let Some(value) = record.get(field) {
            let masked = mask_value(value);
            record.set(field, Some(masked));
        }
    }
}

/// Load a privacy policy from a JSON file.
pub fn load_policy(path: &Path) -> Result<PrivacyPolicy, FinparseError> {
    let content = std::fs::read_to_string(path).map_err(|e| FinparseError::PolicyLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_policy(&content, path)
}

/// Parse a privacy policy from a JSON string read from `source`.
pub fn parse_policy(json: &str, source: &Path) -> Result<PrivacyPolicy, FinparseError> {
    let policy: PrivacyPolicy =
        serde_json::from_str(json).map_err(|e| FinparseError::PolicyLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_policy(&policy)?;
    Ok(policy)
}

/// Parse a privacy policy from a JSON string (no file path context).
pub fn parse_policy_str(json: &str) -> Result<PrivacyPolicy, FinparseError> {
    let policy: PrivacyPolicy = serde_json::from_str(json).map_err(FinparseError::Json)?;
    validate_policy(&policy)?;
    Ok(policy)
}

/// Validate that a policy is well-formed.
pub fn validate_policy(policy: &PrivacyPolicy) -> Result<(), FinparseError> {
    if policy.name.trim().is_empty() {
        return Err(FinparseError::PolicyInvalid("name must not be empty".into()));
    }

    if let Some(ref format) = policy.format {
        if crate::model::StatementFormat::from_str_loose(format).is_none() {
            return Err(FinparseError::PolicyInvalid(format!(
                "unknown format '{}' (expected ledger, wallet or table)",
                format
            )));
        }
    }

    if policy.fields.is_empty() {
        return Err(FinparseError::PolicyInvalid("fields must not be empty".into()));
    }

    for (name, weight) in &policy.fields {
        let Some(field) = Field::from_name(name) else {
            return Err(FinparseError::PolicyInvalid(format!(
                "unknown field '{}'",
                name
            )));
        };

        if *weight == 0 {
            return Err(FinparseError::PolicyInvalid(format!(
                "field '{}' has weight 0 (expected 1 to drop or 2+ to mask)",
                name
            )));
        }

        if field == Field::TxnType && *weight != 1 {
            return Err(FinparseError::PolicyInvalid(
                "txn_type can only be dropped (weight 1)".into(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::RecordAssembler;
    use crate::model::{StatementFormat, TransactionRecord, TxnType};

    fn wallet_table() -> StatementTable {
        let record = TransactionRecord {
            date: Some("02-02-2024".into()),
            txn_type: TxnType::UpiDr,
            txn_id: Some("TXN401234567890".into()),
            party: Some("Jane Doe".into()),
            upi_id: Some("jane@okaxis".into()),
            cheque_no: Some("0007".into()),
            amount: Some("250.00".into()),
            ..Default::default()
        };
        let empty = TransactionRecord {
            upi_id: Some(String::new()),
            ..Default::default()
        };
        RecordAssembler::default().assemble(StatementFormat::Wallet, vec![record, empty])
    }

    fn policy(json: &str) -> PrivacyPolicy {
        parse_policy_str(json).unwrap()
    }

    #[test]
    fn test_level_from_str_loose() {
        assert_eq!(PrivacyLevel::from_str_loose("raw"), PrivacyLevel::Full);
        assert_eq!(PrivacyLevel::from_str_loose("MASKED"), PrivacyLevel::Masked);
        assert_eq!(PrivacyLevel::from_str_loose("clean"), PrivacyLevel::Anonymized);
        assert_eq!(PrivacyLevel::from_str_loose("secret"), PrivacyLevel::Full);
        assert_eq!(PrivacyLevel::default(), PrivacyLevel::Masked);
    }

    #[test]
    fn test_masked_masks_upi_handle() {
        let mut table = wallet_table();
        let p = policy(r#"{"name": "w", "fields": {"upi_id": 2, "cheque_no": 2}}"#);
        sanitize(&mut table, PrivacyLevel::Masked, &p);
        assert_eq!(table.records[0].upi_id.as_deref(), Some("ja****@okaxis"));
        assert_eq!(table.records[0].cheque_no.as_deref(), Some("**07"));
        assert_eq!(table.records[1].upi_id.as_deref(), Some(""));
        assert_eq!(table.records[0].party.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_masked_drops_weight_one_fields() {
        let mut table = wallet_table();
        let p = policy(r#"{"name": "w", "fields": {"upi_id": 2, "txn_id": 1}}"#);
        sanitize(&mut table, PrivacyLevel::Masked, &p);
        assert!(!table.has_column(Field::TxnId));
        assert_eq!(table.records[0].txn_id, None);
        assert!(table.has_column(Field::UpiId));
    }

    #[test]
    fn test_clean_removes_every_sensitive_field() {
        let mut table = wallet_table();
        let p = policy(r#"{"name": "w", "fields": {"upi_id": 2, "txn_id": 1}}"#);
        sanitize(&mut table, PrivacyLevel::Anonymized, &p);
        assert!(!table.has_column(Field::UpiId));
        assert!(!table.has_column(Field::TxnId));
        assert_eq!(table.len(), 2);

        let json = serde_json::to_value(&table).unwrap();
        assert!(json[0].get("upi_id").is_none());
    }

    #[test]
    fn test_full_is_untouched() {
        let mut table = wallet_table();
        let before = table.clone();
        let p = policy(r#"{"name": "w", "fields": {"upi_id": 2}}"#);
        sanitize(&mut table, PrivacyLevel::Full, &p);
        assert_eq!(table, before);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let p = policy(r#"{"name": "w", "fields": {"upi_id": 2, "txn_id": 3, "party": 1}}"#);
        for level in [PrivacyLevel::Masked, PrivacyLevel::Anonymized] {
            let mut once = wallet_table();
            sanitize(&mut once, level, &p);
            let mut twice = once.clone();
            sanitize(&mut twice, level, &p);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_empty_fields_rejected() {
        assert!(parse_policy_str(r#"{"name": "x", "fields": {}}"#).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(parse_policy_str(r#"{"name": "x", "fields": {"iban": 2}}"#).is_err());
    }

    #[test]
    fn test_zero_weight_rejected() {
        assert!(parse_policy_str(r#"{"name": "x", "fields": {"upi_id": 0}}"#).is_err());
    }

    #[test]
    fn test_masking_txn_type_rejected() {
        assert!(parse_policy_str(r#"{"name": "x", "fields": {"txn_type": 2}}"#).is_err());
        assert!(parse_policy_str(r#"{"name": "x", "fields": {"txn_type": 1}}"#).is_ok());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let json = r#"{"name": "x", "format": "swift", "fields": {"upi_id": 2}}"#;
        assert!(parse_policy_str(json).is_err());
    }

    #[test]
    fn test_load_policy_reports_path() {
        let err = load_policy(Path::new("/nonexistent/policy.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/policy.json"));
    }
}
