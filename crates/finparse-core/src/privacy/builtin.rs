use crate::error::FinparseError;
use crate::model::StatementFormat;
use crate::privacy::parse_policy_str;
use crate::privacy::schema::PrivacyPolicy;

const LEDGER_JSON: &str = include_str!("../../../../policies/ledger.json");
const WALLET_JSON: &str = include_str!("../../../../policies/wallet.json");
const TABLE_JSON: &str = include_str!("../../../../policies/table.json");

/// Available built-in policies, one per statement format.
pub const PRESETS: &[&str] = &["ledger", "wallet", "table"];

/// Load a built-in policy by name (format aliases accepted).
pub fn load_preset(name: &str) -> Result<PrivacyPolicy, FinparseError> {
    match StatementFormat::from_str_loose(name) {
        Some(format) => preset_for(format),
        None => Err(FinparseError::PolicyInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

/// The built-in policy for a statement format.
pub fn preset_for(format: StatementFormat) -> Result<PrivacyPolicy, FinparseError> {
    let json = match format {
        StatementFormat::Ledger => LEDGER_JSON,
        StatementFormat::Wallet => WALLET_JSON,
        StatementFormat::Table => TABLE_JSON,
    };
    parse_policy_str(json)
}
