use regex::Regex;
use std::sync::LazyLock;

/// Page header repeated on every page of a Canara Bank ledger.
const CANARA_PAGE_HEADER: &str =
    r"(?i)Page\s*\d+\s*Date\s+Particulars\s+Deposits\s+Withdrawals\s+Balance";

static LEDGER_DEFAULT: LazyLock<TextNormalizer> =
    LazyLock::new(|| TextNormalizer::new(vec![Regex::new(CANARA_PAGE_HEADER).unwrap()]));

/// Strips repeating page boilerplate (headers, column titles) from raw text.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    patterns: Vec<Regex>,
}

impl TextNormalizer {
    pub fn new(patterns: Vec<Regex>) -> Self {
        TextNormalizer { patterns }
    }

    /// Boilerplate filter for bank ledger statements.
    pub fn ledger() -> &'static TextNormalizer {
        &LEDGER_DEFAULT
    }

    /// Remove every match of every pattern, in pattern order.
    pub fn clean(&self, text: &str) -> String {
        let mut out = text.to_string();
        for re in &self.patterns {
            if re.is_match(&out) {
                out = re.replace_all(&out, "").into_owned();
            }
        }
        out
    }
}
