use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Transaction region between the opening and closing balance lines.
static ENVELOPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Opening\s+Balance\s+[\d,]+\.\d+\s*(.*?)\s*Closing\s+Balance\s+[\d,]+\.\d+")
        .unwrap()
});

/// Cheque-reference marker. Digits must sit on the same line as `Chq:` so an
/// empty marker at a line end never takes the next row's date.
static CHEQUE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Chq:[ \t]*\d*").unwrap());

/// Splits ledger text into one chunk per transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockSegmenter;

impl BlockSegmenter {
    /// The text strictly inside the opening/closing balance envelope.
    ///
    /// None when either anchor is missing, meaning the text is not a ledger.
    pub fn transaction_region<'a>(&self, text: &'a str) -> Option<&'a str> {
        ENVELOPE_RE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
    }

    /// Ordered transaction blocks, each ending with its own `Chq:` marker.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let Some(region) = self.transaction_region(text) else {
            warn!("no Opening/Closing Balance envelope found; not a ledger statement");
            return Vec::new();
        };

        let mut blocks = Vec::new();
        let mut fragment_start = 0;
        for marker in CHEQUE_MARKER_RE.find_iter(region) {
            let before = region[fragment_start..marker.start()].trim();
            let chq = marker.as_str().trim();
            blocks.push(format!("{before} {chq}").trim().to_string());
            fragment_start = marker.end();
        }

        let trailing = region[fragment_start..].trim();
        if !trailing.is_empty() {
            debug!(trailing, "dropping text after the last cheque marker");
        }

        blocks
    }

    /// Number of cheque markers inside the envelope (0 without an envelope).
    pub fn marker_count(&self, text: &str) -> usize {
        self.transaction_region(text)
            .map(|region| CHEQUE_MARKER_RE.find_iter(region).count())
            .unwrap_or(0)
    }
}
