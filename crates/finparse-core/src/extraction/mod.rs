pub mod pdftotext;
pub mod table;

use crate::error::FinparseError;

/// Rows × columns of cell text for one detected table.
pub type CellGrid = Vec<Vec<String>>;

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

impl PageContent {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// All pages' text as one string, pages separated by a newline.
pub fn join_pages(pages: &[PageContent]) -> String {
    pages
        .iter()
        .map(PageContent::text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, FinparseError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
