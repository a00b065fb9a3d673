use crate::extraction::{CellGrid, PageContent};

/// Reconstruct table cells from pdftotext -layout output.
///
/// pdftotext -layout keeps columns apart with runs of spaces. A header line
/// fixes the column anchors; every following line is cut into segments at
/// 2+ space gaps and each segment lands in the column whose anchor it sits
/// closest to. Row 0 of every grid is the header itself.
///
/// Detect if a line looks like a transaction table header row.
pub fn is_table_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    let header_keywords = ["date", "transaction details", "amount", "particulars"];
    let count = header_keywords
        .iter()
        .filter(|kw| lower.contains(*kw))
        .count();
    count >= 2
}

/// Lines that end a table: page footers and statement notes.
fn is_table_footer(line: &str) -> bool {
    let trimmed = line.trim();
    let lower = trimmed.to_lowercase();
    lower.starts_with("page ")
        || lower.starts_with("note:")
        || lower.starts_with("---")
        || lower.contains("system generated")
}

/// Find the table region(s) within page content.
/// One region per header; a region ends at a footer or the end of its page.
pub fn find_table_regions(pages: &[PageContent]) -> Vec<TableRegion> {
    let mut regions = Vec::new();

    for page in pages {
        let mut current: Option<usize> = None;

        for (i, line) in page.lines.iter().enumerate() {
            if is_table_header(line) {
                if let Some(start) = current.take() {
                    regions.push(TableRegion {
                        page_number: page.page_number,
                        header_line: start,
                        end_line: i,
                    });
                }
                current = Some(i);
                continue;
            }

            if let Some(start) = current {
                if is_table_footer(line) {
                    regions.push(TableRegion {
                        page_number: page.page_number,
                        header_line: start,
                        end_line: i,
                    });
                    current = None;
                }
            }
        }

        if let Some(start) = current {
            regions.push(TableRegion {
                page_number: page.page_number,
                header_line: start,
                end_line: page.lines.len(),
            });
        }
    }

    regions
}

#[derive(Debug, Clone)]
pub struct TableRegion {
    pub page_number: usize,
    /// Index of the header line; data rows follow it.
    pub header_line: usize,
    /// Exclusive end of the region.
    pub end_line: usize,
}

/// Build one cell grid per detected table, in page order.
pub fn extract_grids(pages: &[PageContent]) -> Vec<CellGrid> {
    find_table_regions(pages)
        .iter()
        .filter_map(|region| {
            let page = pages.iter().find(|p| p.page_number == region.page_number)?;
            let lines = &page.lines[region.header_line..region.end_line];
            Some(build_grid(lines))
        })
        .collect()
}

/// Turn a header line plus data lines into a grid. Blank lines are skipped.
pub fn build_grid(lines: &[String]) -> CellGrid {
    let Some((header, rows)) = lines.split_first() else {
        return Vec::new();
    };

    let header_segments = split_by_whitespace_gaps(header);
    let anchors: Vec<usize> = header_segments.iter().map(|(start, _)| *start).collect();
    let width = anchors.len().max(1);

    // Column i owns every start position from the midpoint to its left
    // neighbour up to the midpoint to its right neighbour.
    let boundaries: Vec<usize> = anchors.windows(2).map(|w| (w[0] + w[1]) / 2).collect();

    let mut grid: CellGrid = Vec::with_capacity(lines.len());
    grid.push(
        header_segments
            .iter()
            .map(|(_, text)| text.to_string())
            .collect(),
    );

    for line in rows {
        if line.trim().is_empty() {
            continue;
        }
        let mut cells = vec![String::new(); width];
        for (start, text) in split_by_whitespace_gaps(line) {
            let col = boundaries.iter().filter(|b| **b <= start).count();
            let cell = &mut cells[col.min(width - 1)];
            if !cell.is_empty() {
                cell.push(' ');
            }
            cell.push_str(text);
        }
        grid.push(cells);
    }

    grid
}

/// Split a line by gaps of 2+ whitespace characters.
///
/// Returns each segment with its start column, counted in characters so
/// multi-byte symbols such as `₹` do not shift later columns.
fn split_by_whitespace_gaps(line: &str) -> Vec<(usize, &str)> {
    let mut segments = Vec::new();
    let mut start: Option<(usize, usize)> = None; // (column, byte offset)
    let mut space_count = 0;
    let mut last_non_space_end = 0;

    for (col, (i, c)) in line.char_indices().enumerate() {
        if c.is_whitespace() {
            space_count += 1;
            if space_count == 2 {
                if let Some((s_col, s_byte)) = start.take() {
                    segments.push((s_col, &line[s_byte..last_non_space_end]));
                }
            }
        } else {
            if start.is_none() {
                start = Some((col, i));
            }
            space_count = 0;
            last_non_space_end = i + c.len_utf8();
        }
    }

    if let Some((s_col, s_byte)) = start {
        segments.push((s_col, &line[s_byte..last_non_space_end]));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: usize, lines: &[&str]) -> PageContent {
        PageContent {
            page_number: number,
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_is_table_header() {
        assert!(is_table_header(
            "Date & time        Transaction details                 Amount"
        ));
        assert!(!is_table_header("12 Jan, 2024       Paid to Jane Doe    ₹250"));
    }

    #[test]
    fn test_split_by_whitespace_gaps() {
        let segments = split_by_whitespace_gaps("  12 Jan, 2024    Paid to Jane Doe   ₹250");
        assert_eq!(
            segments,
            vec![(2, "12 Jan, 2024"), (18, "Paid to Jane Doe"), (37, "₹250")]
        );
    }

    #[test]
    fn test_build_grid_assigns_columns_by_position() {
        let lines: Vec<String> = [
            "Date & time        Transaction details                 Amount",
            "12 Jan, 2024       Paid to Jane Doe                      ₹250",
            "10:15 AM           UPI Transaction ID: 401234567890",
            "                   Paid by HDFC Bank 1234",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let grid = build_grid(&lines);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0], vec!["Date & time", "Transaction details", "Amount"]);
        assert_eq!(grid[1], vec!["12 Jan, 2024", "Paid to Jane Doe", "₹250"]);
        assert_eq!(grid[2], vec!["10:15 AM", "UPI Transaction ID: 401234567890", ""]);
        assert_eq!(grid[3], vec!["", "Paid by HDFC Bank 1234", ""]);
    }

    #[test]
    fn test_find_table_regions_stops_at_footer() {
        let pages = vec![page(
            1,
            &[
                "Transaction statement",
                "Date & time        Transaction details        Amount",
                "12 Jan, 2024       Paid to Jane Doe            ₹250",
                "",
                "Page 1 of 2",
                "Footer",
            ],
        )];

        let regions = find_table_regions(&pages);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].header_line, 1);
        assert_eq!(regions[0].end_line, 4);
    }

    #[test]
    fn test_extract_grids_one_per_page() {
        let pages = vec![
            page(
                1,
                &[
                    "Date        Transaction details     Amount",
                    "a           b                       c",
                ],
            ),
            page(2, &["no table here"]),
            page(
                3,
                &[
                    "Date        Transaction details     Amount",
                    "d           e                       f",
                ],
            ),
        ];
        let grids = extract_grids(&pages);
        assert_eq!(grids.len(), 2);
        assert_eq!(grids[1][1], vec!["d", "e", "f"]);
    }
}
