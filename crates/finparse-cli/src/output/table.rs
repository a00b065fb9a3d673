use finparse_core::assemble::StatementTable;

/// Longest cell shown; longer values (particulars) are cut with an ellipsis.
const MAX_CELL: usize = 32;

pub fn print(table: &StatementTable) {
    if table.is_empty() {
        println!("No transactions found.");
        return;
    }

    let header: Vec<&str> = table.columns.iter().map(|f| f.as_str()).collect();
    let rows: Vec<Vec<String>> = table
        .records
        .iter()
        .map(|record| {
            table
                .row(record)
                .into_iter()
                .map(|v| truncate(v.unwrap_or("-")))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(i, name)| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    print_row(header.iter().copied(), &widths);
    println!("  {}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len()));
    for row in &rows {
        print_row(row.iter().map(String::as_str), &widths);
    }

    println!();
    println!(
        "  {} transaction(s), total amount {}",
        table.len(),
        table.total_amount()
    );
}

fn print_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    println!("  {}", line.join("  ").trim_end());
}

fn truncate(value: &str) -> String {
    if value.chars().count() <= MAX_CELL {
        value.to_string()
    } else {
        let cut: String = value.chars().take(MAX_CELL - 3).collect();
        format!("{cut}...")
    }
}
