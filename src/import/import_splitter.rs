//! Column splitting for pasted spreadsheet rows.

/// Split one row into raw (untrimmed) cells.
///
/// A row containing a tab is treated as tab-separated. Otherwise it is split on
/// commas outside double quotes. Quote characters are kept in the cell text and
/// escaped quotes (`""`) are not recognised.
pub fn split_columns(line: &str) -> Vec<String> {
    if line.contains('\t') {
        return line.split('\t').map(str::to_string).collect();
    }

    let mut columns = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => columns.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    columns.push(current);
    columns
}
