//! Pipe table conversion.

/// Convert every run of pipe-delimited lines that forms a valid table.
///
/// A valid table is a header row, a separator row of dash/colon cells and at
/// least one data row. Anything else is left untouched.
pub(crate) fn convert_tables(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        if !is_table_line(lines[i]) {
            out.push(lines[i].to_string());
            i += 1;
            continue;
        }

        let start = i;
        while i < lines.len() && is_table_line(lines[i]) {
            i += 1;
        }

        let run = &lines[start..i];
        match render_table(run) {
            Some(html) => out.push(html),
            None => out.extend(run.iter().map(|line| line.to_string())),
        }
    }

    out.join("\n")
}

fn is_table_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

/// Split a row into trimmed cells, dropping the outer pipe artifacts.
fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = &trimmed[1..trimmed.len() - 1];
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn is_separator(line: &str) -> bool {
    split_cells(line).iter().all(|cell| {
        cell.contains('-') && cell.chars().all(|c| c == '-' || c == ':')
    })
}

fn render_table(lines: &[&str]) -> Option<String> {
    if lines.len() < 3 || !is_separator(lines[1]) {
        return None;
    }

    let headers = split_cells(lines[0]);
    let rows: Vec<Vec<String>> = lines[2..]
        .iter()
        .map(|line| split_cells(line))
        .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
        .collect();

    let mut html = String::from("<table>\n<thead>\n<tr>\n");
    for header in &headers {
        html.push_str(&format!("<th>{}</th>\n", header));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in &rows {
        html.push_str("<tr>\n");
        for cell in row {
            html.push_str(&format!("<td>{}</td>\n", cell));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>");
    Some(html)
}
