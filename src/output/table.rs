use crossterm::style::{Color, Stylize, style};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::api::Status;

/// Get display width of a string (accounts for wide chars like emojis)
fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// One table cell, optionally colored when the table has color enabled.
#[derive(Debug, Clone)]
pub struct Cell {
    text: String,
    color: Option<Color>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }
}

/// A status cell colored by outcome.
pub fn status_cell(status: &str) -> Cell {
    let parsed: Status = status.parse().unwrap_or(Status::Other(String::new()));
    let color = match parsed {
        Status::Success => Color::Green,
        Status::Failure | Status::Error => Color::Red,
        Status::Running => Color::Yellow,
        Status::Pending => Color::Grey,
        Status::Killed | Status::Canceled => Color::DarkGrey,
        Status::Other(_) => Color::White,
    };
    Cell::colored(status, color)
}

/// Plain-text table with per-column alignment and cell wrapping.
///
/// Cells wider than `max_col_width` wrap onto continuation lines within
/// their column. Colors are applied per line chunk so padding stays
/// outside the styled region.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
    max_col_width: usize,
    color: bool,
}

impl Table {
    pub fn new(headers: &[&str], max_col_width: usize, color: bool) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            max_col_width,
            color,
        }
    }

    pub fn add_row(&mut self, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), self.headers.len());
        self.rows.push(cells);
    }

    pub fn render(&self) -> String {
        let columns = self.headers.len();

        // Wrap every cell up front; a logical row spans as many output
        // lines as its tallest cell.
        let wrapped: Vec<Vec<(Vec<String>, Option<Color>)>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| (wrap_cell(&cell.text, self.max_col_width), cell.color))
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = self
            .headers
            .iter()
            .map(|h| display_width(h).min(self.max_col_width))
            .collect();
        for row in &wrapped {
            for (col, (chunks, _)) in row.iter().enumerate() {
                for chunk in chunks {
                    widths[col] = widths[col].max(display_width(chunk));
                }
            }
        }

        let mut out = String::new();
        for (col, header) in self.headers.iter().enumerate() {
            if col > 0 {
                out.push_str("  ");
            }
            out.push_str(header);
            out.push_str(&" ".repeat(widths[col].saturating_sub(display_width(header))));
        }
        out.push('\n');

        for row in &wrapped {
            let height = row.iter().map(|(chunks, _)| chunks.len()).max().unwrap_or(1);
            for line in 0..height {
                for col in 0..columns {
                    if col > 0 {
                        out.push_str("  ");
                    }
                    let (chunks, color) = &row[col];
                    let chunk = chunks.get(line).map(String::as_str).unwrap_or("");
                    if self.color && let Some(color) = color {
                        out.push_str(&format!("{}", style(chunk).with(*color)));
                    } else {
                        out.push_str(chunk);
                    }
                    out.push_str(&" ".repeat(widths[col].saturating_sub(display_width(chunk))));
                }
                // No trailing whitespace on output lines
                while out.ends_with(' ') {
                    out.pop();
                }
                out.push('\n');
            }
        }

        out
    }
}

/// Split cell text into chunks no wider than `max_width` display columns.
/// Embedded newlines force a chunk break.
fn wrap_cell(text: &str, max_width: usize) -> Vec<String> {
    let mut chunks = Vec::new();

    for line in text.lines() {
        if line.is_empty() {
            chunks.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_width = 0;
        for c in line.chars() {
            let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
            if current_width + char_width > max_width && !current.is_empty() {
                chunks.push(current);
                current = String::new();
                current_width = 0;
            }
            current.push(c);
            current_width += char_width;
        }
        chunks.push(current);
    }

    if chunks.is_empty() {
        chunks.push(String::new());
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        let mut table = Table::new(&["NUMBER", "STATUS"], 50, false);
        table.add_row(vec![Cell::new("1"), Cell::new("success")]);
        table.add_row(vec![Cell::new("12"), Cell::new("failure")]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "NUMBER  STATUS");
        assert_eq!(lines[1], "1       success");
        assert_eq!(lines[2], "12      failure");
    }

    #[test]
    fn test_wrap_cell_at_width() {
        let chunks = wrap_cell("abcdefghij", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_cell_keeps_newlines() {
        let chunks = wrap_cell("first\nsecond", 50);
        assert_eq!(chunks, vec!["first", "second"]);
    }

    #[test]
    fn test_long_cell_wraps_into_column() {
        let mut table = Table::new(&["NUMBER", "MESSAGE"], 10, false);
        table.add_row(vec![Cell::new("1"), Cell::new("a commit message that wraps")]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        // header + three wrapped lines for one logical row
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("1"));
        assert!(lines[2].starts_with(" "));
    }

    #[test]
    fn test_color_disabled_is_plain() {
        let mut table = Table::new(&["STATUS"], 50, false);
        table.add_row(vec![status_cell("success")]);
        assert_eq!(table.render(), "STATUS\nsuccess\n");
    }

    #[test]
    fn test_color_enabled_styles_status() {
        let mut table = Table::new(&["STATUS"], 50, true);
        table.add_row(vec![status_cell("failure")]);
        let rendered = table.render();
        assert!(rendered.contains("\u{1b}["));
        assert!(rendered.contains("failure"));
    }
}
