//! Plain column-aligned tables
//!
//! Widths are measured with `console`, so accented names and colored cells
//! line up.

use console::{measure_text_width, pad_str, truncate_str, Alignment};
use owo_colors::OwoColorize;

/// Cells wider than this are truncated with an ellipsis
const MAX_CELL_WIDTH: usize = 32;

/// A table of text cells rendered with two-space gutters.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    right_aligned: Vec<bool>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let right_aligned = vec![false; headers.len()];
        Self {
            headers,
            right_aligned,
            rows: Vec::new(),
        }
    }

    /// Right-align column `index` (prices, distances)
    #[must_use]
    pub fn align_right(mut self, index: usize) -> Self {
        if let Some(flag) = self.right_aligned.get_mut(index) {
            *flag = true;
        }
        self
    }

    /// Append a row. Missing cells render empty, extra cells are dropped.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).take(self.headers.len()).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| measure_text_width(&row[i]))
                    .chain(std::iter::once(measure_text_width(header)))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_CELL_WIDTH)
            })
            .collect()
    }

    fn render_line(&self, cells: &[String], widths: &[usize]) -> String {
        cells
            .iter()
            .zip(widths)
            .zip(&self.right_aligned)
            .map(|((cell, width), right)| {
                let align = if *right { Alignment::Right } else { Alignment::Left };
                let cell = truncate_str(cell, MAX_CELL_WIDTH, "…");
                pad_str(&cell, *width, align, None).into_owned()
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    /// Render with a bold header line
    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.render_line(&self.headers, &widths).bold().to_string());
        for row in &self.rows {
            lines.push(self.render_line(row, &widths));
        }
        lines.join("\n")
    }
}
