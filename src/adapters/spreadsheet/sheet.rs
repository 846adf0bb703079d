//! In-memory sheet model
//!
//! Rows are collected during the export phases and rendered into a
//! worksheet when the workbook is closed, so column widths can be fitted
//! once over the complete content.

use crate::domain::Result;
use rust_xlsxwriter::{Format, Worksheet};
use std::collections::HashSet;

/// Fixed leading columns of every sheet
pub const FIXED_TITLES: [&str; 8] = [
    "Requirement",
    "ID",
    "Status",
    "Priority",
    "Owner",
    "Description",
    "Traces from",
    "Traces to",
];

pub const NAME_COLUMN: u16 = 0;
pub const DESCRIPTION_COLUMN: u16 = 5;
const DESCRIPTION_WIDTH: f64 = 50.0;

/// Longest text a workbook cell can hold
pub const MAX_CELL_CHARS: usize = 32_767;

const MAX_SHEET_NAME_CHARS: usize = 31;

/// One data row
#[derive(Debug, Clone, PartialEq)]
pub struct RowModel {
    /// Indent level of the name cell, the node's depth
    pub indent: u8,
    pub cells: Vec<String>,
}

/// One worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetModel {
    pub name: String,
    pub titles: Vec<String>,
    pub rows: Vec<RowModel>,
}

impl SheetModel {
    pub fn new(name: String, attribute_names: impl IntoIterator<Item = String>) -> Self {
        let mut titles: Vec<String> = FIXED_TITLES.iter().map(|t| t.to_string()).collect();
        titles.extend(attribute_names);
        Self {
            name,
            titles,
            rows: Vec::new(),
        }
    }

    /// Renders the model into a worksheet
    ///
    /// # Errors
    ///
    /// Returns a format error if the workbook library rejects a value.
    pub fn render(&self) -> Result<Worksheet> {
        let bold = Format::new().set_bold();
        let wrap = Format::new().set_text_wrap();

        let mut worksheet = Worksheet::new();
        worksheet.set_name(&self.name)?;

        for (col, title) in self.titles.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, title, &bold)?;
        }

        for (index, row) in self.rows.iter().enumerate() {
            let row_number = index as u32 + 1;
            for (col, text) in row.cells.iter().enumerate() {
                let col = col as u16;
                if col == NAME_COLUMN {
                    let indented = Format::new().set_text_wrap().set_indent(row.indent);
                    worksheet.write_string_with_format(row_number, col, text, &indented)?;
                } else if text.contains('\n') {
                    worksheet.write_string_with_format(row_number, col, text, &wrap)?;
                } else if !text.is_empty() {
                    worksheet.write_string(row_number, col, text)?;
                }
            }
        }

        worksheet.autofit();
        worksheet.set_column_width(DESCRIPTION_COLUMN, DESCRIPTION_WIDTH)?;
        Ok(worksheet)
    }
}

/// Cuts text to the cell limit, logging when something is lost
pub fn fit_cell(text: String, sheet: &str, column: &str) -> String {
    if text.chars().count() <= MAX_CELL_CHARS {
        return text;
    }
    tracing::warn!(
        sheet = %sheet,
        column = %column,
        chars = text.chars().count(),
        "Cell text exceeds the workbook limit, truncated"
    );
    text.chars().take(MAX_CELL_CHARS).collect()
}

/// Derives a legal, unique sheet name from a type name
///
/// `[ ] : * ? / \` are removed, surrounding whitespace and apostrophes are
/// trimmed and the name is cut to 31 characters. A name already in `used`
/// (compared case-insensitively) gets a ` (n)` suffix.
pub fn sheet_name(raw: &str, used: &mut HashSet<String>) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').trim();
    let base: String = if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned.chars().take(MAX_SHEET_NAME_CHARS).collect()
    };

    let mut candidate = base.clone();
    let mut n = 2;
    while !used.insert(candidate.to_lowercase()) {
        let suffix = format!(" ({n})");
        let room = MAX_SHEET_NAME_CHARS - suffix.chars().count();
        candidate = format!("{}{suffix}", base.chars().take(room).collect::<String>());
        n += 1;
    }
    candidate
}
