//! Utilities for parsing and formatting Excel-style cell references and ranges.
//!
//! Positions are 1-based throughout (`A1` is row 1, column 1).

use crate::types::{CellPos, Rectangle};

/// Largest column index Excel accepts (`XFD`).
pub const MAX_COLS: u32 = 16_384;
/// Largest row index Excel accepts.
pub const MAX_ROWS: u32 = 1_048_576;

/// Parse a cell reference like `"B3"` or `"$B$3"`.
///
/// Letters must precede digits; anything else (or an index beyond the
/// sheet limits) yields `None`.
pub fn parse_cell_ref(cell_ref: &str) -> Option<CellPos> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut in_row = false;

    for ch in cell_ref.trim().chars() {
        match ch {
            '$' => {}
            'A'..='Z' | 'a'..='z' if !in_row => {
                let upper = ch.to_ascii_uppercase();
                col = col
                    .checked_mul(26)?
                    .checked_add(upper as u32 - 'A' as u32 + 1)?;
            }
            '0'..='9' => {
                in_row = true;
                row = row.checked_mul(10)?.checked_add(ch as u32 - '0' as u32)?;
            }
            _ => return None,
        }
    }

    if col == 0 || row == 0 || col > MAX_COLS || row > MAX_ROWS {
        return None;
    }

    Some(CellPos::new(row, col))
}

/// Parse a cell range like `"A1:B10"` or a single cell `"A1"` into a rectangle.
///
/// Corners may be given in any order.
pub fn parse_cell_range(range: &str) -> Option<Rectangle> {
    let (start, end) = match range.split_once(':') {
        Some((start, end)) => (parse_cell_ref(start)?, parse_cell_ref(end)?),
        None => {
            let cell = parse_cell_ref(range)?;
            (cell, cell)
        }
    };

    let top = start.row.min(end.row);
    let left = start.col.min(end.col);
    let bottom = start.row.max(end.row);
    let right = start.col.max(end.col);

    Some(Rectangle::at(top, left, bottom - top + 1, right - left + 1))
}

/// Split `"Sheet1!$A$1:$B$2"` or `"'My Sheet'!A1"` into sheet name and range part.
///
/// Doubled quotes inside a quoted sheet name are unescaped.
pub fn split_sheet_ref(reference: &str) -> (Option<String>, &str) {
    let reference = reference.trim();
    let Some(pos) = reference.rfind('!') else {
        return (None, reference);
    };
    let (sheet, rest) = reference.split_at(pos);
    let range = rest.get(1..).unwrap_or("");

    let sheet = match sheet.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        Some(quoted) => quoted.replace("''", "'"),
        None => sheet.to_string(),
    };

    (Some(sheet), range)
}

/// Parse a sheet-qualified range reference as found in defined names.
pub fn parse_sheet_range(reference: &str) -> Option<(Option<String>, Rectangle)> {
    let (sheet, range) = split_sheet_ref(reference);
    parse_cell_range(range).map(|rect| (sheet, rect))
}

/// Column letters for a 1-based column index (`1 -> "A"`, `27 -> "AA"`).
pub fn col_letters(col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = col;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A1-style name of a cell.
pub fn cell_name(pos: CellPos) -> String {
    format!("{}{}", col_letters(pos.col), pos.row)
}
