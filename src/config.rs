//! Layout run configuration.

use serde::Deserialize;

use crate::cell_ref::{MAX_COLS, MAX_ROWS};
use crate::error::{BoxgridError, Result};
use crate::types::{CellPos, Rectangle};

/// Options for a placement run.
///
/// Deserializes from JSON with every field optional:
///
/// ```json
/// { "origin": { "row": 3, "col": 2 }, "maxRows": 65536 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Top-left cell of the root box.
    pub origin: CellPos,
    /// Last usable row of the target sheet.
    pub max_rows: u32,
    /// Last usable column of the target sheet.
    pub max_cols: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin: CellPos::default(),
            max_rows: MAX_ROWS,
            max_cols: MAX_COLS,
        }
    }
}

impl LayoutConfig {
    /// Parse a JSON configuration document.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub const fn with_origin(mut self, origin: CellPos) -> Self {
        self.origin = origin;
        self
    }

    /// Check that a placed root fits in the sheet.
    ///
    /// # Errors
    /// Returns [`BoxgridError::SheetOverflow`] if `rect` reaches past the limits.
    pub fn check_fits(&self, rect: &Rectangle) -> Result<()> {
        if rect.bottom() > self.max_rows || rect.right() > self.max_cols {
            return Err(BoxgridError::SheetOverflow {
                rows: rect.bottom(),
                cols: rect.right(),
                max_rows: self.max_rows,
                max_cols: self.max_cols,
            });
        }
        Ok(())
    }
}
