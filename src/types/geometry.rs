use serde::{Deserialize, Serialize};

use crate::cell_ref::cell_name;

/// One of the two grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    /// Vertical: heights, row spans.
    Row,
    /// Horizontal: widths, column spans.
    Col,
}

impl Axis {
    /// The other axis.
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Row => Self::Col,
            Self::Col => Self::Row,
        }
    }
}

/// A cell position (1-based row and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: u32,
    pub col: u32,
}

impl CellPos {
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn get(self, axis: Axis) -> u32 {
        match axis {
            Axis::Row => self.row,
            Axis::Col => self.col,
        }
    }

    /// Move `by` cells along `axis`, stopping at `u32::MAX`.
    #[must_use]
    pub const fn advance(self, axis: Axis, by: u32) -> Self {
        match axis {
            Axis::Row => Self::new(self.row.saturating_add(by), self.col),
            Axis::Col => Self::new(self.row, self.col.saturating_add(by)),
        }
    }
}

impl Default for CellPos {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Size of a region in rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Extent {
    pub rows: u32,
    pub cols: u32,
}

impl Extent {
    #[must_use]
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    #[must_use]
    pub const fn get(self, axis: Axis) -> u32 {
        match axis {
            Axis::Row => self.rows,
            Axis::Col => self.cols,
        }
    }

    #[must_use]
    pub const fn with(self, axis: Axis, value: u32) -> Self {
        match axis {
            Axis::Row => Self::new(value, self.cols),
            Axis::Col => Self::new(self.rows, value),
        }
    }

    /// True when either side is zero (nothing to place).
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

/// A rectangle of cells. Coordinates are 1-based; `height` and `width` are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub row: u32,
    pub col: u32,
    pub height: u32,
    pub width: u32,
}

impl Rectangle {
    #[must_use]
    pub const fn at(row: u32, col: u32, height: u32, width: u32) -> Self {
        Self {
            row,
            col,
            height,
            width,
        }
    }

    #[must_use]
    pub const fn from_parts(origin: CellPos, extent: Extent) -> Self {
        Self::at(origin.row, origin.col, extent.rows, extent.cols)
    }

    #[must_use]
    pub const fn origin(&self) -> CellPos {
        CellPos::new(self.row, self.col)
    }

    #[must_use]
    pub const fn extent(&self) -> Extent {
        Extent::new(self.height, self.width)
    }

    /// Last row covered (inclusive). Saturates at `u32::MAX`.
    #[must_use]
    pub const fn bottom(&self) -> u32 {
        last_cell(self.row, self.height)
    }

    /// Last column covered (inclusive). Saturates at `u32::MAX`.
    #[must_use]
    pub const fn right(&self) -> u32 {
        last_cell(self.col, self.width)
    }

    /// Whether `other` lies entirely inside this rectangle.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        other.row >= self.row
            && other.col >= self.col
            && other.bottom() <= self.bottom()
            && other.right() <= self.right()
    }

    /// Translate a rectangle given in this rectangle's local coordinates,
    /// where `(1, 1)` is this rectangle's top-left cell.
    #[must_use]
    pub const fn place_local(&self, local: &Self) -> Self {
        Self::at(
            last_cell(self.row, local.row),
            last_cell(self.col, local.col),
            local.height,
            local.width,
        )
    }

    /// Express `inner` in this rectangle's local coordinates.
    ///
    /// Returns `None` if `inner` is not contained in `self`.
    #[must_use]
    pub fn localize(&self, inner: &Self) -> Option<Self> {
        self.contains(inner).then(|| {
            Self::at(
                inner.row - self.row + 1,
                inner.col - self.col + 1,
                inner.height,
                inner.width,
            )
        })
    }

    /// A1-style reference: `"B2"` for a single cell, `"B2:D5"` otherwise.
    #[must_use]
    pub fn to_a1(&self) -> String {
        let start = cell_name(self.origin());
        if self.height == 1 && self.width == 1 {
            start
        } else {
            let end = cell_name(CellPos::new(self.bottom(), self.right()));
            format!("{start}:{end}")
        }
    }
}

const fn last_cell(start: u32, len: u32) -> u32 {
    start.saturating_add(len.saturating_sub(1))
}
