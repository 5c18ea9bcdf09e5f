//! boxgrid - box-tree layout for spreadsheet documents
//!
//! Describe a sheet as nested boxes and get back, for every box, the exact
//! cell rectangle it occupies:
//! - `Row`, `Col` and `Stack` containers with stretch-to-fit spans
//! - `Value` cells with optional explicit row/column spans
//! - `Proto` boxes that reuse a named range of an XLSX template, with
//!   caller content bound into named slots
//!
//! Rendering the placed tree into a workbook is left to the caller.
//!
//! # Usage
//!
//! ```rust
//! use boxgrid::{place, GridBox, Rectangle};
//!
//! let tree = GridBox::row([
//!     GridBox::text("Name"),
//!     GridBox::text("Total").span_cols(2)?,
//! ]);
//! let placed = place(&tree)?;
//! assert_eq!(placed.rect(), Some(Rectangle::at(1, 1, 1, 3)));
//! assert_eq!(placed.children[1].rect(), Some(Rectangle::at(1, 2, 1, 2)));
//! # Ok::<(), boxgrid::BoxgridError>(())
//! ```

pub mod cell_ref;
pub mod config;
pub mod error;
pub mod layout;
pub mod resolver;
pub mod types;
pub mod workbook_meta;

pub use config::LayoutConfig;
pub use error::{BoxgridError, ProtoResolutionError, Result};
pub use layout::Layout;
pub use resolver::{ProtoBank, RangeResolver, ResolvedRange, TemplateRanges};
pub use types::*;

/// Place a tree that contains no protos, with the default configuration.
///
/// # Errors
/// Fails if the tree contains a proto, or does not fit in a sheet.
pub fn place(root: &GridBox) -> Result<PlacedNode<'_>> {
    Layout::default().place(root)
}

/// Place a tree, resolving protos with `resolver`.
///
/// # Errors
/// Fails if a proto or slot cannot be resolved, or the tree does not fit in a sheet.
pub fn place_with<'t>(root: &'t GridBox, resolver: &dyn RangeResolver) -> Result<PlacedNode<'t>> {
    Layout::new(resolver).place(root)
}

/// Get the library version
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
