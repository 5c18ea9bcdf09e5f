//! Structured error types for boxgrid.

use crate::types::TemplateId;

/// A prototype reference that could not be resolved against its template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtoResolutionError {
    /// The bank holds no template with this id.
    #[error("unknown prototype template `{template}`")]
    UnknownTemplate { template: TemplateId },

    /// The template has no range with this name.
    #[error("range `{range}` not found in prototype template `{template}`")]
    RangeNotFound { template: TemplateId, range: String },

    /// A slot is bound that the template range does not declare.
    #[error("slot `{slot}` is not declared in range `{range}` of prototype template `{template}`")]
    SlotNotFound {
        template: TemplateId,
        range: String,
        slot: String,
    },

    /// A proto was given an explicit span; its size comes from the template.
    #[error("prototype `{template}`!`{range}` is sized by its template and cannot take an explicit span")]
    ExplicitSpan { template: TemplateId, range: String },
}

/// All errors that can occur in boxgrid.
#[derive(Debug, thiserror::Error)]
pub enum BoxgridError {
    /// Prototype or slot resolution failure; the whole run fails.
    #[error("Prototype resolution: {0}")]
    ProtoResolution(#[from] ProtoResolutionError),

    /// A zero span given to a builder.
    #[error("Invalid span: {0} (spans must be at least 1)")]
    InvalidSpan(u32),

    /// The placed tree does not fit in the sheet.
    #[error("Layout of {rows}x{cols} cells exceeds sheet limits of {max_rows}x{max_cols}")]
    SheetOverflow {
        rows: u32,
        cols: u32,
        max_rows: u32,
        max_cols: u32,
    },

    /// Invalid cell reference.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BoxgridError>;
