use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

use super::Axis;
use crate::error::{BoxgridError, ProtoResolutionError, Result};

/// The span of a box along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Span {
    /// Stretch to the extent the parent allocates on this axis.
    #[default]
    Auto,
    /// Exactly this many cells.
    Explicit(NonZeroU32),
}

impl Span {
    /// Create an explicit span, rejecting zero.
    ///
    /// # Errors
    /// Returns [`BoxgridError::InvalidSpan`] if `cells` is zero.
    pub fn explicit(cells: u32) -> Result<Self> {
        NonZeroU32::new(cells)
            .map(Self::Explicit)
            .ok_or(BoxgridError::InvalidSpan(cells))
    }

    /// The explicit cell count, if any.
    #[must_use]
    pub const fn cells(self) -> Option<u32> {
        match self {
            Self::Auto => None,
            Self::Explicit(n) => Some(n.get()),
        }
    }
}

/// Identifies a prototype document in a [`ProtoBank`](crate::resolver::ProtoBank).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TemplateId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TemplateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A box bound into a named range of a prototype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    pub content: Arc<GridBox>,
}

/// Reference to a named range in a template document, plus its slot bindings.
///
/// A proto's footprint is the template range's size on both axes. Setting
/// `auto_rows` / `auto_cols` lets it stretch on that axis like an auto span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtoRef {
    pub template: TemplateId,
    pub range: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<Slot>,
    #[serde(default)]
    pub auto_rows: bool,
    #[serde(default)]
    pub auto_cols: bool,
}

impl ProtoRef {
    pub fn new(template: impl Into<TemplateId>, range: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            range: range.into(),
            slots: Vec::new(),
            auto_rows: false,
            auto_cols: false,
        }
    }

    /// Bind `content` into the template's range named `name`.
    #[must_use]
    pub fn slot(mut self, name: impl Into<String>, content: impl Into<Arc<GridBox>>) -> Self {
        self.slots.push(Slot {
            name: name.into(),
            content: content.into(),
        });
        self
    }

    #[must_use]
    pub fn auto_span(self) -> Self {
        self.auto_span_rows().auto_span_cols()
    }

    #[must_use]
    pub fn auto_span_rows(mut self) -> Self {
        self.auto_rows = true;
        self
    }

    #[must_use]
    pub fn auto_span_cols(mut self) -> Self {
        self.auto_cols = true;
        self
    }

    /// Whether the proto stretches along `axis`.
    #[must_use]
    pub const fn is_auto(&self, axis: Axis) -> bool {
        match axis {
            Axis::Row => self.auto_rows,
            Axis::Col => self.auto_cols,
        }
    }

    pub(crate) fn explicit_span_error(&self) -> ProtoResolutionError {
        ProtoResolutionError::ExplicitSpan {
            template: self.template.clone(),
            range: self.range.clone(),
        }
    }
}

/// Box variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoxKind {
    /// Children left to right.
    Row,
    /// Children top to bottom.
    Col,
    /// Children overlaid at the same top-left cell.
    Stack,
    /// A single (possibly merged) cell.
    Value,
    /// A template range with slots.
    Proto(ProtoRef),
}

impl BoxKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Col => "col",
            Self::Stack => "stack",
            Self::Value => "value",
            Self::Proto(_) => "proto",
        }
    }
}

/// Cell content carried through layout untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<f64> for Content {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<bool> for Content {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

/// Data the renderer needs and layout ignores.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// Defined name written for this box's range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// Style key, resolved by the renderer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// An immutable layout node.
///
/// Children are held by `Arc` so the same node can appear under several
/// parents, or several times under one parent. A `Proto` takes its size
/// from its template and rejects explicit spans; use [`ProtoRef::auto_span`]
/// to let it stretch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridBox {
    pub kind: BoxKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Arc<GridBox>>,
    #[serde(default)]
    pub row_span: Span,
    #[serde(default)]
    pub col_span: Span,
    #[serde(default)]
    pub payload: Payload,
}

impl GridBox {
    fn with_kind(kind: BoxKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            row_span: Span::Auto,
            col_span: Span::Auto,
            payload: Payload::default(),
        }
    }

    fn container<I, B>(kind: BoxKind, children: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Arc<GridBox>>,
    {
        let mut node = Self::with_kind(kind);
        node.children = children.into_iter().map(Into::into).collect();
        node
    }

    pub fn row<I, B>(children: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Arc<GridBox>>,
    {
        Self::container(BoxKind::Row, children)
    }

    pub fn col<I, B>(children: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Arc<GridBox>>,
    {
        Self::container(BoxKind::Col, children)
    }

    pub fn stack<I, B>(children: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Arc<GridBox>>,
    {
        Self::container(BoxKind::Stack, children)
    }

    /// An empty value cell.
    #[must_use]
    pub fn value() -> Self {
        Self::with_kind(BoxKind::Value)
    }

    pub fn text(content: impl Into<Content>) -> Self {
        Self::value().content(content)
    }

    #[must_use]
    pub fn proto(proto: ProtoRef) -> Self {
        Self::with_kind(BoxKind::Proto(proto))
    }

    /// Set an explicit row span.
    ///
    /// # Errors
    /// Returns [`BoxgridError::InvalidSpan`] if `rows` is zero, or
    /// [`ProtoResolutionError::ExplicitSpan`] on a proto.
    pub fn span_rows(mut self, rows: u32) -> Result<Self> {
        self.reject_proto_span()?;
        self.row_span = Span::explicit(rows)?;
        Ok(self)
    }

    /// Set an explicit column span.
    ///
    /// # Errors
    /// Returns [`BoxgridError::InvalidSpan`] if `cols` is zero, or
    /// [`ProtoResolutionError::ExplicitSpan`] on a proto.
    pub fn span_cols(mut self, cols: u32) -> Result<Self> {
        self.reject_proto_span()?;
        self.col_span = Span::explicit(cols)?;
        Ok(self)
    }

    fn reject_proto_span(&self) -> std::result::Result<(), ProtoResolutionError> {
        match self.as_proto() {
            Some(proto) => Err(proto.explicit_span_error()),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.payload.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.payload.style = Some(style.into());
        self
    }

    #[must_use]
    pub fn content(mut self, content: impl Into<Content>) -> Self {
        self.payload.content = Some(content.into());
        self
    }

    #[must_use]
    pub const fn span(&self, axis: Axis) -> Span {
        match axis {
            Axis::Row => self.row_span,
            Axis::Col => self.col_span,
        }
    }

    /// Whether either axis carries an explicit span.
    #[must_use]
    pub const fn has_explicit_span(&self) -> bool {
        self.row_span.cells().is_some() || self.col_span.cells().is_some()
    }

    #[must_use]
    pub const fn as_proto(&self) -> Option<&ProtoRef> {
        match &self.kind {
            BoxKind::Proto(proto) => Some(proto),
            _ => None,
        }
    }
}
