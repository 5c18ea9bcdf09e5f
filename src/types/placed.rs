use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::{GridBox, Rectangle};

/// Where one occurrence of a box ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Placement {
    /// Nothing to place (an empty container).
    Absent,
    Present(Rectangle),
}

impl Placement {
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    #[must_use]
    pub const fn rect(&self) -> Option<Rectangle> {
        match self {
            Self::Absent => None,
            Self::Present(rect) => Some(*rect),
        }
    }
}

/// A placed box: mirrors the input tree, one node per occurrence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedNode<'a> {
    #[serde(rename = "box", serialize_with = "serialize_source")]
    pub source: &'a GridBox,
    pub placement: Placement,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PlacedNode<'a>>,
    /// Slot contents of a proto, in binding order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<PlacedSlot<'a>>,
}

/// Placed content of one proto slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedSlot<'a> {
    pub name: &'a str,
    pub node: PlacedNode<'a>,
}

impl<'a> PlacedNode<'a> {
    /// An absent node whose children mirror the source, all absent too.
    pub(crate) fn absent(source: &'a GridBox) -> Self {
        Self {
            source,
            placement: Placement::Absent,
            children: source
                .children
                .iter()
                .map(|child| Self::absent(child))
                .collect(),
            slots: Vec::new(),
        }
    }

    #[must_use]
    pub const fn rect(&self) -> Option<Rectangle> {
        self.placement.rect()
    }

    /// `(name, rectangle)` for every present named node, pre-order,
    /// slot contents after a node's children.
    #[must_use]
    pub fn named_ranges(&self) -> Vec<(&'a str, Rectangle)> {
        let mut out = Vec::new();
        self.collect_names(&mut out);
        out
    }

    fn collect_names(&self, out: &mut Vec<(&'a str, Rectangle)>) {
        if let (Some(name), Some(rect)) = (self.source.payload.name.as_deref(), self.rect()) {
            out.push((name, rect));
        }
        for child in &self.children {
            child.collect_names(out);
        }
        for slot in &self.slots {
            slot.node.collect_names(out);
        }
    }
}

fn serialize_source<S: Serializer>(
    source: &&GridBox,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("Box", 2)?;
    state.serialize_field("kind", source.kind.label())?;
    state.serialize_field("payload", &source.payload)?;
    state.end()
}
