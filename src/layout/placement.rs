//! Top-down placement of a box tree onto the grid.
//!
//! Each node receives an allocated extent from its parent. Along a
//! container's main axis a child is allocated its own min extent (plus a
//! share of any excess when it stretches); across it, the container's full
//! extent. A child with a fixed span keeps it, an auto child takes what it
//! was allocated. Nothing here is cached: a shared node is placed afresh
//! for every occurrence.

use super::extent::ExtentCalc;
use super::proto::ResolvedProtos;
use crate::types::{
    Axis, BoxKind, CellPos, Extent, GridBox, PlacedNode, PlacedSlot, Placement, ProtoRef,
    Rectangle,
};

pub(crate) struct Placer<'r> {
    extents: ExtentCalc<'r>,
    protos: &'r ResolvedProtos,
}

impl<'r> Placer<'r> {
    pub(crate) fn new(protos: &'r ResolvedProtos) -> Self {
        Self {
            extents: ExtentCalc::new(protos),
            protos,
        }
    }

    /// Place the root at `origin`; with nothing above it, it gets its min extent.
    pub(crate) fn place_root<'t>(&mut self, root: &'t GridBox, origin: CellPos) -> PlacedNode<'t> {
        let min = self.extents.min_extents(root);
        self.place(root, origin, min)
    }

    fn place<'t>(&mut self, node: &'t GridBox, origin: CellPos, allocated: Extent) -> PlacedNode<'t> {
        let min = self.extents.min_extents(node);
        if min.is_empty() {
            return PlacedNode::absent(node);
        }

        let extent = Extent::new(
            self.actual_span(node, Axis::Row, allocated, min),
            self.actual_span(node, Axis::Col, allocated, min),
        );
        self.place_at(node, Rectangle::from_parts(origin, extent))
    }

    fn actual_span(&self, node: &GridBox, axis: Axis, allocated: Extent, min: Extent) -> u32 {
        self.fixed_span(node, axis)
            .unwrap_or_else(|| allocated.get(axis))
            .max(min.get(axis))
    }

    /// The span a node keeps whatever it is allocated, or `None` if it stretches.
    fn fixed_span(&self, node: &GridBox, axis: Axis) -> Option<u32> {
        match &node.kind {
            BoxKind::Proto(proto) => {
                (!proto.is_auto(axis)).then(|| self.protos.footprint(node).get(axis))
            }
            _ => node.span(axis).cells(),
        }
    }

    /// Place `node` exactly at `rect` and lay out its contents inside it.
    fn place_at<'t>(&mut self, node: &'t GridBox, rect: Rectangle) -> PlacedNode<'t> {
        log::trace!("{} at {}", node.kind.label(), rect.to_a1());

        let (children, slots) = match &node.kind {
            BoxKind::Row => (self.sequence(node, rect, Axis::Col), Vec::new()),
            BoxKind::Col => (self.sequence(node, rect, Axis::Row), Vec::new()),
            BoxKind::Stack => (self.overlay(node, rect), Vec::new()),
            BoxKind::Value => (absent_children(node), Vec::new()),
            BoxKind::Proto(proto) => (absent_children(node), self.slots(node, proto, rect)),
        };

        PlacedNode {
            source: node,
            placement: Placement::Present(rect),
            children,
            slots,
        }
    }

    fn sequence<'t>(&mut self, node: &'t GridBox, rect: Rectangle, main: Axis) -> Vec<PlacedNode<'t>> {
        let cross = main.cross();
        let mins: Vec<Extent> = node
            .children
            .iter()
            .map(|child| self.extents.min_extents(child))
            .collect();

        let used = mins
            .iter()
            .filter(|min| !min.is_empty())
            .fold(0u32, |sum, min| sum.saturating_add(min.get(main)));
        let excess = rect.extent().get(main).saturating_sub(used);
        let stretchers = node
            .children
            .iter()
            .zip(&mins)
            .filter(|(child, min)| !min.is_empty() && self.fixed_span(child, main).is_none())
            .count();
        let mut excess = ExcessSplit::new(excess, stretchers);

        let mut offset = rect.origin();
        let mut placed = Vec::with_capacity(node.children.len());
        for (child, min) in node.children.iter().zip(mins) {
            if min.is_empty() {
                placed.push(PlacedNode::absent(child));
                continue;
            }

            let mut main_extent = min.get(main);
            if self.fixed_span(child, main).is_none() {
                main_extent = main_extent.saturating_add(excess.next_share());
            }
            let allocated = Extent::default()
                .with(main, main_extent)
                .with(cross, rect.extent().get(cross));

            let child_placed = self.place(child, offset, allocated);
            if let Some(child_rect) = child_placed.rect() {
                offset = offset.advance(main, child_rect.extent().get(main));
            }
            placed.push(child_placed);
        }
        placed
    }

    fn overlay<'t>(&mut self, node: &'t GridBox, rect: Rectangle) -> Vec<PlacedNode<'t>> {
        node.children
            .iter()
            .map(|child| self.place(child, rect.origin(), rect.extent()))
            .collect()
    }

    /// Slot contents go where the template says, sized by the template.
    fn slots<'t>(
        &mut self,
        node: &'t GridBox,
        proto: &'t ProtoRef,
        rect: Rectangle,
    ) -> Vec<PlacedSlot<'t>> {
        let Some(resolved) = self.protos.get(node) else {
            return Vec::new();
        };

        let mut placed = Vec::with_capacity(proto.slots.len());
        for slot in &proto.slots {
            let Some(local) = resolved.slots.get(&slot.name) else {
                continue;
            };
            let content: &'t GridBox = &slot.content;
            let node = if self.extents.min_extents(content).is_empty() {
                PlacedNode::absent(content)
            } else {
                self.place_at(content, rect.place_local(local))
            };
            placed.push(PlacedSlot {
                name: &slot.name,
                node,
            });
        }
        placed
    }
}

fn absent_children(node: &GridBox) -> Vec<PlacedNode<'_>> {
    node.children.iter().map(|child| PlacedNode::absent(child)).collect()
}

/// Splits main-axis excess evenly over stretching children, earliest first
/// for the remainder.
struct ExcessSplit {
    base: u32,
    remainder: u32,
}

impl ExcessSplit {
    fn new(excess: u32, stretchers: usize) -> Self {
        match u32::try_from(stretchers) {
            Ok(0) | Err(_) => Self {
                base: 0,
                remainder: 0,
            },
            Ok(count) => Self {
                base: excess / count,
                remainder: excess % count,
            },
        }
    }

    fn next_share(&mut self) -> u32 {
        if self.remainder > 0 {
            self.remainder -= 1;
            self.base + 1
        } else {
            self.base
        }
    }
}
