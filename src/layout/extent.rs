//! Minimum extents, computed bottom-up and memoized per node.

use std::collections::HashMap;

use super::proto::ResolvedProtos;
use super::NodeKey;
use crate::types::{Axis, BoxKind, Extent, GridBox};

/// Computes the minimum number of rows or columns a box needs.
///
/// The result depends only on the node, never on where it sits, so it is
/// cached by node identity for the life of one run. Shared nodes are
/// computed once.
pub struct ExtentCalc<'r> {
    protos: &'r ResolvedProtos,
    cache: HashMap<(NodeKey, Axis), u32>,
}

impl<'r> ExtentCalc<'r> {
    /// `protos` must cover every proto reachable from the nodes asked about.
    #[must_use]
    pub fn new(protos: &'r ResolvedProtos) -> Self {
        Self {
            protos,
            cache: HashMap::new(),
        }
    }

    /// Minimum extent of `node` along `axis`. Zero means the node is absent.
    pub fn min_extent(&mut self, node: &GridBox, axis: Axis) -> u32 {
        let key = (NodeKey::of(node), axis);
        if let Some(&cached) = self.cache.get(&key) {
            return cached;
        }

        let extent = match &node.kind {
            BoxKind::Value => node.span(axis).cells().unwrap_or(1),
            BoxKind::Row => self.sequence(node, axis, Axis::Col),
            BoxKind::Col => self.sequence(node, axis, Axis::Row),
            BoxKind::Stack => self.overlay(node, axis),
            BoxKind::Proto(_) => self.protos.footprint(node).get(axis),
        };

        self.cache.insert(key, extent);
        extent
    }

    /// Minimum extent on both axes.
    pub fn min_extents(&mut self, node: &GridBox) -> Extent {
        Extent::new(
            self.min_extent(node, Axis::Row),
            self.min_extent(node, Axis::Col),
        )
    }

    /// Number of cached entries.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Children laid out along `main`: summed on the main axis, maxed across it.
    fn sequence(&mut self, node: &GridBox, axis: Axis, main: Axis) -> u32 {
        let aggregate = if axis == main {
            node.children
                .iter()
                .fold(0u32, |sum, child| sum.saturating_add(self.min_extent(child, axis)))
        } else {
            self.widest(node, axis)
        };
        with_explicit(node, axis, aggregate)
    }

    /// Children overlaid: maxed on both axes.
    fn overlay(&mut self, node: &GridBox, axis: Axis) -> u32 {
        let aggregate = self.widest(node, axis);
        with_explicit(node, axis, aggregate)
    }

    fn widest(&mut self, node: &GridBox, axis: Axis) -> u32 {
        node.children
            .iter()
            .map(|child| self.min_extent(child, axis))
            .max()
            .unwrap_or(0)
    }
}

/// An explicit span widens a container past its aggregate but never
/// shrinks it below what its children need. A container with nothing in it
/// stays empty.
fn with_explicit(node: &GridBox, axis: Axis, aggregate: u32) -> u32 {
    if aggregate == 0 {
        0
    } else {
        node.span(axis).cells().map_or(aggregate, |span| span.max(aggregate))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn extents(node: &GridBox) -> Extent {
        let protos = ResolvedProtos::default();
        ExtentCalc::new(&protos).min_extents(node)
    }

    fn value(rows: u32, cols: u32) -> GridBox {
        GridBox::value()
            .span_rows(rows)
            .unwrap()
            .span_cols(cols)
            .unwrap()
    }

    #[test]
    fn test_value_defaults_to_one_cell() {
        assert_eq!(extents(&GridBox::value()), Extent::new(1, 1));
        assert_eq!(extents(&value(3, 4)), Extent::new(3, 4));
    }

    #[test]
    fn test_row_sums_columns_maxes_rows() {
        let row = GridBox::row([value(2, 3), value(5, 1)]);
        assert_eq!(extents(&row), Extent::new(5, 4));
    }

    #[test]
    fn test_col_sums_rows_maxes_columns() {
        let col = GridBox::col([value(2, 3), value(5, 1)]);
        assert_eq!(extents(&col), Extent::new(7, 3));
    }

    #[test]
    fn test_stack_maxes_both() {
        let stack = GridBox::stack([value(2, 3), value(5, 1)]);
        assert_eq!(extents(&stack), Extent::new(5, 3));
    }

    #[test]
    fn test_empty_containers_are_zero() {
        let empty: Vec<GridBox> = Vec::new();
        assert_eq!(extents(&GridBox::row(empty.clone())), Extent::new(0, 0));
        assert_eq!(extents(&GridBox::col(empty.clone())), Extent::new(0, 0));
        assert_eq!(extents(&GridBox::stack(empty.clone())), Extent::new(0, 0));
        let nested = GridBox::row([GridBox::col(empty)]);
        assert_eq!(extents(&nested), Extent::new(0, 0));
    }

    #[test]
    fn test_empty_child_contributes_nothing() {
        let row = GridBox::row([GridBox::stack(Vec::<GridBox>::new()), value(2, 2)]);
        assert_eq!(extents(&row), Extent::new(2, 2));
    }

    #[test]
    fn test_explicit_container_span() {
        let row = GridBox::row([GridBox::value()]).span_cols(4).unwrap();
        assert_eq!(extents(&row), Extent::new(1, 4));
        let narrow = GridBox::row([value(1, 3)]).span_cols(1).unwrap();
        assert_eq!(extents(&narrow), Extent::new(1, 3));
        let empty = GridBox::row(Vec::<GridBox>::new()).span_cols(4).unwrap();
        assert_eq!(extents(&empty), Extent::new(0, 0));
    }

    #[test]
    fn test_shared_node_cached_once() {
        let shared = Arc::new(value(2, 2));
        let row = GridBox::row([Arc::clone(&shared), Arc::clone(&shared), shared]);
        let protos = ResolvedProtos::default();
        let mut calc = ExtentCalc::new(&protos);
        assert_eq!(calc.min_extents(&row), Extent::new(2, 6));
        // root and one shared child, both axes
        assert_eq!(calc.cached(), 4);
    }
}
