//! Prototype resolution and slot binding.

use std::collections::{HashMap, HashSet};

use super::NodeKey;
use crate::error::ProtoResolutionError;
use crate::resolver::RangeResolver;
use crate::types::{Extent, GridBox, ProtoRef, Rectangle};

/// A proto's geometry as dictated by its template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProto {
    /// Size of the template range.
    pub footprint: Extent,
    /// Slot name to rectangle, in template-local 1-based coordinates.
    pub slots: HashMap<String, Rectangle>,
}

/// Resolved protos of one tree, keyed by node identity.
#[derive(Debug, Clone, Default)]
pub struct ResolvedProtos {
    by_node: HashMap<NodeKey, ResolvedProto>,
}

impl ResolvedProtos {
    #[must_use]
    pub fn get(&self, node: &GridBox) -> Option<&ResolvedProto> {
        self.by_node.get(&NodeKey::of(node))
    }

    /// Footprint of a resolved proto node.
    ///
    /// Every proto reachable from the root is resolved before layout starts,
    /// so the fallback is never taken for a tree handed to [`ProtoBinder::resolve_tree`].
    #[must_use]
    pub fn footprint(&self, node: &GridBox) -> Extent {
        self.get(node)
            .map_or(Extent::new(1, 1), |resolved| resolved.footprint)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }
}

/// Resolves proto boxes against a [`RangeResolver`].
#[derive(Clone, Copy)]
pub struct ProtoBinder<'r> {
    resolver: &'r dyn RangeResolver,
}

impl<'r> ProtoBinder<'r> {
    #[must_use]
    pub fn new(resolver: &'r dyn RangeResolver) -> Self {
        Self { resolver }
    }

    /// Resolve one proto reference.
    ///
    /// Template names with no binding are fine; a binding with no template
    /// name is an error.
    ///
    /// # Errors
    /// Returns the first unresolvable range or slot.
    pub fn resolve_proto(&self, proto: &ProtoRef) -> Result<ResolvedProto, ProtoResolutionError> {
        let Some(range) = self.resolver.resolve(&proto.template, &proto.range) else {
            return Err(if self.resolver.has_template(&proto.template) {
                ProtoResolutionError::RangeNotFound {
                    template: proto.template.clone(),
                    range: proto.range.clone(),
                }
            } else {
                ProtoResolutionError::UnknownTemplate {
                    template: proto.template.clone(),
                }
            });
        };

        let mut slots = HashMap::with_capacity(proto.slots.len());
        for slot in &proto.slots {
            let Some(local) = range.names.get(&slot.name) else {
                return Err(ProtoResolutionError::SlotNotFound {
                    template: proto.template.clone(),
                    range: proto.range.clone(),
                    slot: slot.name.clone(),
                });
            };
            slots.insert(slot.name.clone(), *local);
        }

        Ok(ResolvedProto {
            footprint: range.extent,
            slots,
        })
    }

    /// Resolve every distinct proto reachable from `root`, slot contents included.
    ///
    /// # Errors
    /// Fails on the first proto that cannot be resolved.
    pub fn resolve_tree(&self, root: &GridBox) -> Result<ResolvedProtos, ProtoResolutionError> {
        let mut resolved = ResolvedProtos::default();
        let mut visited = HashSet::new();
        let mut pending = vec![root];

        while let Some(node) = pending.pop() {
            if !visited.insert(NodeKey::of(node)) {
                continue;
            }
            if let Some(proto) = node.as_proto() {
                if node.has_explicit_span() {
                    return Err(proto.explicit_span_error());
                }
                let entry = self.resolve_proto(proto)?;
                resolved.by_node.insert(NodeKey::of(node), entry);
                pending.extend(proto.slots.iter().rev().map(|slot| &*slot.content));
            }
            // reversed so nodes pop in document order
            pending.extend(node.children.iter().rev().map(|child| &**child));
        }

        log::debug!("resolved {} prototype boxes", resolved.len());
        Ok(resolved)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resolver::{NoTemplates, ProtoBank, TemplateRanges};
    use crate::types::TemplateId;
    use std::sync::Arc;

    fn bank() -> ProtoBank {
        let mut ranges = TemplateRanges::new();
        ranges.insert("Card", None, Rectangle::at(1, 1, 2, 1));
        ranges.insert("Body", None, Rectangle::at(2, 1, 1, 1));
        let mut bank = ProtoBank::new();
        bank.insert("cards", ranges);
        bank
    }

    #[test]
    fn test_resolve_proto_with_slot() {
        let bank = bank();
        let binder = ProtoBinder::new(&bank);
        let proto = ProtoRef::new("cards", "Card").slot("Body", GridBox::text("x"));
        let resolved = binder.resolve_proto(&proto).unwrap();
        assert_eq!(resolved.footprint, Extent::new(2, 1));
        assert_eq!(resolved.slots["Body"], Rectangle::at(2, 1, 1, 1));
    }

    #[test]
    fn test_unbound_template_name_is_fine() {
        let bank = bank();
        let resolved = ProtoBinder::new(&bank)
            .resolve_proto(&ProtoRef::new("cards", "Card"))
            .unwrap();
        assert!(resolved.slots.is_empty());
    }

    #[test]
    fn test_unknown_slot() {
        let bank = bank();
        let proto = ProtoRef::new("cards", "Card").slot("Footer", GridBox::value());
        let err = ProtoBinder::new(&bank).resolve_proto(&proto).unwrap_err();
        assert_eq!(
            err,
            ProtoResolutionError::SlotNotFound {
                template: TemplateId::new("cards"),
                range: "Card".to_string(),
                slot: "Footer".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_range_and_template() {
        let bank = bank();
        let binder = ProtoBinder::new(&bank);
        let err = binder
            .resolve_proto(&ProtoRef::new("cards", "Missing"))
            .unwrap_err();
        assert!(matches!(err, ProtoResolutionError::RangeNotFound { .. }));
        let err = binder
            .resolve_proto(&ProtoRef::new("tables", "Card"))
            .unwrap_err();
        assert!(matches!(err, ProtoResolutionError::UnknownTemplate { .. }));
    }

    #[test]
    fn test_resolve_tree_visits_slots_and_shares() {
        let bank = bank();
        let inner = Arc::new(GridBox::proto(ProtoRef::new("cards", "Card")));
        let outer = GridBox::proto(ProtoRef::new("cards", "Card").slot("Body", Arc::clone(&inner)));
        let root = GridBox::row([Arc::new(outer), Arc::clone(&inner), inner]);
        let resolved = ProtoBinder::new(&bank).resolve_tree(&root).unwrap();
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn test_resolve_tree_fails_whole_run() {
        let root = GridBox::col([
            GridBox::value(),
            GridBox::proto(ProtoRef::new("cards", "Card")),
        ]);
        let err = ProtoBinder::new(&NoTemplates).resolve_tree(&root).unwrap_err();
        assert!(matches!(err, ProtoResolutionError::UnknownTemplate { .. }));
    }
}
