//! Layout engine: turns a box tree into absolute grid placements.
//!
//! A run has three steps:
//! - Resolve every proto against the range resolver ([`ProtoBinder`])
//! - Compute min extents bottom-up, memoized per node ([`ExtentCalc`])
//! - Place top-down, recomputed per occurrence so shared nodes get
//!   independent rectangles
//!
//! Runs share no mutable state; independent runs may go on separate threads.

mod extent;
mod placement;
mod proto;

pub use extent::ExtentCalc;
pub use proto::{ProtoBinder, ResolvedProto, ResolvedProtos};

use crate::config::LayoutConfig;
use crate::error::Result;
use crate::resolver::{NoTemplates, RangeResolver};
use crate::types::{GridBox, PlacedNode};
use placement::Placer;

/// Identity of a node within one run. Valid only while the tree is borrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeKey(usize);

impl NodeKey {
    pub(crate) fn of(node: &GridBox) -> Self {
        Self(std::ptr::from_ref(node) as usize)
    }
}

static NO_TEMPLATES: NoTemplates = NoTemplates;

/// A configured placement run.
#[derive(Clone, Copy)]
pub struct Layout<'r> {
    resolver: &'r dyn RangeResolver,
    config: LayoutConfig,
}

impl Default for Layout<'static> {
    fn default() -> Self {
        Self::new(&NO_TEMPLATES)
    }
}

impl<'r> Layout<'r> {
    #[must_use]
    pub fn new(resolver: &'r dyn RangeResolver) -> Self {
        Self {
            resolver,
            config: LayoutConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Place `root` and everything under it.
    ///
    /// # Errors
    /// Fails if any proto or slot cannot be resolved, or if the result does
    /// not fit in the configured sheet. No partial result is produced.
    pub fn place<'t>(&self, root: &'t GridBox) -> Result<PlacedNode<'t>> {
        log::debug!(
            "placing {} box at row {}, col {}",
            root.kind.label(),
            self.config.origin.row,
            self.config.origin.col
        );

        let protos = ProtoBinder::new(self.resolver).resolve_tree(root)?;
        let placed = Placer::new(&protos).place_root(root, self.config.origin);

        match placed.rect() {
            Some(rect) => {
                self.config.check_fits(&rect)?;
                log::debug!("placed root at {}", rect.to_a1());
            }
            None => log::debug!("root is empty"),
        }
        Ok(placed)
    }
}
