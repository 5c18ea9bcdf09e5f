//! Range resolution for prototype boxes.
//!
//! The layout engine never reads template documents itself. It asks a
//! [`RangeResolver`] for the size of a named range and the local rectangles
//! of the names nested inside it. [`TemplateRanges`] holds one template's
//! names; [`ProtoBank`] maps template ids to several of them.

use std::collections::HashMap;

use crate::error::Result;
use crate::types::{Extent, PlacedNode, Rectangle, TemplateId};
use crate::workbook_meta::parse_template_ranges;

/// A resolved template range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedRange {
    /// Size of the range.
    pub extent: Extent,
    /// Names nested in the range, in range-local 1-based coordinates.
    pub names: HashMap<String, Rectangle>,
}

/// Maps `(template, range name)` to the range's geometry.
pub trait RangeResolver: Send + Sync {
    /// Geometry of `range` in `template`, or `None` if there is no such range.
    fn resolve(&self, template: &TemplateId, range: &str) -> Option<ResolvedRange>;

    /// Whether `template` is known at all. Used only to pick an error message.
    fn has_template(&self, _template: &TemplateId) -> bool {
        true
    }
}

impl<F> RangeResolver for F
where
    F: Fn(&TemplateId, &str) -> Option<ResolvedRange> + Send + Sync,
{
    fn resolve(&self, template: &TemplateId, range: &str) -> Option<ResolvedRange> {
        self(template, range)
    }
}

/// A resolver with no templates, for trees without protos.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTemplates;

impl RangeResolver for NoTemplates {
    fn resolve(&self, _template: &TemplateId, _range: &str) -> Option<ResolvedRange> {
        None
    }

    fn has_template(&self, _template: &TemplateId) -> bool {
        false
    }
}

/// A named range in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRange {
    pub name: String,
    /// Sheet the range lives on; `None` for single-sheet templates.
    pub sheet: Option<String>,
    pub rect: Rectangle,
}

/// The named ranges of one template document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateRanges {
    ranges: Vec<NamedRange>,
}

impl TemplateRanges {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read defined names from an XLSX package.
    ///
    /// # Errors
    /// Returns an error if the bytes are not a readable XLSX package.
    pub fn from_xlsx(data: &[u8]) -> Result<Self> {
        parse_template_ranges(data)
    }

    /// Use the named boxes of a placed tree as a template.
    #[must_use]
    pub fn from_placed(placed: &PlacedNode<'_>) -> Self {
        let mut ranges = Self::new();
        for (name, rect) in placed.named_ranges() {
            ranges.insert(name, None, rect);
        }
        ranges
    }

    /// Add a range. A later range with the same name replaces the earlier one.
    pub fn insert(&mut self, name: impl Into<String>, sheet: Option<String>, rect: Rectangle) {
        let name = name.into();
        self.ranges.retain(|existing| existing.name != name);
        self.ranges.push(NamedRange { name, sheet, rect });
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NamedRange> {
        self.ranges.iter().find(|range| range.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedRange> {
        self.ranges.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Resolve `name`: its extent and every other range on the same sheet
    /// lying inside it.
    #[must_use]
    pub fn resolve_range(&self, name: &str) -> Option<ResolvedRange> {
        let outer = self.get(name)?;
        let names = self
            .ranges
            .iter()
            .filter(|inner| inner.name != outer.name && inner.sheet == outer.sheet)
            .filter_map(|inner| {
                outer
                    .rect
                    .localize(&inner.rect)
                    .map(|local| (inner.name.clone(), local))
            })
            .collect();

        Some(ResolvedRange {
            extent: outer.rect.extent(),
            names,
        })
    }
}

impl RangeResolver for TemplateRanges {
    fn resolve(&self, _template: &TemplateId, range: &str) -> Option<ResolvedRange> {
        self.resolve_range(range)
    }
}

/// Several prototype templates addressed by id.
#[derive(Debug, Clone, Default)]
pub struct ProtoBank {
    templates: HashMap<TemplateId, TemplateRanges>,
}

impl ProtoBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bank from `(id, xlsx bytes)` pairs.
    ///
    /// # Errors
    /// Returns the first package that fails to read.
    pub fn from_documents<I, K, D>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, D)>,
        K: Into<TemplateId>,
        D: AsRef<[u8]>,
    {
        let mut bank = Self::new();
        for (id, data) in documents {
            bank.add_xlsx(id, data.as_ref())?;
        }
        Ok(bank)
    }

    /// Register a template. Replaces any template with the same id.
    pub fn insert(&mut self, id: impl Into<TemplateId>, ranges: TemplateRanges) {
        self.templates.insert(id.into(), ranges);
    }

    /// Read and register an XLSX template.
    ///
    /// # Errors
    /// Returns an error if the bytes are not a readable XLSX package.
    pub fn add_xlsx(&mut self, id: impl Into<TemplateId>, data: &[u8]) -> Result<()> {
        let id = id.into();
        let ranges = TemplateRanges::from_xlsx(data)?;
        log::debug!("template `{id}`: {} named ranges", ranges.len());
        self.templates.insert(id, ranges);
        Ok(())
    }

    #[must_use]
    pub fn template(&self, id: &TemplateId) -> Option<&TemplateRanges> {
        self.templates.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl RangeResolver for ProtoBank {
    fn resolve(&self, template: &TemplateId, range: &str) -> Option<ResolvedRange> {
        self.templates.get(template)?.resolve_range(range)
    }

    fn has_template(&self, template: &TemplateId) -> bool {
        self.templates.contains_key(template)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn header_template() -> TemplateRanges {
        let mut ranges = TemplateRanges::new();
        ranges.insert("Header", Some("Protos".into()), Rectangle::at(3, 2, 2, 3));
        ranges.insert("Title", Some("Protos".into()), Rectangle::at(4, 3, 1, 2));
        ranges.insert("Elsewhere", Some("Other".into()), Rectangle::at(4, 3, 1, 1));
        ranges.insert("Outside", Some("Protos".into()), Rectangle::at(1, 1, 1, 1));
        ranges
    }

    #[test]
    fn test_resolve_range_nested_names() {
        let resolved = header_template().resolve_range("Header").unwrap();
        assert_eq!(resolved.extent, Extent::new(2, 3));
        assert_eq!(resolved.names.len(), 1);
        assert_eq!(resolved.names["Title"], Rectangle::at(2, 2, 1, 2));
    }

    #[test]
    fn test_resolve_missing_range() {
        assert!(header_template().resolve_range("Footer").is_none());
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut ranges = TemplateRanges::new();
        ranges.insert("A", None, Rectangle::at(1, 1, 1, 1));
        ranges.insert("A", None, Rectangle::at(2, 2, 1, 1));
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges.get("A").unwrap().rect, Rectangle::at(2, 2, 1, 1));
    }

    #[test]
    fn test_bank_dispatches_by_template() {
        let mut bank = ProtoBank::new();
        bank.insert("headers", header_template());
        let id = TemplateId::new("headers");
        assert!(bank.resolve(&id, "Header").is_some());
        assert!(bank.has_template(&id));
        assert!(!bank.has_template(&TemplateId::new("footers")));
        assert!(bank.resolve(&TemplateId::new("footers"), "Header").is_none());
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |_: &TemplateId, range: &str| {
            (range == "One").then(|| ResolvedRange {
                extent: Extent::new(1, 1),
                names: HashMap::new(),
            })
        };
        assert!(resolver.resolve(&TemplateId::new("t"), "One").is_some());
        assert!(resolver.resolve(&TemplateId::new("t"), "Two").is_none());
    }
}
