//! Workbook metadata parsing for prototype templates.
//!
//! Reads `xl/workbook.xml` from an XLSX package and collects its defined
//! names as [`TemplateRanges`]. Only plain rectangular references are kept:
//!
//! - `<definedName name="Header">Protos!$B$3:$D$4</definedName>` is kept
//! - `_xlnm.` built-ins (print areas, filters) are skipped
//! - multi-area (`A1:B2,D1:E2`), `#REF!`, constants and formulas are skipped

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{BufReader, Cursor, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::parse_sheet_range;
use crate::error::Result;
use crate::resolver::TemplateRanges;

/// Prefix Excel uses for built-in names.
const BUILTIN_PREFIX: &str = "_xlnm.";

/// A `definedName` element as read, before reference parsing.
#[derive(Debug, Default)]
struct DefinedNameBuilder {
    name: String,
    local_sheet_id: Option<u32>,
    value: String,
}

/// Parse an XLSX package into its template ranges.
pub fn parse_template_ranges(data: &[u8]) -> Result<TemplateRanges> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;
    let (sheet_names, defined_names) = parse_workbook_xml(&mut archive)?;
    Ok(collect_ranges(&sheet_names, defined_names))
}

/// Parse workbook.xml for sheet names (in order) and defined names.
///
/// Parses:
/// - `<sheets><sheet name="..." sheetId="1" r:id="rId1"/></sheets>`
/// - `<definedNames><definedName name="..." localSheetId="0">Sheet1!$A$1:$D$10</definedName></definedNames>`
fn parse_workbook_xml<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<(Vec<String>, Vec<DefinedNameBuilder>)> {
    let file = archive.by_name("xl/workbook.xml")?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut sheet_names = Vec::new();
    let mut defined_names = Vec::new();
    let mut buf = Vec::new();

    let mut in_defined_names = false;
    let mut current: Option<DefinedNameBuilder> = None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"definedNames" => in_defined_names = true,
                b"definedName" if in_defined_names => {
                    current = Some(parse_defined_name_attributes(e));
                }
                b"sheet" => {
                    if let Some(name) = attr_string(e, b"name") {
                        sheet_names.push(name);
                    }
                }
                _ => {}
            },
            Event::Empty(ref e) => {
                if e.local_name().as_ref() == b"sheet" {
                    if let Some(name) = attr_string(e, b"name") {
                        sheet_names.push(name);
                    }
                }
            }
            Event::Text(ref e) => {
                if let Some(ref mut builder) = current {
                    builder.value.push_str(&e.unescape()?);
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"definedNames" => in_defined_names = false,
                b"definedName" => {
                    if let Some(builder) = current.take() {
                        if !builder.name.is_empty() {
                            defined_names.push(builder);
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok((sheet_names, defined_names))
}

fn parse_defined_name_attributes(e: &BytesStart<'_>) -> DefinedNameBuilder {
    DefinedNameBuilder {
        name: attr_string(e, b"name").unwrap_or_default(),
        local_sheet_id: attr_string(e, b"localSheetId").and_then(|s| s.parse().ok()),
        value: String::new(),
    }
}

/// Extract a string attribute value by key.
fn attr_string(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Turn defined names into ranges.
///
/// Workbook-scoped names win over sheet-scoped names of the same name.
/// References without a sheet are attributed to the name's local sheet.
fn collect_ranges(sheet_names: &[String], defined_names: Vec<DefinedNameBuilder>) -> TemplateRanges {
    let mut ranges = TemplateRanges::new();
    let mut scoped_globally: Vec<String> = Vec::new();

    for dn in defined_names {
        if dn.name.starts_with(BUILTIN_PREFIX) {
            continue;
        }
        let value = dn.value.trim();
        if value.contains(',') || value.contains("#REF!") {
            log::warn!("skipping defined name `{}`: unsupported reference `{value}`", dn.name);
            continue;
        }
        let Some((sheet, rect)) = parse_sheet_range(value) else {
            log::warn!("skipping defined name `{}`: not a cell range `{value}`", dn.name);
            continue;
        };

        let local_sheet = dn
            .local_sheet_id
            .and_then(|idx| sheet_names.get(usize::try_from(idx).ok()?).cloned());
        let is_global = dn.local_sheet_id.is_none();

        if !is_global && scoped_globally.contains(&dn.name) {
            continue;
        }
        if is_global {
            scoped_globally.push(dn.name.clone());
        } else if ranges.contains(&dn.name) {
            continue;
        }

        ranges.insert(dn.name, sheet.or(local_sheet), rect);
    }

    ranges
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::Rectangle;

    fn name(name: &str, local: Option<u32>, value: &str) -> DefinedNameBuilder {
        DefinedNameBuilder {
            name: name.to_string(),
            local_sheet_id: local,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_collect_skips_unsupported() {
        let sheets = vec!["Protos".to_string()];
        let ranges = collect_ranges(
            &sheets,
            vec![
                name("_xlnm.Print_Area", Some(0), "Protos!$A$1:$D$10"),
                name("Split", None, "Protos!$A$1:$B$2,Protos!$D$1:$E$2"),
                name("Broken", None, "#REF!"),
                name("Rate", None, "0.0825"),
                name("Header", None, "Protos!$B$3:$D$4"),
            ],
        );
        assert_eq!(ranges.len(), 1);
        let header = ranges.get("Header").unwrap();
        assert_eq!(header.sheet.as_deref(), Some("Protos"));
        assert_eq!(header.rect, Rectangle::at(3, 2, 2, 3));
    }

    #[test]
    fn test_collect_global_wins_over_local() {
        let sheets = vec!["One".to_string(), "Two".to_string()];
        let ranges = collect_ranges(
            &sheets,
            vec![
                name("Total", Some(1), "Two!$A$1"),
                name("Total", None, "One!$C$3"),
                name("Total", Some(0), "One!$A$1"),
            ],
        );
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges.get("Total").unwrap().rect, Rectangle::at(3, 3, 1, 1));
    }

    #[test]
    fn test_collect_unqualified_uses_local_sheet() {
        let sheets = vec!["One".to_string(), "Two".to_string()];
        let ranges = collect_ranges(&sheets, vec![name("Cell", Some(1), "$B$2")]);
        assert_eq!(ranges.get("Cell").unwrap().sheet.as_deref(), Some("Two"));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(parse_template_ranges(b"not a zip").is_err());
    }
}
