//! Test fixtures for generating prototype XLSX templates in memory.
//!
//! Only the parts the template reader looks at are written: the package
//! skeleton, `xl/workbook.xml` with sheets and defined names, and empty
//! worksheets.
//!
//! # Example
//!
//! ```rust,ignore
//! let xlsx = TemplateBuilder::new()
//!     .add_sheet("Protos")
//!     .add_name("Card", "Protos!$A$1:$A$2")
//!     .add_name("Body", "Protos!$A$2")
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

/// A `definedName` entry.
#[derive(Debug, Clone)]
pub struct NameDef {
    pub name: String,
    pub value: String,
    pub local_sheet_id: Option<u32>,
}

/// Builder for template workbooks.
#[derive(Debug, Clone, Default)]
pub struct TemplateBuilder {
    sheets: Vec<String>,
    names: Vec<NameDef>,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(mut self, name: &str) -> Self {
        self.sheets.push(name.to_string());
        self
    }

    /// Add a workbook-scoped defined name.
    pub fn add_name(mut self, name: &str, value: &str) -> Self {
        self.names.push(NameDef {
            name: name.to_string(),
            value: value.to_string(),
            local_sheet_id: None,
        });
        self
    }

    /// Add a sheet-scoped defined name.
    pub fn add_local_name(mut self, name: &str, sheet_idx: u32, value: &str) -> Self {
        self.names.push(NameDef {
            name: name.to_string(),
            value: value.to_string(),
            local_sheet_id: Some(sheet_idx),
        });
        self
    }

    fn workbook_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>"#,
        );
        for (i, sheet) in self.sheets.iter().enumerate() {
            xml.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(sheet),
                i + 1,
                i + 1
            ));
        }
        xml.push_str("</sheets>");

        if !self.names.is_empty() {
            xml.push_str("<definedNames>");
            for def in &self.names {
                let local = def
                    .local_sheet_id
                    .map(|id| format!(r#" localSheetId="{id}""#))
                    .unwrap_or_default();
                xml.push_str(&format!(
                    r#"<definedName name="{}"{local}>{}</definedName>"#,
                    escape(&def.name),
                    escape(&def.value)
                ));
            }
            xml.push_str("</definedNames>");
        }

        xml.push_str("</workbook>");
        xml
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buffer);
            let options =
                FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(self.content_types_xml().as_bytes()).unwrap();

            zip.start_file("_rels/.rels", options).unwrap();
            zip.write_all(RELS_XML.as_bytes()).unwrap();

            zip.start_file("xl/workbook.xml", options).unwrap();
            zip.write_all(self.workbook_xml().as_bytes()).unwrap();

            zip.start_file("xl/_rels/workbook.xml.rels", options)
                .unwrap();
            zip.write_all(self.workbook_rels_xml().as_bytes()).unwrap();

            for i in 0..self.sheets.len() {
                zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
                    .unwrap();
                zip.write_all(EMPTY_SHEET_XML.as_bytes()).unwrap();
            }

            zip.finish().unwrap();
        }
        buffer.into_inner()
    }

    fn content_types_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
        );
        for i in 0..self.sheets.len() {
            xml.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    fn workbook_rels_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for i in 0..self.sheets.len() {
            xml.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const EMPTY_SHEET_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData/>
</worksheet>"#;

/// The two-row card template used across proto tests:
/// `Card` is `A1:A2` on sheet `Protos`, with slot `Body` at `A2`.
pub fn card_template() -> Vec<u8> {
    TemplateBuilder::new()
        .add_sheet("Protos")
        .add_name("Card", "Protos!$A$1:$A$2")
        .add_name("Body", "Protos!$A$2")
        .build()
}
