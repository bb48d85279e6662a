use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::Error;

use super::xml::{XML_DECL, escape};

pub(super) mod content_type {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const DOCUMENT: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    pub const STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
    pub const NUMBERING: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
    pub const HEADER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
    pub const FOOTER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";
}

pub(super) mod rel_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const NUMBERING: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
    pub const HEADER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
    pub const FOOTER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
}

pub(super) struct Relationship {
    pub id: String,
    pub rel_type: &'static str,
    pub target: String,
}

pub(super) fn relationships_xml(rels: &[Relationship]) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for rel in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            escape(&rel.id),
            rel.rel_type,
            escape(&rel.target)
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

struct Part {
    name: String,
    content_type: &'static str,
    data: String,
}

/// Parts collected in write order, then zipped in one go.
#[derive(Default)]
pub(super) struct Package {
    parts: Vec<Part>,
}

impl Package {
    pub fn add(&mut self, name: impl Into<String>, content_type: &'static str, data: String) {
        self.parts.push(Part { name: name.into(), content_type, data });
    }

    /// Move every part of `other` to the end of this package.
    pub fn extend(&mut self, other: Package) {
        self.parts.extend(other.parts);
    }

    fn content_types_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(XML_DECL);
        xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
        xml.push_str(&format!(
            r#"<Default Extension="rels" ContentType="{}"/>"#,
            content_type::RELATIONSHIPS
        ));
        xml.push_str(&format!(r#"<Default Extension="xml" ContentType="{}"/>"#, content_type::XML));
        for part in &self.parts {
            if part.content_type == content_type::RELATIONSHIPS || part.content_type == content_type::XML {
                continue;
            }
            xml.push_str(&format!(
                r#"<Override PartName="/{}" ContentType="{}"/>"#,
                escape(&part.name),
                part.content_type
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    /// Zip every part. Entry order, compression and timestamps are fixed so the
    /// same parts always give the same bytes.
    pub fn finish(self) -> Result<Vec<u8>, Error> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(self.content_types_xml().as_bytes())?;
        for part in &self.parts {
            zip.start_file(part.name.as_str(), options)?;
            zip.write_all(part.data.as_bytes())?;
        }
        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn content_types_cover_overridden_parts() {
        let mut package = Package::default();
        package.add("_rels/.rels", content_type::RELATIONSHIPS, String::new());
        package.add("word/document.xml", content_type::DOCUMENT, String::new());
        package.add("word/header1.xml", content_type::HEADER, String::new());
        let xml = package.content_types_xml();
        assert!(xml.contains(r#"<Override PartName="/word/document.xml""#));
        assert!(xml.contains(r#"<Override PartName="/word/header1.xml""#));
        assert!(!xml.contains(r#"PartName="/_rels/.rels""#));
    }

    #[test]
    fn zip_is_reproducible_and_readable() {
        let build = || {
            let mut package = Package::default();
            package.add("word/document.xml", content_type::DOCUMENT, "<w:document/>".to_string());
            package.finish().unwrap()
        };
        let bytes = build();
        assert_eq!(bytes, build());

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index(0).unwrap().name(), "[Content_Types].xml");
        let mut body = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "<w:document/>");
    }

    #[test]
    fn relationships() {
        let xml = relationships_xml(&[Relationship {
            id: "rId1".into(),
            rel_type: rel_type::STYLES,
            target: "styles.xml".into(),
        }]);
        assert!(xml.contains(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#));
    }
}
