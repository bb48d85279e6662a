mod numbering;
mod package;
mod styles;
pub(crate) mod xml;

use crate::error::Error;
use crate::field::{check_placement, write_field};
use crate::model::{Block, CoreProperties, Document, Inline, PageGeometry, Paragraph, Run, RunContent, Section, Table};
use crate::numbering::NumberingEngine;
use crate::style::ResolvedStyles;
use crate::table::{ResolvedCell, layout};

use package::{Package, Relationship, content_type, rel_type, relationships_xml};
use xml::{REL_NS, WML_NS, XML_DECL, escape};

const PAGE_BREAK_RUN: &str = r#"<w:r><w:br w:type="page"/></w:r>"#;

/// Header and footer relationship ids for one section.
#[derive(Default)]
struct SectionRefs {
    header: Option<String>,
    footer: Option<String>,
}

/// One serialization pass. Owns the per-pass state: style cache, numbering
/// counters and the parts collected so far.
struct DocxWriter<'a> {
    doc: &'a Document,
    styles: ResolvedStyles<'a>,
    numbering: NumberingEngine<'a>,
    package: Package,
    rels: Vec<Relationship>,
    headers: usize,
    footers: usize,
}

impl<'a> DocxWriter<'a> {
    fn new(doc: &'a Document) -> Self {
        DocxWriter {
            doc,
            styles: ResolvedStyles::new(&doc.styles),
            numbering: NumberingEngine::new(&doc.numbering),
            package: Package::default(),
            rels: Vec::new(),
            headers: 0,
            footers: 0,
        }
    }

    fn next_rel_id(&self) -> String {
        format!("rId{}", self.rels.len() + 1)
    }

    fn write_paragraph(&mut self, xml: &mut String, para: &'a Paragraph, path: &str) -> Result<(), Error> {
        let style_id = para.style.as_deref();
        self.styles.paragraph(style_id).map_err(|e| e.at(path))?;

        let mut ppr = String::new();
        if let Some(id) = style_id {
            ppr.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, escape(id)));
        }
        if let Some(num) = &para.numbering {
            let label = self
                .numbering
                .next(&num.reference, num.level)
                .map_err(|e| e.at(path))?;
            log::trace!("{path}: list label {:?}", label.text);
            let id = numbering::num_id(&self.doc.numbering, &num.reference).unwrap_or_default();
            ppr.push_str(&format!(
                r#"<w:numPr><w:ilvl w:val="{}"/><w:numId w:val="{id}"/></w:numPr>"#,
                num.level
            ));
        }
        ppr.push_str(&xml::paragraph_properties(&para.direct_properties()));

        xml.push_str("<w:p>");
        if !ppr.is_empty() {
            xml.push_str(&format!("<w:pPr>{ppr}</w:pPr>"));
        }
        for (i, inline) in para.children.iter().enumerate() {
            check_placement(inline).map_err(|e| e.at(&format!("{path}/inline[{i}]")))?;
            match inline {
                Inline::Run(run) => self.write_run(xml, run, &format!("{path}/run[{i}]"))?,
                Inline::PageBreak => xml.push_str(PAGE_BREAK_RUN),
                Inline::Field(_) => {}
            }
        }
        if para.page_break_after {
            xml.push_str(PAGE_BREAK_RUN);
        }
        xml.push_str("</w:p>");
        Ok(())
    }

    fn write_run(&mut self, xml: &mut String, run: &'a Run, path: &str) -> Result<(), Error> {
        if let Some(id) = run.style.as_deref() {
            self.styles.resolve(id).map_err(|e| e.at(path))?;
        }
        let rpr = xml::rpr(run.style.as_deref(), &run.format);
        for content in &run.content {
            match content {
                RunContent::Text(text) => {
                    xml::check_text(text).map_err(|e| e.at(path))?;
                    xml::write_text(xml, text, &rpr);
                }
                RunContent::Field(field) => write_field(xml, *field, &rpr),
            }
        }
        Ok(())
    }

    fn write_table(&mut self, xml: &mut String, table: &'a Table, path: &str) -> Result<(), Error> {
        let resolved = layout(table).map_err(|e| e.at(path))?;

        xml.push_str("<w:tbl><w:tblPr>");
        xml.push_str(&format!(
            r#"<w:tblW w:w="{}" w:type="dxa"/><w:tblLayout w:type="fixed"/>"#,
            resolved.total_width()
        ));
        xml.push_str("</w:tblPr><w:tblGrid>");
        for width in resolved.column_widths {
            xml.push_str(&format!(r#"<w:gridCol w:w="{width}"/>"#));
        }
        xml.push_str("</w:tblGrid>");

        for (r, row) in resolved.rows.iter().enumerate() {
            xml.push_str("<w:tr>");
            if row.grid_after > 0 || row.repeat_header {
                xml.push_str("<w:trPr>");
                if row.grid_after > 0 {
                    xml.push_str(&format!(r#"<w:gridAfter w:val="{}"/>"#, row.grid_after));
                }
                if row.repeat_header {
                    xml.push_str("<w:tblHeader/>");
                }
                xml.push_str("</w:trPr>");
            }
            for (c, cell) in row.cells.iter().enumerate() {
                self.write_cell(xml, cell, &format!("{path}/row[{r}]/cell[{c}]"))?;
            }
            xml.push_str("</w:tr>");
        }
        xml.push_str("</w:tbl>");
        Ok(())
    }

    fn write_cell(&mut self, xml: &mut String, cell: &ResolvedCell<'a>, path: &str) -> Result<(), Error> {
        xml.push_str("<w:tc><w:tcPr>");
        xml.push_str(&format!(r#"<w:tcW w:w="{}" w:type="dxa"/>"#, cell.width));
        if cell.span > 1 {
            xml.push_str(&format!(r#"<w:gridSpan w:val="{}"/>"#, cell.span));
        }
        if !cell.borders.is_empty() {
            xml.push_str("<w:tcBorders>");
            let edges = [
                ("top", &cell.borders.top),
                ("left", &cell.borders.left),
                ("bottom", &cell.borders.bottom),
                ("right", &cell.borders.right),
            ];
            for (edge, border) in edges {
                if let Some(border) = border {
                    xml.push_str(&format!(
                        r#"<w:{edge} w:val="{}" w:sz="{}" w:space="0" w:color="{}"/>"#,
                        border.style.as_wml(),
                        border.size,
                        escape(&border.color)
                    ));
                }
            }
            xml.push_str("</w:tcBorders>");
        }
        if let Some(shading) = cell.shading {
            xml.push_str(&format!(
                r#"<w:shd w:val="{}" w:color="auto" w:fill="{}"/>"#,
                shading.pattern.as_wml(),
                escape(&shading.fill)
            ));
        }
        xml.push_str("</w:tcPr>");

        // a cell must end with a paragraph
        if cell.children.is_empty() {
            xml.push_str("<w:p/>");
        }
        for (p, para) in cell.children.iter().enumerate() {
            self.write_paragraph(xml, para, &format!("{path}/paragraph[{p}]"))?;
        }
        xml.push_str("</w:tc>");
        Ok(())
    }

    /// Header or footer part. Returns the relationship id, or `None` when
    /// neither this section nor any earlier one has something to show there.
    /// Once a section has a header, later sections without one get an empty
    /// part instead of inheriting it.
    fn write_header_footer(
        &mut self,
        paragraphs: &'a [Paragraph],
        footer: bool,
        path: &str,
    ) -> Result<Option<String>, Error> {
        let written = if footer { self.footers } else { self.headers };
        if paragraphs.is_empty() && written == 0 {
            return Ok(None);
        }
        let (root, part_type, relation, name) = if footer {
            self.footers += 1;
            ("ftr", content_type::FOOTER, rel_type::FOOTER, format!("footer{}.xml", self.footers))
        } else {
            self.headers += 1;
            ("hdr", content_type::HEADER, rel_type::HEADER, format!("header{}.xml", self.headers))
        };

        let mut xml = String::with_capacity(1024);
        xml.push_str(XML_DECL);
        xml.push_str(&format!(r#"<w:{root} xmlns:w="{WML_NS}" xmlns:r="{REL_NS}">"#));
        if paragraphs.is_empty() {
            xml.push_str("<w:p/>");
        }
        for (p, para) in paragraphs.iter().enumerate() {
            self.write_paragraph(&mut xml, para, &format!("{path}/paragraph[{p}]"))?;
        }
        xml.push_str(&format!("</w:{root}>"));

        let id = self.next_rel_id();
        self.package.add(format!("word/{name}"), part_type, xml);
        self.rels.push(Relationship { id: id.clone(), rel_type: relation, target: name });
        Ok(Some(id))
    }

    fn write_section(&mut self, body: &mut String, index: usize, section: &'a Section, last: bool) -> Result<(), Error> {
        let path = format!("section[{index}]");
        let refs = SectionRefs {
            header: self.write_header_footer(&section.header, false, &format!("{path}/header"))?,
            footer: self.write_header_footer(&section.footer, true, &format!("{path}/footer"))?,
        };

        for (b, block) in section.children.iter().enumerate() {
            let block_path = format!("{path}/body[{b}]");
            match block {
                Block::Paragraph(para) => self.write_paragraph(body, para, &block_path)?,
                Block::Table(table) => self.write_table(body, table, &format!("{block_path}/table"))?,
            }
        }

        let sect_pr = section_properties(&section.page, &refs);
        if last {
            body.push_str(&sect_pr);
        } else {
            // a section other than the last ends with a paragraph carrying its sectPr
            body.push_str(&format!("<w:p><w:pPr>{sect_pr}</w:pPr></w:p>"));
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>, Error> {
        let doc = self.doc;

        let id = self.next_rel_id();
        self.rels.push(Relationship { id, rel_type: rel_type::STYLES, target: "styles.xml".into() });
        if !doc.numbering.is_empty() {
            let id = self.next_rel_id();
            self.rels.push(Relationship { id, rel_type: rel_type::NUMBERING, target: "numbering.xml".into() });
        }

        let mut body = String::with_capacity(16 * 1024);
        let count = doc.sections.len();
        for (index, section) in doc.sections.iter().enumerate() {
            self.write_section(&mut body, index, section, index + 1 == count)?;
        }
        if doc.sections.is_empty() {
            // Word refuses a body without a paragraph
            body.push_str("<w:p/>");
            body.push_str(&section_properties(&PageGeometry::default(), &SectionRefs::default()));
        }

        let mut document = String::with_capacity(body.len() + 256);
        document.push_str(XML_DECL);
        document.push_str(&format!(r#"<w:document xmlns:w="{WML_NS}" xmlns:r="{REL_NS}"><w:body>"#));
        document.push_str(&body);
        document.push_str("</w:body></w:document>");

        let mut package = Package::default();
        package.add(
            "_rels/.rels",
            content_type::RELATIONSHIPS,
            relationships_xml(&[
                Relationship {
                    id: "rId1".into(),
                    rel_type: rel_type::OFFICE_DOCUMENT,
                    target: "word/document.xml".into(),
                },
                Relationship {
                    id: "rId2".into(),
                    rel_type: rel_type::CORE_PROPERTIES,
                    target: "docProps/core.xml".into(),
                },
            ]),
        );
        package.add("docProps/core.xml", content_type::CORE_PROPERTIES, core_xml(&doc.properties));
        package.add("word/document.xml", content_type::DOCUMENT, document);
        package.add("word/styles.xml", content_type::STYLES, styles::styles_xml(&doc.styles));
        if !doc.numbering.is_empty() {
            package.add(
                "word/numbering.xml",
                content_type::NUMBERING,
                numbering::numbering_xml(&doc.numbering),
            );
        }
        package.extend(self.package);
        package.add("word/_rels/document.xml.rels", content_type::RELATIONSHIPS, relationships_xml(&self.rels));

        package.finish()
    }
}

fn section_properties(page: &PageGeometry, refs: &SectionRefs) -> String {
    let mut xml = String::from("<w:sectPr>");
    if let Some(id) = &refs.header {
        xml.push_str(&format!(r#"<w:headerReference w:type="default" r:id="{id}"/>"#));
    }
    if let Some(id) = &refs.footer {
        xml.push_str(&format!(r#"<w:footerReference w:type="default" r:id="{id}"/>"#));
    }
    xml.push_str(&format!(r#"<w:pgSz w:w="{}" w:h="{}"/>"#, page.width, page.height));
    xml.push_str(&format!(
        r#"<w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="{}" w:footer="{}" w:gutter="0"/>"#,
        page.margin_top,
        page.margin_right,
        page.margin_bottom,
        page.margin_left,
        page.header_distance,
        page.footer_distance
    ));
    xml.push_str("</w:sectPr>");
    xml
}

/// Core properties without timestamps, so repeated runs stay byte-identical.
fn core_xml(props: &CoreProperties) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties""#,
        r#" xmlns:dc="http://purl.org/dc/elements/1.1/""#,
        r#" xmlns:dcterms="http://purl.org/dc/terms/""#,
        r#" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
    ));
    let fields = [
        ("dc:title", &props.title),
        ("dc:subject", &props.subject),
        ("dc:creator", &props.creator),
        ("dc:description", &props.description),
    ];
    for (tag, value) in fields {
        if let Some(value) = value {
            xml.push_str(&format!("<{tag}>{}</{tag}>", escape(value)));
        }
    }
    xml.push_str("</cp:coreProperties>");
    xml
}

/// Serialize a document into a `.docx` package.
///
/// Either the whole package comes back or the first structural problem does,
/// wrapped in [`Error::Serialization`] with the path of the offending node.
pub fn serialize(doc: &Document) -> Result<Vec<u8>, Error> {
    for style in doc.styles.styles() {
        doc.styles
            .validate_style(&style.id)
            .map_err(|e| e.at(&format!("styles/{}", style.id)))?;
    }
    let writer = DocxWriter::new(doc);
    writer.numbering.validate()?;
    let bytes = writer.finish()?;
    log::debug!(
        "serialized {} section(s) into {} bytes",
        doc.sections.len(),
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_properties_reference_margins() {
        let refs = SectionRefs { header: Some("rId3".into()), footer: None };
        let xml = section_properties(&PageGeometry::default(), &refs);
        assert!(xml.starts_with(r#"<w:sectPr><w:headerReference w:type="default" r:id="rId3"/><w:pgSz w:w="11906" w:h="16838"/>"#));
        assert!(xml.contains(r#"w:header="708" w:footer="708" w:gutter="0""#));
        assert!(!xml.contains("footerReference"));
    }

    #[test]
    fn core_properties_are_escaped_and_undated() {
        let xml = core_xml(&CoreProperties {
            title: Some("Q&A".into()),
            ..CoreProperties::default()
        });
        assert!(xml.contains("<dc:title>Q&amp;A</dc:title>"));
        assert!(!xml.contains("dc:creator"));
        assert!(!xml.contains("dcterms:created"));
    }

    #[test]
    fn empty_document_still_has_a_body() {
        let bytes = serialize(&Document::default()).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        let mut body = String::new();
        std::io::Read::read_to_string(&mut archive.by_name("word/document.xml").unwrap(), &mut body).unwrap();
        assert!(body.contains("<w:body><w:p/><w:sectPr>"));
    }
}
