use crate::model::{Style, StyleKind};
use crate::style::{NORMAL_STYLE_ID, StyleRegistry};

use super::xml::{WML_NS, XML_DECL, escape, paragraph_properties, run_properties};

/// `word/styles.xml`: document defaults, then every registered style in
/// registration order. `Normal` is always present and always the default.
pub(super) fn styles_xml(registry: &StyleRegistry) -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<w:styles xmlns:w="{WML_NS}">"#));

    let defaults = registry.defaults();
    xml.push_str("<w:docDefaults>");
    xml.push_str(&format!(
        "<w:rPrDefault><w:rPr>{}</w:rPr></w:rPrDefault>",
        run_properties(None, &defaults.run)
    ));
    xml.push_str(&format!(
        "<w:pPrDefault><w:pPr>{}</w:pPr></w:pPrDefault>",
        paragraph_properties(&defaults.paragraph)
    ));
    xml.push_str("</w:docDefaults>");

    if !registry.has_normal() {
        xml.push_str(&format!(
            r#"<w:style w:type="paragraph" w:default="1" w:styleId="{NORMAL_STYLE_ID}"><w:name w:val="{NORMAL_STYLE_ID}"/><w:qFormat/></w:style>"#
        ));
    }
    for style in registry.styles() {
        write_style(&mut xml, style);
    }

    xml.push_str("</w:styles>");
    xml
}

fn write_style(xml: &mut String, style: &Style) {
    let kind = match style.kind {
        StyleKind::Paragraph => "paragraph",
        StyleKind::Character => "character",
    };
    let default = if style.id == NORMAL_STYLE_ID && style.kind == StyleKind::Paragraph {
        r#" w:default="1""#
    } else {
        ""
    };
    xml.push_str(&format!(
        r#"<w:style w:type="{kind}"{default} w:styleId="{}">"#,
        escape(&style.id)
    ));
    xml.push_str(&format!(r#"<w:name w:val="{}"/>"#, escape(&style.name)));
    if let Some(parent) = &style.based_on {
        xml.push_str(&format!(r#"<w:basedOn w:val="{}"/>"#, escape(parent)));
    }
    if let Some(next) = &style.next {
        xml.push_str(&format!(r#"<w:next w:val="{}"/>"#, escape(next)));
    }
    if style.quick_format {
        xml.push_str("<w:qFormat/>");
    }
    if style.kind == StyleKind::Paragraph && !style.paragraph.is_empty() {
        xml.push_str(&format!("<w:pPr>{}</w:pPr>", paragraph_properties(&style.paragraph)));
    }
    if !style.run.is_empty() {
        xml.push_str(&format!("<w:rPr>{}</w:rPr>", run_properties(None, &style.run)));
    }
    xml.push_str("</w:style>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ParagraphProperties, RunProperties};
    use crate::style::DocumentDefaults;

    #[test]
    fn implicit_normal_and_registered_styles() {
        let registry = StyleRegistry::new(DocumentDefaults {
            run: RunProperties::default().font("Arial").size(24),
            paragraph: ParagraphProperties::default(),
        })
        .with_style(
            Style::paragraph("Heading1", "Heading 1")
                .based_on("Normal")
                .next("Normal")
                .quick_format()
                .with_run(RunProperties::default().size(32).bold())
                .with_paragraph(ParagraphProperties {
                    outline_level: Some(0),
                    ..ParagraphProperties::default()
                }),
        );
        let xml = styles_xml(&registry);
        assert!(xml.contains(r#"<w:rFonts w:ascii="Arial""#));
        assert!(xml.contains(r#"w:default="1" w:styleId="Normal""#));
        assert!(xml.contains(r#"<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="Heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>"#));
        assert!(xml.contains(r#"<w:outlineLvl w:val="0"/>"#));
        assert!(roxmltree::Document::parse(&xml).is_ok());
    }

    #[test]
    fn registered_normal_is_default_once() {
        let registry = StyleRegistry::default().with_style(Style::paragraph("Normal", "Normal"));
        let xml = styles_xml(&registry);
        assert_eq!(xml.matches(r#"w:styleId="Normal""#).count(), 1);
        assert!(xml.contains(r#"w:default="1""#));
    }
}
