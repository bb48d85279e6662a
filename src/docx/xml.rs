use std::borrow::Cow;

use crate::error::Error;
use crate::model::{ParagraphProperties, RunProperties};

pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub(crate) const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Characters allowed by the XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}

/// Reject body text XML cannot carry, so the caller can report where it came from.
pub(crate) fn check_text(text: &str) -> Result<(), Error> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(Error::InvalidText(c)),
        None => Ok(()),
    }
}

/// Escape markup characters. Characters XML cannot carry at all are dropped,
/// so names and properties never make a part unreadable.
pub(crate) fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) && s.chars().all(is_xml_char) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if !is_xml_char(c) => {}
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn on_off(xml: &mut String, tag: &str, value: Option<bool>) {
    match value {
        Some(true) => xml.push_str(&format!("<w:{tag}/>")),
        Some(false) => xml.push_str(&format!(r#"<w:{tag} w:val="0"/>"#)),
        None => {}
    }
}

/// Child elements of `w:rPr`, in schema order. `style` becomes `w:rStyle`.
pub(crate) fn run_properties(style: Option<&str>, props: &RunProperties) -> String {
    let mut xml = String::new();
    if let Some(id) = style {
        xml.push_str(&format!(r#"<w:rStyle w:val="{}"/>"#, escape(id)));
    }
    if let Some(font) = &props.font {
        let font = escape(font);
        xml.push_str(&format!(
            r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}" w:eastAsia="{font}"/>"#
        ));
    }
    on_off(&mut xml, "b", props.bold);
    on_off(&mut xml, "bCs", props.bold);
    on_off(&mut xml, "i", props.italic);
    on_off(&mut xml, "iCs", props.italic);
    if let Some(color) = &props.color {
        xml.push_str(&format!(r#"<w:color w:val="{}"/>"#, escape(color)));
    }
    if let Some(size) = props.size {
        xml.push_str(&format!(r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#));
    }
    match props.underline {
        Some(true) => xml.push_str(r#"<w:u w:val="single"/>"#),
        Some(false) => xml.push_str(r#"<w:u w:val="none"/>"#),
        None => {}
    }
    xml
}

/// `<w:rPr>` wrapper, or nothing when there is nothing to say.
pub(crate) fn rpr(style: Option<&str>, props: &RunProperties) -> String {
    let inner = run_properties(style, props);
    if inner.is_empty() {
        String::new()
    } else {
        format!("<w:rPr>{inner}</w:rPr>")
    }
}

/// Spacing, indentation, alignment and outline level, in schema order.
/// Style and numbering references come before these and are written by the caller.
pub(crate) fn paragraph_properties(props: &ParagraphProperties) -> String {
    let mut xml = String::new();
    if props.space_before.is_some() || props.space_after.is_some() {
        xml.push_str("<w:spacing");
        if let Some(before) = props.space_before {
            xml.push_str(&format!(r#" w:before="{before}""#));
        }
        if let Some(after) = props.space_after {
            xml.push_str(&format!(r#" w:after="{after}""#));
        }
        xml.push_str("/>");
    }
    if let Some(indent) = props.indent {
        xml.push_str(&format!(
            r#"<w:ind w:left="{}" w:hanging="{}"/>"#,
            indent.left, indent.hanging
        ));
    }
    if let Some(alignment) = props.alignment {
        xml.push_str(&format!(r#"<w:jc w:val="{}"/>"#, alignment.as_wml()));
    }
    if let Some(level) = props.outline_level {
        xml.push_str(&format!(r#"<w:outlineLvl w:val="{level}"/>"#));
    }
    xml
}

/// Literal text as one or more runs. Tabs and newlines become `w:tab` / `w:br`.
pub(crate) fn write_text(xml: &mut String, text: &str, rpr: &str) {
    xml.push_str("<w:r>");
    xml.push_str(rpr);
    let mut pieces = text.split(['\t', '\n']).peekable();
    let mut rest = text;
    while let Some(piece) = pieces.next() {
        if !piece.is_empty() {
            xml.push_str(&format!(
                r#"<w:t xml:space="preserve">{}</w:t>"#,
                escape(piece)
            ));
        }
        rest = &rest[piece.len()..];
        if pieces.peek().is_some() {
            match rest.chars().next() {
                Some('\t') => xml.push_str("<w:tab/>"),
                Some('\n') => xml.push_str("<w:br/>"),
                _ => {}
            }
            rest = &rest[1..];
        }
    }
    xml.push_str("</w:r>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, Indent};

    #[test]
    fn escaping() {
        assert!(matches!(escape("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape(r#"{ a < b & "c" }"#), "{ a &lt; b &amp; &quot;c&quot; }");
        assert_eq!(escape("Q1\u{1}\u{FFFE} report"), "Q1 report");
    }

    #[test]
    fn control_characters_are_rejected_in_text() {
        assert!(check_text("tab\tline\nreturn\r").is_ok());
        assert!(matches!(check_text("a\u{1}b"), Err(Error::InvalidText('\u{1}'))));
        assert!(matches!(check_text("\u{FFFF}"), Err(Error::InvalidText('\u{FFFF}'))));
    }

    #[test]
    fn run_properties_in_schema_order() {
        let props = RunProperties::default().font("Arial").bold().color("666666").size(20).italic();
        let xml = run_properties(Some("Strong"), &props);
        let order = ["rStyle", "rFonts", "<w:b/>", "<w:i/>", "color", "<w:sz "];
        let positions: Vec<usize> = order.iter().map(|t| xml.find(t).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{xml}");
        assert_eq!(rpr(None, &RunProperties::default()), "");
    }

    #[test]
    fn paragraph_properties_output() {
        let props = ParagraphProperties {
            alignment: Some(Alignment::Justify),
            space_before: Some(240),
            space_after: None,
            outline_level: Some(1),
            indent: Some(Indent { left: 720, hanging: 360 }),
        };
        assert_eq!(
            paragraph_properties(&props),
            r#"<w:spacing w:before="240"/><w:ind w:left="720" w:hanging="360"/><w:jc w:val="both"/><w:outlineLvl w:val="1"/>"#
        );
    }

    #[test]
    fn text_with_tabs_and_breaks() {
        let mut xml = String::new();
        write_text(&mut xml, "a\tb\nc", "");
        assert_eq!(
            xml,
            r#"<w:r><w:t xml:space="preserve">a</w:t><w:tab/><w:t xml:space="preserve">b</w:t><w:br/><w:t xml:space="preserve">c</w:t></w:r>"#
        );
    }
}
