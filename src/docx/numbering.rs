use crate::model::{Alignment, NumberingDefinition};

use super::xml::{WML_NS, XML_DECL, escape};

/// `w:numId` for a definition: its 1-based registration position.
pub(super) fn num_id(definitions: &[NumberingDefinition], reference: &str) -> Option<usize> {
    definitions
        .iter()
        .position(|d| d.reference == reference)
        .map(|i| i + 1)
}

/// `word/numbering.xml`: one abstract definition and one instance per
/// numbering definition, so separate definitions never share counters.
pub(super) fn numbering_xml(definitions: &[NumberingDefinition]) -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<w:numbering xmlns:w="{WML_NS}">"#));

    for (index, def) in definitions.iter().enumerate() {
        let multi = if def.levels.len() > 1 { "multilevel" } else { "singleLevel" };
        xml.push_str(&format!(
            r#"<w:abstractNum w:abstractNumId="{index}"><w:multiLevelType w:val="{multi}"/>"#
        ));

        let mut levels: Vec<_> = def.levels.iter().collect();
        levels.sort_by_key(|l| l.level);
        for lvl in levels {
            let jc = match lvl.alignment {
                Alignment::Center => "center",
                Alignment::Right => "right",
                Alignment::Left | Alignment::Justify => "left",
            };
            xml.push_str(&format!(
                concat!(
                    r#"<w:lvl w:ilvl="{}"><w:start w:val="{}"/><w:numFmt w:val="{}"/>"#,
                    r#"<w:lvlRestart w:val="0"/><w:lvlText w:val="{}"/><w:lvlJc w:val="{}"/>"#,
                    r#"<w:pPr><w:ind w:left="{}" w:hanging="{}"/></w:pPr></w:lvl>"#,
                ),
                lvl.level,
                lvl.start,
                lvl.format.as_wml(),
                escape(&lvl.text),
                jc,
                lvl.indent.left,
                lvl.indent.hanging,
            ));
        }
        xml.push_str("</w:abstractNum>");
    }

    for index in 0..definitions.len() {
        xml.push_str(&format!(
            r#"<w:num w:numId="{}"><w:abstractNumId w:val="{index}"/></w:num>"#,
            index + 1
        ));
    }

    xml.push_str("</w:numbering>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NumberingLevel;

    #[test]
    fn each_definition_gets_its_own_instance() {
        let defs = vec![
            NumberingDefinition::new("bullets", vec![NumberingLevel::bullet(0, "\u{2022}")]),
            NumberingDefinition::new("num1", vec![NumberingLevel::decimal(0, "%1.")]),
            NumberingDefinition::new("num2", vec![NumberingLevel::decimal(0, "%1.")]),
        ];
        let xml = numbering_xml(&defs);
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let count = |name: &str| doc.descendants().filter(|n| n.tag_name().name() == name).count();
        assert_eq!(count("abstractNum"), 3);
        assert_eq!(count("num"), 3);
        assert_eq!(count("lvlRestart"), 3);
        assert!(xml.contains(r#"<w:numFmt w:val="bullet"/>"#));
        assert!(xml.contains(r#"<w:num w:numId="3"><w:abstractNumId w:val="2"/></w:num>"#));
        assert_eq!(num_id(&defs, "num2"), Some(3));
        assert_eq!(num_id(&defs, "missing"), None);
    }
}
