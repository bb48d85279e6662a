//! Live fields. Nothing here computes a page number: the consumer evaluates
//! the instruction every time it lays the document out.

use crate::docx::xml::escape;
use crate::error::Error;
use crate::model::{Field, Inline};

impl Field {
    pub fn instruction(self) -> &'static str {
        match self {
            Field::CurrentPage => "PAGE",
            Field::TotalPages => "NUMPAGES",
            Field::SectionPages => "SECTIONPAGES",
        }
    }

    /// Stand-in used by the plain-text preview.
    pub fn placeholder(self) -> &'static str {
        match self {
            Field::CurrentPage => "{PAGE}",
            Field::TotalPages => "{NUMPAGES}",
            Field::SectionPages => "{SECTIONPAGES}",
        }
    }
}

/// Fields may only live inside a run, where they pick up its formatting.
pub fn check_placement(inline: &Inline) -> Result<(), Error> {
    match inline {
        Inline::Field(_) => Err(Error::MisplacedField),
        Inline::Run(_) | Inline::PageBreak => Ok(()),
    }
}

/// Append a complex field: begin, instruction, separate, end. Every piece
/// sits in its own run carrying `rpr`. No cached result is written so the
/// consumer has nothing stale to show.
pub(crate) fn write_field(xml: &mut String, field: Field, rpr: &str) {
    let instruction = escape(field.instruction());
    xml.push_str(&format!(
        r#"<w:r>{rpr}<w:fldChar w:fldCharType="begin" w:dirty="true"/></w:r>"#
    ));
    xml.push_str(&format!(
        r#"<w:r>{rpr}<w:instrText xml:space="preserve"> {instruction} </w:instrText></w:r>"#
    ));
    xml.push_str(&format!(
        r#"<w:r>{rpr}<w:fldChar w:fldCharType="separate"/></w:r>"#
    ));
    xml.push_str(&format!(r#"<w:r>{rpr}<w:fldChar w:fldCharType="end"/></w:r>"#));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Run;

    #[test]
    fn field_is_deferred_not_literal() {
        let mut xml = String::new();
        write_field(&mut xml, Field::TotalPages, "<w:rPr><w:sz w:val=\"20\"/></w:rPr>");
        assert!(xml.contains(r#"w:fldCharType="begin""#));
        assert!(xml.contains("> NUMPAGES <"));
        assert!(xml.contains(r#"w:fldCharType="separate""#));
        assert!(xml.ends_with(r#"<w:fldChar w:fldCharType="end"/></w:r>"#));
        assert_eq!(xml.matches("<w:r>").count(), 4);
        assert_eq!(xml.matches(r#"<w:sz w:val="20"/>"#).count(), 4);
        assert!(!xml.contains("<w:t>"));
    }

    #[test]
    fn bare_field_is_misplaced() {
        assert!(matches!(
            check_placement(&Inline::Field(Field::CurrentPage)),
            Err(Error::MisplacedField)
        ));
        assert!(check_placement(&Inline::Run(Run::field(Field::CurrentPage))).is_ok());
        assert!(check_placement(&Inline::PageBreak).is_ok());
    }

    #[test]
    fn instructions() {
        assert_eq!(Field::CurrentPage.instruction(), "PAGE");
        assert_eq!(Field::SectionPages.placeholder(), "{SECTIONPAGES}");
    }
}
