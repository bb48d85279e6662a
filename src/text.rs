//! Plain-text preview of a document.
//!
//! Runs the same style and numbering resolution as the serializer, so list
//! labels and heading levels come out exactly as a word processor would show
//! them. Fields appear as `{PAGE}`-style placeholders.

use crate::docx::xml::check_text;
use crate::error::Error;
use crate::field::check_placement;
use crate::model::{Block, Document, Inline, Paragraph, RunContent, Table};
use crate::numbering::NumberingEngine;
use crate::style::ResolvedStyles;
use crate::table::layout;

struct TextWriter<'a> {
    styles: ResolvedStyles<'a>,
    numbering: NumberingEngine<'a>,
    out: String,
}

impl<'a> TextWriter<'a> {
    fn paragraph_text(&mut self, para: &'a Paragraph, path: &str) -> Result<String, Error> {
        let outline = self
            .styles
            .paragraph(para.style.as_deref())
            .map_err(|e| e.at(path))?
            .outline_level();

        let mut line = String::new();
        if let Some(level) = outline {
            line.push_str(&"#".repeat(usize::from(level) + 1));
            line.push(' ');
        }
        if let Some(num) = &para.numbering {
            let label = self
                .numbering
                .next(&num.reference, num.level)
                .map_err(|e| e.at(path))?;
            line.push_str(&"  ".repeat(usize::from(num.level)));
            line.push_str(&label.text);
            line.push(' ');
        }
        for (i, inline) in para.children.iter().enumerate() {
            check_placement(inline).map_err(|e| e.at(&format!("{path}/inline[{i}]")))?;
            let Inline::Run(run) = inline else {
                continue;
            };
            if let Some(id) = run.style.as_deref() {
                self.styles
                    .resolve(id)
                    .map_err(|e| e.at(&format!("{path}/run[{i}]")))?;
            }
            for content in &run.content {
                match content {
                    RunContent::Text(text) => {
                        check_text(text).map_err(|e| e.at(&format!("{path}/run[{i}]")))?;
                        line.push_str(text);
                    }
                    RunContent::Field(field) => line.push_str(field.placeholder()),
                }
            }
        }
        Ok(line)
    }

    fn paragraph(&mut self, para: &'a Paragraph, path: &str) -> Result<(), Error> {
        let line = self.paragraph_text(para, path)?;
        self.out.push_str(line.trim_end());
        self.out.push('\n');
        Ok(())
    }

    fn table(&mut self, table: &'a Table, path: &str) -> Result<(), Error> {
        let resolved = layout(table).map_err(|e| e.at(path))?;
        for (r, row) in resolved.rows.iter().enumerate() {
            let mut cells = Vec::with_capacity(row.cells.len());
            for (c, cell) in row.cells.iter().enumerate() {
                let mut parts = Vec::with_capacity(cell.children.len());
                for (p, para) in cell.children.iter().enumerate() {
                    let text = self.paragraph_text(para, &format!("{path}/row[{r}]/cell[{c}]/paragraph[{p}]"))?;
                    parts.push(text);
                }
                cells.push(parts.join(" "));
            }
            self.out.push_str(cells.join(" | ").trim_end());
            self.out.push('\n');
        }
        Ok(())
    }

    fn margin(&mut self, tag: &str, paragraphs: &'a [Paragraph], path: &str) -> Result<(), Error> {
        for (p, para) in paragraphs.iter().enumerate() {
            let text = self.paragraph_text(para, &format!("{path}/paragraph[{p}]"))?;
            self.out.push_str(&format!("[{tag}] {}\n", text.trim_end()));
        }
        Ok(())
    }
}

/// Render `doc` as plain text. Fails on the same malformed input
/// [`serialize`](crate::serialize) rejects.
pub fn render_text(doc: &Document) -> Result<String, Error> {
    let mut writer = TextWriter {
        styles: ResolvedStyles::new(&doc.styles),
        numbering: NumberingEngine::new(&doc.numbering),
        out: String::new(),
    };
    writer.numbering.validate()?;

    for (index, section) in doc.sections.iter().enumerate() {
        let path = format!("section[{index}]");
        if index > 0 {
            writer.out.push_str("---\n");
        }
        writer.margin("header", &section.header, &format!("{path}/header"))?;
        for (b, block) in section.children.iter().enumerate() {
            match block {
                Block::Paragraph(para) => writer.paragraph(para, &format!("{path}/body[{b}]"))?,
                Block::Table(table) => writer.table(table, &format!("{path}/body[{b}]/table"))?,
            }
        }
        writer.margin("footer", &section.footer, &format!("{path}/footer"))?;
    }
    Ok(writer.out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Field, HeadingLevel, NumberingDefinition, NumberingLevel, ParagraphProperties, Run, Section,
        Style, TableCell, TableRow,
    };
    use crate::style::StyleRegistry;

    fn styles() -> StyleRegistry {
        StyleRegistry::default().with_style(Style::paragraph("Heading1", "Heading 1").with_paragraph(
            ParagraphProperties {
                outline_level: Some(0),
                ..ParagraphProperties::default()
            },
        ))
    }

    #[test]
    fn headings_lists_and_fields() {
        let doc = Document::new(styles())
            .add_numbering(NumberingDefinition::new("steps", vec![NumberingLevel::decimal(0, "%1.")]))
            .add_section(
                Section::new()
                    .with_footer(vec![
                        Paragraph::new()
                            .add_run(Run::text("Page ").then_field(Field::CurrentPage))
                            .add_run(Run::text(" of ").then_field(Field::TotalPages)),
                    ])
                    .add_paragraph(Paragraph::heading(HeadingLevel::Heading1, "Setup"))
                    .add_paragraph(Paragraph::with_text("Install").numbered("steps", 0))
                    .add_paragraph(Paragraph::with_text("Run").numbered("steps", 0)),
            );
        let text = render_text(&doc).unwrap();
        assert_eq!(text, "# Setup\n1. Install\n2. Run\n[footer] Page {PAGE} of {NUMPAGES}\n");
    }

    #[test]
    fn table_rows_are_pipe_joined() {
        let table = Table::new(vec![2800, 6560])
            .add_row(TableRow::header(vec![TableCell::with_text("Component"), TableCell::with_text("Purpose")]))
            .add_row(TableRow::from_cells(vec![TableCell::with_text("S3"), TableCell::with_text("Storage")]));
        let doc = Document::default().add_section(Section::new().add_table(table));
        assert_eq!(render_text(&doc).unwrap(), "Component | Purpose\nS3 | Storage\n");
    }

    #[test]
    fn sections_are_separated_and_errors_carry_paths() {
        let doc = Document::default()
            .add_section(Section::new().add_paragraph(Paragraph::with_text("one")))
            .add_section(Section::new().add_paragraph(Paragraph::with_text("two")));
        assert_eq!(render_text(&doc).unwrap(), "one\n---\ntwo\n");

        let doc = Document::default().add_section(
            Section::new().add_paragraph(Paragraph::with_text("x").with_style("Nope")),
        );
        match render_text(&doc) {
            Err(Error::Serialization { path, source }) => {
                assert_eq!(path, "section[0]/body[0]");
                assert!(matches!(*source, Error::UnknownStyle(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
