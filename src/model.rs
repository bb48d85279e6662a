use serde::{Deserialize, Serialize};

use crate::style::StyleRegistry;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub(crate) fn as_wml(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }
}

/// Left and hanging indentation in twips.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Indent {
    pub left: u32,
    pub hanging: u32,
}

/// Character formatting. Every field is optional; `None` inherits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunProperties {
    pub font: Option<String>,
    pub size: Option<u32>, // half-points
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub color: Option<String>, // RRGGBB
}

impl RunProperties {
    pub fn is_empty(&self) -> bool {
        *self == RunProperties::default()
    }

    /// Overlay `other` on top of `self`: every property `other` sets wins.
    pub fn merge(&mut self, other: &RunProperties) {
        if other.font.is_some() {
            self.font.clone_from(&other.font);
        }
        if other.size.is_some() {
            self.size = other.size;
        }
        if other.bold.is_some() {
            self.bold = other.bold;
        }
        if other.italic.is_some() {
            self.italic = other.italic;
        }
        if other.underline.is_some() {
            self.underline = other.underline;
        }
        if other.color.is_some() {
            self.color.clone_from(&other.color);
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = Some(true);
        self
    }

    pub fn size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }

    pub fn color(mut self, rgb: impl Into<String>) -> Self {
        self.color = Some(rgb.into());
        self
    }

    pub fn font(mut self, family: impl Into<String>) -> Self {
        self.font = Some(family.into());
        self
    }
}

/// Paragraph formatting. Every field is optional; `None` inherits.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParagraphProperties {
    pub alignment: Option<Alignment>,
    pub space_before: Option<u32>, // twips
    pub space_after: Option<u32>,  // twips
    pub outline_level: Option<u8>,
    pub indent: Option<Indent>,
}

impl ParagraphProperties {
    pub fn is_empty(&self) -> bool {
        *self == ParagraphProperties::default()
    }

    pub fn merge(&mut self, other: &ParagraphProperties) {
        if other.alignment.is_some() {
            self.alignment = other.alignment;
        }
        if other.space_before.is_some() {
            self.space_before = other.space_before;
        }
        if other.space_after.is_some() {
            self.space_after = other.space_after;
        }
        if other.outline_level.is_some() {
            self.outline_level = other.outline_level;
        }
        if other.indent.is_some() {
            self.indent = other.indent;
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleKind {
    #[default]
    Paragraph,
    Character,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: StyleKind,
    #[serde(default)]
    pub based_on: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub quick_format: bool,
    #[serde(default)]
    pub run: RunProperties,
    #[serde(default)]
    pub paragraph: ParagraphProperties,
}

impl Style {
    pub fn paragraph(id: impl Into<String>, name: impl Into<String>) -> Self {
        Style {
            id: id.into(),
            name: name.into(),
            kind: StyleKind::Paragraph,
            based_on: None,
            next: None,
            quick_format: false,
            run: RunProperties::default(),
            paragraph: ParagraphProperties::default(),
        }
    }

    pub fn character(id: impl Into<String>, name: impl Into<String>) -> Self {
        Style {
            kind: StyleKind::Character,
            ..Style::paragraph(id, name)
        }
    }

    pub fn based_on(mut self, parent: impl Into<String>) -> Self {
        self.based_on = Some(parent.into());
        self
    }

    pub fn next(mut self, style: impl Into<String>) -> Self {
        self.next = Some(style.into());
        self
    }

    pub fn quick_format(mut self) -> Self {
        self.quick_format = true;
        self
    }

    pub fn with_run(mut self, run: RunProperties) -> Self {
        self.run = run;
        self
    }

    pub fn with_paragraph(mut self, paragraph: ParagraphProperties) -> Self {
        self.paragraph = paragraph;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LevelFormat {
    Bullet,
    Decimal,
    LowerLetter,
    UpperLetter,
    LowerRoman,
    UpperRoman,
}

impl LevelFormat {
    pub(crate) fn as_wml(self) -> &'static str {
        match self {
            LevelFormat::Bullet => "bullet",
            LevelFormat::Decimal => "decimal",
            LevelFormat::LowerLetter => "lowerLetter",
            LevelFormat::UpperLetter => "upperLetter",
            LevelFormat::LowerRoman => "lowerRoman",
            LevelFormat::UpperRoman => "upperRoman",
        }
    }
}

fn default_start() -> u32 {
    1
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberingLevel {
    pub level: u8,
    pub format: LevelFormat,
    /// Label template: the glyph for bullets, `%1.`-style for counters.
    pub text: String,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub indent: Indent,
    #[serde(default = "default_start")]
    pub start: u32,
}

impl NumberingLevel {
    pub fn bullet(level: u8, glyph: impl Into<String>) -> Self {
        NumberingLevel {
            level,
            format: LevelFormat::Bullet,
            text: glyph.into(),
            alignment: Alignment::Left,
            indent: Indent { left: 720 * (u32::from(level) + 1), hanging: 360 },
            start: 1,
        }
    }

    pub fn decimal(level: u8, template: impl Into<String>) -> Self {
        NumberingLevel {
            format: LevelFormat::Decimal,
            ..NumberingLevel::bullet(level, template)
        }
    }

    pub fn with_indent(mut self, left: u32, hanging: u32) -> Self {
        self.indent = Indent { left, hanging };
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberingDefinition {
    pub reference: String,
    pub levels: Vec<NumberingLevel>,
}

impl NumberingDefinition {
    pub fn new(reference: impl Into<String>, levels: Vec<NumberingLevel>) -> Self {
        NumberingDefinition { reference: reference.into(), levels }
    }

    pub fn level(&self, level: u8) -> Option<&NumberingLevel> {
        self.levels.iter().find(|l| l.level == level)
    }
}

/// Live values the consuming word processor computes at display time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    CurrentPage,
    TotalPages,
    SectionPages,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunContent {
    Text(String),
    Field(Field),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    #[serde(default)]
    pub content: Vec<RunContent>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub format: RunProperties,
}

impl Run {
    pub fn text(text: impl Into<String>) -> Self {
        Run {
            content: vec![RunContent::Text(text.into())],
            ..Run::default()
        }
    }

    pub fn field(field: Field) -> Self {
        Run {
            content: vec![RunContent::Field(field)],
            ..Run::default()
        }
    }

    pub fn then_text(mut self, text: impl Into<String>) -> Self {
        self.content.push(RunContent::Text(text.into()));
        self
    }

    pub fn then_field(mut self, field: Field) -> Self {
        self.content.push(RunContent::Field(field));
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_format(mut self, format: RunProperties) -> Self {
        self.format = format;
        self
    }

    pub fn bold(mut self) -> Self {
        self.format.bold = Some(true);
        self
    }

    pub fn italic(mut self) -> Self {
        self.format.italic = Some(true);
        self
    }

    pub fn size(mut self, half_points: u32) -> Self {
        self.format.size = Some(half_points);
        self
    }

    pub fn color(mut self, rgb: impl Into<String>) -> Self {
        self.format.color = Some(rgb.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Inline {
    Run(Run),
    PageBreak,
    /// Only valid inside a run; a bare field here fails serialization.
    Field(Field),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeadingLevel {
    Title,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
}

impl HeadingLevel {
    pub fn style_id(self) -> &'static str {
        match self {
            HeadingLevel::Title => "Title",
            HeadingLevel::Heading1 => "Heading1",
            HeadingLevel::Heading2 => "Heading2",
            HeadingLevel::Heading3 => "Heading3",
            HeadingLevel::Heading4 => "Heading4",
            HeadingLevel::Heading5 => "Heading5",
            HeadingLevel::Heading6 => "Heading6",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberingRef {
    pub reference: String,
    #[serde(default)]
    pub level: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paragraph {
    pub children: Vec<Inline>,
    pub style: Option<String>,
    pub numbering: Option<NumberingRef>,
    pub page_break_after: bool,
    pub alignment: Option<Alignment>,
    pub space_before: Option<u32>,
    pub space_after: Option<u32>,
}

impl Paragraph {
    pub fn new() -> Self {
        Paragraph::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Paragraph::new().add_run(Run::text(text))
    }

    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Paragraph::with_text(text).with_style(level.style_id())
    }

    /// A paragraph holding nothing but a page break.
    pub fn page_break() -> Self {
        Paragraph {
            children: vec![Inline::PageBreak],
            ..Paragraph::default()
        }
    }

    pub fn add_run(mut self, run: Run) -> Self {
        self.children.push(Inline::Run(run));
        self
    }

    pub fn add_inline(mut self, inline: Inline) -> Self {
        self.children.push(inline);
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn numbered(mut self, reference: impl Into<String>, level: u8) -> Self {
        self.numbering = Some(NumberingRef { reference: reference.into(), level });
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn spacing(mut self, before: Option<u32>, after: Option<u32>) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    pub fn break_after(mut self) -> Self {
        self.page_break_after = true;
        self
    }

    /// Direct paragraph formatting layered on top of the paragraph style.
    pub(crate) fn direct_properties(&self) -> ParagraphProperties {
        ParagraphProperties {
            alignment: self.alignment,
            space_before: self.space_before,
            space_after: self.space_after,
            ..ParagraphProperties::default()
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    #[default]
    Single,
    Double,
    Dotted,
    Dashed,
    Thick,
    None,
}

impl BorderStyle {
    pub(crate) fn as_wml(self) -> &'static str {
        match self {
            BorderStyle::Single => "single",
            BorderStyle::Double => "double",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Thick => "thick",
            BorderStyle::None => "nil",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    #[serde(default)]
    pub style: BorderStyle,
    /// Eighths of a point.
    pub size: u32,
    pub color: String,
}

impl Border {
    pub fn single(size: u32, color: impl Into<String>) -> Self {
        Border { style: BorderStyle::Single, size, color: color.into() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellBorders {
    pub top: Option<Border>,
    pub bottom: Option<Border>,
    pub left: Option<Border>,
    pub right: Option<Border>,
}

impl CellBorders {
    pub fn all(border: Border) -> Self {
        CellBorders {
            top: Some(border.clone()),
            bottom: Some(border.clone()),
            left: Some(border.clone()),
            right: Some(border),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.bottom.is_none() && self.left.is_none() && self.right.is_none()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShadingPattern {
    #[default]
    Clear,
    Solid,
}

impl ShadingPattern {
    pub(crate) fn as_wml(self) -> &'static str {
        match self {
            ShadingPattern::Clear => "clear",
            ShadingPattern::Solid => "solid",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shading {
    pub fill: String,
    #[serde(default)]
    pub pattern: ShadingPattern,
}

impl Shading {
    pub fn fill(color: impl Into<String>) -> Self {
        Shading { fill: color.into(), pattern: ShadingPattern::Clear }
    }
}

fn default_span() -> u16 {
    1
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    pub children: Vec<Paragraph>,
    #[serde(default)]
    pub borders: CellBorders,
    #[serde(default)]
    pub shading: Option<Shading>,
    #[serde(default = "default_span")]
    pub column_span: u16,
}

impl TableCell {
    pub fn new(children: Vec<Paragraph>) -> Self {
        TableCell {
            children,
            borders: CellBorders::default(),
            shading: None,
            column_span: 1,
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        TableCell::new(vec![Paragraph::with_text(text)])
    }

    pub fn with_borders(mut self, borders: CellBorders) -> Self {
        self.borders = borders;
        self
    }

    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = Some(shading);
        self
    }

    pub fn span(mut self, columns: u16) -> Self {
        self.column_span = columns;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    #[serde(default)]
    pub is_header: bool,
}

impl TableRow {
    pub fn from_cells(cells: Vec<TableCell>) -> Self {
        TableRow { cells, is_header: false }
    }

    pub fn header(cells: Vec<TableCell>) -> Self {
        TableRow { cells, is_header: true }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub column_widths: Vec<u32>, // twips
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn new(column_widths: Vec<u32>) -> Self {
        Table { column_widths, rows: Vec::new() }
    }

    pub fn add_row(mut self, row: TableRow) -> Self {
        self.rows.push(row);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// Page size and margins in twips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageGeometry {
    pub width: u32,
    pub height: u32,
    pub margin_top: u32,
    pub margin_right: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
    pub header_distance: u32,
    pub footer_distance: u32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        // A4, one-inch margins
        PageGeometry {
            width: 11906,
            height: 16838,
            margin_top: 1440,
            margin_right: 1440,
            margin_bottom: 1440,
            margin_left: 1440,
            header_distance: 708,
            footer_distance: 708,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    pub page: PageGeometry,
    pub header: Vec<Paragraph>,
    pub footer: Vec<Paragraph>,
    pub children: Vec<Block>,
}

impl Section {
    pub fn new() -> Self {
        Section::default()
    }

    pub fn with_page(mut self, page: PageGeometry) -> Self {
        self.page = page;
        self
    }

    pub fn with_header(mut self, header: Vec<Paragraph>) -> Self {
        self.header = header;
        self
    }

    pub fn with_footer(mut self, footer: Vec<Paragraph>) -> Self {
        self.footer = footer;
        self
    }

    pub fn add_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.children.push(Block::Paragraph(paragraph));
        self
    }

    pub fn add_table(mut self, table: Table) -> Self {
        self.children.push(Block::Table(table));
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreProperties {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    pub properties: CoreProperties,
    pub styles: StyleRegistry,
    pub numbering: Vec<NumberingDefinition>,
    pub sections: Vec<Section>,
}

impl Document {
    pub fn new(styles: StyleRegistry) -> Self {
        Document { styles, ..Document::default() }
    }

    pub fn with_properties(mut self, properties: CoreProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn add_numbering(mut self, definition: NumberingDefinition) -> Self {
        self.numbering.push(definition);
        self
    }

    pub fn add_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }
}
