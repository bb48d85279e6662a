use crate::error::Error;
use crate::model::{CellBorders, Paragraph, Shading, Table};

/// A table with widths applied and header rows settled.
#[derive(Debug)]
pub struct ResolvedTable<'a> {
    pub column_widths: &'a [u32],
    pub rows: Vec<ResolvedRow<'a>>,
    total_width: u32,
}

impl ResolvedTable<'_> {
    pub fn total_width(&self) -> u32 {
        self.total_width
    }

    pub fn header_rows(&self) -> usize {
        self.rows.iter().take_while(|r| r.repeat_header).count()
    }
}

#[derive(Debug)]
pub struct ResolvedRow<'a> {
    pub cells: Vec<ResolvedCell<'a>>,
    /// Repeat at the top of every continuation page.
    pub repeat_header: bool,
    /// Declared columns the row leaves unfilled at its end.
    pub grid_after: usize,
}

#[derive(Debug)]
pub struct ResolvedCell<'a> {
    pub width: u32, // twips
    pub span: usize,
    pub first_column: usize,
    pub borders: &'a CellBorders,
    pub shading: Option<&'a Shading>,
    pub children: &'a [Paragraph],
}

pub fn layout(table: &Table) -> Result<ResolvedTable<'_>, Error> {
    if table.rows.is_empty() {
        return Err(Error::EmptyTable);
    }
    // every cell width is a partial sum of this one, so checking it once is enough
    let total_width = table
        .column_widths
        .iter()
        .try_fold(0u32, |sum, w| sum.checked_add(*w))
        .ok_or(Error::TableTooWide)?;
    let columns = table.column_widths.len();
    let mut rows = Vec::with_capacity(table.rows.len());
    let mut in_header = true;

    for (row_index, row) in table.rows.iter().enumerate() {
        if row.cells.is_empty() {
            return Err(Error::EmptyRow(row_index));
        }
        let spanned: usize = row.cells.iter().map(|c| usize::from(c.column_span.max(1))).sum();
        if spanned > columns {
            return Err(Error::ColumnOverflow { row: row_index, cells: spanned, columns });
        }

        let repeat_header = row.is_header && in_header;
        if row.is_header && !in_header {
            log::warn!("header row {row_index} follows body rows; it will not repeat across pages");
        }
        in_header = repeat_header;

        let mut column = 0;
        let cells = row
            .cells
            .iter()
            .map(|cell| {
                let span = usize::from(cell.column_span.max(1));
                let width = table.column_widths[column..column + span].iter().sum();
                let resolved = ResolvedCell {
                    width,
                    span,
                    first_column: column,
                    borders: &cell.borders,
                    shading: cell.shading.as_ref(),
                    children: &cell.children,
                };
                column += span;
                resolved
            })
            .collect();

        rows.push(ResolvedRow { cells, repeat_header, grid_after: columns - spanned });
    }

    Ok(ResolvedTable { column_widths: &table.column_widths, rows, total_width })
}
