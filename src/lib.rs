mod docx;
mod error;
mod field;
mod model;
mod numbering;
mod style;
mod table;
mod text;

pub use docx::serialize;
pub use error::Error;
pub use field::check_placement;
pub use model::*;
pub use numbering::{ListLabel, MAX_LEVEL, NumberingEngine};
pub use style::{DocumentDefaults, EffectiveProperties, NORMAL_STYLE_ID, ResolvedStyles, StyleRegistry};
pub use table::{ResolvedCell, ResolvedRow, ResolvedTable, layout};
pub use text::render_text;

use std::path::Path;

/// Serialize `doc` and write the package to `output`.
pub fn write_docx(doc: &Document, output: &Path) -> Result<(), Error> {
    let bytes = serialize(doc)?;
    std::fs::write(output, bytes).map_err(Error::Io)
}
