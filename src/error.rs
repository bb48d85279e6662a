use std::fmt;

#[derive(Debug)]
pub enum Error {
    UnknownStyle(String),
    CyclicStyle(String),
    UnknownNumbering { reference: String, level: u8 },
    DuplicateNumbering(String),
    LevelOutOfRange { reference: String, level: u8 },
    CounterOverflow { reference: String, level: u8 },
    ColumnOverflow { row: usize, cells: usize, columns: usize },
    EmptyTable,
    EmptyRow(usize),
    /// Column widths whose sum does not fit in a `u32` twip count.
    TableTooWide,
    MisplacedField,
    /// Text holding a character XML 1.0 cannot represent.
    InvalidText(char),
    /// First structural violation met while serializing, with the path of the
    /// offending node (e.g. `section[0]/body[3]/table/row[1]/cell[0]`).
    Serialization { path: String, source: Box<Error> },
    Zip(zip::result::ZipError),
    Io(std::io::Error),
}

impl Error {
    /// The structural violation underneath any `Serialization` wrapper.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Serialization { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn at(self, path: &str) -> Error {
        match self {
            Error::Serialization { .. } | Error::Zip(_) | Error::Io(_) => self,
            other => Error::Serialization {
                path: path.to_string(),
                source: Box::new(other),
            },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownStyle(id) => write!(f, "unknown style id: {id}"),
            Error::CyclicStyle(id) => write!(f, "style chain does not terminate: {id}"),
            Error::UnknownNumbering { reference, level } => {
                write!(f, "unknown numbering definition: {reference} level {level}")
            }
            Error::DuplicateNumbering(reference) => {
                write!(f, "numbering definition registered twice: {reference}")
            }
            Error::LevelOutOfRange { reference, level } => {
                write!(f, "numbering level {level} of {reference} is outside 0..=8")
            }
            Error::CounterOverflow { reference, level } => {
                write!(f, "list counter overflow: {reference} level {level}")
            }
            Error::ColumnOverflow { row, cells, columns } => write!(
                f,
                "row {row} spans {cells} columns but the table declares {columns}"
            ),
            Error::EmptyTable => write!(f, "table has no rows"),
            Error::EmptyRow(row) => write!(f, "table row {row} has no cells"),
            Error::TableTooWide => write!(f, "table column widths overflow"),
            Error::MisplacedField => write!(f, "field marker outside of a run"),
            Error::InvalidText(c) => {
                write!(f, "text contains U+{:04X}, which XML cannot carry", u32::from(*c))
            }
            Error::Serialization { path, source } => {
                write!(f, "cannot serialize document at {path}: {source}")
            }
            Error::Zip(e) => write!(f, "ZIP error: {e}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Serialization { source, .. } => Some(source.as_ref()),
            Error::Zip(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::Zip(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_wraps_structural_errors_once() {
        let err = Error::EmptyTable.at("section[0]/body[2]/table");
        let err = err.at("section[0]");
        match &err {
            Error::Serialization { path, source } => {
                assert_eq!(path, "section[0]/body[2]/table");
                assert!(matches!(**source, Error::EmptyTable));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(err.root_cause(), Error::EmptyTable));
        assert_eq!(
            err.to_string(),
            "cannot serialize document at section[0]/body[2]/table: table has no rows"
        );
    }
}
