// ─────────────────────────────────────────────────────────────────────
// MtxGen — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use std::path::PathBuf;

use thiserror::Error;

/// Root error type for all MtxGen failures.
#[derive(Error, Debug)]
pub enum MtxGenError {
    /// Underlying filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed exchange-format file.
    #[error("parse error in {}{}: {cause}", .file.display(), line_suffix(.line))]
    Parse {
        file: PathBuf,
        line: Option<usize>,
        cause: String,
    },

    /// Matrix construction with inconsistent dimensions.
    #[error("shape error: {0}")]
    Shape(String),

    /// Expansion requested from a source with a zero dimension.
    #[error("cannot scale a {rows}x{cols} source: scale factor undefined")]
    EmptySource { rows: usize, cols: usize },

    /// A weighted descriptor key is absent from one of the compared sets.
    #[error("descriptor '{key}' missing from {side} set")]
    MissingDescriptor { key: String, side: &'static str },

    /// A weighted descriptor is defined on one side only.
    #[error("descriptor '{key}' is undefined in exactly one of the compared sets")]
    UndefinedDescriptor { key: String },

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Numerical error (NaN/Inf in computation).
    #[error("numerical error: {0}")]
    Numerical(String),
}

pub type MtxGenResult<T> = Result<T, MtxGenError>;

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" (line {l})")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_with_line() {
        let err = MtxGenError::Parse {
            file: PathBuf::from("a.mtx"),
            line: Some(3),
            cause: "bad entry".into(),
        };
        assert_eq!(err.to_string(), "parse error in a.mtx (line 3): bad entry");
    }

    #[test]
    fn test_parse_error_without_line() {
        let err = MtxGenError::Parse {
            file: PathBuf::from("a.mtx"),
            line: None,
            cause: "empty file".into(),
        };
        assert_eq!(err.to_string(), "parse error in a.mtx: empty file");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: MtxGenError = io.into();
        assert!(matches!(err, MtxGenError::Io(_)));
    }
}
