// ─────────────────────────────────────────────────────────────────────
// MtxGen — Matrix Market Reader / Writer
// ─────────────────────────────────────────────────────────────────────
//! Matrix Market exchange format.
//!
//! Reader coverage: `matrix coordinate|array`, field
//! `real|integer|pattern`, symmetry `general|symmetric|skew-symmetric`.
//! Complex and hermitian files are rejected. Comment lines of the form
//! `% key: value` ahead of the size line are collected as metadata.
//!
//! The writer always emits `coordinate real general`, 1-indexed.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use mtxgen_types::{Matrix, MtxGenError, MtxGenResult};

/// Placeholder shown for absent metadata fields.
pub const MISSING_FIELD: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFormat {
    Coordinate,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Real,
    Integer,
    Pattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symmetry {
    General,
    Symmetric,
    SkewSymmetric,
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Coordinate => "coordinate",
            Self::Array => "array",
        })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Real => "real",
            Self::Integer => "integer",
            Self::Pattern => "pattern",
        })
    }
}

impl fmt::Display for Symmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::General => "general",
            Self::Symmetric => "symmetric",
            Self::SkewSymmetric => "skew-symmetric",
        })
    }
}

/// `key: value` pairs from the header comments, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; a replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value for `key`, or `-` when absent.
    pub fn field(&self, key: &str) -> &str {
        self.get(key).unwrap_or(MISSING_FIELD)
    }

    pub fn name(&self) -> &str {
        self.field("name")
    }

    pub fn id(&self) -> &str {
        self.field("id")
    }

    pub fn date(&self) -> &str {
        self.field("date")
    }

    pub fn author(&self) -> &str {
        self.field("author")
    }

    pub fn ed(&self) -> &str {
        self.field("ed")
    }

    pub fn kind(&self) -> &str {
        self.field("kind")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Banner fields plus header metadata of a parsed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketHeader {
    pub format: StorageFormat,
    pub field: Field,
    pub symmetry: Symmetry,
    pub metadata: Metadata,
}

/// A parsed exchange file.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketFile {
    pub header: MarketHeader,
    pub matrix: Matrix,
}

/// Matrix Market parser.
#[derive(Debug)]
pub struct MarketParser;

impl MarketParser {
    /// Read and parse a file. The handle is closed before parsing starts.
    pub fn parse_file(path: &Path) -> MtxGenResult<MarketFile> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Parse file content; `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> MtxGenResult<MarketFile> {
        let err = |line: Option<usize>, cause: String| MtxGenError::Parse {
            file: path.to_path_buf(),
            line,
            cause,
        };

        let mut lines = content.lines().enumerate();

        let (banner_num, banner) = lines
            .by_ref()
            .find(|(_, l)| !l.trim().is_empty())
            .ok_or_else(|| err(None, "empty file".into()))?;
        let (format, field, symmetry) = Self::parse_banner(banner.trim(), path, banner_num)?;

        let mut metadata = Metadata::new();
        let mut size_line = None;
        for (line_num, line) in lines.by_ref() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('%') {
                Self::collect_metadata(line, &mut metadata);
                continue;
            }
            size_line = Some((line_num, line));
            break;
        }
        let (size_num, size_line) =
            size_line.ok_or_else(|| err(None, "missing size line".into()))?;

        let sizes = size_line
            .split_whitespace()
            .map(|t| {
                t.parse::<usize>()
                    .map_err(|_| err(Some(size_num + 1), format!("invalid size entry: {t}")))
            })
            .collect::<MtxGenResult<Vec<usize>>>()?;
        let expected_len = match format {
            StorageFormat::Coordinate => 3,
            StorageFormat::Array => 2,
        };
        if sizes.len() != expected_len {
            return Err(err(
                Some(size_num + 1),
                format!("size line needs {expected_len} integers, got {}", sizes.len()),
            ));
        }
        let (rows, cols) = (sizes[0], sizes[1]);
        if rows.checked_mul(cols).is_none() {
            return Err(err(
                Some(size_num + 1),
                format!("{rows}x{cols} matrix is too large to hold"),
            ));
        }
        if symmetry != Symmetry::General && rows != cols {
            return Err(err(
                Some(size_num + 1),
                format!("{symmetry} matrix must be square, got {rows}x{cols}"),
            ));
        }

        let body = lines.filter(|(_, l)| {
            let l = l.trim();
            !l.is_empty() && !l.starts_with('%')
        });
        let matrix = match format {
            StorageFormat::Coordinate => {
                Self::parse_coordinate(body, rows, cols, sizes[2], field, symmetry, path)?
            }
            StorageFormat::Array => Self::parse_array(body, rows, cols, symmetry, path)?,
        };

        log::debug!(
            "read {}: {rows}x{cols} {format} {field} {symmetry}, {} nonzeros, {} metadata fields",
            path.display(),
            matrix.nnz(),
            metadata.len()
        );

        Ok(MarketFile {
            header: MarketHeader {
                format,
                field,
                symmetry,
                metadata,
            },
            matrix,
        })
    }

    fn parse_banner(
        line: &str,
        path: &Path,
        line_num: usize,
    ) -> MtxGenResult<(StorageFormat, Field, Symmetry)> {
        let err = |cause: String| MtxGenError::Parse {
            file: path.to_path_buf(),
            line: Some(line_num + 1),
            cause,
        };
        let tokens: Vec<String> = line.split_whitespace().map(str::to_lowercase).collect();
        if tokens.len() != 5 || tokens[0] != "%%matrixmarket" || tokens[1] != "matrix" {
            return Err(err(format!("invalid Matrix Market banner: {line}")));
        }
        let format = match tokens[2].as_str() {
            "coordinate" => StorageFormat::Coordinate,
            "array" => StorageFormat::Array,
            other => return Err(err(format!("unsupported storage format: {other}"))),
        };
        let field = match tokens[3].as_str() {
            "real" | "double" => Field::Real,
            "integer" => Field::Integer,
            "pattern" => Field::Pattern,
            other => return Err(err(format!("unsupported field type: {other}"))),
        };
        let symmetry = match tokens[4].as_str() {
            "general" => Symmetry::General,
            "symmetric" => Symmetry::Symmetric,
            "skew-symmetric" => Symmetry::SkewSymmetric,
            other => return Err(err(format!("unsupported symmetry: {other}"))),
        };
        if format == StorageFormat::Array && field == Field::Pattern {
            return Err(err("pattern field requires coordinate storage".into()));
        }
        Ok((format, field, symmetry))
    }

    /// `% key: value`; lines without a colon or with an empty key are plain comments.
    fn collect_metadata(line: &str, metadata: &mut Metadata) {
        let stripped = line.trim_matches(|c: char| c == '%' || c.is_whitespace());
        if let Some((key, value)) = stripped.split_once(':') {
            let key = key.trim();
            if !key.is_empty() {
                metadata.insert(key, value.trim());
            }
        }
    }

    fn parse_value(token: &str, path: &Path, line_num: usize) -> MtxGenResult<f64> {
        token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| MtxGenError::Parse {
                file: path.to_path_buf(),
                line: Some(line_num + 1),
                cause: format!("invalid value: {token}"),
            })
    }

    /// Store `v` at `(r, c)` and its mirror according to `symmetry`.
    fn place(matrix: &mut Matrix, r: usize, c: usize, v: f64, symmetry: Symmetry) {
        let current = matrix.get(r, c);
        matrix.set(r, c, current + v);
        if r == c {
            return;
        }
        let mirror = matrix.get(c, r);
        match symmetry {
            Symmetry::General => {}
            Symmetry::Symmetric => matrix.set(c, r, mirror + v),
            Symmetry::SkewSymmetric => matrix.set(c, r, mirror - v),
        }
    }

    fn parse_coordinate<'a>(
        body: impl Iterator<Item = (usize, &'a str)>,
        rows: usize,
        cols: usize,
        nnz: usize,
        field: Field,
        symmetry: Symmetry,
        path: &Path,
    ) -> MtxGenResult<Matrix> {
        let err = |line: Option<usize>, cause: String| MtxGenError::Parse {
            file: path.to_path_buf(),
            line,
            cause,
        };
        let mut matrix = Matrix::zeros(rows, cols);
        let mut seen = 0usize;
        for (line_num, line) in body {
            if seen == nnz {
                return Err(err(
                    Some(line_num + 1),
                    format!("more than the declared {nnz} entries"),
                ));
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            let needed = if field == Field::Pattern { 2 } else { 3 };
            if parts.len() < needed {
                return Err(err(
                    Some(line_num + 1),
                    format!("entry needs {needed} fields, got {}", parts.len()),
                ));
            }
            let index = |token: &str, bound: usize, axis: &str| -> MtxGenResult<usize> {
                match token.parse::<usize>() {
                    Ok(i) if (1..=bound).contains(&i) => Ok(i - 1),
                    _ => Err(err(
                        Some(line_num + 1),
                        format!("invalid {axis} index {token} for dimension {bound}"),
                    )),
                }
            };
            let r = index(parts[0], rows, "row")?;
            let c = index(parts[1], cols, "column")?;
            let v = match field {
                Field::Pattern => 1.0,
                _ => Self::parse_value(parts[2], path, line_num)?,
            };
            if symmetry == Symmetry::SkewSymmetric && r == c {
                return Err(err(
                    Some(line_num + 1),
                    "skew-symmetric matrix cannot store a diagonal entry".into(),
                ));
            }
            Self::place(&mut matrix, r, c, v, symmetry);
            seen += 1;
        }
        if seen != nnz {
            return Err(err(None, format!("declared {nnz} entries, found {seen}")));
        }
        Ok(matrix)
    }

    /// Column-major values; symmetric variants store the lower triangle only.
    fn parse_array<'a>(
        body: impl Iterator<Item = (usize, &'a str)>,
        rows: usize,
        cols: usize,
        symmetry: Symmetry,
        path: &Path,
    ) -> MtxGenResult<Matrix> {
        let positions: Vec<(usize, usize)> = (0..cols)
            .flat_map(|c| (0..rows).map(move |r| (r, c)))
            .filter(|&(r, c)| match symmetry {
                Symmetry::General => true,
                Symmetry::Symmetric => r >= c,
                Symmetry::SkewSymmetric => r > c,
            })
            .collect();

        let mut matrix = Matrix::zeros(rows, cols);
        let mut next = 0usize;
        for (line_num, line) in body {
            for token in line.split_whitespace() {
                let &(r, c) = positions.get(next).ok_or_else(|| MtxGenError::Parse {
                    file: path.to_path_buf(),
                    line: Some(line_num + 1),
                    cause: format!("more than the expected {} values", positions.len()),
                })?;
                let v = Self::parse_value(token, path, line_num)?;
                Self::place(&mut matrix, r, c, v, symmetry);
                next += 1;
            }
        }
        if next != positions.len() {
            return Err(MtxGenError::Parse {
                file: path.to_path_buf(),
                line: None,
                cause: format!("expected {} values, found {next}", positions.len()),
            });
        }
        Ok(matrix)
    }
}

/// Read a matrix and its header from `path`.
pub fn read_matrix(path: impl AsRef<Path>) -> MtxGenResult<MarketFile> {
    MarketParser::parse_file(path.as_ref())
}

/// Serialize as `coordinate real general` text.
pub fn to_market_string(matrix: &Matrix, metadata: Option<&Metadata>) -> String {
    let mut out = String::from("%%MatrixMarket matrix coordinate real general\n");
    if let Some(metadata) = metadata {
        for (key, value) in metadata.iter() {
            out.push_str(&format!("% {key}: {value}\n"));
        }
    }
    out.push_str(&format!(
        "{} {} {}\n",
        matrix.rows(),
        matrix.cols(),
        matrix.nnz()
    ));
    for (r, c, v) in matrix.nonzeros() {
        // `Display` for f64 prints the shortest round-trip representation.
        out.push_str(&format!("{} {} {v}\n", r + 1, c + 1));
    }
    out
}

/// Write `matrix` to `path`, replacing any existing file.
pub fn write_matrix(
    path: impl AsRef<Path>,
    matrix: &Matrix,
    metadata: Option<&Metadata>,
) -> MtxGenResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(to_market_string(matrix, metadata).as_bytes())?;
    writer.flush()?;
    log::debug!(
        "wrote {}: {}x{}, {} nonzeros",
        path.display(),
        matrix.rows(),
        matrix.cols(),
        matrix.nnz()
    );
    Ok(())
}
