use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use super::model::{CellValue, PlayerRecord, PlayerTable};
use super::schema::{ColumnKind, ColumnSpec, Schema, IDENTIFIER_COLUMNS, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found at {}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("required column '{0}' is missing from the header")]
    MissingColumn(String),
    #[error("record {record}: identifier column '{column}' is empty")]
    MissingIdentifier { record: usize, column: String },
    #[error("column '{0}' appears more than once in the header")]
    DuplicateColumn(String),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse a player CSV from disk. Uncached: the app goes through
/// [`super::cache::load`] instead.
pub fn load_file(path: &Path) -> Result<PlayerTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse(file, path.to_path_buf())?;
    log::info!(
        "Loaded {} players with {} columns from {}",
        table.len(),
        table.schema().len(),
        path.display()
    );
    Ok(table)
}

/// Parse a player CSV from any reader.
pub fn read_table<R: Read>(reader: R) -> Result<PlayerTable, LoadError> {
    parse(reader, PathBuf::new())
}

fn parse<R: Read>(reader: R, source: PathBuf) -> Result<PlayerTable, LoadError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    for (i, name) in headers.iter().enumerate() {
        if headers[..i].contains(name) {
            return Err(LoadError::DuplicateColumn(name.clone()));
        }
    }
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(LoadError::MissingColumn(required.to_string()));
        }
    }

    let raw: Vec<StringRecord> = reader.records().collect::<Result<_, _>>()?;

    // Classification pass: one kind per column, decided before any cell is converted.
    let columns: Vec<ColumnSpec> = headers
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let kind = if IDENTIFIER_COLUMNS.contains(&name.as_str()) {
                ColumnKind::Text
            } else {
                classify_column(raw.iter().map(|r| r.get(col).unwrap_or("")))
            };
            if kind == ColumnKind::Fraction {
                log::debug!("Column '{name}' holds percentages, converting to fractions");
            }
            ColumnSpec::new(name.as_str(), kind)
        })
        .collect();

    let mut records = Vec::with_capacity(raw.len());
    for (row_no, row) in raw.iter().enumerate() {
        let mut cells = Vec::with_capacity(columns.len());
        for (col, spec) in columns.iter().enumerate() {
            let value = convert_cell(row.get(col).unwrap_or(""), spec.kind);
            if value.is_missing() && IDENTIFIER_COLUMNS.contains(&spec.name.as_str()) {
                return Err(LoadError::MissingIdentifier {
                    record: row_no + 1,
                    column: spec.name.clone(),
                });
            }
            cells.push(value);
        }
        records.push(PlayerRecord::new(cells));
    }

    Ok(PlayerTable::new(source, Schema::new(columns), records))
}

// ---------------------------------------------------------------------------
// Column classification
// ---------------------------------------------------------------------------

/// Cell texts read as "no value", the same set pandas' `read_csv` uses.
pub const NA_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_na_token(raw: &str) -> bool {
    raw.is_empty() || NA_TOKENS.contains(&raw)
}

/// Empty, an NA token, or a number that is not finite (`inf`, `NaN`).
fn is_absent(raw: &str) -> bool {
    is_na_token(raw) || raw.parse::<f64>().is_ok_and(|v| !v.is_finite())
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Decide a column's kind from all of its raw cells.
///
/// A column is a fraction column only when every non-empty cell is a
/// percentage; a single plain value leaves the whole column as text.
/// Absent cells (see [`NA_TOKENS`]) take no part in the decision.
pub fn classify_column<'a>(cells: impl IntoIterator<Item = &'a str>) -> ColumnKind {
    let values: Vec<&str> = cells.into_iter().filter(|s| !is_absent(s)).collect();
    if values.is_empty() {
        return ColumnKind::Float;
    }
    if values.iter().all(|v| parse_percentage(v).is_some()) {
        return ColumnKind::Fraction;
    }
    if values.iter().all(|v| v.parse::<i64>().is_ok()) {
        return ColumnKind::Integer;
    }
    if values.iter().all(|v| parse_finite(v).is_some()) {
        return ColumnKind::Float;
    }
    ColumnKind::Text
}

/// `"42.5%"` → `0.425`. Anything without a trailing `%` is not a percentage.
pub fn parse_percentage(s: &str) -> Option<f64> {
    let number = s.trim().strip_suffix('%')?;
    parse_finite(number.trim()).map(|v| v / 100.0)
}

fn convert_cell(raw: &str, kind: ColumnKind) -> CellValue {
    if is_na_token(raw) {
        return CellValue::Missing;
    }
    let converted = match kind {
        ColumnKind::Text => Some(CellValue::Text(raw.to_string())),
        ColumnKind::Integer => raw.parse().ok().map(CellValue::Integer),
        ColumnKind::Float => parse_finite(raw).map(CellValue::Float),
        ColumnKind::Fraction => parse_percentage(raw).map(CellValue::Float),
    };
    // Classification guarantees every present cell parses; `inf` lands here.
    converted.unwrap_or(CellValue::Missing)
}
