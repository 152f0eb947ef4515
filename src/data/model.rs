use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use super::schema::{ColumnKind, Schema};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the player table
// ---------------------------------------------------------------------------

/// A typed cell. Fraction columns hold `Float` values in [0, 1].
#[derive(Debug, Clone)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    /// The source cell was empty.
    Missing,
}

static MISSING: CellValue = CellValue::Missing;

// -- Manual Eq/Ord so integers and floats compare by value when sorting --

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Missing => 0,
                Integer(_) | Float(_) => 1,
                Text(_) => 2,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Missing, Missing) => Ordering::Equal,
            _ => {
                let a = self.as_f64().unwrap_or(f64::NAN);
                let b = other.as_f64().unwrap_or(f64::NAN);
                a.total_cmp(&b)
            }
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Missing => Ok(()),
        }
    }
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Full-precision text, so distinct values never render alike.
    pub fn to_exact_string(&self) -> String {
        match self {
            CellValue::Float(v) => v.to_string(),
            _ => self.to_string(),
        }
    }

    /// Render the cell the way its column is meant to be read.
    pub fn display_as(&self, kind: ColumnKind) -> String {
        match (self, kind) {
            (CellValue::Float(v), ColumnKind::Fraction) => format!("{:.2}%", v * 100.0),
            _ => self.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// PlayerRecord – one row of the CSV
// ---------------------------------------------------------------------------

/// A single player's statistics. Cells are aligned with the table schema.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    cells: Vec<CellValue>,
}

impl PlayerRecord {
    pub(crate) fn new(cells: Vec<CellValue>) -> Self {
        PlayerRecord { cells }
    }

    /// Cell at a schema position; `Missing` when the position is absent.
    pub fn cell(&self, position: Option<usize>) -> &CellValue {
        position
            .and_then(|i| self.cells.get(i))
            .unwrap_or(&MISSING)
    }

    pub fn number(&self, position: Option<usize>) -> Option<f64> {
        self.cell(position).as_f64()
    }

    pub fn text(&self, position: Option<usize>) -> Option<&str> {
        self.cell(position).as_text()
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }
}

// ---------------------------------------------------------------------------
// PlayerTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The parsed dataset. Built once by the loader, read-only afterwards.
#[derive(Debug, Clone)]
pub struct PlayerTable {
    source: PathBuf,
    schema: Schema,
    records: Vec<PlayerRecord>,
}

impl PlayerTable {
    pub(crate) fn new(source: PathBuf, schema: Schema, records: Vec<PlayerRecord>) -> Self {
        PlayerTable {
            source,
            schema,
            records,
        }
    }

    /// File the table was read from (empty for in-memory readers).
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a named cell of a record.
    pub fn value<'a>(&self, record: &'a PlayerRecord, column: &str) -> &'a CellValue {
        record.cell(self.schema.position(column))
    }

    /// Sorted set of distinct text values of a column.
    pub fn unique_text(&self, column: &str) -> BTreeSet<String> {
        let pos = self.schema.position(column);
        self.records
            .iter()
            .filter_map(|r| r.text(pos))
            .map(str::to_string)
            .collect()
    }

    /// Smallest and largest non-missing value of a numeric column.
    pub fn numeric_range(&self, column: &str) -> Option<(f64, f64)> {
        let pos = self.schema.position(column);
        self.records
            .iter()
            .filter_map(|r| r.number(pos))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
