use std::collections::{BTreeSet, HashMap};
use std::fmt;

// ---------------------------------------------------------------------------
// Well-known columns
// ---------------------------------------------------------------------------

pub const PLAYER_NAME: &str = "Player Name";
pub const CLUB: &str = "Club";
pub const POSITION: &str = "Position";
pub const MINUTES: &str = "Minutes";
pub const GOALS: &str = "Goals";
pub const ASSISTS: &str = "Assists";
pub const SHOTS: &str = "Shots";

/// Columns that must be non-empty on every row.
pub const IDENTIFIER_COLUMNS: [&str; 3] = [PLAYER_NAME, CLUB, POSITION];

/// Columns the dashboard cannot work without.
pub const REQUIRED_COLUMNS: [&str; 7] = [PLAYER_NAME, CLUB, POSITION, MINUTES, GOALS, ASSISTS, SHOTS];

// ---------------------------------------------------------------------------
// Ranking policy
// ---------------------------------------------------------------------------

/// Numeric columns that describe negative events or goalkeeper-only figures
/// and make no sense on a "top players" chart.
pub const EXCLUDED_METRICS: [&str; 8] = [
    "Big Chances Missed",
    "Hit Woodwork",
    "Offsides",
    "Goals Conceded",
    "Own Goals",
    "Yellow Cards",
    "Red Cards",
    "Penalties Saved",
];

/// Any numeric column whose name contains one of these is not rankable.
pub const EXCLUDED_METRIC_PATTERNS: [&str; 2] = ["Ended", "xGoT"];

// ---------------------------------------------------------------------------
// ColumnKind – result of the load-time classification pass
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
    /// Converted from `"42.5%"`-style text to a value in [0, 1].
    Fraction,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        !matches!(self, ColumnKind::Text)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnKind::Text => "text",
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Fraction => "fraction",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// FieldRole – what the presentation layer may do with a column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// Numeric and eligible for top-N ranking.
    Rankable,
    /// Categorical and eligible as a group-by key.
    Groupable,
    Neither,
}

impl FieldRole {
    /// Decide the role of a column from its name and kind alone.
    pub fn classify(name: &str, kind: ColumnKind) -> Self {
        if name == PLAYER_NAME {
            return FieldRole::Neither;
        }
        if !kind.is_numeric() {
            return FieldRole::Groupable;
        }
        if is_excluded_metric(name) {
            FieldRole::Neither
        } else {
            FieldRole::Rankable
        }
    }
}

fn is_excluded_metric(name: &str) -> bool {
    EXCLUDED_METRICS.contains(&name)
        || EXCLUDED_METRIC_PATTERNS
            .iter()
            .any(|pattern| name.contains(pattern))
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    pub role: FieldRole,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        let name = name.into();
        let role = FieldRole::classify(&name, kind);
        ColumnSpec { name, kind, role }
    }
}

/// Ordered column descriptors, in source header order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Name lookups resolve to the first column with that name. The loader
    /// rejects duplicate headers before a schema is built.
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, c) in columns.iter().enumerate() {
            index.entry(c.name.clone()).or_insert(i);
        }
        Schema { columns, index }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Position of a column in every record's cells.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.position(name).map(|i| &self.columns[i])
    }

    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.column(name).map(|c| c.kind)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Numeric fields eligible for top-N ranking, sorted by name.
pub fn rankable_metrics(schema: &Schema) -> BTreeSet<String> {
    fields_with_role(schema, FieldRole::Rankable)
}

/// Categorical fields usable as group-by keys, sorted by name.
pub fn groupable_fields(schema: &Schema) -> BTreeSet<String> {
    fields_with_role(schema, FieldRole::Groupable)
}

fn fields_with_role(schema: &Schema, role: FieldRole) -> BTreeSet<String> {
    schema
        .columns()
        .iter()
        .filter(|c| c.role == role)
        .map(|c| c.name.clone())
        .collect()
}

/// `Goals` when rankable, otherwise the first metric alphabetically.
pub fn default_metric(metrics: &BTreeSet<String>) -> Option<&str> {
    if metrics.contains(GOALS) {
        return Some(GOALS);
    }
    metrics.iter().next().map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new(vec![
            ColumnSpec::new(PLAYER_NAME, ColumnKind::Text),
            ColumnSpec::new(CLUB, ColumnKind::Text),
            ColumnSpec::new(GOALS, ColumnKind::Integer),
            ColumnSpec::new("Yellow Cards", ColumnKind::Integer),
            ColumnSpec::new("Shots Ended In Block", ColumnKind::Integer),
            ColumnSpec::new("xGoT Conceded", ColumnKind::Float),
            ColumnSpec::new("Passes%", ColumnKind::Fraction),
        ])
    }

    #[test]
    fn excluded_metrics_are_never_rankable() {
        let metrics = rankable_metrics(&schema());
        for excluded in EXCLUDED_METRICS {
            assert!(!metrics.contains(excluded));
        }
        assert!(!metrics.contains("Shots Ended In Block"));
        assert!(!metrics.contains("xGoT Conceded"));
        assert_eq!(
            metrics.into_iter().collect::<Vec<_>>(),
            vec!["Goals".to_string(), "Passes%".to_string()]
        );
    }

    #[test]
    fn player_name_is_not_a_group_key() {
        let groups = groupable_fields(&schema());
        assert_eq!(groups.into_iter().collect::<Vec<_>>(), vec!["Club".to_string()]);
    }

    #[test]
    fn default_metric_prefers_goals() {
        let metrics = rankable_metrics(&schema());
        assert_eq!(default_metric(&metrics), Some(GOALS));

        let others: BTreeSet<String> = ["Tackles", "Assists"].map(String::from).into();
        assert_eq!(default_metric(&others), Some("Assists"));
        assert_eq!(default_metric(&BTreeSet::new()), None);
    }

    #[test]
    fn lookup_by_name() {
        let s = schema();
        assert_eq!(s.position(GOALS), Some(2));
        assert_eq!(s.kind("Passes%"), Some(ColumnKind::Fraction));
        assert!(s.column("Nope").is_none());
    }

    #[test]
    fn first_duplicate_wins_lookup() {
        let s = Schema::new(vec![
            ColumnSpec::new(GOALS, ColumnKind::Integer),
            ColumnSpec::new(GOALS, ColumnKind::Text),
        ]);
        assert_eq!(s.position(GOALS), Some(0));
        assert_eq!(s.kind(GOALS), Some(ColumnKind::Integer));
    }
}
