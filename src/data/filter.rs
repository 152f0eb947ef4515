use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::model::{PlayerRecord, PlayerTable};
use super::schema::{Schema, CLUB, MINUTES, POSITION};

/// Position selector entry meaning "do not filter by position".
pub const ALL_POSITIONS: &str = "All";

/// Clubs selected when the dashboard first opens.
pub const DEFAULT_CLUBS: [&str; 4] = ["Arsenal", "Manchester City", "Liverpool", "Manchester United"];

// ---------------------------------------------------------------------------
// MinutesRange
// ---------------------------------------------------------------------------

/// Inclusive minutes-played window. `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinutesRange {
    min: i64,
    max: i64,
}

impl MinutesRange {
    pub fn new(a: i64, b: i64) -> Self {
        MinutesRange {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Full range of the table's `Minutes` column (`0..=0` when empty).
    pub fn bounds(table: &PlayerTable) -> Self {
        match table.numeric_range(MINUTES) {
            Some((lo, hi)) => MinutesRange::new(lo.floor() as i64, hi.ceil() as i64),
            None => MinutesRange::new(0, 0),
        }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn contains(&self, minutes: f64) -> bool {
        self.min as f64 <= minutes && minutes <= self.max as f64
    }

    /// Restrict this range to lie within `bounds`.
    pub fn clamp_to(&self, bounds: MinutesRange) -> Self {
        MinutesRange::new(
            self.min.clamp(bounds.min, bounds.max),
            self.max.clamp(bounds.min, bounds.max),
        )
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria
// ---------------------------------------------------------------------------

/// The user's current selections. Immutable: every change builds a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    clubs: BTreeSet<String>,
    position: Option<String>,
    minutes: MinutesRange,
}

impl FilterCriteria {
    /// `position` of `None` or `"All"` disables the position predicate.
    pub fn new(clubs: BTreeSet<String>, position: Option<String>, minutes: MinutesRange) -> Self {
        FilterCriteria {
            clubs,
            position: position.filter(|p| p != ALL_POSITIONS),
            minutes,
        }
    }

    /// Starting selection: the preferred clubs present in the table, all
    /// positions, and the full minutes range.
    pub fn initial<S: AsRef<str>>(table: &PlayerTable, preferred_clubs: &[S]) -> Self {
        let available = club_options(table);
        let clubs = preferred_clubs
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| available.contains(*c))
            .map(str::to_string)
            .collect();
        FilterCriteria::new(clubs, None, MinutesRange::bounds(table))
    }

    pub fn clubs(&self) -> &BTreeSet<String> {
        &self.clubs
    }

    pub fn position(&self) -> Option<&str> {
        self.position.as_deref()
    }

    pub fn minutes(&self) -> MinutesRange {
        self.minutes
    }

    pub fn with_clubs(&self, clubs: BTreeSet<String>) -> Self {
        FilterCriteria::new(clubs, self.position.clone(), self.minutes)
    }

    pub fn with_position(&self, position: Option<String>) -> Self {
        FilterCriteria::new(self.clubs.clone(), position, self.minutes)
    }

    pub fn with_minutes(&self, minutes: MinutesRange) -> Self {
        FilterCriteria::new(self.clubs.clone(), self.position.clone(), minutes)
    }
}

/// Sorted distinct clubs of the table.
pub fn club_options(table: &PlayerTable) -> BTreeSet<String> {
    table.unique_text(CLUB)
}

/// `"All"` followed by the table's distinct positions, sorted.
pub fn position_options(table: &PlayerTable) -> Vec<String> {
    std::iter::once(ALL_POSITIONS.to_string())
        .chain(table.unique_text(POSITION))
        .collect()
}

// ---------------------------------------------------------------------------
// FilteredView
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Rows of a [`PlayerTable`] that passed a filter, in display order.
/// Borrows the table; never copies or mutates records.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a PlayerTable,
    rows: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Every row of the table.
    pub fn all(table: &'a PlayerTable) -> Self {
        FilteredView {
            table,
            rows: (0..table.len()).collect(),
        }
    }

    pub fn empty(table: &'a PlayerTable) -> Self {
        FilteredView {
            table,
            rows: Vec::new(),
        }
    }

    pub fn table(&self) -> &'a PlayerTable {
        self.table
    }

    pub fn schema(&self) -> &'a Schema {
        self.table.schema()
    }

    /// Indices into the source table, in view order.
    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    pub fn records(&self) -> impl Iterator<Item = &'a PlayerRecord> + '_ {
        let records = self.table.records();
        self.rows.iter().map(move |&i| &records[i])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The same rows reordered by `column`. Stable; missing cells go last
    /// in either direction. Unknown columns leave the order unchanged.
    pub fn sorted_by(&self, column: &str, order: SortOrder) -> FilteredView<'a> {
        let mut rows = self.rows.clone();
        if let Some(pos) = self.schema().position(column) {
            let records = self.table.records();
            rows.sort_by(|&a, &b| {
                let (va, vb) = (records[a].cell(Some(pos)), records[b].cell(Some(pos)));
                match (va.is_missing(), vb.is_missing()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => match order {
                        SortOrder::Ascending => va.cmp(vb),
                        SortOrder::Descending => vb.cmp(va),
                    },
                }
            });
        }
        FilteredView {
            table: self.table,
            rows,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter application
// ---------------------------------------------------------------------------

/// Keep the rows matching every predicate of `criteria`.
///
/// Predicates run in order club → position → minutes, each over the
/// survivors of the previous one:
/// * no clubs selected → nothing passes
/// * position `None` → every position passes, otherwise exact match
/// * minutes → inclusive range; rows with no minutes recorded never pass
pub fn apply<'a>(table: &'a PlayerTable, criteria: &FilterCriteria) -> FilteredView<'a> {
    if criteria.clubs().is_empty() {
        return FilteredView::empty(table);
    }

    let schema = table.schema();
    let club = schema.position(CLUB);
    let records = table.records();

    let mut rows: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.text(club).is_some_and(|c| criteria.clubs().contains(c)))
        .map(|(i, _)| i)
        .collect();

    if let Some(wanted) = criteria.position() {
        let position = schema.position(POSITION);
        rows.retain(|&i| records[i].text(position) == Some(wanted));
    }

    if !rows.is_empty() {
        let minutes = schema.position(MINUTES);
        let range = criteria.minutes();
        rows.retain(|&i| records[i].number(minutes).is_some_and(|m| range.contains(m)));
    }

    FilteredView { table, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_table;
    use crate::data::schema::PLAYER_NAME;

    fn table() -> PlayerTable {
        let csv = "\
Player Name,Club,Position,Minutes,Goals,Assists,Shots
Saka,Arsenal,MID,2500,6,10,70
Havertz,Arsenal,FWD,2300,9,2,60
Salah,Liverpool,FWD,3300,29,18,130
Unknown,Liverpool,DEF,,0,0,0
Palmer,Chelsea,MID,3100,15,8,110
";
        read_table(csv.as_bytes()).unwrap()
    }

    fn names(view: &FilteredView<'_>) -> Vec<String> {
        view.records()
            .map(|r| view.table().value(r, PLAYER_NAME).to_string())
            .collect()
    }

    fn clubs(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn no_clubs_means_no_rows() {
        let t = table();
        let criteria = FilterCriteria::new(BTreeSet::new(), None, MinutesRange::new(0, 10_000));
        assert!(apply(&t, &criteria).is_empty());
    }

    #[test]
    fn predicates_are_conjunctive() {
        let t = table();
        let criteria = FilterCriteria::new(
            clubs(&["Arsenal", "Liverpool"]),
            Some("FWD".into()),
            MinutesRange::new(2000, 3000),
        );
        assert_eq!(names(&apply(&t, &criteria)), vec!["Havertz"]);
    }

    #[test]
    fn all_position_is_no_position_filter() {
        let t = table();
        let criteria = FilterCriteria::new(
            clubs(&["Arsenal"]),
            Some(ALL_POSITIONS.into()),
            MinutesRange::bounds(&t),
        );
        assert_eq!(criteria.position(), None);
        assert_eq!(names(&apply(&t, &criteria)), vec!["Saka", "Havertz"]);
    }

    #[test]
    fn minutes_range_is_inclusive_and_skips_missing() {
        let t = table();
        let criteria = FilterCriteria::new(clubs(&["Liverpool"]), None, MinutesRange::new(3300, 3300));
        assert_eq!(names(&apply(&t, &criteria)), vec!["Salah"]);

        let wide = criteria.with_minutes(MinutesRange::new(i64::MIN, i64::MAX));
        assert_eq!(names(&apply(&t, &wide)), vec!["Salah"]);
    }

    #[test]
    fn initial_criteria_keeps_only_known_default_clubs() {
        let t = table();
        let criteria = FilterCriteria::initial(&t, &DEFAULT_CLUBS);
        assert_eq!(criteria.clubs(), &clubs(&["Arsenal", "Liverpool"]));
        assert_eq!(criteria.minutes(), MinutesRange::new(2300, 3300));
        assert_eq!(apply(&t, &criteria).len(), 3);
    }

    #[test]
    fn options_are_sorted_with_all_first() {
        let t = table();
        assert_eq!(position_options(&t), vec!["All", "DEF", "FWD", "MID"]);
        assert_eq!(
            club_options(&t).into_iter().collect::<Vec<_>>(),
            vec!["Arsenal", "Chelsea", "Liverpool"]
        );
    }

    #[test]
    fn minutes_range_orders_and_clamps() {
        let r = MinutesRange::new(900, 100);
        assert_eq!((r.min(), r.max()), (100, 900));
        let clamped = MinutesRange::new(-50, 5000).clamp_to(r);
        assert_eq!(clamped, r);
    }

    #[test]
    fn sorting_is_stable_and_puts_missing_last() {
        let t = table();
        let view = FilteredView::all(&t);

        let desc = view.sorted_by("Minutes", SortOrder::Descending);
        assert_eq!(names(&desc), vec!["Salah", "Palmer", "Saka", "Havertz", "Unknown"]);

        let asc = view.sorted_by("Minutes", SortOrder::Ascending);
        assert_eq!(names(&asc), vec!["Havertz", "Saka", "Palmer", "Salah", "Unknown"]);

        let by_club = view.sorted_by("Club", SortOrder::Ascending);
        assert_eq!(names(&by_club), vec!["Saka", "Havertz", "Palmer", "Salah", "Unknown"]);

        assert_eq!(names(&view.sorted_by("Nope", SortOrder::Ascending)), names(&view));
    }
}
