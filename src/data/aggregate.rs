use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::FilteredView;
use super::model::{CellValue, PlayerRecord};
use super::schema::{ASSISTS, CLUB, GOALS, MINUTES, PLAYER_NAME};

// ---------------------------------------------------------------------------
// Summary metrics (KPI cards)
// ---------------------------------------------------------------------------

/// Headline numbers for the current view. All zero for an empty view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SummaryMetrics {
    pub count: usize,
    pub total_goals: i64,
    /// Rounded to two decimals.
    pub mean_assists: f64,
    /// Rounded to a whole number of minutes.
    pub mean_minutes: f64,
}

pub fn summary_metrics(view: &FilteredView<'_>) -> SummaryMetrics {
    if view.is_empty() {
        return SummaryMetrics::default();
    }
    SummaryMetrics {
        count: view.len(),
        total_goals: column_sum(view, GOALS) as i64,
        mean_assists: round_to(column_mean(view, ASSISTS), 2),
        mean_minutes: round_to(column_mean(view, MINUTES), 0),
    }
}

/// Sum of the non-missing values of a numeric column.
pub fn column_sum(view: &FilteredView<'_>, field: &str) -> f64 {
    let pos = view.schema().position(field);
    view.records().filter_map(|r| r.number(pos)).sum()
}

/// Mean of the non-missing values, or 0 when there are none.
fn column_mean(view: &FilteredView<'_>, field: &str) -> f64 {
    let pos = view.schema().position(field);
    let (sum, n) = view
        .records()
        .filter_map(|r| r.number(pos))
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Round half to even at `decimals` places.
fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

// ---------------------------------------------------------------------------
// Group sums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSum {
    pub key: String,
    pub sum: f64,
}

/// Sum `sum_field` per distinct value of `group_field`, largest first.
///
/// Equal sums keep the order in which their keys first appear in the view.
/// Rows group on the cell value itself, so numeric keys that only differ past
/// the displayed precision stay apart. Rows without a group key are left
/// out; missing values add nothing.
pub fn group_sum(view: &FilteredView<'_>, group_field: &str, sum_field: &str) -> Vec<GroupSum> {
    let schema = view.schema();
    let (Some(group_pos), Some(sum_pos)) = (schema.position(group_field), schema.position(sum_field))
    else {
        log::warn!("group_sum over unknown columns '{group_field}' / '{sum_field}'");
        return Vec::new();
    };

    let mut groups: Vec<GroupSum> = Vec::new();
    let mut slot: BTreeMap<&CellValue, usize> = BTreeMap::new();

    for record in view.records() {
        let key = record.cell(Some(group_pos));
        if key.is_missing() {
            continue;
        }
        let value = record.number(Some(sum_pos)).unwrap_or(0.0);
        match slot.get(key) {
            Some(&i) => groups[i].sum += value,
            None => {
                slot.insert(key, groups.len());
                groups.push(GroupSum {
                    key: key.to_exact_string(),
                    sum: value,
                });
            }
        }
    }

    groups.sort_by(|a, b| b.sum.total_cmp(&a.sum));
    groups
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

/// The `n` records with the largest `metric`, returned smallest first so a
/// horizontal bar chart can be drawn bottom-to-top without re-sorting.
///
/// Ties favour the earlier row. Rows with no value for `metric` are not
/// ranked.
pub fn top_n<'a>(view: &FilteredView<'a>, metric: &str, n: usize) -> Vec<&'a PlayerRecord> {
    let pos = view.schema().position(metric);
    let mut ranked: Vec<(f64, &'a PlayerRecord)> = view
        .records()
        .filter_map(|r| r.number(pos).map(|v| (v, r)))
        .collect();

    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.truncate(n);
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.into_iter().map(|(_, r)| r).collect()
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint<'a> {
    pub player: &'a str,
    pub club: &'a str,
    pub x: f64,
    pub y: f64,
}

/// One point per row having both `x_field` and `y_field`.
pub fn scatter_points<'a>(
    view: &FilteredView<'a>,
    x_field: &str,
    y_field: &str,
) -> Vec<ScatterPoint<'a>> {
    let schema = view.schema();
    let (name, club) = (schema.position(PLAYER_NAME), schema.position(CLUB));
    let (x, y) = (schema.position(x_field), schema.position(y_field));

    view.records()
        .filter_map(|r| {
            Some(ScatterPoint {
                player: r.text(name).unwrap_or_default(),
                club: r.text(club).unwrap_or_default(),
                x: r.number(x)?,
                y: r.number(y)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::filter::{apply, FilterCriteria, MinutesRange};
    use crate::data::loader::read_table;
    use crate::data::model::PlayerTable;

    fn table() -> PlayerTable {
        let csv = "\
Player Name,Club,Position,Minutes,Goals,Assists,Shots,xG
A,Arsenal,FWD,900,10,3,40,8.5
B,Chelsea,MID,1000,4,7,20,3.1
C,Arsenal,MID,1500,4,1,15,
D,Everton,DEF,2000,4,0,5,0.4
E,Chelsea,FWD,300,,2,10,1.0
";
        read_table(csv.as_bytes()).unwrap()
    }

    fn names(t: &PlayerTable, records: &[&PlayerRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| t.value(r, PLAYER_NAME).to_string())
            .collect()
    }

    #[test]
    fn empty_view_summary_is_all_zero() {
        let t = table();
        let view = FilteredView::empty(&t);
        assert_eq!(
            summary_metrics(&view),
            SummaryMetrics {
                count: 0,
                total_goals: 0,
                mean_assists: 0.0,
                mean_minutes: 0.0
            }
        );
    }

    #[test]
    fn summary_rounds_means() {
        let t = table();
        let view = FilteredView::all(&t);
        let s = summary_metrics(&view);
        assert_eq!(s.count, 5);
        assert_eq!(s.total_goals, 22);
        assert_eq!(s.mean_assists, 2.6);
        assert_eq!(s.mean_minutes, 1140.0);

        let criteria = FilterCriteria::new(
            BTreeSet::from(["Arsenal".to_string(), "Chelsea".to_string()]),
            Some("MID".into()),
            MinutesRange::new(0, 5000),
        );
        let s = summary_metrics(&apply(&t, &criteria));
        assert_eq!(s.mean_assists, 4.0);
        assert_eq!(s.mean_minutes, 1250.0);
    }

    #[test]
    fn group_sum_is_descending_with_first_seen_ties() {
        let t = table();
        let view = FilteredView::all(&t);
        let groups = group_sum(&view, CLUB, GOALS);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Arsenal", "Chelsea", "Everton"]);
        assert_eq!(groups[0].sum, 14.0);

        let total: f64 = groups.iter().map(|g| g.sum).sum();
        assert_eq!(total, column_sum(&view, GOALS));

        let tied = group_sum(&view, "Position", GOALS);
        let keys: Vec<&str> = tied.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["FWD", "MID", "DEF"]);
    }

    #[test]
    fn group_sum_keeps_close_float_keys_apart() {
        let csv = "\
Player Name,Club,Position,Minutes,Goals,Assists,Shots,xG
A,Arsenal,FWD,900,10,3,40,0.421
B,Chelsea,MID,1000,5,7,20,0.419
C,Everton,MID,800,2,1,9,0.421
";
        let t = read_table(csv.as_bytes()).unwrap();
        let groups = group_sum(&FilteredView::all(&t), "xG", GOALS);
        assert_eq!(
            groups,
            vec![
                GroupSum { key: "0.421".into(), sum: 12.0 },
                GroupSum { key: "0.419".into(), sum: 5.0 },
            ]
        );
    }

    #[test]
    fn group_sum_on_unknown_column_is_empty() {
        let t = table();
        assert!(group_sum(&FilteredView::all(&t), "League", GOALS).is_empty());
    }

    #[test]
    fn top_n_returns_largest_ascending() {
        let t = table();
        let view = FilteredView::all(&t);

        let top = top_n(&view, GOALS, 3);
        assert_eq!(names(&t, &top), vec!["B", "C", "A"]);

        let top = top_n(&view, "xG", 10);
        assert_eq!(names(&t, &top), vec!["D", "E", "B", "A"]);

        assert!(top_n(&view, GOALS, 0).is_empty());
        assert!(top_n(&FilteredView::empty(&t), GOALS, 10).is_empty());
    }

    #[test]
    fn scatter_skips_rows_missing_either_axis() {
        let t = table();
        let points = scatter_points(&FilteredView::all(&t), "Shots", GOALS);
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].player, "A");
        assert_eq!(points[0].club, "Arsenal");
        assert_eq!((points[0].x, points[0].y), (40.0, 10.0));
    }
}
