use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use epl_dashboard::data::aggregate::{column_sum, group_sum, summary_metrics, top_n};
use epl_dashboard::data::cache;
use epl_dashboard::data::filter::{apply, FilterCriteria, FilteredView, MinutesRange, DEFAULT_CLUBS};
use epl_dashboard::data::loader::{load_file, read_table, LoadError};
use epl_dashboard::data::model::PlayerTable;
use epl_dashboard::data::schema::{
    rankable_metrics, ColumnKind, CLUB, EXCLUDED_METRICS, GOALS, PLAYER_NAME,
};
use tempfile::NamedTempFile;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn fixture_table() -> PlayerTable {
    load_file(&fixture_path("players.csv")).expect("fixture should load")
}

fn clubs(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|c| c.to_string()).collect()
}

fn names(view: &FilteredView<'_>) -> Vec<String> {
    view.records()
        .map(|r| view.table().value(r, PLAYER_NAME).to_string())
        .collect()
}

#[test]
fn three_row_scenario() {
    let csv = "\
Player Name,Club,Position,Minutes,Goals,Assists,Shots
One,ClubA,FW,900,10,4,30
Two,ClubA,MF,100,1,0,2
Three,ClubB,FW,500,5,2,12
";
    let table = read_table(csv.as_bytes()).unwrap();
    let criteria = FilterCriteria::new(clubs(&["ClubA"]), Some("FW".into()), MinutesRange::new(0, 1000));
    let view = apply(&table, &criteria);
    assert_eq!(names(&view), vec!["One"]);

    let summary = summary_metrics(&view);
    assert_eq!(summary.count, 1);
    assert_eq!(summary.total_goals, 10);
    assert_eq!(summary.mean_assists, 4.0);
    assert_eq!(summary.mean_minutes, 900.0);
}

#[test]
fn fixture_columns_are_classified() {
    let table = fixture_table();
    assert_eq!(table.len(), 10);
    assert_eq!(table.schema().len(), 16);

    let schema = table.schema();
    assert_eq!(schema.kind("Passes%"), Some(ColumnKind::Fraction));
    assert_eq!(schema.kind("Minutes"), Some(ColumnKind::Integer));
    assert_eq!(schema.kind("xG"), Some(ColumnKind::Float));
    assert_eq!(schema.kind("Nationality"), Some(ColumnKind::Text));

    let salah = &table.records()[3];
    let passes = table.value(salah, "Passes%").as_f64().unwrap();
    assert!((passes - 0.749).abs() < 1e-12);
}

#[test]
fn rankable_metrics_respect_exclusions() {
    let table = fixture_table();
    let metrics = rankable_metrics(table.schema());
    for excluded in EXCLUDED_METRICS {
        assert!(!metrics.contains(excluded), "{excluded} should not be rankable");
    }
    assert!(!metrics.contains("Shots Ended In Block"));
    assert!(!metrics.contains("xGoT Conceded"));
    assert!(!metrics.contains(PLAYER_NAME));
    assert!(!metrics.contains("Nationality"));
    for expected in ["Appearances", "Minutes", "Goals", "Assists", "Shots", "Passes%", "xG"] {
        assert!(metrics.contains(expected), "{expected} should be rankable");
    }
}

#[test]
fn filtering_never_fabricates_rows_and_is_repeatable() {
    let table = fixture_table();
    let all_positions = [None, Some("FWD"), Some("MID"), Some("GKP"), Some("ST")];
    let club_sets = [
        clubs(&[]),
        clubs(&["Arsenal"]),
        clubs(&DEFAULT_CLUBS),
        clubs(&["Arsenal", "Chelsea", "Everton", "Liverpool"]),
    ];
    let ranges = [MinutesRange::new(0, 5000), MinutesRange::new(2000, 3400), MinutesRange::new(3420, 3420)];

    for club_set in &club_sets {
        for position in all_positions {
            for range in ranges {
                let criteria = FilterCriteria::new(club_set.clone(), position.map(String::from), range);
                let first = apply(&table, &criteria);
                let second = apply(&table, &criteria);
                assert_eq!(first.row_indices(), second.row_indices());

                for record in first.records() {
                    assert!(table.records().contains(record));
                    let club = table.value(record, CLUB).as_text().unwrap();
                    assert!(club_set.contains(club));
                }
                if club_set.is_empty() {
                    assert!(first.is_empty());
                }
            }
        }
    }
}

#[test]
fn default_dashboard_view() {
    let table = fixture_table();
    let criteria = FilterCriteria::initial(&table, &DEFAULT_CLUBS);
    assert_eq!(criteria.minutes(), MinutesRange::new(1717, 3420));

    let view = apply(&table, &criteria);
    assert_eq!(view.len(), 8);

    let groups = group_sum(&view, CLUB, GOALS);
    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["Liverpool", "Manchester City", "Arsenal", "Manchester United"]);
    for pair in groups.windows(2) {
        assert!(pair[0].sum >= pair[1].sum);
    }
    let total: f64 = groups.iter().map(|g| g.sum).sum();
    assert_eq!(total, column_sum(&view, GOALS));
    assert_eq!(summary_metrics(&view).total_goals, 79);
}

#[test]
fn top_n_dominates_the_rest() {
    let table = fixture_table();
    let view = FilteredView::all(&table);
    let top = top_n(&view, "Shots", 3);
    assert_eq!(top.len(), 3);

    let values: Vec<f64> = top
        .iter()
        .map(|r| table.value(r, "Shots").as_f64().unwrap())
        .collect();
    assert_eq!(values, vec![109.0, 115.0, 130.0]);

    let floor = values[0];
    for record in view.records() {
        if !top.iter().any(|t| std::ptr::eq(*t, record)) {
            assert!(table.value(record, "Shots").as_f64().unwrap() <= floor);
        }
    }
}

#[test]
fn cache_parses_each_path_once() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "Player Name,Club,Position,Minutes,Goals,Assists,Shots\nA,Arsenal,FWD,90,1,0,3\n"
    )
    .unwrap();

    assert!(!cache::is_cached(file.path()));
    let first = cache::load(file.path()).unwrap();
    assert!(cache::is_cached(file.path()));

    // Later edits are not seen: the table lives for the whole process.
    writeln!(file, "B,Chelsea,MID,45,0,1,1").unwrap();
    let second = cache::load(file.path()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 1);
}

#[test]
fn cache_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("epl_player_stats_24_25.csv");
    let err = cache::load(&missing).unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }));
    assert!(err.to_string().contains("epl_player_stats_24_25.csv"));
    assert!(!cache::is_cached(&missing));
}
