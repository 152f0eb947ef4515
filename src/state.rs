use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use epl_dashboard::config::DashboardConfig;
use epl_dashboard::data::cache;
use epl_dashboard::data::filter::{
    self, club_options, FilterCriteria, FilteredView, MinutesRange, SortOrder,
};
use epl_dashboard::data::model::PlayerTable;
use epl_dashboard::data::schema::{default_metric, rankable_metrics, CLUB, GOALS};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Visuals,
    Rankings,
    Data,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded table (None until a file loads successfully).
    pub table: Option<Arc<PlayerTable>>,

    /// Current filter selections.
    pub criteria: Option<FilterCriteria>,

    pub tab: Tab,

    /// Metric shown on the rankings chart.
    pub rank_metric: Option<String>,

    /// Group key and summed field of the overview bar chart.
    pub group_field: String,
    pub group_sum_field: String,

    /// Column and direction of the data table, if the user clicked a header.
    pub sort: Option<(String, SortOrder)>,

    /// One colour per club, built from the whole table.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            table: None,
            criteria: None,
            tab: Tab::Visuals,
            rank_metric: None,
            group_field: CLUB.to_string(),
            group_sum_field: GOALS.to_string(),
            sort: None,
            color_map: None,
            status_message: None,
        }
    }

    /// Load `path` through the table cache. On failure the dashboard is
    /// cleared and only the error is shown.
    pub fn open(&mut self, path: &Path) {
        match cache::load(path) {
            Ok(table) => self.set_table(table),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.table = None;
                self.criteria = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded table and reset the selections.
    pub fn set_table(&mut self, table: Arc<PlayerTable>) {
        self.criteria = Some(FilterCriteria::initial(&table, &self.config.default_clubs));
        self.color_map = Some(ColorMap::new(&club_options(&table)));
        self.rank_metric = default_metric(&rankable_metrics(table.schema())).map(str::to_string);
        self.group_field = CLUB.to_string();
        self.group_sum_field = GOALS.to_string();
        self.sort = None;
        self.status_message = None;
        self.table = Some(table);
    }

    /// Re-run the filter for the current criteria.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        let table = self.table.as_deref()?;
        let criteria = self.criteria.as_ref()?;
        Some(filter::apply(table, criteria))
    }

    fn update_criteria(&mut self, change: impl FnOnce(&FilterCriteria) -> FilterCriteria) {
        if let Some(current) = &self.criteria {
            self.criteria = Some(change(current));
        }
    }

    pub fn set_club_selected(&mut self, club: &str, selected: bool) {
        self.update_criteria(|c| {
            let mut clubs = c.clubs().clone();
            if selected {
                clubs.insert(club.to_string());
            } else {
                clubs.remove(club);
            }
            c.with_clubs(clubs)
        });
    }

    pub fn select_all_clubs(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        let all = club_options(table);
        self.update_criteria(|c| c.with_clubs(all));
    }

    pub fn select_no_clubs(&mut self) {
        self.update_criteria(|c| c.with_clubs(BTreeSet::new()));
    }

    pub fn set_position(&mut self, position: Option<String>) {
        self.update_criteria(|c| c.with_position(position));
    }

    pub fn set_minutes(&mut self, minutes: MinutesRange) {
        let Some(table) = &self.table else {
            return;
        };
        let bounds = MinutesRange::bounds(table);
        self.update_criteria(|c| c.with_minutes(minutes.clamp_to(bounds)));
    }

    /// Clicking the active sort column flips its direction.
    pub fn toggle_sort(&mut self, column: &str) {
        self.sort = match self.sort.take() {
            Some((current, SortOrder::Ascending)) if current == column => {
                Some((current, SortOrder::Descending))
            }
            Some((current, SortOrder::Descending)) if current == column => {
                Some((current, SortOrder::Ascending))
            }
            _ => Some((column.to_string(), SortOrder::Ascending)),
        };
    }
}
