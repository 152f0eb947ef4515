use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use epl_dashboard::data::aggregate::summary_metrics;
use epl_dashboard::data::export;
use epl_dashboard::data::filter::{club_options, position_options, MinutesRange, ALL_POSITIONS};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let (Some(table), Some(criteria)) = (state.table.clone(), state.criteria.clone()) else {
        ui.label("No dataset loaded.");
        return;
    };

    // ---- Clubs ----
    let clubs = club_options(&table);
    ui.strong(format!("Clubs  ({}/{})", criteria.clubs().len(), clubs.len()));
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_clubs();
        }
        if ui.small_button("None").clicked() {
            state.select_no_clubs();
        }
    });
    ScrollArea::vertical()
        .id_salt("club_list")
        .max_height(260.0)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for club in &clubs {
                let mut checked = criteria.clubs().contains(club);
                let mut text = RichText::new(club);
                if let Some(cm) = &state.color_map {
                    text = text.color(cm.color_for(club));
                }
                if ui.checkbox(&mut checked, text).changed() {
                    state.set_club_selected(club, checked);
                }
            }
        });
    ui.separator();

    // ---- Position ----
    ui.strong("Position");
    let current = criteria.position().unwrap_or(ALL_POSITIONS).to_string();
    egui::ComboBox::from_id_salt("position")
        .selected_text(current.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for option in position_options(&table) {
                if ui.selectable_label(current == option, option.as_str()).clicked() {
                    state.set_position(Some(option));
                }
            }
        });
    ui.separator();

    // ---- Minutes played ----
    ui.strong("Minutes played");
    let bounds = MinutesRange::bounds(&table);
    let mut lo = criteria.minutes().min();
    let mut hi = criteria.minutes().max();
    let lo_changed = ui
        .add(egui::Slider::new(&mut lo, bounds.min()..=bounds.max()).text("from"))
        .changed();
    let hi_changed = ui
        .add(egui::Slider::new(&mut hi, bounds.min()..=bounds.max()).text("to"))
        .changed();
    if lo_changed || hi_changed {
        state.set_minutes(MinutesRange::new(lo, hi));
    }
}

// ---------------------------------------------------------------------------
// Central panel pieces
// ---------------------------------------------------------------------------

/// Four KPI cards over the current view.
pub fn metric_cards(ui: &mut Ui, state: &AppState) {
    let summary = state.view().map(|v| summary_metrics(&v)).unwrap_or_default();

    let cards = [
        ("Players", summary.count.to_string()),
        ("Total goals", summary.total_goals.to_string()),
        ("Average assists", format!("{:.2}", summary.mean_assists)),
        ("Average minutes", format!("{}", summary.mean_minutes as i64)),
    ];
    ui.columns(cards.len(), |cols| {
        for (col, (label, value)) in cols.iter_mut().zip(cards) {
            col.label(RichText::new(label).weak());
            col.label(RichText::new(value).size(26.0).strong());
        }
    });
}

pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::Visuals, "Combined visual analysis");
        ui.selectable_value(&mut state.tab, Tab::Rankings, "Player rankings");
        ui.selectable_value(&mut state.tab, Tab::Data, "Full data");
    });
}

/// Shown instead of the dashboard when no table could be loaded.
pub fn load_failed(ui: &mut Ui, state: &AppState) {
    ui.centered_and_justified(|ui: &mut Ui| {
        let msg = state.status_message.as_deref().unwrap_or("No data loaded.");
        ui.label(
            RichText::new(format!("{msg}\n\nOpen a player CSV with File → Open…"))
                .color(Color32::RED)
                .heading(),
        );
    });
}

/// Warning shown by every tab when the filters leave nothing.
pub fn empty_view_warning(ui: &mut Ui) {
    ui.colored_label(
        Color32::from_rgb(230, 160, 0),
        "No data for the selected filters. Adjust the filters on the left.",
    );
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let has_table = state.table.is_some();
            if ui
                .add_enabled(has_table, egui::Button::new("Export filtered rows (CSV)…"))
                .clicked()
            {
                save_dialog(state, "filtered_players.csv", "CSV", "csv", export_rows);
                ui.close_menu();
            }
            if ui
                .add_enabled(has_table, egui::Button::new("Export summary (JSON)…"))
                .clicked()
            {
                save_dialog(state, "summary.json", "JSON", "json", export_summary);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            let visible = state.view().map(|v| v.len()).unwrap_or(0);
            ui.label(format!(
                "{}: {} players loaded, {} visible",
                table.source().display(),
                table.len(),
                visible
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open player statistics")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

fn save_dialog(
    state: &mut AppState,
    file_name: &str,
    filter_name: &str,
    extension: &str,
    write: fn(&AppState, &Path) -> Result<()>,
) {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name(file_name)
        .add_filter(filter_name, &[extension])
        .save_file()
    else {
        return;
    };

    match write(state, &path) {
        Ok(()) => {
            log::info!("Exported to {}", path.display());
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Export failed: {e:#}"));
        }
    }
}

fn export_rows(state: &AppState, path: &Path) -> Result<()> {
    let view = state.view().context("no table loaded")?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    export::write_csv(&view, BufWriter::new(file)).context("writing CSV")
}

fn export_summary(state: &AppState, path: &Path) -> Result<()> {
    let view = state.view().context("no table loaded")?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    export::write_summary_json(&summary_metrics(&view), BufWriter::new(file)).context("writing JSON")
}
