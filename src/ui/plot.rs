use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::{self, Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use epl_dashboard::data::aggregate::{group_sum, scatter_points, top_n};
use epl_dashboard::data::schema::{
    groupable_fields, rankable_metrics, ColumnKind, GOALS, PLAYER_NAME, SHOTS,
};

use crate::state::AppState;
use crate::ui::panels::empty_view_warning;

// ---------------------------------------------------------------------------
// Tab 1: goals per club + shots vs goals
// ---------------------------------------------------------------------------

pub fn visuals_tab(ui: &mut Ui, state: &mut AppState) {
    let Some(table) = state.table.clone() else {
        return;
    };
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Total of");
        field_combo(ui, "group_sum_field", &mut state.group_sum_field, &rankable_metrics(table.schema()));
        ui.label("per");
        field_combo(ui, "group_field", &mut state.group_field, &groupable_fields(table.schema()));
    });

    let Some(view) = state.view() else {
        return;
    };
    if view.is_empty() {
        empty_view_warning(ui);
        return;
    }
    let club_color = |club: &str| {
        state
            .color_map
            .as_ref()
            .map(|cm| cm.color_for(club))
            .unwrap_or(Color32::LIGHT_BLUE)
    };

    ui.heading(format!("Total {} per {}", state.group_sum_field, state.group_field));
    let bars: Vec<Bar> = group_sum(&view, &state.group_field, &state.group_sum_field)
        .iter()
        .enumerate()
        .map(|(i, g)| Bar::new(i as f64, g.sum).name(&g.key).fill(club_color(&g.key)))
        .collect();
    Plot::new("group_sum")
        .height(ui.available_height() * 0.45)
        .y_axis_label(state.group_sum_field.as_str())
        .show_x(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(state.group_sum_field.as_str()));
        });

    ui.add_space(8.0);
    ui.heading("Shots vs goals");

    // One series per club so the legend doubles as a club key.
    let mut by_club: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for p in scatter_points(&view, SHOTS, GOALS) {
        by_club.entry(p.club).or_default().push([p.x, p.y]);
    }
    Plot::new("shots_vs_goals")
        .legend(Legend::default())
        .x_axis_label("Shots")
        .y_axis_label("Goals")
        .allow_boxed_zoom(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (club, points) in by_club {
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(club)
                        .color(club_color(club))
                        .radius(4.0),
                );
            }
        });
}

fn field_combo(ui: &mut Ui, id: &str, selected: &mut String, options: &BTreeSet<String>) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                ui.selectable_value(selected, option.clone(), option.as_str());
            }
        });
}

// ---------------------------------------------------------------------------
// Tab 2: top-N ranking
// ---------------------------------------------------------------------------

pub fn rankings_tab(ui: &mut Ui, state: &mut AppState) {
    let Some(table) = state.table.clone() else {
        return;
    };

    let metrics = rankable_metrics(table.schema());
    let mut selected = state.rank_metric.clone().unwrap_or_default();
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Metric to rank by:");
        field_combo(ui, "rank_metric", &mut selected, &metrics);
    });
    if selected.is_empty() {
        ui.label("No numeric columns to rank.");
        return;
    }
    state.rank_metric = Some(selected.clone());

    let Some(view) = state.view() else {
        return;
    };
    if view.is_empty() {
        empty_view_warning(ui);
        return;
    }

    let n = state.config.top_n;
    let ranked = top_n(&view, &selected, n);
    let kind = table.schema().kind(&selected).unwrap_or(ColumnKind::Float);

    ui.heading(format!("Top {n} players by {selected}"));
    let bars: Vec<Bar> = ranked
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let value = table.value(rec, &selected).as_f64().unwrap_or_default();
            Bar::new(i as f64, value).name(table.value(rec, PLAYER_NAME))
        })
        .collect();
    Plot::new("top_n")
        .height(ui.available_height() * 0.6)
        .x_axis_label(selected.as_str())
        .show_y(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .horizontal()
                    .color(Color32::from_rgb(68, 1, 84))
                    .name(selected.as_str()),
            );
        });

    // Best first, matching the top of the chart.
    egui::Grid::new("top_n_list").striped(true).show(ui, |ui: &mut Ui| {
        for (rank, rec) in ranked.iter().rev().enumerate() {
            ui.label(format!("{}.", rank + 1));
            ui.label(table.value(rec, PLAYER_NAME).to_string());
            ui.label(table.value(rec, &selected).display_as(kind));
            ui.end_row();
        }
    });
}
