use eframe::egui::{self, ProgressBar, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use epl_dashboard::data::filter::SortOrder;
use epl_dashboard::data::schema::{ColumnKind, ASSISTS, CLUB, GOALS, PLAYER_NAME};

use crate::state::AppState;
use crate::ui::panels::empty_view_warning;

const ROW_HEIGHT: f32 = 20.0;

/// Friendlier header text for a few well-known columns.
fn header_label(column: &str) -> String {
    match column {
        PLAYER_NAME => "Player".to_string(),
        CLUB => "Club".to_string(),
        GOALS => "Goals ⚽".to_string(),
        ASSISTS => "Assists 🎯".to_string(),
        "Passes%" => "Pass accuracy".to_string(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tab 3: full filtered table
// ---------------------------------------------------------------------------

pub fn data_tab(ui: &mut Ui, state: &mut AppState) {
    let Some(table) = state.table.clone() else {
        return;
    };
    ui.label(RichText::new("Click a column header to sort.").weak());

    let mut clicked: Option<String> = None;
    {
        let Some(view) = state.view() else {
            return;
        };
        if view.is_empty() {
            empty_view_warning(ui);
            return;
        }
        let view = match &state.sort {
            Some((column, order)) => view.sorted_by(column, *order),
            None => view,
        };

        let columns = table.schema().columns();
        let rows = view.row_indices();
        let records = table.records();

        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .columns(Column::auto().at_least(60.0), columns.len())
                .header(ROW_HEIGHT, |mut header| {
                    for spec in columns {
                        header.col(|ui: &mut Ui| {
                            let arrow = match &state.sort {
                                Some((c, SortOrder::Ascending)) if *c == spec.name => " ⬆",
                                Some((c, SortOrder::Descending)) if *c == spec.name => " ⬇",
                                _ => "",
                            };
                            let label = format!("{}{arrow}", header_label(&spec.name));
                            if ui.button(RichText::new(label).strong()).clicked() {
                                clicked = Some(spec.name.clone());
                            }
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                        let record = &records[rows[row.index()]];
                        for (i, spec) in columns.iter().enumerate() {
                            let cell = record.cell(Some(i));
                            row.col(|ui: &mut Ui| match (spec.kind, cell.as_f64()) {
                                (ColumnKind::Fraction, Some(v)) => {
                                    ui.add(
                                        ProgressBar::new(v as f32)
                                            .desired_width(90.0)
                                            .text(format!("{:.2}%", v * 100.0)),
                                    );
                                }
                                _ => {
                                    ui.label(cell.display_as(spec.kind));
                                }
                            });
                        }
                    });
                });
        });
    }

    if let Some(column) = clicked {
        state.toggle_sort(&column);
    }
}
