use std::io::Write;

use super::aggregate::SummaryMetrics;
use super::filter::FilteredView;
use super::model::CellValue;
use super::schema::ColumnKind;

/// Write the rows of a view as CSV, header first, in schema column order.
///
/// Fraction columns are written back as percentage text so the output
/// loads the same way the source did.
pub fn write_csv<W: Write>(view: &FilteredView<'_>, writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    let schema = view.schema();
    out.write_record(schema.names())?;

    for record in view.records() {
        let row = schema
            .columns()
            .iter()
            .zip(record.cells())
            .map(|(spec, cell)| export_cell(cell, spec.kind));
        out.write_record(row)?;
    }
    out.flush()?;
    Ok(())
}

fn export_cell(cell: &CellValue, kind: ColumnKind) -> String {
    match (cell, kind) {
        (CellValue::Float(v), ColumnKind::Fraction) => {
            let percent = (v * 100.0 * 1e6).round() / 1e6;
            format!("{percent}%")
        }
        _ => cell.to_exact_string(),
    }
}

/// Write the summary metrics as pretty-printed JSON.
pub fn write_summary_json<W: Write>(summary: &SummaryMetrics, writer: W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::summary_metrics;
    use crate::data::loader::read_table;

    const CSV: &str = "\
Player Name,Club,Position,Minutes,Goals,Assists,Shots,Passes%,xG
A,Arsenal,FWD,900,10,3,40,42.5%,8.25
B,Chelsea,MID,1000,,7,20,80%,
";

    #[test]
    fn csv_export_restores_percentages() {
        let table = read_table(CSV.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_csv(&FilteredView::all(&table), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, CSV);
    }

    #[test]
    fn csv_export_of_empty_view_is_header_only() {
        let table = read_table(CSV.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_csv(&FilteredView::empty(&table), &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Player Name,Club,Position,Minutes,Goals,Assists,Shots,Passes%,xG\n"
        );
    }

    #[test]
    fn summary_serialises_to_json() {
        let table = read_table(CSV.as_bytes()).unwrap();
        let summary = summary_metrics(&FilteredView::all(&table));
        let mut buf = Vec::new();
        write_summary_json(&summary, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(value["total_goals"], 10);
        assert_eq!(value["mean_assists"], 5.0);
        assert_eq!(value["mean_minutes"], 950.0);
    }
}
