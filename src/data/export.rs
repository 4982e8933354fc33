use std::path::Path;

use anyhow::{Context, Result};

use super::table::Table;

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Write the table to `path` as CSV: header row first, then every row in
/// order.  Null cells become empty fields.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating output CSV")?;

    writer
        .write_record(&table.columns)
        .context("writing CSV header")?;

    for (row_no, row) in table.rows.iter().enumerate() {
        let record: Vec<String> = row.iter().map(ToString::to_string).collect();
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }

    writer.flush().context("flushing output CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::CellValue;

    #[test]
    fn exported_csv_keeps_extra_columns_and_order() {
        let mut table = Table::new(vec!["Substance".into(), "note".into()]);
        table.rows.push(vec![
            CellValue::String("methane".into()),
            CellValue::String("from plant 7".into()),
        ]);
        table.push_column("Predicted GHG Emission", vec![CellValue::Float(1.5)]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&table, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Substance,note,Predicted GHG Emission")
        );
        assert_eq!(lines.next(), Some("methane,from plant 7,1.5"));
    }

    #[test]
    fn null_cells_become_empty_fields() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        table
            .rows
            .push(vec![CellValue::Null, CellValue::Integer(2)]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&table, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().nth(1), Some(",2"));
    }
}
