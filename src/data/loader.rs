use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::table::{CellValue, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a batch input table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with column names, one record per line
/// * `.json`    – records orientation: `[{ "col": value, ... }, ...]`
/// * `.parquet` – flat columns (string / int / float / bool)
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one record per row.
/// Cell types are guessed per cell (int, float, bool, string, empty → null).
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = Table::new(headers);

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != table.columns.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, found {}",
                table.columns.len(),
                record.len()
            );
        }
        let row: Vec<CellValue> = record.iter().map(guess_cell_type).collect();
        table.rows.push(row);
    }

    Ok(table)
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Substance": "methane", "Unit": "...", "Source": "Industry", ... },
///   ...
/// ]
/// ```
///
/// The column set is taken from the first record; later records may list
/// their keys in any order but must not introduce new columns.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let Some(first) = records.first() else {
        return Ok(Table::default());
    };
    let columns: Vec<String> = first
        .as_object()
        .context("Row 0 is not a JSON object")?
        .keys()
        .cloned()
        .collect();

    let mut table = Table::new(columns);

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        for key in obj.keys() {
            if table.column_index(key).is_none() {
                bail!("Row {i}: unexpected column '{key}' not present in row 0");
            }
        }

        let row: Vec<CellValue> = table
            .columns
            .iter()
            .map(|col| obj.get(col).map_or(CellValue::Null, json_to_cell))
            .collect();
        table.rows.push(row);
    }

    Ok(table)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`), as long as every column is a scalar
/// type (strings, ints, floats, bools).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut table: Option<Table> = None;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let table = table.get_or_insert_with(|| {
            Table::new(schema.fields().iter().map(|f| f.name().clone()).collect())
        });

        for row in 0..batch.num_rows() {
            let cells: Vec<CellValue> = (0..batch.num_columns())
                .map(|col| extract_cell(batch.column(col), row))
                .collect();
            table.rows.push(cells);
        }
    }

    Ok(table.unwrap_or_default())
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                CellValue::String(s.value(row).to_string())
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                CellValue::String(s.value(row).to_string())
            }
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            CellValue::Bool(arr.value(row))
        }
        _ => CellValue::String(format!("{:?}", col.data_type())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(ext: &str, contents: &str) -> tempfile::TempPath {
        let mut f = tempfile::Builder::new()
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.into_temp_path()
    }

    #[test]
    fn csv_preserves_column_order_and_guesses_types() {
        let path = write_temp("csv", "Substance,Score,Note\nmethane,3,ok\n,2.5,\n");
        let table = load_file(&path).unwrap();
        assert_eq!(table.columns, vec!["Substance", "Score", "Note"]);
        assert_eq!(table.get(0, 0), Some(&CellValue::String("methane".into())));
        assert_eq!(table.get(0, 1), Some(&CellValue::Integer(3)));
        assert_eq!(table.get(1, 0), Some(&CellValue::Null));
        assert_eq!(table.get(1, 1), Some(&CellValue::Float(2.5)));
    }

    #[test]
    fn json_records_follow_first_row_columns() {
        let path = write_temp("json", r#"[{"a": 1, "b": "x"}, {"b": "y", "a": 2}]"#);
        let table = load_file(&path).unwrap();
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(table.get(1, 0), Some(&CellValue::Integer(2)));
        assert_eq!(table.get(1, 1), Some(&CellValue::String("y".into())));
    }

    #[test]
    fn json_rejects_new_columns_in_later_rows() {
        let path = write_temp("json", r#"[{"a": 1}, {"a": 2, "extra": 3}]"#);
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn parquet_round_trip_covers_scalar_column_types() {
        use arrow::array::{BooleanArray, Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("Substance", DataType::Utf8, true),
            Field::new("factor", DataType::Float64, false),
            Field::new("score", DataType::Int64, false),
            Field::new("flag", DataType::Boolean, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("methane"), None])),
                Arc::new(Float64Array::from(vec![1.25, 0.5])),
                Arc::new(Int64Array::from(vec![3, 4])),
                Arc::new(BooleanArray::from(vec![true, false])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.columns, vec!["Substance", "factor", "score", "flag"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, 0), Some(&CellValue::String("methane".into())));
        assert_eq!(table.get(0, 1), Some(&CellValue::Float(1.25)));
        assert_eq!(table.get(0, 2), Some(&CellValue::Integer(3)));
        assert_eq!(table.get(0, 3), Some(&CellValue::Bool(true)));
        assert_eq!(table.get(1, 0), Some(&CellValue::Null));
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = load_file(Path::new("input.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
