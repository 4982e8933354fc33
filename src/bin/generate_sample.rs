use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde_json::json;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn score(&mut self) -> i64 {
        (self.next_u64() % 6) as i64
    }
}

const SUBSTANCES: [&str; 4] = ["carbon dioxide", "methane", "nitrous oxide", "other GHGs"];
const UNITS: [&str; 2] = [
    "kg CO2e/2018 USD, purchaser price",
    "kg/2018 USD, purchaser price",
];
const SOURCES: [&str; 2] = ["Commodity", "Industry"];

const NUMERIC_FEATURES: [&str; 7] = [
    "Supply Chain Emission Factors without Margins",
    "Margins of Supply Chain Emission Factors",
    "DQ ReliabilityScore of Factors without Margins",
    "DQ TemporalCorrelation of Factors without Margins",
    "DQ GeographicalCorrelation of Factors without Margins",
    "DQ TechnologicalCorrelation of Factors without Margins",
    "DQ DataCollection of Factors without Margins",
];

/// A consistent artifact bundle in the format `ModelArtifacts::load` expects.
/// The fitted parameters are synthetic but mutually consistent: 10 columns
/// everywhere, one encoder per categorical feature.
fn artifacts_json() -> serde_json::Value {
    let schema: Vec<serde_json::Value> = [
        ("Substance", "categorical"),
        ("Unit", "categorical"),
        ("Supply Chain Emission Factors without Margins", "numeric"),
        ("Margins of Supply Chain Emission Factors", "numeric"),
        ("DQ ReliabilityScore of Factors without Margins", "score"),
        ("DQ TemporalCorrelation of Factors without Margins", "score"),
        ("DQ GeographicalCorrelation of Factors without Margins", "score"),
        ("DQ TechnologicalCorrelation of Factors without Margins", "score"),
        ("DQ DataCollection of Factors without Margins", "score"),
        ("Source", "categorical"),
    ]
    .iter()
    .map(|(name, kind)| json!({ "name": name, "kind": kind }))
    .collect();

    json!({
        "version": 1,
        "schema": schema,
        "encoders": {
            "Substance": { "classes": SUBSTANCES },
            "Unit": { "classes": UNITS },
            "Source": { "classes": SOURCES },
        },
        "scaler": {
            "mean":  [1.5, 0.5, 2.1, 0.35, 2.5, 2.5, 2.5, 2.5, 2.5, 0.5],
            "scale": [1.1, 0.5, 1.8, 0.30, 1.7, 1.7, 1.7, 1.7, 1.7, 0.5],
        },
        "model": {
            "coefficients": [0.12, -0.05, 1.85, 0.42, 0.03, 0.02, 0.02, 0.01, 0.03, -0.08],
            "intercept": 2.31,
        },
    })
}

struct BatchRows {
    industry: Vec<String>,
    substance: Vec<String>,
    unit: Vec<String>,
    source: Vec<String>,
    numeric: [Vec<f64>; 2],
    scores: [Vec<i64>; 5],
}

fn generate_rows(rng: &mut SimpleRng) -> BatchRows {
    let industries = ["Cement", "Steel", "Textiles", "Agriculture", "Logistics", "Chemicals"];

    let mut rows = BatchRows {
        industry: Vec::new(),
        substance: Vec::new(),
        unit: Vec::new(),
        source: Vec::new(),
        numeric: [Vec::new(), Vec::new()],
        scores: Default::default(),
    };

    for industry in industries {
        for substance in SUBSTANCES {
            rows.industry.push(industry.to_string());
            rows.substance.push(substance.to_string());
            rows.unit
                .push(UNITS[(rng.next_u64() % 2) as usize].to_string());
            rows.source
                .push(SOURCES[(rng.next_u64() % 2) as usize].to_string());
            rows.numeric[0].push((rng.next_f64() * 4.0 * 100.0).round() / 100.0);
            rows.numeric[1].push((rng.next_f64() * 100.0).round() / 100.0);
            for scores in &mut rows.scores {
                scores.push(rng.score());
            }
        }
    }
    rows
}

fn write_csv(rows: &BatchRows, path: &str) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV");

    let mut header = vec!["Industry Name", "Substance", "Unit", "Source"];
    header.extend(NUMERIC_FEATURES);
    writer.write_record(&header).expect("Failed to write header");

    for i in 0..rows.industry.len() {
        let mut record = vec![
            rows.industry[i].clone(),
            rows.substance[i].clone(),
            rows.unit[i].clone(),
            rows.source[i].clone(),
            rows.numeric[0][i].to_string(),
            rows.numeric[1][i].to_string(),
        ];
        record.extend(rows.scores.iter().map(|s| s[i].to_string()));
        writer.write_record(&record).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");
}

fn write_parquet(rows: &BatchRows, path: &str) {
    let mut fields = vec![
        Field::new("Industry Name", DataType::Utf8, false),
        Field::new("Substance", DataType::Utf8, false),
        Field::new("Unit", DataType::Utf8, false),
        Field::new("Source", DataType::Utf8, false),
        Field::new(NUMERIC_FEATURES[0], DataType::Float64, false),
        Field::new(NUMERIC_FEATURES[1], DataType::Float64, false),
    ];
    for name in &NUMERIC_FEATURES[2..] {
        fields.push(Field::new(*name, DataType::Int64, false));
    }
    let schema = Arc::new(Schema::new(fields));

    let as_str = |v: &[String]| StringArray::from(v.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    let mut columns: Vec<Arc<dyn arrow::array::Array>> = vec![
        Arc::new(as_str(&rows.industry)),
        Arc::new(as_str(&rows.substance)),
        Arc::new(as_str(&rows.unit)),
        Arc::new(as_str(&rows.source)),
        Arc::new(Float64Array::from(rows.numeric[0].clone())),
        Arc::new(Float64Array::from(rows.numeric[1].clone())),
    ];
    for scores in &rows.scores {
        columns.push(Arc::new(Int64Array::from(scores.clone())));
    }

    let batch =
        RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);

    std::fs::create_dir_all("models").expect("Failed to create models dir");
    let artifacts = serde_json::to_string_pretty(&artifacts_json()).expect("Failed to serialize");
    std::fs::write("models/artifacts.json", artifacts).expect("Failed to write artifacts");

    let rows = generate_rows(&mut rng);
    write_csv(&rows, "sample_batch.csv");
    write_parquet(&rows, "sample_batch.parquet");

    println!(
        "Wrote models/artifacts.json and {} sample rows to sample_batch.csv / sample_batch.parquet",
        rows.industry.len()
    );
}
