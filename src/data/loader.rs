use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

use super::model::{Listing, VehicleDataset};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Load-boundary errors. `DataNotFound` is the one startup failure the app
/// reports and halts on; everything downstream of a successful load is
/// total over well-formed input.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("vehicle data not found at '{}'", path.display())]
    DataNotFound { path: PathBuf },

    #[error("unsupported file extension '.{extension}'")]
    UnsupportedFormat { extension: String },

    #[error("failed to parse '{}': {source:#}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a vehicle-listings dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least `model`, `model_year`, `price`,
///                `odometer`, `condition`; extra columns are ignored
/// * `.json`    – records-oriented array of listing objects
/// * `.parquet` – scalar columns with the same names
pub fn load_file(path: &Path) -> Result<VehicleDataset, LoadError> {
    if !path.is_file() {
        return Err(LoadError::DataNotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => {
            return Err(LoadError::UnsupportedFormat {
                extension: other.to_string(),
            });
        }
    };

    parsed.map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Dataset cache, keyed by path
// ---------------------------------------------------------------------------

/// Memoized datasets, one per source path. Re-renders hit the cache and
/// never re-read the file; a different path (e.g. a test fixture) gets its
/// own entry rather than invalidating the process.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<VehicleDataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the dataset for `path`, loading and memoizing it on first use.
    pub fn load(&mut self, path: &Path) -> Result<Arc<VehicleDataset>, LoadError> {
        if let Some(cached) = self.entries.get(path) {
            log::debug!("dataset cache hit for {}", path.display());
            return Ok(Arc::clone(cached));
        }
        let dataset = Arc::new(load_file(path)?);
        self.entries.insert(path.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }
}

// ---------------------------------------------------------------------------
// Raw record shared by the CSV and JSON loaders
// ---------------------------------------------------------------------------

/// One source row before derivation. Numeric cells may be empty/null;
/// `model_year` is "integer-like" in the wild (sometimes `2011.0`), so it
/// is read as a float and truncated.
#[derive(Debug, Deserialize)]
struct RawListing {
    model: String,
    model_year: Option<f64>,
    price: Option<f64>,
    odometer: Option<f64>,
    condition: Option<String>,
}

impl RawListing {
    fn into_listing(self) -> Listing {
        Listing::new(
            self.model,
            self.model_year.map(|y| y as i64).unwrap_or(0),
            self.price.unwrap_or(f64::NAN),
            self.odometer.unwrap_or(f64::NAN),
            self.condition.unwrap_or_default(),
        )
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<VehicleDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;

    let mut listings = Vec::new();
    for (row_no, result) in reader.deserialize::<RawListing>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        listings.push(raw.into_listing());
    }

    Ok(VehicleDataset::from_listings(listings))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "model": "toyota camry", "model_year": 2015, "price": 12000,
///     "odometer": 50000, "condition": "good" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<VehicleDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let records: Vec<RawListing> = serde_json::from_str(&text).context("parsing JSON records")?;

    Ok(VehicleDataset::from_listings(
        records.into_iter().map(RawListing::into_listing).collect(),
    ))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with scalar listing columns.  Works with files
/// written by both Pandas (`df.to_parquet()`) and Polars
/// (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<VehicleDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut listings = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let model_idx = schema
            .index_of("model")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'model' column"))?;
        let year_idx = schema
            .index_of("model_year")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'model_year' column"))?;
        let price_idx = schema
            .index_of("price")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'price' column"))?;
        let odometer_idx = schema
            .index_of("odometer")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'odometer' column"))?;
        let condition_idx = schema
            .index_of("condition")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'condition' column"))?;

        for row in 0..batch.num_rows() {
            let model = string_at(batch.column(model_idx), row).unwrap_or_default();
            let model_year = i64_at(batch.column(year_idx), row).unwrap_or(0);
            let price = f64_at(batch.column(price_idx), row).unwrap_or(f64::NAN);
            let odometer = f64_at(batch.column(odometer_idx), row).unwrap_or(f64::NAN);
            let condition = string_at(batch.column(condition_idx), row).unwrap_or_default();

            listings.push(Listing::new(model, model_year, price, odometer, condition));
        }
    }

    Ok(VehicleDataset::from_listings(listings))
}

// -- Arrow scalar helpers --

fn string_at(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|arr| arr.value(row).to_string()),
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            Some(arr.value(row).to_string())
        }
        _ => None,
    }
}

fn i64_at(col: &ArrayRef, row: usize) -> Option<i64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|arr| arr.value(row) as i64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|arr| arr.value(row)),
        // Pandas writes integer columns containing NaN as floats.
        DataType::Float32 | DataType::Float64 => f64_at(col, row).map(|v| v as i64),
        _ => None,
    }
}

fn f64_at(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|arr| arr.value(row) as f64),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|arr| arr.value(row)),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|arr| arr.value(row) as f64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|arr| arr.value(row) as f64),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map(|arr| arr.value(row) as u8 as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Manufacturer;
    use std::io::Write;

    fn write_fixture(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    const TOY_CSV: &str = "\
model,model_year,price,odometer,condition,fuel
toyota camry,2015,12000,50000,good,gas
honda civic,2018,15000,30000,excellent,gas
toyota corolla,2010,8000,90000,fair,gas
ford f150,2020,25000,10000,excellent,gas
";

    #[test]
    fn csv_loads_and_derives_manufacturers() {
        let file = write_fixture(".csv", TOY_CSV);
        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 4);
        assert_eq!(
            ds.listings[0].manufacturer,
            Manufacturer::Derived("Toyota".to_string())
        );
        assert_eq!(ds.listings[3].model_year, 2020);
        // The extra `fuel` column is ignored.
        assert_eq!(ds.listings[1].condition, "excellent");
    }

    #[test]
    fn empty_year_cell_maps_to_zero() {
        let csv = "model,model_year,price,odometer,condition\n\
                   gmc sierra,,7000,150000,fair\n";
        let file = write_fixture(".csv", csv);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.listings[0].model_year, 0);
    }

    #[test]
    fn float_year_cell_is_truncated() {
        let csv = "model,model_year,price,odometer,condition\n\
                   ram 1500,2011.0,14000,80000,good\n";
        let file = write_fixture(".csv", csv);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.listings[0].model_year, 2011);
    }

    #[test]
    fn missing_file_is_data_not_found() {
        let err = load_file(Path::new("no_such_vehicles.csv")).unwrap_err();
        assert!(matches!(err, LoadError::DataNotFound { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_fixture(".xlsx", "not really a spreadsheet");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn json_records_load() {
        let json = r#"[
            {"model": "toyota camry", "model_year": 2015, "price": 12000.0,
             "odometer": 50000.0, "condition": "good"},
            {"model": "ford f150", "model_year": null, "price": 25000.0,
             "odometer": 10000.0, "condition": "excellent"}
        ]"#;
        let file = write_fixture(".json", json);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.listings[1].model_year, 0);
    }

    #[test]
    fn cache_memoizes_per_path() {
        let file = write_fixture(".csv", TOY_CSV);
        let mut cache = DatasetCache::new();

        let first = cache.load(file.path()).unwrap();
        let second = cache.load(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn cache_keys_distinguish_paths() {
        let four_rows = write_fixture(".csv", TOY_CSV);
        let one_row = write_fixture(
            ".csv",
            "model,model_year,price,odometer,condition\nkia rio,2016,9500,55000,good\n",
        );

        let mut cache = DatasetCache::new();
        let a = cache.load(four_rows.path()).unwrap();
        let b = cache.load(one_row.path()).unwrap();
        assert_eq!(a.len(), 4);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn cache_propagates_missing_file() {
        let mut cache = DatasetCache::new();
        let err = cache.load(Path::new("still_missing.csv")).unwrap_err();
        assert!(matches!(err, LoadError::DataNotFound { .. }));
    }
}
