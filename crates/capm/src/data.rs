//! Loading long-format price data.
//!
//! Input frames hold one row per observation with columns `symbol`, `date`
//! (`YYYY-MM-DD` string or `Date`) and `close`.

use crate::{CapmError, PriceSeries, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Columns required in a long-format price frame.
pub const REQUIRED_COLUMNS: [&str; 3] = ["symbol", "date", "close"];

/// Split a long-format frame into one series per symbol.
///
/// Series come back in order of each symbol's first appearance, with
/// observations sorted by date.
pub fn series_from_frame(df: &DataFrame) -> Result<Vec<PriceSeries>> {
    for name in REQUIRED_COLUMNS {
        if df.column(name).is_err() {
            return Err(CapmError::MissingColumn(name.to_string()));
        }
    }

    let symbols = df.column("symbol")?.cast(&DataType::String)?;
    let dates = df.column("date")?.cast(&DataType::String)?;
    let closes = df.column("close")?.cast(&DataType::Float64)?;

    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<(NaiveDate, f64)>> = HashMap::new();

    for (row, ((symbol, date), close)) in symbols
        .str()?
        .into_iter()
        .zip(dates.str()?.into_iter())
        .zip(closes.f64()?.into_iter())
        .enumerate()
    {
        let (Some(symbol), Some(date), Some(close)) = (symbol, date, close) else {
            return Err(CapmError::InvalidSeries(format!("row {row} has a null field")));
        };
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
            CapmError::InvalidSeries(format!("row {row}: bad date {date:?}: {e}"))
        })?;

        if !grouped.contains_key(symbol) {
            order.push(symbol.to_string());
        }
        grouped.entry(symbol.to_string()).or_default().push((date, close));
    }

    debug!(rows = df.height(), symbols = order.len(), "split price frame");

    order
        .into_iter()
        .map(|symbol| {
            let mut points = grouped.remove(&symbol).unwrap_or_default();
            points.sort_by_key(|(d, _)| *d);
            PriceSeries::new(symbol, points)
        })
        .collect()
}

/// Read a long-format CSV file and split it into series.
pub fn read_prices_csv(path: impl AsRef<Path>) -> Result<Vec<PriceSeries>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()?;

    series_from_frame(&df)
}
