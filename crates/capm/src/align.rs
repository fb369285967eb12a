//! Inner join of price series on date.

use crate::{AlignedTable, CapmError, PriceSeries, Result};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Merge a benchmark and asset series into one table on their common dates.
///
/// Only dates present in every input series are kept, in ascending order.
/// Asset columns follow input order and the benchmark column comes last.
/// An empty intersection yields a table with zero rows; the caller decides
/// whether that is an error.
///
/// # Errors
///
/// Returns [`CapmError::InvalidSeries`] if two inputs share a symbol.
pub fn align(benchmark: &PriceSeries, assets: &[PriceSeries]) -> Result<AlignedTable> {
    let mut seen = HashSet::with_capacity(assets.len() + 1);
    for symbol in assets.iter().chain(Some(benchmark)).map(PriceSeries::symbol) {
        if !seen.insert(symbol) {
            return Err(CapmError::InvalidSeries(format!(
                "duplicate symbol {symbol}"
            )));
        }
    }

    let mut common: BTreeSet<NaiveDate> = benchmark.dates().collect();
    for series in assets {
        let dates: BTreeSet<NaiveDate> = series.dates().collect();
        common.retain(|d| dates.contains(d));
    }
    let dates: Vec<NaiveDate> = common.into_iter().collect();

    let column_of = |series: &PriceSeries| -> Vec<f64> {
        dates.iter().filter_map(|d| series.get(*d)).collect()
    };

    let mut names: Vec<String> = assets.iter().map(|s| s.symbol().to_string()).collect();
    let mut columns: Vec<Vec<f64>> = assets.iter().map(column_of).collect();
    names.push(benchmark.symbol().to_string());
    columns.push(column_of(benchmark));

    debug!(
        rows = dates.len(),
        columns = names.len(),
        benchmark_rows = benchmark.len(),
        "aligned price series"
    );

    Ok(AlignedTable::from_parts(
        dates,
        benchmark.symbol().to_string(),
        names,
        columns,
    ))
}
