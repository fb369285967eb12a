//! Date-indexed tables with one column per symbol.
//!
//! [`AlignedTable`], [`NormalizedTable`] and [`ReturnTable`] share the same
//! layout and differ only in a marker type, so a normalized table can be shown
//! but never handed to the return calculator.

use crate::{CapmError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use std::marker::PhantomData;
use std::ops::Range;

/// Name of the date column in exported frames.
pub const DATE_COLUMN: &str = "date";

/// Marker for closing prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prices {}

/// Marker for prices rescaled to start at 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalized {}

/// Marker for fractional daily returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Returns {}

/// Closing prices on the dates shared by every input series.
pub type AlignedTable = Table<Prices>;

/// Prices divided by their first-row value.
pub type NormalizedTable = Table<Normalized>;

/// Daily returns; one row fewer than the price table it came from.
pub type ReturnTable = Table<Returns>;

/// Column-major table keyed by ascending date.
///
/// Every column has exactly one value per date and one column is designated
/// as the benchmark. Tables are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<K> {
    dates: Vec<NaiveDate>,
    benchmark: String,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    kind: PhantomData<K>,
}

impl<K> Table<K> {
    pub(crate) fn from_parts(
        dates: Vec<NaiveDate>,
        benchmark: String,
        names: Vec<String>,
        columns: Vec<Vec<f64>>,
    ) -> Self {
        debug_assert_eq!(names.len(), columns.len());
        debug_assert!(columns.iter().all(|c| c.len() == dates.len()));
        debug_assert!(names.contains(&benchmark));
        Self {
            dates,
            benchmark,
            names,
            columns,
            kind: PhantomData,
        }
    }

    /// Row dates in ascending order.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.dates.len()
    }

    /// Number of columns, benchmark included.
    pub fn width(&self) -> usize {
        self.names.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Name of the benchmark column.
    pub fn benchmark(&self) -> &str {
        &self.benchmark
    }

    /// All column names in table order.
    pub fn symbols(&self) -> &[String] {
        &self.names
    }

    /// Column names other than the benchmark, in table order.
    pub fn asset_symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .filter(move |n| *n != self.benchmark)
    }

    /// Values of the named column.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Values of the named column, or [`CapmError::MissingColumn`].
    pub fn require_column(&self, name: &str) -> Result<&[f64]> {
        self.column(name)
            .ok_or_else(|| CapmError::MissingColumn(name.to_string()))
    }

    /// Values of the benchmark column.
    pub fn benchmark_column(&self) -> &[f64] {
        self.column(&self.benchmark).unwrap_or_default()
    }

    /// `(name, values)` pairs in table order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Self {
        self.slice(0..n.min(self.height()))
    }

    /// Last `n` rows.
    pub fn tail(&self, n: usize) -> Self {
        let height = self.height();
        self.slice(height.saturating_sub(n)..height)
    }

    fn slice(&self, rows: Range<usize>) -> Self {
        Self::from_parts(
            self.dates[rows.clone()].to_vec(),
            self.benchmark.clone(),
            self.names.clone(),
            self.columns.iter().map(|c| c[rows.clone()].to_vec()).collect(),
        )
    }

    /// Export as a DataFrame with a `date` column followed by one `f64` column per symbol.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let epoch = NaiveDate::default();
        let days: Vec<i32> = self
            .dates
            .iter()
            .map(|d| d.signed_duration_since(epoch).num_days() as i32)
            .collect();

        let mut frame_columns = Vec::with_capacity(self.width() + 1);
        frame_columns.push(Column::from(
            Series::new(DATE_COLUMN.into(), days).cast(&DataType::Date)?,
        ));
        for (name, values) in self.columns() {
            frame_columns.push(Column::new(name.into(), values));
        }

        Ok(DataFrame::new(frame_columns)?)
    }
}
