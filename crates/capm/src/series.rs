//! Closing-price series for a single symbol.

use crate::{CapmError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ordered `(date, close)` observations for one symbol.
///
/// Dates are strictly increasing. Gaps relative to other series are allowed;
/// they are resolved when series are aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<(NaiveDate, f64)>,
}

impl PriceSeries {
    /// Create a series, validating date order and price values.
    ///
    /// # Errors
    ///
    /// Returns [`CapmError::InvalidSeries`] if dates are not strictly increasing
    /// or a price is negative or not finite. A zero price is accepted here and
    /// rejected later by [`crate::normalize()`] and [`crate::daily_returns`].
    pub fn new(symbol: impl Into<String>, points: Vec<(NaiveDate, f64)>) -> Result<Self> {
        let symbol = symbol.into();

        if let Some(pair) = points.windows(2).find(|w| w[1].0 <= w[0].0) {
            return Err(CapmError::InvalidSeries(format!(
                "{symbol}: dates must be strictly increasing ({} then {})",
                pair[0].0, pair[1].0
            )));
        }
        if let Some((date, price)) = points.iter().find(|(_, p)| !p.is_finite()) {
            return Err(CapmError::InvalidSeries(format!(
                "{symbol}: non-finite price {price} on {date}"
            )));
        }
        if let Some((date, price)) = points.iter().find(|(_, p)| *p < 0.0) {
            return Err(CapmError::InvalidSeries(format!(
                "{symbol}: negative price {price} on {date}"
            )));
        }

        Ok(Self { symbol, points })
    }

    /// Create a series with no observations.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            points: Vec::new(),
        }
    }

    /// Symbol this series belongs to.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// All observations in date order.
    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Observation dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|(d, _)| *d)
    }

    /// First and last observation dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.0, self.points.last()?.0))
    }

    /// Closing price on `date`, if observed.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |(d, _)| *d)
            .ok()
            .map(|i| self.points[i].1)
    }

    /// Number of dates this series shares with `other`.
    pub fn overlap(&self, other: &Self) -> usize {
        self.dates().filter(|d| other.get(*d).is_some()).count()
    }

    /// Restrict the series to `start <= date < end`.
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: self.symbol.clone(),
            points: self
                .points
                .iter()
                .filter(|(d, _)| *d >= start && *d < end)
                .copied()
                .collect(),
        }
    }
}
