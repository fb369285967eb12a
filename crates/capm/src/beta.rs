//! Market beta and alpha by ordinary least squares.
//!
//! Each asset's daily return is regressed on the benchmark's daily return:
//! `R_i = β · R_m + α`, with
//! `β = Cov(R_i, R_m) / Var(R_m)` and `α = mean(R_i) - β · mean(R_m)`.
//!
//! Regressions are independent per asset, so [`BetaEstimator::estimate_all`]
//! can fan out over a thread pool.

use crate::{CapmError, Result, ReturnTable};
use derive_more::Display;
use ndarray::ArrayView1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Slope and intercept of an asset's return regressed on the benchmark's.
#[derive(Debug, Display, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[display("beta={beta:.4} alpha={alpha:.6}")]
pub struct BetaAlpha {
    /// Regression slope: sensitivity to benchmark moves
    pub beta: f64,
    /// Regression intercept: daily return not explained by the benchmark
    pub alpha: f64,
}

/// Configuration for the beta estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetaEstimatorConfig {
    /// Minimum number of return observations (default: 2)
    pub min_observations: usize,
    /// Fit assets on the rayon thread pool (default: true)
    pub parallel: bool,
}

impl Default for BetaEstimatorConfig {
    fn default() -> Self {
        Self {
            min_observations: 2,
            parallel: true,
        }
    }
}

/// Per-asset OLS regression against the benchmark column of a [`ReturnTable`].
#[derive(Debug, Clone, Default)]
pub struct BetaEstimator {
    config: BetaEstimatorConfig,
}

impl BetaEstimator {
    /// Create an estimator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an estimator with a custom configuration.
    pub const fn with_config(config: BetaEstimatorConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub const fn config(&self) -> &BetaEstimatorConfig {
        &self.config
    }

    /// Fit beta and alpha for one asset column.
    ///
    /// # Errors
    ///
    /// - [`CapmError::MissingColumn`] if `asset` is not in the table
    /// - [`CapmError::InsufficientData`] if there are fewer rows than `min_observations`
    /// - [`CapmError::DegenerateInput`] if benchmark returns have zero variance
    pub fn estimate(&self, returns: &ReturnTable, asset: &str) -> Result<BetaAlpha> {
        let y = returns.require_column(asset)?;
        let fit = self.fit(returns.benchmark_column(), y)?;
        debug!(asset, %fit, rows = y.len(), "estimated beta");
        Ok(fit)
    }

    /// Fit every non-benchmark column.
    ///
    /// Fails fast on the first asset that cannot be fitted.
    pub fn estimate_all(&self, returns: &ReturnTable) -> Result<BTreeMap<String, BetaAlpha>> {
        let assets: Vec<&str> = returns.asset_symbols().collect();
        let fit_one = |asset: &&str| -> Result<(String, BetaAlpha)> {
            Ok((asset.to_string(), self.estimate(returns, asset)?))
        };

        if self.config.parallel && assets.len() > 1 {
            assets.par_iter().map(fit_one).collect()
        } else {
            assets.iter().map(fit_one).collect()
        }
    }

    /// Least-squares line `y ≈ beta · x + alpha`.
    pub fn fit(&self, x: &[f64], y: &[f64]) -> Result<BetaAlpha> {
        if x.len() != y.len() {
            return Err(CapmError::InvalidSeries(format!(
                "regression inputs differ in length ({} vs {})",
                x.len(),
                y.len()
            )));
        }
        let required = self.config.min_observations.max(2);
        if x.len() < required {
            return Err(CapmError::InsufficientData {
                required,
                available: x.len(),
            });
        }

        let x = ArrayView1::from(x);
        let y = ArrayView1::from(y);
        let (Some(x_mean), Some(y_mean)) = (x.mean(), y.mean()) else {
            return Err(CapmError::InsufficientData {
                required,
                available: 0,
            });
        };

        let dx = x.mapv(|v| v - x_mean);
        let dy = y.mapv(|v| v - y_mean);
        let sxx = dx.dot(&dx);

        // Relative to the raw sum of squares so constant non-zero series
        // register as flat despite rounding in the mean.
        if sxx <= f64::EPSILON * x.dot(&x) {
            return Err(CapmError::DegenerateInput(
                "benchmark returns have zero variance".to_string(),
            ));
        }

        let beta = dx.dot(&dy) / sxx;
        Ok(BetaAlpha {
            beta,
            alpha: y_mean - beta * x_mean,
        })
    }
}
