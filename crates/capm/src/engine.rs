//! Capital Asset Pricing Model expected returns.
//!
//! `E[R_i] = r_f + β_i · (r_m - r_f)`, where `r_m` is the benchmark's mean daily
//! return scaled by an annualization factor.

use crate::{CapmError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Trading days per year used to annualize mean daily returns.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Configuration for the CAPM engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapmConfig {
    /// Annual risk-free rate (default: 0.0)
    pub risk_free_rate: f64,
    /// Multiplier turning a mean daily return into an annual one (default: 252)
    pub annualization_factor: f64,
}

impl Default for CapmConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0,
            annualization_factor: TRADING_DAYS_PER_YEAR,
        }
    }
}

/// Expected annual returns implied by each asset's beta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapmResult {
    /// Annualized benchmark return `r_m`
    pub market_return: f64,
    /// Risk-free rate `r_f` used for the result
    pub risk_free_rate: f64,
    /// Expected annual return per symbol
    pub expected_returns: BTreeMap<String, f64>,
}

impl CapmResult {
    /// Expected return for `symbol`.
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.expected_returns.get(symbol).copied()
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.expected_returns.len()
    }

    /// Whether no symbol was priced.
    pub fn is_empty(&self) -> bool {
        self.expected_returns.is_empty()
    }
}

/// Combines benchmark returns and asset betas into CAPM expected returns.
#[derive(Debug, Clone, Default)]
pub struct CapmEngine {
    config: CapmConfig,
}

impl CapmEngine {
    /// Create an engine with `r_f = 0` and 252 trading days.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a custom configuration.
    pub const fn with_config(config: CapmConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub const fn config(&self) -> &CapmConfig {
        &self.config
    }

    /// Annualized mean of the benchmark's daily returns.
    ///
    /// # Errors
    ///
    /// Returns [`CapmError::InsufficientData`] if there are no returns.
    pub fn market_return(&self, benchmark_returns: &[f64]) -> Result<f64> {
        if benchmark_returns.is_empty() {
            return Err(CapmError::InsufficientData {
                required: 1,
                available: 0,
            });
        }
        let mean = benchmark_returns.iter().sum::<f64>() / benchmark_returns.len() as f64;
        Ok(mean * self.config.annualization_factor)
    }

    /// `r_f + beta · (r_m - r_f)`.
    pub fn expected_return(&self, beta: f64, market_return: f64) -> f64 {
        let rf = self.config.risk_free_rate;
        rf + beta * (market_return - rf)
    }

    /// Price every `(symbol, beta)` pair against the benchmark's return history.
    pub fn evaluate<'a, I>(&self, benchmark_returns: &[f64], betas: I) -> Result<CapmResult>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let market_return = self.market_return(benchmark_returns)?;
        let expected_returns: BTreeMap<String, f64> = betas
            .into_iter()
            .map(|(symbol, beta)| (symbol.to_string(), self.expected_return(beta, market_return)))
            .collect();

        debug!(
            market_return,
            risk_free_rate = self.config.risk_free_rate,
            assets = expected_returns.len(),
            "computed CAPM expected returns"
        );

        Ok(CapmResult {
            market_return,
            risk_free_rate: self.config.risk_free_rate,
            expected_returns,
        })
    }
}
