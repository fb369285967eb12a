//! Analysis parameters supplied by the caller.

use crate::{BetaEstimatorConfig, CapmConfig, CapmError, Result, TRADING_DAYS_PER_YEAR};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Column name used for the benchmark index.
pub const DEFAULT_BENCHMARK: &str = "sp500";

/// Market-data ticker of the S&P 500 index.
pub const BENCHMARK_TICKER: &str = "^GSPC";

/// Symbols offered for selection.
pub const DEFAULT_UNIVERSE: [&str; 8] = [
    "TSLA", "AAPL", "NFLX", "MGM", "MSFT", "AMZN", "NVDA", "GOOGL",
];

/// Symbols selected when none are given.
pub const DEFAULT_ASSETS: [&str; 4] = ["TSLA", "AAPL", "MSFT", "NFLX"];

/// Accepted lookback lengths in years.
pub const LOOKBACK_YEARS: RangeInclusive<u32> = 1..=10;

/// Parameters for one analysis run.
///
/// Replaces any implicit selection state: everything the run depends on is here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Benchmark column name (default: `sp500`)
    pub benchmark: String,
    /// Asset symbols to analyse, in display order
    pub assets: Vec<String>,
    /// Years of history to fetch upstream (default: 1)
    pub lookback_years: u32,
    /// Annual risk-free rate (default: 0.0)
    pub risk_free_rate: f64,
    /// Trading days per year (default: 252)
    pub annualization_factor: f64,
    /// Fit per-asset regressions in parallel (default: true)
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            benchmark: DEFAULT_BENCHMARK.to_string(),
            assets: DEFAULT_ASSETS.iter().map(|s| s.to_string()).collect(),
            lookback_years: 1,
            risk_free_rate: 0.0,
            annualization_factor: TRADING_DAYS_PER_YEAR,
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| CapmError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the parameters describe a runnable analysis.
    pub fn validate(&self) -> Result<()> {
        if self.benchmark.is_empty() {
            return Err(CapmError::InvalidConfig("benchmark name is empty".to_string()));
        }
        if self.assets.is_empty() {
            return Err(CapmError::InvalidConfig("no assets selected".to_string()));
        }

        let mut seen = HashSet::new();
        for asset in &self.assets {
            if asset == &self.benchmark {
                return Err(CapmError::InvalidConfig(format!(
                    "asset {asset} collides with the benchmark column"
                )));
            }
            if !seen.insert(asset.as_str()) {
                return Err(CapmError::InvalidConfig(format!("asset {asset} listed twice")));
            }
        }

        if !LOOKBACK_YEARS.contains(&self.lookback_years) {
            return Err(CapmError::InvalidConfig(format!(
                "lookback of {} years outside {}..={}",
                self.lookback_years,
                LOOKBACK_YEARS.start(),
                LOOKBACK_YEARS.end()
            )));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(CapmError::InvalidConfig("risk-free rate must be finite".to_string()));
        }
        if !(self.annualization_factor.is_finite() && self.annualization_factor > 0.0) {
            return Err(CapmError::InvalidConfig(
                "annualization factor must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// First date of the lookback window ending at `end`.
    ///
    /// Month ends are clamped, so 29 February steps back to 28 February.
    pub fn lookback_start(&self, end: NaiveDate) -> NaiveDate {
        end.checked_sub_months(Months::new(12 * self.lookback_years))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Settings for the CAPM stage.
    pub const fn capm_config(&self) -> CapmConfig {
        CapmConfig {
            risk_free_rate: self.risk_free_rate,
            annualization_factor: self.annualization_factor,
        }
    }

    /// Settings for the beta stage.
    pub fn beta_config(&self) -> BetaEstimatorConfig {
        BetaEstimatorConfig {
            parallel: self.parallel,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.benchmark, "sp500");
        assert_eq!(config.assets, vec!["TSLA", "AAPL", "MSFT", "NFLX"]);
        assert_eq!(config.lookback_years, 1);
        assert_eq!(config.risk_free_rate, 0.0);
        assert_eq!(config.annualization_factor, 252.0);
        assert!(config.validate().is_ok());
        assert!(config.assets.iter().all(|a| DEFAULT_UNIVERSE.contains(&a.as_str())));
    }

    #[test]
    fn test_from_toml_partial() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            assets = ["NVDA", "AMZN"]
            lookback_years = 3
            risk_free_rate = 0.045
            "#,
        )
        .unwrap();

        assert_eq!(config.assets, vec!["NVDA", "AMZN"]);
        assert_eq!(config.lookback_years, 3);
        assert_eq!(config.risk_free_rate, 0.045);
        assert_eq!(config.benchmark, "sp500");
        assert_eq!(config.capm_config().annualization_factor, 252.0);
    }

    #[test]
    fn test_from_toml_rejects_bad_types() {
        let err = AnalysisConfig::from_toml_str("lookback_years = \"two\"").unwrap_err();
        assert!(matches!(err, CapmError::InvalidConfig(_)));
    }

    #[rstest]
    #[case::no_assets(AnalysisConfig { assets: vec![], ..Default::default() })]
    #[case::duplicate(AnalysisConfig { assets: vec!["AAPL".into(), "AAPL".into()], ..Default::default() })]
    #[case::benchmark_as_asset(AnalysisConfig { assets: vec!["sp500".into()], ..Default::default() })]
    #[case::zero_years(AnalysisConfig { lookback_years: 0, ..Default::default() })]
    #[case::too_many_years(AnalysisConfig { lookback_years: 11, ..Default::default() })]
    #[case::nan_rate(AnalysisConfig { risk_free_rate: f64::NAN, ..Default::default() })]
    #[case::zero_factor(AnalysisConfig { annualization_factor: 0.0, ..Default::default() })]
    fn test_validate_rejects(#[case] config: AnalysisConfig) {
        assert!(matches!(config.validate(), Err(CapmError::InvalidConfig(_))));
    }

    #[rstest]
    #[case(1, "2024-10-17", "2023-10-17")]
    #[case(5, "2024-10-17", "2019-10-17")]
    #[case(1, "2024-02-29", "2023-02-28")]
    fn test_lookback_start(#[case] years: u32, #[case] end: &str, #[case] expected: &str) {
        let config = AnalysisConfig {
            lookback_years: years,
            ..Default::default()
        };
        let end = NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap();
        let expected = NaiveDate::parse_from_str(expected, "%Y-%m-%d").unwrap();
        assert_eq!(config.lookback_start(end), expected);
    }

    #[test]
    fn test_beta_config_follows_parallel_flag() {
        let config = AnalysisConfig {
            parallel: false,
            ..Default::default()
        };
        assert!(!config.beta_config().parallel);
        assert_eq!(config.beta_config().min_observations, 2);
    }
}
