//! Display-ready views of an [`AnalysisReport`].
//!
//! Rounding happens here and nowhere upstream.

use crate::{AnalysisReport, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;

/// Round `value` to `decimals` places.
///
/// `decimals` is capped at [`f64::DIGITS`]; finer rounding is a no-op on an `f64`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals.min(f64::DIGITS) as i32);
    (value * scale).round() / scale
}

/// One analysed asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSummary {
    /// Asset symbol
    pub symbol: String,
    /// Regression slope against the benchmark
    pub beta: f64,
    /// Regression intercept
    pub alpha: f64,
    /// CAPM expected annual return
    pub expected_return: f64,
}

/// An asset left out of the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedAsset {
    /// Asset symbol
    pub symbol: String,
    /// Why it was excluded
    pub reason: String,
}

/// Serializable summary of a run with rounded figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    /// Benchmark column name
    pub benchmark: String,
    /// First aligned date
    pub start: Option<NaiveDate>,
    /// Last aligned date
    pub end: Option<NaiveDate>,
    /// Number of aligned price rows
    pub observations: usize,
    /// Annualized benchmark return
    pub market_return: f64,
    /// Risk-free rate used
    pub risk_free_rate: f64,
    /// Analysed assets in input order
    pub assets: Vec<AssetSummary>,
    /// Excluded assets
    pub skipped: Vec<SkippedAsset>,
}

impl AnalysisReport {
    /// Rounded summary for display or serialization.
    pub fn summary(&self, decimals: u32) -> ReportSummary {
        let assets = self
            .assets()
            .filter_map(|symbol| {
                let fit = self.betas.get(symbol)?;
                let expected = self.capm.get(symbol)?;
                Some(AssetSummary {
                    symbol: symbol.to_string(),
                    beta: round_to(fit.beta, decimals),
                    alpha: round_to(fit.alpha, decimals),
                    expected_return: round_to(expected, decimals),
                })
            })
            .collect();

        let skipped = self
            .skipped
            .iter()
            .map(|(symbol, err)| SkippedAsset {
                symbol: symbol.clone(),
                reason: err.to_string(),
            })
            .collect();

        ReportSummary {
            benchmark: self.prices.benchmark().to_string(),
            start: self.prices.dates().first().copied(),
            end: self.prices.dates().last().copied(),
            observations: self.prices.height(),
            market_return: round_to(self.capm.market_return, decimals),
            risk_free_rate: self.capm.risk_free_rate,
            assets,
            skipped,
        }
    }

    /// Table of `symbol`, `beta`, `alpha`.
    pub fn beta_frame(&self, decimals: u32) -> Result<DataFrame> {
        let rows = self.summary(decimals).assets;
        let df = df![
            "symbol" => rows.iter().map(|r| r.symbol.as_str()).collect::<Vec<_>>(),
            "beta" => rows.iter().map(|r| r.beta).collect::<Vec<_>>(),
            "alpha" => rows.iter().map(|r| r.alpha).collect::<Vec<_>>(),
        ]?;
        Ok(df)
    }

    /// Table of `symbol`, `expected_return`.
    pub fn capm_frame(&self, decimals: u32) -> Result<DataFrame> {
        let rows = self.summary(decimals).assets;
        let df = df![
            "symbol" => rows.iter().map(|r| r.symbol.as_str()).collect::<Vec<_>>(),
            "expected_return" => rows.iter().map(|r| r.expected_return).collect::<Vec<_>>(),
        ]?;
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Analysis, AnalysisConfig, PriceSeries};
    use approx::assert_relative_eq;
    use chrono::Days;
    use rstest::rstest;

    #[rstest]
    #[case(1.413_046, 2, 1.41)]
    #[case(2.433_390, 2, 2.43)]
    #[case(-0.0162, 2, -0.02)]
    #[case(0.123_456, 4, 0.1235)]
    #[case(7.5, 0, 8.0)]
    #[case(1.234, 400, 1.234)]
    #[case(-0.0162, 3_000_000_000, -0.0162)]
    fn test_round_to(#[case] value: f64, #[case] decimals: u32, #[case] expected: f64) {
        assert_relative_eq!(round_to(value, decimals), expected, epsilon = 1e-12);
    }

    fn report() -> AnalysisReport {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let series = |symbol: &str, prices: &[f64]| {
            PriceSeries::new(
                symbol,
                prices
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (start + Days::new(i as u64), *p))
                    .collect(),
            )
            .unwrap()
        };
        let analysis = Analysis::new(AnalysisConfig {
            assets: vec!["TSLA".into(), "GOOGL".into()],
            ..Default::default()
        })
        .unwrap();

        analysis
            .run(
                &series("sp500", &[100.0, 101.0, 99.0, 102.0]),
                &[
                    series("TSLA", &[50.0, 51.0, 49.5, 51.5]),
                    PriceSeries::empty("GOOGL"),
                ],
            )
            .unwrap()
    }

    #[test]
    fn test_summary() {
        let summary = report().summary(2);

        assert_eq!(summary.benchmark, "sp500");
        assert_eq!(summary.observations, 4);
        assert_eq!(summary.start, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(summary.end, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_relative_eq!(summary.market_return, 1.72, epsilon = 1e-12);

        assert_eq!(summary.assets.len(), 1);
        let tsla = &summary.assets[0];
        assert_eq!(tsla.symbol, "TSLA");
        assert_relative_eq!(tsla.beta, 1.41, epsilon = 1e-12);
        assert_relative_eq!(tsla.expected_return, 2.43, epsilon = 1e-12);

        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].symbol, "GOOGL");
        assert!(summary.skipped[0].reason.contains("Insufficient data"));
    }

    #[test]
    fn test_frames() {
        let report = report();

        let betas = report.beta_frame(2).unwrap();
        assert_eq!(betas.shape(), (1, 3));
        let beta = betas.column("beta").unwrap().f64().unwrap().get(0).unwrap();
        assert_relative_eq!(beta, 1.41, epsilon = 1e-12);

        let capm = report.capm_frame(2).unwrap();
        assert_eq!(capm.shape(), (1, 2));
        let symbols = capm
            .column("symbol")
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect::<Vec<_>>();
        assert_eq!(symbols, vec!["TSLA"]);
    }
}
