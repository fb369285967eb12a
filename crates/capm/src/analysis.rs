//! End-to-end analysis: align, normalize, returns, beta, CAPM.

use crate::{
    AlignedTable, AnalysisConfig, BetaAlpha, BetaEstimator, CapmEngine, CapmError, CapmResult,
    NormalizedTable, PriceSeries, Result, ReturnTable, align, daily_returns, normalize,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Fewest dates an asset must share with the benchmark to get one return pair.
const MIN_ALIGNED_ROWS: usize = 2;

/// Everything one run produces, for display by the caller.
#[derive(Debug)]
pub struct AnalysisReport {
    /// Closing prices on common dates
    pub prices: AlignedTable,
    /// Prices rescaled to start at 1.0
    pub normalized: NormalizedTable,
    /// Daily returns
    pub returns: ReturnTable,
    /// Beta and alpha per asset
    pub betas: BTreeMap<String, BetaAlpha>,
    /// CAPM expected annual return per asset
    pub capm: CapmResult,
    /// Assets excluded from the run and why
    pub skipped: BTreeMap<String, CapmError>,
}

impl AnalysisReport {
    /// Analysed asset symbols in input order.
    pub fn assets(&self) -> impl Iterator<Item = &str> + '_ {
        self.prices.asset_symbols()
    }
}

/// Runs the full pipeline for one configuration.
#[derive(Debug, Clone)]
pub struct Analysis {
    config: AnalysisConfig,
    estimator: BetaEstimator,
    engine: CapmEngine,
}

impl Analysis {
    /// Validate `config` and build the pipeline.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            estimator: BetaEstimator::with_config(config.beta_config()),
            engine: CapmEngine::with_config(config.capm_config()),
            config,
        })
    }

    /// Returns the current configuration.
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Pick the configured benchmark and assets out of `universe`, keeping the
    /// lookback window that ends just before `end`.
    ///
    /// A configured asset absent from `universe` comes back as an empty series
    /// so that [`run`](Self::run) reports it as skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CapmError::MissingColumn`] if the benchmark is absent.
    pub fn select(
        &self,
        universe: &[PriceSeries],
        end: NaiveDate,
    ) -> Result<(PriceSeries, Vec<PriceSeries>)> {
        let start = self.config.lookback_start(end);
        let find = |symbol: &str| universe.iter().find(|s| s.symbol() == symbol);

        let benchmark = find(self.config.benchmark.as_str())
            .ok_or_else(|| CapmError::MissingColumn(self.config.benchmark.clone()))?
            .window(start, end);
        let assets = self
            .config
            .assets
            .iter()
            .map(|symbol| {
                find(symbol.as_str()).map_or_else(
                    || PriceSeries::empty(symbol.as_str()),
                    |s| s.window(start, end),
                )
            })
            .collect();

        debug!(%start, %end, benchmark_rows = benchmark.len(), "selected lookback window");
        Ok((benchmark, assets))
    }

    /// Run the pipeline on already-fetched series.
    ///
    /// An asset sharing fewer than two dates with the benchmark is dropped and
    /// recorded in [`AnalysisReport::skipped`] as [`CapmError::InsufficientData`].
    /// Remaining assets are aligned together; every failure after that point
    /// affects all assets alike and aborts the run.
    ///
    /// The benchmark must carry the configured benchmark symbol and every asset
    /// must be one of the configured assets. [`Analysis::select`] produces
    /// series that satisfy both.
    ///
    /// # Errors
    ///
    /// - [`CapmError::InvalidSeries`] if a series is not part of the configuration
    /// - [`CapmError::InsufficientData`] if every asset was dropped or fewer than two rows align
    /// - [`CapmError::EmptyIntersection`] if the remaining series share no date
    /// - [`CapmError::DivisionByZero`] on a zero price
    /// - [`CapmError::DegenerateInput`] if benchmark returns have zero variance
    pub fn run(&self, benchmark: &PriceSeries, assets: &[PriceSeries]) -> Result<AnalysisReport> {
        self.check_selection(benchmark, assets)?;

        let mut skipped = BTreeMap::new();
        let mut usable = Vec::with_capacity(assets.len());
        let mut best_overlap = 0;

        for series in assets {
            let overlap = series.overlap(benchmark);
            best_overlap = best_overlap.max(overlap);
            if overlap < MIN_ALIGNED_ROWS {
                warn!(
                    asset = series.symbol(),
                    overlap, "asset shares too few dates with the benchmark, skipping"
                );
                skipped.insert(
                    series.symbol().to_string(),
                    CapmError::InsufficientData {
                        required: MIN_ALIGNED_ROWS,
                        available: overlap,
                    },
                );
            } else {
                usable.push(series.clone());
            }
        }

        if usable.is_empty() {
            return Err(CapmError::InsufficientData {
                required: MIN_ALIGNED_ROWS,
                available: best_overlap,
            });
        }

        let prices = align(benchmark, &usable)?;
        if prices.is_empty() {
            return Err(CapmError::EmptyIntersection);
        }
        if prices.height() < MIN_ALIGNED_ROWS {
            return Err(CapmError::InsufficientData {
                required: MIN_ALIGNED_ROWS,
                available: prices.height(),
            });
        }

        let normalized = normalize(&prices)?;
        let returns = daily_returns(&prices)?;
        debug!(rows = returns.height(), "computed daily returns");

        let betas = self.estimator.estimate_all(&returns)?;
        let capm = self.engine.evaluate(
            returns.benchmark_column(),
            betas.iter().map(|(s, fit)| (s.as_str(), fit.beta)),
        )?;

        info!(
            benchmark = benchmark.symbol(),
            assets = betas.len(),
            skipped = skipped.len(),
            rows = prices.height(),
            market_return = capm.market_return,
            "analysis complete"
        );

        Ok(AnalysisReport {
            prices,
            normalized,
            returns,
            betas,
            capm,
            skipped,
        })
    }

    fn check_selection(&self, benchmark: &PriceSeries, assets: &[PriceSeries]) -> Result<()> {
        if benchmark.symbol() != self.config.benchmark {
            return Err(CapmError::InvalidSeries(format!(
                "benchmark series {} does not match configured benchmark {}",
                benchmark.symbol(),
                self.config.benchmark
            )));
        }
        if let Some(series) = assets
            .iter()
            .find(|s| !self.config.assets.iter().any(|a| a == s.symbol()))
        {
            return Err(CapmError::InvalidSeries(format!(
                "asset {} is not in the configured asset list",
                series.symbol()
            )));
        }
        Ok(())
    }
}
