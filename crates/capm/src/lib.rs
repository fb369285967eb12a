#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/capm/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod align;
pub mod analysis;
pub mod beta;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod report;
pub mod returns;
pub mod series;
pub mod table;

// Re-export core types
pub use align::align;
pub use analysis::{Analysis, AnalysisReport};
pub use beta::{BetaAlpha, BetaEstimator, BetaEstimatorConfig};
pub use config::{
    AnalysisConfig, BENCHMARK_TICKER, DEFAULT_ASSETS, DEFAULT_BENCHMARK, DEFAULT_UNIVERSE,
};
pub use data::{read_prices_csv, series_from_frame};
pub use engine::{CapmConfig, CapmEngine, CapmResult, TRADING_DAYS_PER_YEAR};
pub use error::{CapmError, Result};
pub use normalize::normalize;
pub use report::{ReportSummary, round_to};
pub use returns::{compound, daily_returns};
pub use series::PriceSeries;
pub use table::{AlignedTable, NormalizedTable, ReturnTable, Table};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
