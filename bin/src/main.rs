//! CLI for beta and CAPM expected-return analysis.
//!
//! Reads long-format closing prices (`symbol,date,close`) from a CSV file,
//! runs the analysis pipeline, and prints the merged, normalized, beta and
//! expected-return tables.

use anyhow::{Context, Result};
use capm::{
    Analysis, AnalysisConfig, AnalysisReport, BENCHMARK_TICKER, DEFAULT_ASSETS, DEFAULT_UNIVERSE,
    PriceSeries, read_prices_csv,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "capm")]
#[command(about = "Market beta and CAPM expected returns against a benchmark index", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the symbols offered for selection
    Universe,
    /// Compute beta and CAPM expected returns from a price file
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// CSV file with columns symbol, date, close
    #[arg(long)]
    prices: PathBuf,
    /// TOML file with analysis settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Benchmark symbol in the price file
    #[arg(long)]
    benchmark: Option<String>,
    /// Comma-separated asset symbols
    #[arg(long, value_delimiter = ',')]
    assets: Option<Vec<String>>,
    /// Years of history to analyse
    #[arg(long)]
    years: Option<u32>,
    /// Annual risk-free rate
    #[arg(long)]
    risk_free_rate: Option<f64>,
    /// Last date to include (default: latest benchmark date)
    #[arg(long)]
    end: Option<NaiveDate>,
    /// Rows shown from each end of the price tables
    #[arg(long, default_value_t = 5)]
    rows: usize,
    /// Decimal places in result tables
    #[arg(long, default_value_t = 2)]
    decimals: u32,
    /// Print a JSON summary instead of tables
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "capm=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Universe => {
            list_universe();
            Ok(())
        }
        Commands::Analyze(args) => analyze(&args),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// List the selectable symbols and the default selection.
fn list_universe() {
    println!("Benchmark: {} ({})", capm::DEFAULT_BENCHMARK, BENCHMARK_TICKER);
    println!("\nAvailable symbols:");
    for symbol in DEFAULT_UNIVERSE {
        let marker = if DEFAULT_ASSETS.contains(&symbol) { " (default)" } else { "" };
        println!("  {symbol}{marker}");
    }
}

/// Merge the optional config file with command-line overrides.
fn build_config(args: &AnalyzeArgs) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            AnalysisConfig::from_toml_str(&text)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => AnalysisConfig::default(),
    };

    if let Some(benchmark) = &args.benchmark {
        config.benchmark = benchmark.clone();
    }
    if let Some(assets) = &args.assets {
        config.assets = assets.clone();
    }
    if let Some(years) = args.years {
        config.lookback_years = years;
    }
    if let Some(rate) = args.risk_free_rate {
        config.risk_free_rate = rate;
    }

    config.validate()?;
    Ok(config)
}

/// Day after the last date to include, so the window keeps `end` itself.
fn window_end(
    args: &AnalyzeArgs,
    config: &AnalysisConfig,
    universe: &[PriceSeries],
) -> Result<NaiveDate> {
    let last = match args.end {
        Some(end) => end,
        None => universe
            .iter()
            .find(|s| s.symbol() == config.benchmark)
            .and_then(PriceSeries::date_range)
            .map(|(_, last)| last)
            .with_context(|| format!("no prices for benchmark {}", config.benchmark))?,
    };
    Ok(last.succ_opt().unwrap_or(last))
}

/// Run the analysis and print the results.
fn analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = build_config(args)?;
    let universe = read_prices_csv(&args.prices)
        .with_context(|| format!("cannot load prices from {}", args.prices.display()))?;
    info!(
        path = %args.prices.display(),
        symbols = universe.len(),
        "loaded price file"
    );

    let end = window_end(args, &config, &universe)?;
    let analysis = Analysis::new(config)?;
    let (benchmark, assets) = analysis.select(&universe, end)?;
    let report = analysis.run(&benchmark, &assets)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.summary(args.decimals))?);
    } else {
        print_tables(&report, args.rows, args.decimals)?;
    }
    Ok(())
}

/// Print head and tail of the price tables followed by the result tables.
fn print_tables(report: &AnalysisReport, rows: usize, decimals: u32) -> Result<()> {
    println!("Prices (head)\n{}", report.prices.head(rows).to_frame()?);
    println!("Prices (tail)\n{}", report.prices.tail(rows).to_frame()?);
    println!("Normalized prices (head)\n{}", report.normalized.head(rows).to_frame()?);
    println!("Normalized prices (tail)\n{}", report.normalized.tail(rows).to_frame()?);

    println!("Beta\n{}", report.beta_frame(decimals)?);
    println!("Expected return (CAPM)\n{}", report.capm_frame(decimals)?);
    println!(
        "Market return: {:.*}  Risk-free rate: {}",
        decimals as usize, report.capm.market_return, report.capm.risk_free_rate
    );

    for (symbol, reason) in &report.skipped {
        println!("Skipped {symbol}: {reason}");
    }
    Ok(())
}
