mod chart;
mod config;
mod data_fetcher;

use anyhow::Context;
use chrono::NaiveDate;
use chart::{ChartHandle, ChartKind};
use clap::{Parser, ValueEnum};
use config::Config;
use data_fetcher::{interval_for, MarketDataFetcher, SeriesWindow};
use dotenv::dotenv;
use std::path::PathBuf;
use std::time::Duration;
use stockcast_engine::forecast::{Extrapolation, PriceStrategy, Stride, TableLookup};
use stockcast_engine::presentation::forecast_table;
use stockcast_engine::{Analysis, Params, PipelineError, Symbol};
use stockcast_twelvedata::time_series::Interval;
use tracing::{error, info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Static per-symbol predictions
    Table,
    /// Fixed percentage growth per step from the last close
    Extrapolation,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker symbol to analyse (e.g. AAPL)
    symbol: String,

    /// How predicted prices are produced
    #[arg(long, value_enum, default_value_t = StrategyArg::Table)]
    strategy: StrategyArg,

    /// Per-step growth factor for the extrapolation strategy
    #[arg(long, default_value_t = 1.02)]
    growth: f64,

    /// Number of forecast steps
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..))]
    steps: u16,

    /// Spacing of forecast labels: 30min, 1h or 1day
    #[arg(long, default_value = "1day")]
    stride: Stride,

    /// Series interval to request (defaults to the stride)
    #[arg(long)]
    interval: Option<Interval>,

    /// Number of historical bars to request
    #[arg(long, default_value_t = 30)]
    output_size: u32,

    /// First day of history to request (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Last day of history to request (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Cash available for the purchase suggestion
    #[arg(long, default_value_t = 10_000.0)]
    balance: f64,

    /// Chart style
    #[arg(long, value_enum, default_value_t = ChartKind::Line)]
    chart: ChartKind,

    /// Chart image path (defaults to <symbol>_chart.png)
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, default_value_t = 1024)]
    width: u32,

    #[arg(long, default_value_t = 640)]
    height: u32,

    /// Print the chart dataset as JSON
    #[arg(long)]
    json: bool,

    /// Skip rendering the chart image
    #[arg(long)]
    no_chart: bool,

    /// Per-request timeout in seconds (0 disables it)
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

fn chart_path(symbol: &Symbol) -> PathBuf {
    let stem: String = symbol
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();

    PathBuf::from(format!("{stem}_chart.png"))
}

fn strategy(args: &Args) -> Result<Box<dyn PriceStrategy>, PipelineError> {
    match args.strategy {
        StrategyArg::Table => Ok(Box::new(TableLookup::default())),
        StrategyArg::Extrapolation if args.growth.is_finite() && args.growth > 0.0 => {
            Ok(Box::new(Extrapolation::new(args.growth)))
        }
        StrategyArg::Extrapolation => Err(PipelineError::InvalidInput(format!(
            "growth factor must be positive, got {}",
            args.growth
        ))),
    }
}

fn series_window(args: &Args) -> Result<SeriesWindow, PipelineError> {
    if let (Some(start), Some(end)) = (args.start_date, args.end_date) {
        if start > end {
            return Err(PipelineError::InvalidInput(format!(
                "start date {start} is after end date {end}"
            )));
        }
    }

    Ok(SeriesWindow {
        interval: args.interval.unwrap_or_else(|| interval_for(args.stride)),
        output_size: Some(args.output_size),
        start_date: args.start_date,
        end_date: args.end_date,
    })
}

async fn run(args: Args, config: Config) -> anyhow::Result<()> {
    let symbol = Symbol::parse(&args.symbol)?;
    let strategy = strategy(&args)?;
    let window = series_window(&args)?;

    let fetcher = MarketDataFetcher::new(&config)?;
    let fetched = fetcher
        .fetch(&symbol, &window)
        .instrument(info_span!("fetch", symbol = %symbol))
        .await?;

    let params = Params {
        steps: usize::from(args.steps),
        stride: args.stride,
        balance: args.balance,
    };
    info!(strategy = strategy.name(), steps = params.steps, "building forecast");

    let analysis = Analysis::run(
        symbol,
        &fetched.quote,
        &fetched.series,
        strategy.as_ref(),
        params,
    )
    .with_context(|| format!("Failed to analyse {}", args.symbol.trim()))?;

    println!("{}", analysis.report());
    if !analysis.forecast.is_empty() {
        println!();
        forecast_table(&analysis.forecast, analysis.label_format()).printstd();
    }

    let dataset = analysis.chart_dataset();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dataset)?);
    }

    if !args.no_chart {
        let path = args.output.clone().unwrap_or_else(|| chart_path(&analysis.symbol));
        let chart = ChartHandle::render(path, (args.width, args.height), args.chart, &dataset)
            .context("Failed to render chart")?;
        println!("\nChart written to {}", chart.path().display());
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,stockcast=info,stockcast_engine=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args = Args::parse();

    let timeout = (args.timeout_secs > 0).then(|| Duration::from_secs(args.timeout_secs));
    let config = Config::from_env()
        .context("Failed to load API configuration")?
        .with_timeout(timeout);

    let rt = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;

    if let Err(e) = rt.block_on(run(args, config)) {
        error!("{e:#}");
        return Err(e);
    }

    Ok(())
}
