//! CLI definition and dispatch.
//!
//! Every command prints one JSON document to stdout. Diagnostics go through
//! `tracing` to stderr, and failures map to an exit code via
//! `From<&StockscopeError> for ExitCode`.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analysis::analyze;
use crate::domain::error::StockscopeError;
use crate::domain::evaluate::{EvaluationResult, SymbolPerformance, evaluate};
use crate::domain::indicator::{
    SignalRecord, compute_atr, compute_mfi, compute_rsi_signals, compute_sma_signals,
};
use crate::domain::params::IndicatorParams;
use crate::domain::series::{PriceSeries, normalize};
use crate::domain::stats::compute_summary_stats;
use crate::domain::universe::{load_universe, parse_symbols};
use crate::logging::{self, LogSettings};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

#[derive(Parser, Debug)]
#[command(
    name = "stockscope",
    about = "Technical indicators and signal backtests over daily price data"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Log filter, e.g. `debug` or `stockscope=trace`
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Directory holding `<SYMBOL>.csv` files
    #[arg(short, long)]
    pub data: Option<PathBuf>,
    /// Comma-separated symbols; defaults to `[data] symbols`, then every CSV in the data directory
    #[arg(short, long)]
    pub symbols: Option<String>,
    /// First date (inclusive), YYYY-MM-DD
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Last date (inclusive), YYYY-MM-DD
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    Sma,
    Rsi,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summary statistics, RSI signals, ATR and MFI in one document
    Analyze {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Buy/hold/sell signals
    Signals {
        #[command(flatten)]
        data: DataArgs,
        #[arg(long, value_enum, default_value_t = IndicatorKind::Sma)]
        indicator: IndicatorKind,
    },
    /// Average true range
    Atr {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Money flow index
    Mfi {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Average return, volatility and max drawdown
    Stats {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Generate signals and evaluate them as long-only trades
    Backtest {
        #[command(flatten)]
        data: DataArgs,
        #[arg(long, value_enum, default_value_t = IndicatorKind::Sma)]
        indicator: IndicatorKind,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
    /// Show the date range and row count per symbol
    Info {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Check a configuration file without running anything
    Validate,
    /// Start the JSON tool server
    Serve {
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Address to bind, e.g. 127.0.0.1:3000
        #[arg(long)]
        listen: Option<String>,
    },
}

impl Command {
    fn data_dir_override(&self) -> Option<&Path> {
        match self {
            Command::Analyze { data }
            | Command::Signals { data, .. }
            | Command::Atr { data }
            | Command::Mfi { data }
            | Command::Stats { data }
            | Command::Backtest { data, .. }
            | Command::Info { data } => data.data.as_deref(),
            Command::ListSymbols { data } | Command::Serve { data, .. } => data.as_deref(),
            Command::Validate => None,
        }
    }
}

/// Symbols and inclusive date range a command operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRequest {
    pub symbols: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    pub indicator: IndicatorKind,
    pub signal_count: usize,
    #[serde(flatten)]
    pub result: EvaluationResult,
    pub per_symbol: BTreeMap<String, SymbolPerformance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolRange {
    pub symbol: String,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub rows: usize,
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match &cli.global.config {
        Some(path) => FileConfigAdapter::from_file(path),
        None => Ok(FileConfigAdapter::empty()),
    };

    let settings = match &config {
        Ok(c) => LogSettings::resolve(c, cli.global.log_level.as_deref(), cli.global.log_json),
        Err(_) => LogSettings::resolve(
            &FileConfigAdapter::empty(),
            cli.global.log_level.as_deref(),
            cli.global.log_json,
        ),
    };
    logging::init(&settings);

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "failed to load config");
            return (&e).into();
        }
    };
    info!(source = config.source(), "configuration loaded");

    if matches!(cli.command, Command::Validate) && cli.global.config.is_none() {
        error!("--config is required for validate");
        return ExitCode::from(2);
    }

    let data_dir = resolve_data_dir(cli.command.data_dir_override(), &config);

    let outcome = match &cli.command {
        Command::Serve { listen, .. } => run_serve(&config, data_dir, listen.as_deref()),
        command => {
            let port = CsvAdapter::new(data_dir);
            execute(command, &config, &port).and_then(|value| emit(&value, cli.global.compact))
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            (&e).into()
        }
    }
}

/// Run a non-serving command against `port` and return its JSON document.
pub fn execute(
    command: &Command,
    config: &dyn ConfigPort,
    port: &dyn DataPort,
) -> Result<Value, StockscopeError> {
    match command {
        Command::Analyze { data } => {
            let params = load_params(config)?;
            let series = load_series(port, &resolve_data_request(data, config, port)?)?;
            Ok(serde_json::to_value(analyze(&series, &params))?)
        }
        Command::Signals { data, indicator } => {
            let params = load_params(config)?;
            let series = load_series(port, &resolve_data_request(data, config, port)?)?;
            Ok(serde_json::to_value(signals_for(&series, &params, *indicator))?)
        }
        Command::Atr { data } => {
            let params = load_params(config)?;
            let series = load_series(port, &resolve_data_request(data, config, port)?)?;
            Ok(serde_json::to_value(compute_atr(&series, params.atr_period))?)
        }
        Command::Mfi { data } => {
            let params = load_params(config)?;
            let series = load_series(port, &resolve_data_request(data, config, port)?)?;
            Ok(serde_json::to_value(compute_mfi(&series, params.mfi_period))?)
        }
        Command::Stats { data } => {
            let series = load_series(port, &resolve_data_request(data, config, port)?)?;
            Ok(serde_json::to_value(compute_summary_stats(&series))?)
        }
        Command::Backtest { data, indicator } => {
            let params = load_params(config)?;
            let series = load_series(port, &resolve_data_request(data, config, port)?)?;
            Ok(serde_json::to_value(run_backtest(series, &params, *indicator))?)
        }
        Command::ListSymbols { .. } => Ok(serde_json::to_value(port.list_symbols()?)?),
        Command::Info { data } => {
            let request = resolve_data_request(data, config, port)?;
            Ok(serde_json::to_value(collect_ranges(port, &request.symbols)?)?)
        }
        Command::Validate => validate_config(config),
        Command::Serve { .. } => Err(StockscopeError::ConfigInvalid {
            section: "cli".to_string(),
            key: "serve".to_string(),
            reason: "serve does not produce a document".to_string(),
        }),
    }
}

pub fn resolve_data_dir(override_dir: Option<&Path>, config: &dyn ConfigPort) -> PathBuf {
    override_dir
        .map(Path::to_path_buf)
        .or_else(|| config.get_string("data", "path").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Command-line values win over `[data]`; with no symbols anywhere, every
/// symbol the port knows about is used. Missing dates leave that end open.
pub fn resolve_data_request(
    args: &DataArgs,
    config: &dyn ConfigPort,
    port: &dyn DataPort,
) -> Result<DataRequest, StockscopeError> {
    let symbols = match args
        .symbols
        .clone()
        .or_else(|| config.get_string("data", "symbols"))
    {
        Some(list) => parse_symbols(&list)?,
        None => port.list_symbols()?,
    };
    if symbols.is_empty() {
        return Err(StockscopeError::ConfigMissing {
            section: "data".to_string(),
            key: "symbols".to_string(),
        });
    }

    let start = match args.start {
        Some(d) => d,
        None => config.get_date("data", "start_date")?.unwrap_or(NaiveDate::MIN),
    };
    let end = match args.end {
        Some(d) => d,
        None => config.get_date("data", "end_date")?.unwrap_or(NaiveDate::MAX),
    };
    if start > end {
        return Err(StockscopeError::ConfigInvalid {
            section: "data".to_string(),
            key: "start_date".to_string(),
            reason: format!("start {start} is after end {end}"),
        });
    }

    Ok(DataRequest {
        symbols,
        start,
        end,
    })
}

pub fn load_params(config: &dyn ConfigPort) -> Result<IndicatorParams, StockscopeError> {
    let params = IndicatorParams::from_config(config)?;
    params.validate()?;
    Ok(params)
}

pub fn load_series(
    port: &dyn DataPort,
    request: &DataRequest,
) -> Result<PriceSeries, StockscopeError> {
    let universe = load_universe(port, &request.symbols, request.start, request.end)?;
    if !universe.skipped.is_empty() {
        warn!(
            skipped = universe.skipped.len(),
            loaded = universe.loaded.len(),
            "some symbols were skipped"
        );
    }
    normalize(universe.records)
}

pub fn signals_for(
    series: &PriceSeries,
    params: &IndicatorParams,
    indicator: IndicatorKind,
) -> Vec<SignalRecord> {
    match indicator {
        IndicatorKind::Sma => compute_sma_signals(series, params.sma_short, params.sma_long),
        IndicatorKind::Rsi => compute_rsi_signals(
            series,
            params.rsi_period,
            params.rsi_overbought,
            params.rsi_oversold,
        ),
    }
}

pub fn run_backtest(
    series: PriceSeries,
    params: &IndicatorParams,
    indicator: IndicatorKind,
) -> BacktestReport {
    let signals = signals_for(&series, params, indicator);
    let records = series.into_records();
    let result = evaluate(&records, &signals);
    info!(
        trades = result.trade_count(),
        total_pnl = result.total_pnl,
        win_rate = result.win_rate,
        "backtest complete"
    );
    BacktestReport {
        indicator,
        signal_count: signals.len(),
        per_symbol: result.per_symbol(),
        result,
    }
}

/// Symbols with no rows or a failing source are logged and left out.
pub fn collect_ranges(
    port: &dyn DataPort,
    symbols: &[String],
) -> Result<Vec<SymbolRange>, StockscopeError> {
    let mut ranges = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        match port.get_data_range(symbol) {
            Ok(Some((first_date, last_date, rows))) => ranges.push(SymbolRange {
                symbol: symbol.clone(),
                first_date,
                last_date,
                rows,
            }),
            Ok(None) => warn!(symbol = %symbol, "no data found"),
            Err(e) => warn!(symbol = %symbol, error = %e, "data range lookup failed"),
        }
    }
    if ranges.is_empty() {
        return Err(StockscopeError::NoData {
            symbols: symbols.join(","),
        });
    }
    Ok(ranges)
}

/// Check every section the commands read and report the effective values.
pub fn validate_config(config: &dyn ConfigPort) -> Result<Value, StockscopeError> {
    let params = load_params(config)?;
    let symbols = match config.get_string("data", "symbols") {
        Some(list) => parse_symbols(&list)?,
        None => Vec::new(),
    };
    let start = config.get_date("data", "start_date")?;
    let end = config.get_date("data", "end_date")?;
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(StockscopeError::ConfigInvalid {
                section: "data".to_string(),
                key: "start_date".to_string(),
                reason: format!("start {s} is after end {e}"),
            });
        }
    }
    let listen = config
        .get_string("web", "listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    parse_listen(&listen)?;

    Ok(json!({
        "valid": true,
        "data": {
            "path": resolve_data_dir(None, config),
            "symbols": symbols,
            "start_date": start,
            "end_date": end,
        },
        "indicators": params,
        "web": { "listen": listen },
    }))
}

fn parse_listen(listen: &str) -> Result<std::net::SocketAddr, StockscopeError> {
    listen.parse().map_err(|e| StockscopeError::ConfigInvalid {
        section: "web".to_string(),
        key: "listen".to_string(),
        reason: format!("{listen:?}: {e}"),
    })
}

fn emit(value: &Value, compact: bool) -> Result<(), StockscopeError> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}")?;
    Ok(())
}

fn run_serve(
    config: &dyn ConfigPort,
    data_dir: PathBuf,
    listen: Option<&str>,
) -> Result<(), StockscopeError> {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};
        use std::sync::Arc;

        let listen = listen
            .map(str::to_string)
            .or_else(|| config.get_string("web", "listen"))
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let addr = parse_listen(&listen)?;

        let state = AppState {
            data_port: Arc::new(CsvAdapter::new(data_dir.clone())),
            params: load_params(config)?,
        };
        let router = build_router(state);

        info!(%addr, data = %data_dir.display(), "starting tool server");
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await
        })?;
        Ok(())
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = (config, data_dir, listen);
        Err(StockscopeError::ConfigInvalid {
            section: "web".to_string(),
            key: "serve".to_string(),
            reason: "built without the `web` feature".to_string(),
        })
    }
}
