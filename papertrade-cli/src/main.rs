//! PaperTrade CLI — stock library listing, series inspection, scripted replay.
//!
//! Commands:
//! - `stocks` — list the CSV files in the stock data directory
//! - `inspect` — summarize one stock's series and its starting window
//! - `replay` — drive a paper-trading session from a script and save artifacts

mod replay;
mod script;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use papertrade_core::data::StockLibrary;
use papertrade_core::export::save_artifacts;
use papertrade_core::{DayCursor, Session, SessionSummary, SimConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "papertrade",
    about = "PaperTrade CLI — day-stepping paper-trading simulator"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Stock data directory. Overrides the config file.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stocks in the data directory with bar counts and date ranges.
    Stocks,
    /// Print a summary of one stock's series and its starting window.
    Inspect {
        /// Stock id (CSV file name without extension).
        stock: String,
    },
    /// Replay a script of steps and trades against one stock.
    Replay {
        /// Stock id to trade.
        #[arg(long, conflicts_with = "random")]
        stock: Option<String>,

        /// Pick a stock from the library at random.
        #[arg(long, default_value_t = false)]
        random: bool,

        /// Script file, one command per line.
        #[arg(long)]
        script: PathBuf,

        /// Output directory for trades.csv, snapshots.csv and summary.json.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.data_dir)?;

    match cli.command {
        Commands::Stocks => run_stocks(&config),
        Commands::Inspect { stock } => run_inspect(&config, &stock),
        Commands::Replay {
            stock,
            random,
            script,
            output_dir,
        } => run_replay(&config, stock, random, &script, &output_dir),
    }
}

fn load_config(path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<SimConfig> {
    let mut config = match path {
        Some(p) => SimConfig::from_file(p)?,
        None => SimConfig::default(),
    };
    if let Some(dir) = data_dir {
        config.data.dir = dir;
    }
    Ok(config)
}

fn run_stocks(config: &SimConfig) -> Result<()> {
    let library = StockLibrary::open(&config.data.dir)?;
    let entries = library.list()?;
    if entries.is_empty() {
        println!("No stock files in {}", library.dir().display());
        return Ok(());
    }

    println!("Stock data: {}", library.dir().display());
    println!("Stocks: {}", entries.len());
    println!();
    println!("{:<12} {:>8} {:<25}", "Stock", "Bars", "Date Range");
    println!("{}", "-".repeat(47));
    for entry in &entries {
        match library.load(&entry.stock_id) {
            Ok(bars) => {
                let range = match (bars.first(), bars.last()) {
                    (Some(first), Some(last)) => format!("{} to {}", first.date, last.date),
                    _ => String::new(),
                };
                println!("{:<12} {:>8} {:<25}", entry.stock_id, bars.len(), range);
            }
            Err(e) => println!("{:<12} {:>8} (unreadable: {e})", entry.stock_id, "-"),
        }
    }
    Ok(())
}

fn run_inspect(config: &SimConfig, stock: &str) -> Result<()> {
    let library = StockLibrary::open(&config.data.dir)?;
    let bars = library.load(stock)?;
    let cursor = DayCursor::new(bars.len(), config.view.window_size)?;
    let window = &bars[cursor.visible_window()];
    let current = &bars[cursor.current_index()];

    let (lo, hi) = window.iter().fold((f64::MAX, f64::MIN), |(lo, hi), b| {
        (lo.min(b.low), hi.max(b.high))
    });
    let insane = bars.iter().filter(|b| !b.is_sane()).count();

    println!();
    println!("=== {stock} ===");
    if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
        println!("Series:         {} to {}", first.date, last.date);
    }
    println!("Bars:           {}", bars.len());
    println!("Window:         {} bars", window.len());
    println!("Start day:      {} (close {:.2})", current.date, current.close);
    println!("Window range:   {lo:.2} to {hi:.2}");
    println!("Steppable days: {}", cursor.remaining());
    if cursor.is_exhausted() {
        println!();
        println!("NOTE: series fits in one window, no days left to step through");
    }
    if insane > 0 {
        println!("WARNING: {insane} bar(s) with inconsistent OHLC values");
    }
    println!();
    Ok(())
}

fn run_replay(
    config: &SimConfig,
    stock: Option<String>,
    random: bool,
    script_path: &Path,
    output_dir: &Path,
) -> Result<()> {
    let library = StockLibrary::open(&config.data.dir)?;
    let stock_id = match (stock, random) {
        (Some(id), false) => id,
        (None, true) => match library.pick_random(&mut rand::thread_rng())? {
            Some(entry) => entry.stock_id,
            None => bail!("no stock files in {}", library.dir().display()),
        },
        _ => bail!("one of --stock or --random is required"),
    };

    let source = std::fs::read_to_string(script_path)
        .with_context(|| format!("failed to read script: {}", script_path.display()))?;
    let lines = script::parse_script(&source)?;
    tracing::info!(stock_id = %stock_id, commands = lines.len(), "replay starting");

    let bars = library.load(&stock_id)?;
    let mut session = Session::new(stock_id.as_str(), bars, config)?;
    println!(
        "Trading {stock_id} from {} (close {:.2})",
        session.current_bar().date,
        session.current_price()
    );

    let mut rejected = 0usize;
    for (line, outcome) in replay::run(&mut session, &lines) {
        if outcome.is_rejection() {
            rejected += 1;
        }
        println!("[{line:>4}] {}", outcome.render());
    }

    print_summary(&session.summary(), rejected);

    let run_dir = save_artifacts(&session, output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());
    Ok(())
}

fn print_summary(summary: &SessionSummary, rejected: usize) {
    println!();
    println!("=== Session Summary ===");
    println!("Stock:          {}", summary.stock_id);
    println!(
        "Period:         {} to {} ({} days visited)",
        summary.start_date, summary.current_date, summary.days_visited
    );
    println!("Trades:         {} ({rejected} rejected)", summary.trade_count);
    println!();
    println!("--- Account ---");
    println!("Initial:        {:.2}", summary.initial_capital);
    println!("Cash:           {:.2}", summary.cash);
    println!(
        "Shares:         {} @ {:.2}",
        summary.shares, summary.last_price
    );
    println!("Value:          {:.2}", summary.portfolio_value);
    println!("Return:         {:.2}%", summary.cumulative_return_pct);
    println!("Realized P&L:   {:.2}", summary.realized_pnl);
    println!("Unrealized P&L: {:.2}", summary.unrealized_pnl);
    println!("Commission:     {:.2}", summary.total_commission);
    if summary.exhausted {
        println!();
        println!("NOTE: reached the end of the series");
    }
    println!();
}
