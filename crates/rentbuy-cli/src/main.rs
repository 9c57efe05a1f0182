mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::buy_rent::EvaluateArgs;
use commands::mortgage::AmortizeArgs;
use commands::portfolio::{AnalyzeArgs, AverageRateArgs, CitySummaryArgs};

/// Buy-versus-rent analysis for residential listings
#[derive(Parser)]
#[command(
    name = "rvb",
    version,
    about = "Buy-versus-rent analysis for residential listings",
    long_about = "Evaluates whether buying a listed property with a home loan or renting it \
                  and investing the difference leaves more wealth at the end of the horizon. \
                  Reports flip thresholds for interest rate, rent and holding period."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every listing in a property CSV
    Analyze(AnalyzeArgs),
    /// Evaluate a single listing
    Evaluate(EvaluateArgs),
    /// Monthly installment and yearly amortization schedule
    Amortize(AmortizeArgs),
    /// City-level evaluation on average price and rent
    CitySummary(CitySummaryArgs),
    /// Average loan rate from a bank rates CSV
    AverageRate(AverageRateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // stdout carries the report
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::portfolio::run_analyze(args),
        Commands::Evaluate(args) => commands::buy_rent::run_evaluate(args),
        Commands::Amortize(args) => commands::mortgage::run_amortize(args),
        Commands::CitySummary(args) => commands::portfolio::run_city_summary(args),
        Commands::AverageRate(args) => commands::portfolio::run_average_rate(args),
        Commands::Version => {
            println!("rvb {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
