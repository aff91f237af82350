pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tradespend_core::config::{EngineConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "tradespend",
    about = "Trade-promotion analytics CLI",
    long_about = "Run the trade-promotion analytics engine over JSON snapshots: \
                  trading-term pricing, budget allocation, combination scoring, \
                  and pattern mining.",
    after_help = "Examples:\n  tradespend price --terms terms.json --order order.json\n  \
                  tradespend allocate --budget budget.json\n  \
                  tradespend mine --combinations combos.json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, global = true, help = "Path to a tradespend.toml config file")]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Resolve applicable trading terms and compute discount/rebate for an order")]
    Price {
        #[arg(long, help = "JSON file holding an array of trading terms")]
        terms: PathBuf,
        #[arg(long, help = "JSON file holding a single order context")]
        order: PathBuf,
    },
    #[command(about = "Distribute a budget across targets using the proportional allocator")]
    Allocate {
        #[arg(long, help = "JSON file holding an allocation input snapshot")]
        budget: PathBuf,
    },
    #[command(about = "Score and classify combination performance records")]
    Score {
        #[arg(long, help = "JSON file holding an array of combination inputs")]
        combinations: PathBuf,
    },
    #[command(about = "Score combinations, then mine success patterns and optimal combinations")]
    Mine {
        #[arg(long, help = "JSON file holding an array of combination inputs")]
        combinations: PathBuf,
    },
    #[command(about = "Inspect effective engine configuration values")]
    Config,
}

fn init_logging(config: &EngineConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    let builder = tracing_subscriber::fmt().with_target(false).with_max_level(log_level);
    // A second init (tests, embedding) is harmless; ignore the error.
    let result = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    let _ = result;
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let load_options = LoadOptions { config_path: cli.config.clone(), require_file: false };
    let config = match EngineConfig::load(load_options).context("failed to load engine configuration")
    {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error:#}");
            return ExitCode::from(2);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        Command::Price { terms, order } => commands::price::run(&config, &terms, &order),
        Command::Allocate { budget } => commands::allocate::run(&config, &budget),
        Command::Score { combinations } => commands::score::run(&config, &combinations),
        Command::Mine { combinations } => commands::mine::run(&config, &combinations),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(&config) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
