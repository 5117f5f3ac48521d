//! Argument parsing and dispatch for the `daystamp` binary.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use daystamp_core::TimeReference;
use daystamp_core::config::Config;
use daystamp_core::slider::Placement;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod filter;
mod format;
mod slider;

#[derive(Parser)]
#[command(
    name = "daystamp",
    about = "Epoch seconds to YYYY-MM-DD labels for dashboard date sliders",
    version
)]
struct Cli {
    /// Path to the config file (default: ~/.config/daystamp/config.toml)
    #[arg(short, long, global = true, env = "DAYSTAMP_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format epoch seconds as YYYY-MM-DD (reads stdin when no values are given)
    Format {
        /// Seconds since 1970-01-01T00:00:00Z. Put `--` before values like
        /// `-Infinity` that look like flags.
        #[arg(allow_negative_numbers = true)]
        values: Vec<String>,

        /// Time reference: utc, local or a fixed offset like +09:00
        #[arg(short, long, allow_hyphen_values = true)]
        reference: Option<TimeReference>,

        /// Fail on the first value that is not a usable number
        #[arg(long)]
        strict: bool,

        /// Output format
        #[arg(short = 'F', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Build the date slider range and marks from a list of dates
    Slider {
        /// Dates as YYYY-MM-DD or RFC 3339 (reads stdin when none are given)
        dates: Vec<String>,

        /// Time reference: utc, local or a fixed offset like +09:00
        #[arg(short, long, allow_hyphen_values = true)]
        reference: Option<TimeReference>,

        /// Output format
        #[arg(short = 'F', long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Print the slider tooltip configuration for a selection
    Tooltip {
        /// Slider minimum, epoch seconds
        #[arg(long, allow_negative_numbers = true)]
        min: i64,

        /// Slider maximum, epoch seconds
        #[arg(long, allow_negative_numbers = true)]
        max: i64,

        /// Selected start and end, epoch seconds
        #[arg(
            long,
            required = true,
            num_args = 2,
            value_names = ["START", "END"],
            allow_negative_numbers = true
        )]
        value: Vec<i64>,

        /// Tooltip placement (overrides the config)
        #[arg(long, value_enum)]
        placement: Option<PlacementArg>,
    },

    /// Keep the dates on stdin that fall inside a selection
    Filter {
        /// Selection start, epoch seconds (inclusive)
        #[arg(long, allow_negative_numbers = true)]
        from: i64,

        /// Selection end, epoch seconds (inclusive)
        #[arg(long, allow_negative_numbers = true)]
        to: i64,

        /// Time reference for dates without an offset
        #[arg(short, long, allow_hyphen_values = true)]
        reference: Option<TimeReference>,
    },

    /// Show or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective config as TOML
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the config file path
    Path,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlacementArg {
    Top,
    Bottom,
    Left,
    Right,
}

impl From<PlacementArg> for Placement {
    fn from(value: PlacementArg) -> Self {
        match value {
            PlacementArg::Top => Placement::Top,
            PlacementArg::Bottom => Placement::Bottom,
            PlacementArg::Left => Placement::Left,
            PlacementArg::Right => Placement::Right,
        }
    }
}

/// Parse arguments, run the command, and map the outcome to an exit code.
pub fn run_cli() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.or_else(Config::config_path);
    match run_command(cli.command, config_path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_command(command: Commands, config_path: Option<&Path>) -> Result<(), String> {
    match command {
        Commands::Format {
            values,
            reference,
            strict,
            format,
        } => {
            let config = load_config(config_path)?;
            let values = if values.is_empty() {
                read_stdin_lines()?
            } else {
                values
            };
            format::handle_format(
                &values,
                reference.unwrap_or(config.time_reference),
                strict || config.strict,
                format,
            )
        }
        Commands::Slider {
            dates,
            reference,
            format,
        } => {
            let config = load_config(config_path)?;
            let dates = if dates.is_empty() {
                read_stdin_lines()?
            } else {
                dates
            };
            slider::handle_slider(
                &dates,
                reference.unwrap_or(config.time_reference),
                &config,
                format,
            )
        }
        Commands::Tooltip {
            min,
            max,
            value,
            placement,
        } => {
            let config = load_config(config_path)?;
            let [start, end] = <[i64; 2]>::try_from(value)
                .map_err(|_| "--value takes exactly two numbers".to_string())?;
            let placement = placement
                .map(Placement::from)
                .unwrap_or(config.tooltip.placement);
            slider::handle_tooltip(min, max, [start, end], placement, &config)
        }
        Commands::Filter {
            from,
            to,
            reference,
        } => {
            let config = load_config(config_path)?;
            filter::handle_filter(
                read_stdin_lines()?,
                [from, to],
                reference.unwrap_or(config.time_reference),
                config.strict,
            )
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => config::handle_show(&load_config(config_path)?),
            ConfigCommands::Init { force } => config::handle_init(config_path, force),
            ConfigCommands::Path => config::handle_path(config_path),
        },
    }
}

/// Load the config file (or defaults) and apply environment overrides.
fn load_config(path: Option<&Path>) -> Result<Config, String> {
    let mut config = match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .map_err(|e| format!("Failed to load config: {}", e))?;

    config
        .apply_env_overrides()
        .map_err(|e| format!("Failed to load config: {}", e))?;

    tracing::debug!(time_reference = %config.time_reference, "config loaded");
    Ok(config)
}

/// Non-empty lines of stdin, trimmed.
fn read_stdin_lines() -> Result<Vec<String>, String> {
    io::stdin()
        .lock()
        .lines()
        .map(|line| line.map_err(|e| format!("Failed to read stdin: {}", e)))
        .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
        .map(|line| line.map(|l| l.trim().to_string()))
        .collect()
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "daystamp=info,daystamp_core=info",
        _ => "daystamp=debug,daystamp_core=debug",
    };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}
