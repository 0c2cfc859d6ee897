//! errflags command line
//!
//! Checks TOML config files and reports problems grouped by error flag.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::aggregator::{ErrorAggregator, MESSAGE_SEPARATOR};
use crate::check::{check_files, select, Categories, ReportView};
use crate::config::{LogFormat, Settings};
use crate::errors::{EXIT_CHECK_FAILED, EXIT_SUCCESS};
use crate::observability::{LogArg, Logger};

#[derive(Parser)]
#[command(name = "errflags")]
#[command(about = "Check config files and report problems grouped by error category")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (defaults to conf.toml, then errflags.toml)
    #[arg(long, value_name = "FILE", global = true)]
    conf: Option<String>,

    /// Log output: stdout, stderr or a file path
    #[arg(long, value_name = "OUT", global = true)]
    logout: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, value_name = "LEVEL", global = true)]
    loglevel: Option<String>,

    /// Colorize log lines
    #[arg(long, global = true)]
    logcolors: bool,

    /// Log line format
    #[arg(long, value_enum, global = true)]
    logformat: Option<LogFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

/// Output format for the check report
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that config files are readable, parse, and carry required keys
    #[command(alias = "c")]
    Check {
        /// Files to check
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Key every file must contain; dotted keys address tables
        #[arg(short, long = "require", value_name = "KEY")]
        require: Vec<String>,

        /// Only report these categories (io, parsing, missing, input)
        #[arg(long, value_name = "CATEGORY", value_delimiter = ',')]
        only: Vec<String>,

        /// Report format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List error categories and the bits they cover
    Categories,
}

pub fn run() -> Result<u8> {
    let cli = Cli::parse();

    if cli.no_color || std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    let conf_path = cli.conf.as_deref().map(expand_home);
    let mut settings = Settings::load(conf_path.as_deref())?;
    if let Some(out) = cli.logout {
        settings.log.output = out;
    }
    if let Some(level) = cli.loglevel {
        settings.log.level = level;
    }
    if cli.logcolors {
        settings.log.colors = true;
    }
    if let Some(format) = cli.logformat {
        settings.log.format = format;
    }

    let logger = Logger::new(&settings.log)?;
    logger.debug(&[
        "logging to".into(),
        (&settings.log.output).into(),
        "at level".into(),
        (&settings.log.level).into(),
    ]);

    match cli.command {
        Commands::Check {
            files,
            require,
            only,
            format,
        } => {
            let categories = Categories::allocate(&logger);
            let mask = if only.is_empty() {
                None
            } else {
                Some(categories.mask(only.as_slice())?)
            };
            let required: Vec<&str> = require.iter().map(String::as_str).collect();

            let report =
                logger.in_scope(|| check_files(&files, &required, &categories, &logger));
            let selected = select(&report, mask.as_ref());

            match format {
                OutputFormat::Json => {
                    let body = match &selected {
                        Some(view) => serde_json::to_string_pretty(&ReportView::new(view))
                            .context("Failed to render report")?,
                        None => "null".to_string(),
                    };
                    println!("{}", body);
                }
                OutputFormat::Text => match &selected {
                    Some(view) => println!("{}", render_report(view)),
                    None => println!(
                        "{} no errors to report for {} file(s)",
                        "ok".green().bold(),
                        files.len()
                    ),
                },
            }

            match selected {
                Some(view) => {
                    let count = view.len();
                    logger.info(&[
                        "check finished with".into(),
                        LogArg::display(&count),
                        "error group(s)".into(),
                    ]);
                    Ok(EXIT_CHECK_FAILED)
                }
                None => Ok(EXIT_SUCCESS),
            }
        }
        Commands::Categories => {
            let categories = Categories::allocate(&Logger::disabled());
            for (name, flag) in categories.all() {
                let bits: Vec<String> = flag.bits().ones().map(|b| b.to_string()).collect();
                println!(
                    "{:<8} {:<14} bits {}",
                    name.bold(),
                    flag.name(),
                    bits.join(",")
                );
            }
            Ok(EXIT_SUCCESS)
        }
    }
}

/// Text report with highlighted group headers. Matches
/// [`ErrorAggregator::report`] when colors are off.
fn render_report(report: &ErrorAggregator) -> String {
    report
        .groups()
        .map(|(flag, messages)| {
            format!(
                "{}{}{}",
                format!("[{}]", flag.name()).red().bold(),
                MESSAGE_SEPARATOR,
                messages.join(MESSAGE_SEPARATOR)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
