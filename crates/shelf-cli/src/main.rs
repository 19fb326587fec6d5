//! shelf CLI
//!
//! Command-line interface for shelf - browse a book catalog.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shelf_core::Config;

mod commands;
mod output;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "shelf - Search and sort a book catalog")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file (overrides SHELF_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Dataset file or URL (overrides the configured dataset)
    #[arg(long, global = true)]
    dataset: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// List books
    #[command(alias = "ls")]
    List {
        /// Free-text filter (title, author, ISBN, publisher, description, subjects)
        #[arg(short = 'f', long = "filter")]
        query: Option<String>,
        /// Sort key: title-asc, title-desc, author-asc, year-desc, year-asc
        #[arg(short, long)]
        sort: Option<String>,
    },
    /// Show the full detail view of one book
    Show {
        /// ISBN (hyphens allowed) or title
        key: String,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (dataset, base_url, search_debounce_ms, animations, data_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands operate on the file itself, not the effective config
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let mut config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    if let Some(dataset) = cli.dataset {
        config.dataset = dataset;
    }

    match cli.command {
        None | Some(Commands::Tui) => tui::run(config).await,
        Some(command) => {
            init_cli_logging();
            match command {
                Commands::List { query, sort } => {
                    commands::book::list(&config, query, sort, &output).await
                }
                Commands::Show { key } => commands::book::show(&config, key, &output).await,
                Commands::Tui | Commands::Config { .. } => unreachable!(), // Handled above
            }
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize stderr logging for one-shot commands
///
/// Only initializes if SHELF_LOG environment variable is set.
fn init_cli_logging() {
    let Ok(log_level) = std::env::var("SHELF_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!("shelf_core={},shelf={}", log_level, log_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_is_tui() {
        let cli = Cli::try_parse_from(["shelf"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_list_flags() {
        let cli =
            Cli::try_parse_from(["shelf", "--json", "list", "-f", "rust", "-s", "year-asc"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Some(Commands::List { query, sort }) => {
                assert_eq!(query.as_deref(), Some("rust"));
                assert_eq!(sort.as_deref(), Some("year-asc"));
            }
            _ => panic!("expected list command"),
        }
    }
}
