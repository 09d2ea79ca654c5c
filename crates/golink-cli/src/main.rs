//! golink CLI
//!
//! Command-line interface and HTTP redirector for golink - personal go-links.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use golink_core::{Config, LinkRegistry};

mod commands;
mod logging;
mod output;
mod prompt;
mod server;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "golink")]
#[command(about = "golink - Personal URL shortener and go-link redirector")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file (default: ~/.config/golink/config.toml)
    #[arg(long, global = true, env = "GOLINK_CONFIG")]
    config: Option<PathBuf>,

    /// Store data in given directory (default: current directory)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP redirector
    Serve {
        /// Address to bind (default: 0.0.0.0)
        #[arg(long)]
        host: Option<String>,
        /// Listen port (default: 7410)
        #[arg(short, long)]
        port: Option<u16>,
    },
    #[command(flatten)]
    Link(LinkCommands),
    /// Show storage location and health
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

/// Commands that run one operation-cycle against the registry
#[derive(Subcommand)]
enum LinkCommands {
    /// List all links, most visited first
    #[command(alias = "ls")]
    List,
    /// Show a link without counting a visit
    Show {
        /// Link name
        name: String,
    },
    /// Create a link, or point an existing one at a new URL
    #[command(alias = "set")]
    Add {
        /// Link name (case-insensitive)
        name: String,
        /// Destination URL
        url: String,
    },
    /// Resolve a link, count the visit and print its URL
    Go {
        /// Link name
        name: String,
    },
    /// Delete a link
    #[command(alias = "delete")]
    Rm {
        /// Link name
        name: String,
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Print link names starting with a prefix
    Suggest {
        /// Name prefix (empty matches everything)
        #[arg(default_value = "")]
        prefix: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, host, port, log_level)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let mut config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    if let Some(data_dir) = cli.data_dir.clone() {
        config.data_dir = data_dir;
    }

    logging::init(&config.log_level);

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            server::serve(&config).await
        }
        Commands::Config { command } => {
            handle_config_command(command, &config, cli.config.as_ref(), &output)
        }
        Commands::Status => commands::status::show(&config, &output),
        Commands::Link(command) => {
            let registry = LinkRegistry::open(&config);
            handle_link_command(command, &registry, &output)
        }
    }
}

fn handle_link_command(
    command: LinkCommands,
    registry: &LinkRegistry,
    output: &Output,
) -> Result<()> {
    match command {
        LinkCommands::List => commands::link::list(registry, output),
        LinkCommands::Show { name } => commands::link::show(registry, name, output),
        LinkCommands::Add { name, url } => commands::link::add(registry, name, url, output),
        LinkCommands::Go { name } => commands::link::go(registry, name, output),
        LinkCommands::Rm { name, yes } => commands::link::delete(registry, name, yes, output),
        LinkCommands::Suggest { prefix } => commands::link::suggest(registry, prefix, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config: &Config,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config, config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from(["golink", "add", "gh", "https://github.com"]).unwrap();
        match cli.command {
            Commands::Link(LinkCommands::Add { name, url }) => {
                assert_eq!(name, "gh");
                assert_eq!(url, "https://github.com");
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_parse_serve_with_global_flags() {
        let cli = Cli::try_parse_from(["golink", "serve", "-p", "8080", "-d", "/srv/links"])
            .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/links")));
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(8080));
                assert!(host.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_suggest_prefix_defaults_to_empty() {
        let cli = Cli::try_parse_from(["golink", "suggest"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Link(LinkCommands::Suggest { prefix }) if prefix.is_empty()
        ));
    }

    #[test]
    fn test_link_commands_sit_at_top_level() {
        let cli = Cli::try_parse_from(["golink", "rm", "gh", "-y"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Link(LinkCommands::Rm { name, yes: true }) if name == "gh"
        ));

        let cli = Cli::try_parse_from(["golink", "ls"]).unwrap();
        assert!(matches!(cli.command, Commands::Link(LinkCommands::List)));

        let cli = Cli::try_parse_from(["golink", "status"]).unwrap();
        assert!(matches!(cli.command, Commands::Status));
    }
}
