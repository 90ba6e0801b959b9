//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `resolve`: link conversion and classification
//! - `config`: showing and initializing the config file

mod config;
mod resolve;

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

pub use config::cmd_config;
pub use resolve::{cmd_classify, cmd_resolve};

/// Convert track links between Apple Music and Spotify
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a track link to the other catalog
    Resolve {
        /// Apple Music song/album-track link or Spotify track link
        url: String,
        /// Two-letter storefront (or set TUNE_BRIDGE_STOREFRONT env var)
        #[arg(short, long, env = "TUNE_BRIDGE_STOREFRONT")]
        storefront: Option<String>,
        /// Overall deadline in milliseconds (overrides the config file)
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Show how a link is classified, without any network access
    Classify {
        /// Link to classify
        url: String,
    },
    /// Show the effective configuration and its path
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Resolve {
            url,
            storefront,
            timeout_ms,
        } => {
            let rt = Runtime::new()?;
            cmd_resolve(&rt, url, storefront.as_deref(), *timeout_ms)
        }
        Commands::Classify { url } => cmd_classify(url),
        Commands::Config { init } => cmd_config(*init),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve_flags() {
        let cli = Cli::try_parse_from([
            "tune-bridge",
            "resolve",
            "https://open.spotify.com/track/abc",
            "--storefront",
            "gb",
            "--timeout-ms",
            "2500",
        ])
        .unwrap();
        match cli.command {
            Commands::Resolve {
                url,
                storefront,
                timeout_ms,
            } => {
                assert_eq!(url, "https://open.spotify.com/track/abc");
                assert_eq!(storefront.as_deref(), Some("gb"));
                assert_eq!(timeout_ms, Some(2500));
            }
            _ => panic!("expected resolve"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["tune-bridge"]).is_err());
    }

    #[test]
    fn test_parse_config_init() {
        let cli = Cli::try_parse_from(["tune-bridge", "config", "--init"]).unwrap();
        assert!(matches!(cli.command, Commands::Config { init: true }));
    }
}
