//! Command-line interface for moviedb.

mod commands;
pub mod menu;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// moviedb - load a movies CSV into `SQLite` and explore it
#[derive(Parser)]
#[command(name = "moviedb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default search paths
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create the database and its schema
    InitDb,

    /// Load the CSV dataset into the database
    Load {
        /// CSV file to read instead of dataset.path
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,

        /// Load even if the database already holds movies
        #[arg(long)]
        force: bool,
    },

    /// Show row counts per table
    Stats,

    /// Interactive query menu
    #[command(alias = "m")]
    Menu,
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["moviedb"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_load_flags() {
        let cli =
            Cli::try_parse_from(["moviedb", "load", "--csv", "movies.csv", "--force"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Load {
                csv: Some(PathBuf::from("movies.csv")),
                force: true,
            })
        );
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["moviedb", "stats", "--config", "alt.toml"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Stats));
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    }
}
