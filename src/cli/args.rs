//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;

/// Assemble flat parent-referencing records into trees
#[derive(Parser, Debug)]
#[command(name = "rstree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the full forest
    Tree {
        /// Record file (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Ids to flag as selected
        #[arg(short, long, value_delimiter = ',')]
        select: Vec<i64>,
    },

    /// List records with all of their ancestors
    Ancestors {
        /// Record file (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Target ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },

    /// Show the forest pruned to records and their ancestors
    Prune {
        /// Record file (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Target ids (shown as selected)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Show global config location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_comma_separated_selection_when_parsing_then_splits_ids() {
        let cli = Cli::parse_from(["rstree", "tree", "menu.json", "--select", "3,6"]);
        match cli.command {
            Some(Commands::Tree { select, .. }) => assert_eq!(select, vec![3, 6]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn given_repeated_debug_flag_when_parsing_then_counts() {
        let cli = Cli::parse_from(["rstree", "-ddd", "ancestors", "menu.toml", "6"]);
        assert_eq!(cli.debug, 3);
    }

    #[test]
    fn given_prune_without_ids_when_parsing_then_errors() {
        assert!(Cli::try_parse_from(["rstree", "prune", "menu.json"]).is_err());
    }
}
