//! Command dispatch

use std::fmt::Display;
use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, OutputFormat, Settings};
use crate::domain::{MenuRecord, Record, TreeNode};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, run with --help".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let format = cli.format.unwrap_or(settings.format);
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Tree { file, select } => cmd_tree(&container, file, select, format),
        Commands::Ancestors { file, ids } => cmd_ancestors(&container, file, ids, format),
        Commands::Prune { file, ids } => cmd_prune(&container, file, ids, format),
        Commands::Config { command } => cmd_config(&container.settings, command),
        Commands::Completion { .. } => Ok(()),
    }
}

#[instrument(skip(container))]
fn cmd_tree(
    container: &ServiceContainer,
    file: &Path,
    select: &[i64],
    format: OutputFormat,
) -> CliResult<()> {
    let service = container.forest_service();
    let records = service.load(file)?;
    let forest = service.tree(&records, select)?;
    print_forest(&forest, format)
}

#[instrument(skip(container))]
fn cmd_ancestors(
    container: &ServiceContainer,
    file: &Path,
    ids: &[i64],
    format: OutputFormat,
) -> CliResult<()> {
    let service = container.forest_service();
    let records = service.load(file)?;
    let closure = service.ancestors(&records, ids)?;
    debug!("{} records in closure", closure.len());
    match format {
        OutputFormat::Tree => {
            for record in &closure {
                let line = format!("{}\t{}\t{}", record.id, record.parent_id, record.name);
                output::info(&line)?;
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&closure),
    }
}

#[instrument(skip(container))]
fn cmd_prune(
    container: &ServiceContainer,
    file: &Path,
    ids: &[i64],
    format: OutputFormat,
) -> CliResult<()> {
    let service = container.forest_service();
    let records = service.load(file)?;
    let closure: Vec<MenuRecord> = service.ancestors(&records, ids)?;
    let forest = service.tree(&closure, ids)?;
    print_forest(&forest, format)
}

fn cmd_config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::header("Effective configuration")?;
            output::info(&settings.to_toml()?)?;
        }
        ConfigCommands::Template => output::info(&Settings::template())?,
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display())?,
            None => output::warning("cannot determine config directory"),
        },
    }
    Ok(())
}

fn print_forest<R: Record>(forest: &[TreeNode<'_, R>], format: OutputFormat) -> CliResult<()>
where
    R::Id: Display + Serialize,
    R::Payload: Serialize,
{
    match format {
        OutputFormat::Tree => {
            if forest.is_empty() {
                output::warning("no root records found");
            }
            for tree in forest {
                output::info(&tree.to_tree_string())?;
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&forest),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| InfraError::Render {
        message: e.to_string(),
    })?;
    output::info(&json)?;
    Ok(())
}
