//! Command dispatch: loads settings and the tree file, then runs one command.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{self, Session};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{DecisionTree, TreeError, TreeNodeConvert};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(Commands::Completion { shell }) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let file = cli
        .file
        .clone()
        .unwrap_or_else(|| settings.database.clone());
    debug!(file = %file.display(), "tree file");

    match &cli.command {
        None | Some(Commands::Play) => _play(&settings, &file),
        Some(Commands::Define { word }) => _define(&settings, &file, word),
        Some(Commands::Compare { first, second }) => _compare(&settings, &file, first, second),
        Some(Commands::Check) => _check(&settings, &file),
        Some(Commands::Show { dot }) => _show(&settings, &file, *dot),
        Some(Commands::Format { output }) => _format(&settings, &file, output.as_deref()),
        Some(Commands::Config { command }) => _config(&settings, command),
        Some(Commands::Completion { .. }) => Ok(()),
    }
}

fn load(settings: &Settings, file: &Path) -> CliResult<DecisionTree> {
    Ok(application::load(file, settings.limits())?)
}

#[instrument(skip(settings))]
fn _play(settings: &Settings, file: &Path) -> CliResult<()> {
    let tree = if file.exists() {
        load(settings, file)?
    } else {
        output::warning(&format!(
            "{} does not exist, starting with an empty tree",
            file.display()
        ));
        DecisionTree::with_limits(settings.limits())
    };

    let stdin = io::stdin();
    let mut session = Session::new(tree, stdin.lock(), io::stdout());
    if session.run()? {
        application::save(session.tree(), file, settings.write_options())?;
        output::success(&format!("Saved {}", file.display()));
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _define(settings: &Settings, file: &Path, word: &str) -> CliResult<()> {
    if word.trim().is_empty() {
        return Err(CliError::InvalidArgs("word must not be empty".into()));
    }
    let tree = load(settings, file)?;
    Session::new(tree, io::empty(), io::stdout()).define(word.trim())?;
    Ok(())
}

#[instrument(skip(settings))]
fn _compare(settings: &Settings, file: &Path, first: &str, second: &str) -> CliResult<()> {
    let tree = load(settings, file)?;
    Session::new(tree, io::empty(), io::stdout()).compare(first.trim(), second.trim())?;
    Ok(())
}

#[instrument(skip(settings))]
fn _check(settings: &Settings, file: &Path) -> CliResult<()> {
    let tree = load(settings, file)?;
    let status = tree.status();

    output::header(&file.display());
    output::detail(&format!("nodes: {}", tree.len()));
    output::detail(&format!("depth: {}", tree.depth()));
    output::detail(&format!("answers: {}", tree.leaf_values().len()));
    if status.is_valid() {
        output::success("structure is valid");
        Ok(())
    } else {
        for flag in status.flag_names() {
            output::failure(flag);
        }
        Err(TreeError::StructuralInvalid(status).into())
    }
}

#[instrument(skip(settings))]
fn _show(settings: &Settings, file: &Path, dot: bool) -> CliResult<()> {
    let tree = load(settings, file)?;
    if dot {
        output::info(&tree.to_dot());
    } else {
        output::info(&tree.to_tree_string());
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _format(settings: &Settings, file: &Path, target: Option<&Path>) -> CliResult<()> {
    let tree = load(settings, file)?;
    let target: PathBuf = target.unwrap_or(file).to_path_buf();
    application::save(&tree, &target, settings.write_options())?;
    output::success(&format!("Wrote {}", target.display()));
    Ok(())
}

fn _config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no configuration directory on this platform"),
        },
    }
    Ok(())
}
