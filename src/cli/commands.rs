//! Command dispatch: one function per subcommand, all going through the service container.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::Session;
use crate::cli::args::{Cli, Commands, ConfigCommands, FieldEdits, OutputTarget};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{self, Settings};
use crate::domain::sample::SAMPLE_CSV;
use crate::domain::{parse_quantity, Forest, NodeFields, UuidTokens};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `bomtree --help`".into(),
        ));
    };

    // Commands that need no settings
    match command {
        Commands::Sample => {
            output::info(SAMPLE_CSV.trim_end());
            return Ok(());
        }
        Commands::Completion { shell } => {
            print_completions(*shell);
            return Ok(());
        }
        _ => {}
    }

    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    let settings = Settings::load(Some(&project_dir))?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Show { file } => cmd_show(&container, file),
        Commands::Export { file, target } => cmd_export(&container, file, target),
        Commands::Add {
            file,
            parent_id,
            target,
        } => cmd_add(&container, file, parent_id, target),
        Commands::Update {
            file,
            id,
            edit,
            target,
        } => cmd_update(&container, file, id, edit, target),
        Commands::Delete { file, id, target } => cmd_delete(&container, file, id, target),
        Commands::Parents { file, id } => cmd_parents(&container, file, id),
        Commands::Config { command } => cmd_config(&container, &project_dir, command),
        Commands::Sample | Commands::Completion { .. } => Ok(()),
    }
}

fn resolve_project_dir(project_dir: Option<&Path>) -> CliResult<PathBuf> {
    match project_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e).into()),
    }
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// Fresh session holding the content of `file`.
fn open_session(container: &ServiceContainer, file: &Path) -> CliResult<Session<UuidTokens>> {
    let mut session = container.session();
    container.hierarchy.import_into(&mut session, file)?;
    Ok(session)
}

/// Write the session's forest to the chosen target.
fn emit(
    container: &ServiceContainer,
    session: &Session<UuidTokens>,
    input: &Path,
    target: &OutputTarget,
) -> CliResult<()> {
    let destination = if target.in_place {
        Some(input)
    } else {
        target.output.as_deref()
    };
    match destination {
        Some(path) => {
            container.hierarchy.save(session.forest(), path)?;
            output::success(&format!("wrote {}", path.display()));
        }
        None => output::info(&session.on_export()),
    }
    Ok(())
}

/// Build a display tree per root without recursion.
fn display_trees(forest: &Forest) -> Vec<Tree<String>> {
    let mut parents: Vec<Option<usize>> = Vec::new();
    let mut slots: Vec<Option<Tree<String>>> = Vec::new();
    let mut stack: Vec<_> = forest.roots.iter().rev().map(|root| (root, None)).collect();
    while let Some((node, parent)) = stack.pop() {
        let pos = slots.len();
        slots.push(Some(Tree::new(node.to_string())));
        parents.push(parent);
        stack.extend(node.children.iter().rev().map(|child| (child, Some(pos))));
    }

    let mut roots = Vec::new();
    for pos in (0..slots.len()).rev() {
        let Some(mut tree) = slots[pos].take() else {
            continue;
        };
        tree.leaves.reverse();
        match parents[pos].and_then(|p| slots[p].as_mut()) {
            Some(parent) => parent.leaves.push(tree),
            None => roots.push(tree),
        }
    }
    roots.reverse();
    roots
}

#[instrument(level = "debug", skip(container))]
fn cmd_show(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let forest = container.hierarchy.load(file)?;
    if forest.is_empty() {
        output::warning(&format!("{} holds no items", file.display()));
        return Ok(());
    }
    for tree in display_trees(&forest) {
        print!("{}", tree);
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_export(container: &ServiceContainer, file: &Path, target: &OutputTarget) -> CliResult<()> {
    let session = open_session(container, file)?;
    emit(container, &session, file, target)
}

#[instrument(level = "debug", skip(container))]
fn cmd_add(
    container: &ServiceContainer,
    file: &Path,
    parent_id: &str,
    target: &OutputTarget,
) -> CliResult<()> {
    let mut session = open_session(container, file)?;
    match session.on_add(parent_id) {
        Some(id) => output::success(&format!("added {} under {}", id, parent_id)),
        None => output::warning(&format!("no item with id {}, nothing added", parent_id)),
    }
    emit(container, &session, file, target)
}

/// Overlay the given flags on the node's current fields.
fn merge_fields(mut fields: NodeFields, edit: &FieldEdits) -> CliResult<NodeFields> {
    if let Some(code) = &edit.code {
        fields.code = code.clone();
    }
    if let Some(description) = &edit.description {
        fields.description = description.clone();
    }
    if let Some(kind) = edit.kind {
        fields.kind = kind;
    }
    if edit.no_quantity {
        fields.quantity = None;
    } else if let Some(quantity) = &edit.quantity {
        fields.quantity = parse_quantity(quantity)?;
    }
    if let Some(unit) = &edit.unit {
        fields.unit = Some(unit.trim().to_string()).filter(|u| !u.is_empty());
    }
    Ok(fields)
}

#[instrument(level = "debug", skip(container))]
fn cmd_update(
    container: &ServiceContainer,
    file: &Path,
    id: &str,
    edit: &FieldEdits,
    target: &OutputTarget,
) -> CliResult<()> {
    let mut session = open_session(container, file)?;
    let Some(node) = session.forest().find(id) else {
        output::warning(&format!("no item with id {}, nothing updated", id));
        return emit(container, &session, file, target);
    };

    let fields = merge_fields(node.fields(), edit)?;
    let old_parent = session.forest().parent_of(id).map(str::to_string);
    let new_parent = if edit.root {
        None
    } else if let Some(parent) = &edit.parent {
        Some(parent.clone())
    } else {
        old_parent.clone()
    };
    debug!(?old_parent, ?new_parent, "update");

    session.on_update(id, &fields, new_parent.as_deref(), old_parent.as_deref())?;
    output::success(&format!("updated {}", id));
    emit(container, &session, file, target)
}

#[instrument(level = "debug", skip(container))]
fn cmd_delete(
    container: &ServiceContainer,
    file: &Path,
    id: &str,
    target: &OutputTarget,
) -> CliResult<()> {
    let mut session = open_session(container, file)?;
    let before = session.forest().len();
    if session.on_delete(id) {
        let removed = before - session.forest().len();
        output::success(&format!("deleted {} ({} item(s))", id, removed));
    } else {
        output::warning(&format!("no item with id {}, nothing deleted", id));
    }
    emit(container, &session, file, target)
}

#[instrument(level = "debug", skip(container))]
fn cmd_parents(container: &ServiceContainer, file: &Path, id: &str) -> CliResult<()> {
    let session = open_session(container, file)?;
    if !session.forest().contains(id) {
        return Err(CliError::InvalidArgs(format!("no item with id {}", id)));
    }
    for option in session.parent_options(id) {
        match option.id {
            Some(parent_id) => output::action(&parent_id, &option.label),
            None => output::header(&option.label),
        }
    }
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    project_dir: &Path,
    command: &ConfigCommands,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                config::global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".into())
                })?
            } else {
                config::local_config_path(project_dir)
            };
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
        }
        ConfigCommands::Path => {
            match config::global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::action("global", &"(unavailable)"),
            }
            output::action("local", &config::local_config_path(project_dir).display());
        }
    }
    Ok(())
}
