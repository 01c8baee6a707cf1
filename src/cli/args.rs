//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::domain::NodeKind;

/// Asset hierarchy editor: show, edit and re-export location/equipment/assembly/part trees kept in CSV
#[derive(Parser, Debug)]
#[command(name = "bomtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Project directory holding a local .bomtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the hierarchy as a tree
    Show {
        /// Hierarchy CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Re-export in canonical order and quoting
    Export {
        /// Hierarchy CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        target: OutputTarget,
    },

    /// Add a placeholder child under a parent
    Add {
        /// Hierarchy CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Id of the parent node
        parent_id: String,
        #[command(flatten)]
        target: OutputTarget,
    },

    /// Edit fields of a node, optionally moving it
    Update {
        /// Hierarchy CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Id of the node to edit
        id: String,
        #[command(flatten)]
        edit: FieldEdits,
        #[command(flatten)]
        target: OutputTarget,
    },

    /// Remove a node and its whole subtree
    Delete {
        /// Hierarchy CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Id of the node to remove
        id: String,
        #[command(flatten)]
        target: OutputTarget,
    },

    /// List legal new parents for a node
    Parents {
        /// Hierarchy CSV file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Id of the node to move
        id: String,
    },

    /// Print the bundled sample hierarchy
    Sample,

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

/// Where an editing command writes the resulting CSV.
#[derive(Args, Debug, Default)]
pub struct OutputTarget {
    /// Write the result to this file
    #[arg(short, long, value_hint = ValueHint::FilePath, conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Overwrite the input file
    #[arg(short, long)]
    pub in_place: bool,
}

/// Field overrides for `update`; omitted flags keep the current value.
#[derive(Args, Debug, Default)]
pub struct FieldEdits {
    /// New code
    #[arg(long)]
    pub code: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New kind
    #[arg(long = "type", value_parser = parse_kind)]
    pub kind: Option<NodeKind>,

    /// New quantity (non-negative number)
    #[arg(long, conflicts_with = "no_quantity")]
    pub quantity: Option<String>,

    /// Clear the quantity
    #[arg(long)]
    pub no_quantity: bool,

    /// New unit (empty string clears it)
    #[arg(long)]
    pub unit: Option<String>,

    /// Move under this parent id
    #[arg(long, conflicts_with = "root")]
    pub parent: Option<String>,

    /// Move to root level
    #[arg(long)]
    pub root: bool,
}

fn parse_kind(s: &str) -> Result<NodeKind, String> {
    s.parse().map_err(|e: crate::domain::DomainError| e.to_string())
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_update_flags_when_parsing_then_edits_collected() {
        let cli = Cli::try_parse_from([
            "bomtree", "-vv", "update", "bom.csv", "7", "--type", "Assembly", "--no-quantity",
            "--root", "-i",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Update { id, edit, target, .. }) => {
                assert_eq!(id, "7");
                assert_eq!(edit.kind, Some(NodeKind::Assembly));
                assert!(edit.no_quantity);
                assert!(edit.root);
                assert!(target.in_place);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_unknown_type_when_parsing_then_rejected() {
        let result = Cli::try_parse_from(["bomtree", "update", "bom.csv", "7", "--type", "widget"]);
        assert!(result.is_err());
    }

    #[test]
    fn given_parent_and_root_when_parsing_then_conflict() {
        let result = Cli::try_parse_from([
            "bomtree", "update", "bom.csv", "7", "--parent", "2", "--root",
        ]);
        assert!(result.is_err());
    }
}
