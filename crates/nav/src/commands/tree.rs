//! `tree` command implementation.

use clap::Args;
use nav_repo::ContentId;
use nav_tree::{NavNode, NavTree};

use super::common::{self, CommonArgs};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tree command.
#[derive(Args)]
pub(crate) struct TreeArgs {
    /// Navigation item the tree is classified against.
    content_id: u64,

    /// Request parameter as name=value (repeatable).
    #[arg(short, long = "param", value_parser = common::parse_param)]
    params: Vec<(String, String)>,

    /// Print the tree as JSON.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    pub(crate) common: CommonArgs,
}

impl TreeArgs {
    /// Execute the tree command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the snapshot cannot be
    /// loaded, or the tree cannot be linked.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config()?;
        let navigator = common::navigator(&config)?;

        let request = common::request_context(&self.params, None);
        let tree = navigator.tree(ContentId(self.content_id), &request)?;

        if self.json {
            output.result(&serde_json::to_string_pretty(tree.as_ref())?);
        } else {
            output.result(&outline(&tree));
        }
        Ok(())
    }
}

/// Indented outline of `tree`, one node per line.
fn outline(tree: &NavTree) -> String {
    let mut lines = Vec::with_capacity(tree.node_count());
    outline_node(&tree.root, &mut lines);
    lines.join("\n")
}

fn outline_node(node: &NavNode, lines: &mut Vec<String>) {
    let indent = "  ".repeat(node.absolute_level as usize);
    lines.push(format!(
        "{indent}{} [{}] {} ({})",
        node.name, node.id, node.node_type, node.relative_level
    ));
    for child in &node.children {
        outline_node(child, lines);
    }
}
