//! `render` command implementation.

use clap::Args;
use nav_repo::ContentId;
use nav_xml::XmlSerializer;

use super::common::{self, CommonArgs};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Navigation item the document is rendered for.
    content_id: u64,

    /// Request parameter as name=value (repeatable).
    #[arg(short, long = "param", value_parser = common::parse_param)]
    params: Vec<(String, String)>,

    /// Session id carried into rebuilt links.
    #[arg(long)]
    session: Option<String>,

    /// Indent nested elements by this many spaces.
    #[arg(long, default_value_t = 0)]
    indent: usize,

    /// Prepend an XML declaration.
    #[arg(long)]
    declaration: bool,

    #[command(flatten)]
    pub(crate) common: CommonArgs,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the snapshot cannot be
    /// loaded, or the tree cannot be linked.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config()?;
        let serializer = XmlSerializer::new()
            .with_indent(self.indent)
            .with_declaration(self.declaration);
        let navigator = common::navigator(&config)?.with_serializer(serializer);

        let request = common::request_context(&self.params, self.session.as_deref());
        let xml = navigator.render(ContentId(self.content_id), &request)?;

        output.result(&xml);
        Ok(())
    }
}
