//! Command-line implementation of the tool traits.
//!
//! | Trait | Command |
//! |---|---|
//! | [`DeclarationExtractor`] | `npx typedoc --json ...` |
//! | [`DotnetToolchain::build`] | `dotnet build ...` |
//! | [`DotnetToolchain::convert`] | `xmldocmd <assembly> <output> ...` |
//!
//! Command prefixes come from the `[tools]` config table, and every
//! invocation runs from the root directory under the configured timeout.

use super::backend::{DeclarationExtractor, DotnetToolchain, ToolError};
use super::command::{CommandSpec, run_command};
use super::params::{BuildParams, ConvertParams, ExtractParams};
use crate::config::ToolsConfig;
use crate::declaration::Reflection;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct CliToolchain {
    tools: ToolsConfig,
    root: PathBuf,
}

impl CliToolchain {
    pub fn new(tools: &ToolsConfig, root: &Path) -> Self {
        Self {
            tools: tools.clone(),
            root: root.to_path_buf(),
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.tools.timeout_secs)
    }

    fn run(&self, prefix: &[String], args: Vec<String>) -> Result<(), ToolError> {
        let spec = CommandSpec::from_prefix(prefix)?
            .args(args)
            .current_dir(&self.root);
        run_command(&spec, self.timeout())
    }
}

impl DeclarationExtractor for CliToolchain {
    fn extract(&self, params: &ExtractParams) -> Result<Option<Reflection>, ToolError> {
        if let Some(parent) = params.json_output.parent() {
            fs::create_dir_all(parent)?;
        }
        // A stale dump from an earlier run must not pass for this run's result.
        if params.json_output.exists() {
            fs::remove_file(&params.json_output)?;
        }

        self.run(&self.tools.typedoc, params.to_args())?;

        if !params.json_output.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&params.json_output)?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

impl DotnetToolchain for CliToolchain {
    fn build(&self, params: &BuildParams) -> Result<(), ToolError> {
        tracing::info!(project = %params.project, "building");
        self.run(&self.tools.dotnet, params.to_args())
    }

    fn convert(&self, params: &ConvertParams) -> Result<(), ToolError> {
        tracing::info!(project = %params.project, externals = ?params.externals, "converting");
        self.run(&self.tools.xmldocmd, params.to_args())
    }
}
