//! External tool traits and shared error type.
//!
//! The pipelines talk to three opaque providers: a declaration doc extractor,
//! a .NET build tool, and an XML-doc-to-Markdown converter. They are traits
//! so the pipelines can run against a recording fake in tests. The production
//! implementation is [`CliToolchain`](super::cli_backend::CliToolchain), which
//! spawns the configured commands.

use super::params::{BuildParams, ConvertParams, ExtractParams};
use crate::declaration::Reflection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Tool command is empty")]
    EmptyCommand,
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{command}' exited with status {status}")]
    Failed { command: String, status: i32 },
    #[error("'{command}' was terminated by a signal")]
    Terminated { command: String },
    #[error("'{command}' did not finish within {secs}s")]
    Timeout { command: String, secs: u64 },
}

impl ToolError {
    /// Exit status of the failed command, when it exited on its own.
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            ToolError::Failed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Produces a declaration tree from a TypeScript entry point.
pub trait DeclarationExtractor {
    /// Extract and serialize the tree to `params.json_output`.
    ///
    /// Returns `Ok(None)` when the tool ran but produced no tree.
    fn extract(&self, params: &ExtractParams) -> Result<Option<Reflection>, ToolError>;
}

/// Builds .NET projects and converts their XML docs to Markdown.
///
/// `Sync` so conversions can fan out across a rayon pool.
pub trait DotnetToolchain: Sync {
    /// Build a project with XML documentation output enabled.
    fn build(&self, params: &BuildParams) -> Result<(), ToolError>;

    /// Convert an assembly's XML docs into Markdown under `params.output_dir`.
    fn convert(&self, params: &ConvertParams) -> Result<(), ToolError>;
}
