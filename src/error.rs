//! Top-level error for the CLI.

use crate::config::ConfigError;
use crate::dotnet::DotnetError;
use crate::js::JsDocsError;
use crate::nav::NavError;
use crate::toolchain::ToolError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocsError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("JS docs failed: {0}")]
    Js(#[from] JsDocsError),
    #[error(".NET docs failed: {0}")]
    Dotnet(#[from] DotnetError),
    #[error("Navigation failed: {0}")]
    Nav(#[from] NavError),
}

impl DocsError {
    fn tool_error(&self) -> Option<&ToolError> {
        match self {
            DocsError::Js(JsDocsError::Tool(e)) | DocsError::Dotnet(DotnetError::Tool(e)) => {
                Some(e)
            }
            _ => None,
        }
    }

    /// Process exit status: the failed tool's own status when there is one.
    pub fn exit_code(&self) -> i32 {
        self.tool_error()
            .and_then(ToolError::exit_status)
            .filter(|status| *status != 0)
            .unwrap_or(1)
    }
}
