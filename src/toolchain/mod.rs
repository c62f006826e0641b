//! External documentation tools.
//!
//! The module is split into:
//! - **Parameters**: what each tool is asked to do, rendered as argument lists
//! - **Backend**: the [`DeclarationExtractor`] and [`DotnetToolchain`] traits
//! - **Command**: blocking process execution with a timeout
//! - **CLI backend**: [`CliToolchain`], the trait implementation that spawns tools

pub mod backend;
pub mod cli_backend;
pub mod command;
pub mod params;

pub use backend::{DeclarationExtractor, DotnetToolchain, ToolError};
pub use cli_backend::CliToolchain;
pub use command::{CommandSpec, run_command};
pub use params::{BuildParams, ConvertParams, ExtractParams};
