//! Parameter types for external tool invocations.
//!
//! These structs describe *what* to ask a tool for, not *how* the tool is
//! run. They are the interface between the pipelines (which decide what to
//! build and convert) and the [`backend`](super::backend) traits (which do the
//! work). Each struct renders its own argument list so command lines can be
//! checked without spawning anything.
//!
//! ## Types
//!
//! - [`ExtractParams`]: declaration entry point, tsconfig, JSON dump path.
//! - [`BuildParams`]: project directory, configuration, target framework.
//! - [`ConvertParams`]: assembly, output directory, source URL, external references.

use std::path::{Path, PathBuf};

/// MSBuild property enabling XML documentation output.
pub const GENERATE_DOCS_PROPERTY: &str = "-p:GenerateDocumentationFile=true";

/// Suppresses CS1591, "missing XML comment for publicly visible type or member".
pub const SUPPRESS_MISSING_DOCS_PROPERTY: &str = "-p:NoWarn=CS1591";

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Parameters for extracting a declaration tree from a `.d.ts` entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractParams {
    pub entry_point: PathBuf,
    pub tsconfig: PathBuf,
    /// Where the extractor serializes the tree.
    pub json_output: PathBuf,
}

impl ExtractParams {
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--entryPoints".to_string(),
            path_arg(&self.entry_point),
            "--tsconfig".to_string(),
            path_arg(&self.tsconfig),
            "--json".to_string(),
            path_arg(&self.json_output),
        ]
    }
}

/// Parameters for building one project with XML documentation enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildParams {
    pub project: String,
    pub project_dir: PathBuf,
    pub configuration: String,
    pub target_framework: String,
}

impl BuildParams {
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "build".to_string(),
            path_arg(&self.project_dir),
            "--configuration".to_string(),
            self.configuration.clone(),
            "--framework".to_string(),
            self.target_framework.clone(),
            GENERATE_DOCS_PROPERTY.to_string(),
            SUPPRESS_MISSING_DOCS_PROPERTY.to_string(),
            "--no-incremental".to_string(),
        ]
    }
}

/// Parameters for converting one assembly's XML docs to Markdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertParams {
    pub project: String,
    pub assembly: PathBuf,
    pub output_dir: PathBuf,
    pub source_url: String,
    /// Assembly names whose types should link out instead of being skipped.
    pub externals: Vec<String>,
}

impl ConvertParams {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            path_arg(&self.assembly),
            path_arg(&self.output_dir),
            "--source".to_string(),
            self.source_url.clone(),
            "--obsolete".to_string(),
            "--namespace-pages".to_string(),
        ];
        for external in &self.externals {
            args.push("--external".to_string());
            args.push(external.clone());
        }
        args
    }
}
