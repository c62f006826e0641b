//! .NET API reference pipeline.
//!
//! For an ordered list of projects:
//!
//! 1. **Clean**: the output directory is removed and recreated.
//! 2. **Build**: each project is built in configured order with XML
//!    documentation enabled; both `<name>.dll` and `<name>.xml` must exist
//!    afterwards.
//! 3. **Convert**: each assembly is converted to Markdown, with the
//!    project's references passed as external assemblies. Conversions run on
//!    the rayon pool; results are consumed in configured order.
//! 4. **Index**: every project's `<name>.md` is concatenated with its
//!    level-1 headers stripped, under a single `# <index title>`.
//! 5. **Post-process**: every `.md` under the output directory gets table
//!    escaping and front matter.
//! 6. **Navigation**: the sidebar tree is derived from the final layout.
//!
//! A tool failure aborts the whole run. Partial output is left in place.

use crate::config::{ConfigError, DocsConfig, DotnetConfig, ProjectConfig};
use crate::markdown::{self, MarkdownError};
use crate::nav::{self, NavError, NavOptions};
use crate::toolchain::{BuildParams, ConvertParams, DotnetToolchain, ToolError};
use crate::types::NavItem;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DotnetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Tool failed: {0}")]
    Tool(#[from] ToolError),
    #[error("Build artifact not found: {0}")]
    MissingArtifact(PathBuf),
    #[error("Converted assembly page not found: {0}")]
    MissingAssemblyDoc(PathBuf),
    #[error("Unsafe output layout: {0}")]
    Config(#[from] ConfigError),
    #[error("No projects configured under [dotnet]")]
    NoProjects,
    #[error("Markdown post-processing failed: {0}")]
    Markdown(#[from] MarkdownError),
    #[error("Navigation failed: {0}")]
    Nav(#[from] NavError),
}

/// Build outputs the converter reads for one project.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyArtifacts {
    pub dll: PathBuf,
    pub xml: PathBuf,
}

/// `<bin>/<configuration>/<name>/<framework>/<rid>/<name>.{dll,xml}`
pub fn artifact_paths(root: &Path, config: &DotnetConfig, project: &str) -> AssemblyArtifacts {
    let dir = root
        .join(&config.bin_dir)
        .join(&config.configuration)
        .join(project)
        .join(&config.target_framework)
        .join(config.runtime_identifier());
    AssemblyArtifacts {
        dll: dir.join(format!("{project}.dll")),
        xml: dir.join(format!("{project}.xml")),
    }
}

/// What happened to one project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectReport {
    pub name: String,
    pub assembly: PathBuf,
    pub externals: Vec<String>,
}

/// Summary of a .NET documentation run.
#[derive(Debug, Clone, PartialEq)]
pub struct DotnetReport {
    pub projects: Vec<ProjectReport>,
    pub index: PathBuf,
    pub files_processed: usize,
    pub nav_file: PathBuf,
    pub nav: Vec<NavItem>,
}

/// Run the whole pipeline for `config.dotnet.projects`.
pub fn run_dotnet_docs(
    toolchain: &impl DotnetToolchain,
    root: &Path,
    config: &DocsConfig,
) -> Result<DotnetReport, DotnetError> {
    let dotnet = &config.dotnet;
    if dotnet.projects.is_empty() {
        return Err(DotnetError::NoProjects);
    }

    dotnet.check_output_paths()?;
    let output_dir = root.join(&dotnet.output_dir);
    reset_dir(&output_dir)?;

    let mut artifacts = Vec::with_capacity(dotnet.projects.len());
    for project in &dotnet.projects {
        artifacts.push(build_project(toolchain, root, dotnet, project)?);
    }

    let jobs: Vec<ConvertParams> = dotnet
        .projects
        .iter()
        .zip(&artifacts)
        .map(|(project, artifacts)| ConvertParams {
            project: project.name.clone(),
            assembly: artifacts.dll.clone(),
            output_dir: output_dir.clone(),
            source_url: format!("{}/{}", dotnet.source_url.trim_end_matches('/'), project.name),
            externals: project.references.clone(),
        })
        .collect();
    jobs.par_iter()
        .map(|params| toolchain.convert(params))
        .collect::<Result<Vec<()>, ToolError>>()?;

    let mut sections = Vec::with_capacity(jobs.len());
    for params in &jobs {
        let page = output_dir.join(format!("{}.md", params.project));
        if !page.is_file() {
            return Err(DotnetError::MissingAssemblyDoc(page));
        }
        sections.push(fs::read_to_string(&page)?);
    }
    let index = output_dir.join(&dotnet.index_file);
    fs::write(&index, combine_index(&dotnet.index_title, &sections))?;
    tracing::info!(index = %index.display(), "wrote combined index");

    let files_processed = markdown::postprocess_dir(&output_dir)?;

    let nav = nav::build_nav(
        &output_dir,
        &NavOptions {
            site_base: dotnet.site_base.clone(),
            index_file: dotnet.index_file.clone(),
        },
    )?;
    let nav_file = root.join(&dotnet.nav_file);
    nav::write_nav(&nav_file, &nav)?;
    tracing::info!(nav = %nav_file.display(), items = nav.len(), "wrote navigation");

    Ok(DotnetReport {
        projects: jobs
            .into_iter()
            .map(|params| ProjectReport {
                name: params.project,
                assembly: params.assembly,
                externals: params.externals,
            })
            .collect(),
        index,
        files_processed,
        nav_file,
        nav,
    })
}

fn reset_dir(dir: &Path) -> Result<(), DotnetError> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

fn build_project(
    toolchain: &impl DotnetToolchain,
    root: &Path,
    dotnet: &DotnetConfig,
    project: &ProjectConfig,
) -> Result<AssemblyArtifacts, DotnetError> {
    toolchain.build(&BuildParams {
        project: project.name.clone(),
        project_dir: root.join(&dotnet.source_dir).join(&project.name),
        configuration: dotnet.configuration.clone(),
        target_framework: dotnet.target_framework.clone(),
    })?;

    let artifacts = artifact_paths(root, dotnet, &project.name);
    for path in [&artifacts.dll, &artifacts.xml] {
        if !path.is_file() {
            return Err(DotnetError::MissingArtifact(path.clone()));
        }
    }
    tracing::debug!(project = %project.name, dll = %artifacts.dll.display(), "build artifacts present");
    Ok(artifacts)
}

/// Drop level-1 header lines outside fenced code blocks.
pub fn strip_h1(markdown: &str) -> String {
    // Open fence: marker character and run length.
    let mut fence: Option<(char, usize)> = None;
    let mut out = String::with_capacity(markdown.len());
    for line in markdown.split_inclusive('\n') {
        let trimmed = line.trim_start();
        match fence {
            Some((marker, len)) => {
                if let Some((c, run)) = fence_run(trimmed)
                    && c == marker
                    && run >= len
                    && trimmed[run..].trim().is_empty()
                {
                    fence = None;
                }
            }
            None => {
                if let Some(opening) = fence_run(trimmed) {
                    fence = Some(opening);
                } else if is_h1(line) {
                    continue;
                }
            }
        }
        out.push_str(line);
    }
    out
}

/// A run of three or more backticks or tildes at the start of `line`.
fn fence_run(line: &str) -> Option<(char, usize)> {
    let marker = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let run = line.chars().take_while(|c| *c == marker).count();
    (run >= 3).then_some((marker, run))
}

fn is_h1(line: &str) -> bool {
    let line = line.trim_end_matches(['\n', '\r']);
    line == "#" || line.starts_with("# ")
}

/// Combined index: a single title followed by each section minus its H1s.
pub fn combine_index(title: &str, sections: &[String]) -> String {
    let mut body = String::new();
    for section in sections {
        let stripped = strip_h1(section);
        body.push_str(stripped.trim_matches('\n'));
        body.push_str("\n\n");
    }
    format!("# {title}\n\n{}\n", body.trim_end())
}
