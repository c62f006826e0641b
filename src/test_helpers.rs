//! Shared test utilities for the interop-docs test suite.
//!
//! Provides the declaration fixture, a recording fake .NET toolchain that
//! writes converter-shaped output, and navigation tree assertions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let toolchain = FakeToolchain::new(tmp.path());
//! let report = run_dotnet_docs(&toolchain, tmp.path(), &config).unwrap();
//!
//! assert_nav_shape(&report.nav, &[
//!     ("A namespace", &["Widget class"]),
//!     ("B namespace", &["Widget class"]),
//! ]);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::DotnetConfig;
use crate::declaration::Reflection;
use crate::dotnet::artifact_paths;
use crate::toolchain::{BuildParams, ConvertParams, DotnetToolchain, ToolError};
use crate::types::NavItem;

// =========================================================================
// Fixtures
// =========================================================================

/// Parse `fixtures/declarations/index.json`.
pub fn load_declaration_fixture() -> Reflection {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/declarations/index.json");
    let content = fs::read_to_string(&path).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// Write `(relative path, content)` pairs under `root`, creating directories.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

// =========================================================================
// Fake toolchain
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ToolOp {
    Build(String),
    /// Project name and external assembly hints.
    Convert(String, Vec<String>),
}

/// Records every call and writes the files the real tools would.
///
/// Builds drop empty `<name>.dll`/`<name>.xml` under the `linux-x64` layout.
/// Conversions write, per project `X`:
///
/// ```text
/// X.md                     "# X assembly" + "## X namespace" + a type table
/// X/X.md                   "# X namespace"
/// X/X/Widget.md            "# Widget class"
/// X/X/Widget/Run.md        "# Widget.Run method (2 overloads)"
/// ```
///
/// Uses Mutex so it is Sync and works with rayon's par_iter.
pub struct FakeToolchain {
    root: PathBuf,
    ops: Mutex<Vec<ToolOp>>,
    builds: Mutex<Vec<BuildParams>>,
    converts: Mutex<Vec<ConvertParams>>,
    skip_xml: Option<String>,
    fail_build: Option<(String, i32)>,
}

impl FakeToolchain {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            ops: Mutex::new(Vec::new()),
            builds: Mutex::new(Vec::new()),
            converts: Mutex::new(Vec::new()),
            skip_xml: None,
            fail_build: None,
        }
    }

    /// Build `project` without producing its XML doc file.
    pub fn skip_xml_for(mut self, project: &str) -> Self {
        self.skip_xml = Some(project.to_string());
        self
    }

    /// Make the build of `project` exit with `status`.
    pub fn fail_build_of(mut self, project: &str, status: i32) -> Self {
        self.fail_build = Some((project.to_string(), status));
        self
    }

    pub fn ops(&self) -> Vec<ToolOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn builds(&self) -> Vec<BuildParams> {
        self.builds.lock().unwrap().clone()
    }

    pub fn converts(&self) -> Vec<ConvertParams> {
        self.converts.lock().unwrap().clone()
    }
}

impl DotnetToolchain for FakeToolchain {
    fn build(&self, params: &BuildParams) -> Result<(), ToolError> {
        self.ops
            .lock()
            .unwrap()
            .push(ToolOp::Build(params.project.clone()));
        self.builds.lock().unwrap().push(params.clone());

        if let Some((project, status)) = &self.fail_build
            && *project == params.project
        {
            return Err(ToolError::Failed {
                command: format!("dotnet build {}", params.project),
                status: *status,
            });
        }

        let layout = DotnetConfig {
            configuration: params.configuration.clone(),
            target_framework: params.target_framework.clone(),
            platform: Some("linux".to_string()),
            arch: Some("x64".to_string()),
            ..DotnetConfig::default()
        };
        let artifacts = artifact_paths(&self.root, &layout, &params.project);
        fs::create_dir_all(artifacts.dll.parent().unwrap())?;
        fs::write(&artifacts.dll, b"")?;
        if self.skip_xml.as_deref() != Some(params.project.as_str()) {
            fs::write(&artifacts.xml, b"<doc />")?;
        }
        Ok(())
    }

    fn convert(&self, params: &ConvertParams) -> Result<(), ToolError> {
        self.ops.lock().unwrap().push(ToolOp::Convert(
            params.project.clone(),
            params.externals.clone(),
        ));
        self.converts.lock().unwrap().push(params.clone());

        let name = &params.project;
        let out = &params.output_dir;
        let assembly_page = format!(
            "# {name} assembly\n\n## {name} namespace\n\n\
             | public type | description |\n| --- | --- |\n\
             | class [Widget{{T}};]({name}/{name}/Widget.md) | A widget. |\n"
        );
        let files = [
            (format!("{name}.md"), assembly_page),
            (format!("{name}/{name}.md"), format!("# {name} namespace\n")),
            (format!("{name}/{name}/Widget.md"), "# Widget class\n".to_string()),
            (
                format!("{name}/{name}/Widget/Run.md"),
                "# Widget.Run method (2 overloads)\n\n```csharp\n# region\n```\n".to_string(),
            ),
        ];
        for (rel, content) in files {
            let path = out.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
        }
        Ok(())
    }
}

// =========================================================================
// Navigation lookups (panic with a clear message on miss)
// =========================================================================

/// Labels of `items` in order.
pub fn nav_texts(items: &[NavItem]) -> Vec<&str> {
    items.iter().map(|i| i.text.as_str()).collect()
}

/// Follow a path of labels down the tree. Panics if any step is missing.
pub fn find_nav<'a>(items: &'a [NavItem], path: &[&str]) -> &'a NavItem {
    let mut level = items;
    let mut found: Option<&NavItem> = None;
    for text in path {
        let item = level.iter().find(|i| i.text == *text).unwrap_or_else(|| {
            panic!(
                "nav item '{text}' not found. Available: {:?}",
                nav_texts(level)
            )
        });
        level = item.children();
        found = Some(item);
    }
    found.unwrap_or_else(|| panic!("empty nav path"))
}

/// Assert the top level and second level of the navigation tree.
///
/// Each entry is `(text, children)`. Use `&[]` for leaf nodes.
///
/// ```rust
/// assert_nav_shape(&nav, &[
///     ("A namespace", &["Widget class"]),
///     ("Orphan page", &[]),
/// ]);
/// ```
pub fn assert_nav_shape(items: &[NavItem], expected: &[(&str, &[&str])]) {
    let expected_texts: Vec<&str> = expected.iter().map(|(t, _)| *t).collect();
    assert_eq!(nav_texts(items), expected_texts, "nav top-level texts mismatch");

    for (text, children) in expected {
        let item = find_nav(items, &[*text]);
        assert_eq!(
            nav_texts(item.children()),
            children.to_vec(),
            "nav children of '{text}' mismatch"
        );
    }
}
