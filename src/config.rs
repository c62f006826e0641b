//! Tool configuration module.
//!
//! Handles loading, validating, and merging `interop-docs.toml`. User values
//! are layered over the stock defaults, so a config file only needs the keys
//! it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [js]
//! entry_point = "out/pkg/index.d.ts"       # Declaration entry point
//! tsconfig = "src/node-api-dotnet/tsconfig.json"
//! namespace = "dotnet"                     # Prefix for rendered symbols
//! title = "JavaScript API"
//! output = "docs/reference/js-api.md"
//! json_output = "out/obj/docs/js-api.json" # Symbol tree dump
//!
//! [dotnet]
//! projects = []                            # [{ name = "A", references = [] }, ...]
//! source_dir = "src"
//! bin_dir = "out/bin"
//! configuration = "Release"
//! target_framework = "net8.0"
//! # platform = "linux"                     # Default: host OS
//! # arch = "x64"                           # Default: host architecture
//! output_dir = "docs/reference/dotnet"
//! index_file = "index.md"
//! index_title = ".NET API"
//! site_base = "/reference/dotnet"
//! nav_file = "docs/.vitepress/dotnet-nav.mjs"
//! source_url = "https://github.com/microsoft/node-api-dotnet/blob/main/src"
//!
//! [tools]
//! typedoc = ["npx", "typedoc"]
//! dotnet = ["dotnet"]
//! xmldocmd = ["xmldocmd"]
//! timeout_secs = 600
//! # max_processes = 4                      # Default: CPU cores
//! ```
//!
//! Paths are relative to the root directory passed on the command line.
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `interop-docs.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsConfig {
    /// JS declaration-doc pipeline.
    pub js: JsConfig,
    /// .NET assembly-doc pipeline.
    pub dotnet: DotnetConfig,
    /// External tool commands and limits.
    pub tools: ToolsConfig,
}

impl DocsConfig {
    /// Validate config values are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for project in &self.dotnet.projects {
            if project.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "dotnet.projects entries must have a name".into(),
                ));
            }
            for reference in &project.references {
                if !seen.contains(reference.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "project '{}' references '{}', which is not configured before it",
                        project.name, reference
                    )));
                }
            }
            if !seen.insert(project.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate project '{}' in dotnet.projects",
                    project.name
                )));
            }
        }
        self.dotnet.check_output_paths()?;
        for (key, command) in [
            ("typedoc", &self.tools.typedoc),
            ("dotnet", &self.tools.dotnet),
            ("xmldocmd", &self.tools.xmldocmd),
        ] {
            if command.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "tools.{key} must not be empty"
                )));
            }
        }
        if self.tools.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "tools.timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Settings for the JS declaration-doc page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JsConfig {
    /// Root type-declaration file describing the JS-visible surface.
    pub entry_point: String,
    /// tsconfig used by the extractor for type resolution.
    pub tsconfig: String,
    /// Object name prefixed to every rendered symbol (`dotnet.load()`).
    pub namespace: String,
    /// Top-level page title.
    pub title: String,
    /// Rendered Markdown page.
    pub output: String,
    /// JSON dump of the extracted symbol tree.
    pub json_output: String,
}

impl Default for JsConfig {
    fn default() -> Self {
        Self {
            entry_point: "out/pkg/index.d.ts".to_string(),
            tsconfig: "src/node-api-dotnet/tsconfig.json".to_string(),
            namespace: "dotnet".to_string(),
            title: "JavaScript API".to_string(),
            output: "docs/reference/js-api.md".to_string(),
            json_output: "out/obj/docs/js-api.json".to_string(),
        }
    }
}

/// One documented .NET project and the projects its docs link into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project directory name under `source_dir`; also the assembly name.
    pub name: String,
    /// Other configured projects whose types this assembly's docs reference.
    #[serde(default)]
    pub references: Vec<String>,
}

impl ProjectConfig {
    pub fn new(name: &str, references: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            references: references.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Settings for the .NET assembly-doc pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DotnetConfig {
    /// Projects in build and concatenation order.
    pub projects: Vec<ProjectConfig>,
    pub source_dir: String,
    pub bin_dir: String,
    pub configuration: String,
    pub target_framework: String,
    /// Build output platform (`linux`, `osx`, `win`). Host OS when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Build output architecture (`x64`, `arm64`). Host arch when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    /// Cleared at the start of every run.
    pub output_dir: String,
    /// Combined index file name inside `output_dir`.
    pub index_file: String,
    pub index_title: String,
    /// Site path that `output_dir` is served under.
    pub site_base: String,
    /// Generated sidebar module.
    pub nav_file: String,
    /// Base URL for source links; the project name is appended.
    pub source_url: String,
}

impl Default for DotnetConfig {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            source_dir: "src".to_string(),
            bin_dir: "out/bin".to_string(),
            configuration: "Release".to_string(),
            target_framework: "net8.0".to_string(),
            platform: None,
            arch: None,
            output_dir: "docs/reference/dotnet".to_string(),
            index_file: "index.md".to_string(),
            index_title: ".NET API".to_string(),
            site_base: "/reference/dotnet".to_string(),
            nav_file: "docs/.vitepress/dotnet-nav.mjs".to_string(),
            source_url: "https://github.com/microsoft/node-api-dotnet/blob/main/src".to_string(),
        }
    }
}

impl DotnetConfig {
    /// Reject an `output_dir` whose reset could reach outside the output tree,
    /// and a `nav_file` the reset would delete.
    ///
    /// The output directory must be a relative path below the root: not
    /// empty, not `.`, with no `..` components.
    pub fn check_output_paths(&self) -> Result<(), ConfigError> {
        let output_dir = Path::new(&self.output_dir);
        let invalid = |reason: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Validation(format!(
                "dotnet.output_dir '{}' {reason}",
                self.output_dir
            )))
        };
        if output_dir.has_root() || output_dir.is_absolute() {
            return invalid("must be relative to the root");
        }
        let mut depth = 0;
        for component in output_dir.components() {
            match component {
                Component::Normal(_) => depth += 1,
                Component::CurDir => {}
                _ => return invalid("must not contain '..'"),
            }
        }
        if depth == 0 {
            return invalid("must name a directory below the root");
        }

        let normalized: Vec<Component> = output_dir
            .components()
            .filter(|c| *c != Component::CurDir)
            .collect();
        let nav_file: Vec<Component> = Path::new(&self.nav_file)
            .components()
            .filter(|c| *c != Component::CurDir)
            .collect();
        if nav_file.starts_with(&normalized) {
            return Err(ConfigError::Validation(format!(
                "dotnet.nav_file '{}' must not be inside dotnet.output_dir '{}'",
                self.nav_file, self.output_dir
            )));
        }
        Ok(())
    }

    /// Runtime identifier of the build output directory, e.g. `linux-x64`.
    pub fn runtime_identifier(&self) -> String {
        let platform = self
            .platform
            .clone()
            .unwrap_or_else(|| host_platform().to_string());
        let arch = self.arch.clone().unwrap_or_else(|| host_arch().to_string());
        format!("{platform}-{arch}")
    }
}

/// External tool commands and execution limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Declaration doc extractor command prefix.
    pub typedoc: Vec<String>,
    /// .NET build tool command prefix.
    pub dotnet: Vec<String>,
    /// XML-doc-to-Markdown converter command prefix.
    pub xmldocmd: Vec<String>,
    /// Upper bound on any single external tool invocation.
    pub timeout_secs: u64,
    /// Maximum number of parallel conversions.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            typedoc: vec!["npx".to_string(), "typedoc".to_string()],
            dotnet: vec!["dotnet".to_string()],
            xmldocmd: vec!["xmldocmd".to_string()],
            timeout_secs: 600,
            max_processes: None,
        }
    }
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ToolsConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Platform segment of .NET runtime identifiers for the host OS.
pub fn host_platform() -> &'static str {
    match std::env::consts::OS {
        "macos" => "osx",
        "windows" => "win",
        other => other,
    }
}

/// Architecture segment of .NET runtime identifiers for the host CPU.
pub fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        "x86" => "x86",
        "arm" => "arm",
        other => other,
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(DocsConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so a
///   `projects` array is replaced, never appended to.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<DocsConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: DocsConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file, falling back to stock defaults.
pub fn load_config(path: &Path) -> Result<DocsConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `interop-docs.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# interop-docs configuration
# ==========================
# All settings are optional. Values shown below are the defaults.
# Paths are relative to the --root directory.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# JavaScript API page (TypeDoc declaration tree -> Markdown)
# ---------------------------------------------------------------------------
[js]
# Root type-declaration file describing the package's public JS surface.
entry_point = "out/pkg/index.d.ts"

# tsconfig used by the extractor for type resolution.
tsconfig = "src/node-api-dotnet/tsconfig.json"

# Object name prefixed to every rendered symbol, e.g. dotnet.load().
namespace = "dotnet"

title = "JavaScript API"
output = "docs/reference/js-api.md"

# JSON dump of the extracted symbol tree.
json_output = "out/obj/docs/js-api.json"

# ---------------------------------------------------------------------------
# .NET API pages (XML documentation -> Markdown)
# ---------------------------------------------------------------------------
[dotnet]
# Projects in build order. Each project's docs link to the assemblies it
# lists in `references`, which must appear earlier in this list.
#
# projects = [
#   { name = "Interop.Runtime", references = [] },
#   { name = "Interop.Generator", references = ["Interop.Runtime"] },
# ]
projects = []

source_dir = "src"
bin_dir = "out/bin"
configuration = "Release"
target_framework = "net8.0"

# Build output runtime identifier parts. Default to the host OS/arch.
# platform = "linux"
# arch = "x64"

# Cleared at the start of every run.
output_dir = "docs/reference/dotnet"
index_file = "index.md"
index_title = ".NET API"

# Site path that output_dir is served under (used for sidebar links).
site_base = "/reference/dotnet"

# Generated sidebar module, imported by the site configuration.
nav_file = "docs/.vitepress/dotnet-nav.mjs"

# Base URL for source links; the project name is appended.
source_url = "https://github.com/microsoft/node-api-dotnet/blob/main/src"

# ---------------------------------------------------------------------------
# External tools
# ---------------------------------------------------------------------------
[tools]
typedoc = ["npx", "typedoc"]
dotnet = ["dotnet"]
xmldocmd = ["xmldocmd"]

# Any single tool invocation running longer than this is killed.
timeout_secs = 600

# Maximum parallel conversions.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        DocsConfig::default().validate().unwrap();
    }

    fn dotnet_with(output_dir: &str, nav_file: &str) -> DocsConfig {
        let mut config = DocsConfig::default();
        config.dotnet.output_dir = output_dir.to_string();
        config.dotnet.nav_file = nav_file.to_string();
        config
    }

    fn assert_rejected(config: &DocsConfig, needle: &str) {
        match config.validate() {
            Err(ConfigError::Validation(msg)) => {
                assert!(msg.contains(needle), "unexpected message: {msg}")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn output_dir_must_be_below_root() {
        let nav = "docs/.vitepress/dotnet-nav.mjs";
        assert_rejected(&dotnet_with("", nav), "below the root");
        assert_rejected(&dotnet_with(".", nav), "below the root");
        assert_rejected(&dotnet_with("./", nav), "below the root");
        assert_rejected(&dotnet_with("..", nav), "'..'");
        assert_rejected(&dotnet_with("docs/../..", nav), "'..'");
        assert_rejected(&dotnet_with("/", nav), "relative");
        assert_rejected(&dotnet_with("/tmp/reference", nav), "relative");
    }

    #[test]
    fn nav_file_must_be_outside_output_dir() {
        assert_rejected(
            &dotnet_with("docs/reference/dotnet", "docs/reference/dotnet/nav.mjs"),
            "nav_file",
        );
        assert_rejected(
            &dotnet_with("./docs/api", "docs/api/sub/nav.mjs"),
            "nav_file",
        );
        dotnet_with("docs/api", "docs/api-nav.mjs").validate().unwrap();
        dotnet_with("./docs/api", "docs/.vitepress/nav.mjs").validate().unwrap();
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: DocsConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, DocsConfig::default());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
            [js]
            namespace = "interop"
        "#;
        let overlay: toml::Value = toml::from_str(toml).unwrap();
        let config = resolve_config(stock_defaults_value().unwrap(), Some(overlay)).unwrap();

        assert_eq!(config.js.namespace, "interop");
        assert_eq!(config.js.title, "JavaScript API");
        assert_eq!(config.dotnet.index_file, "index.md");
    }

    #[test]
    fn parse_projects_in_order() {
        let toml = r#"
            [dotnet]
            projects = [
                { name = "A" },
                { name = "B", references = ["A"] },
            ]
        "#;
        let overlay: toml::Value = toml::from_str(toml).unwrap();
        let config = resolve_config(stock_defaults_value().unwrap(), Some(overlay)).unwrap();

        assert_eq!(
            config.dotnet.projects,
            vec![ProjectConfig::new("A", &[]), ProjectConfig::new("B", &["A"])]
        );
    }

    #[test]
    fn unknown_key_is_rejected() {
        let overlay: toml::Value = toml::from_str("[js]\nnamespaec = \"x\"").unwrap();
        let result = resolve_config(stock_defaults_value().unwrap(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn forward_reference_is_rejected() {
        let mut config = DocsConfig::default();
        config.dotnet.projects = vec![
            ProjectConfig::new("B", &["A"]),
            ProjectConfig::new("A", &[]),
        ];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'B' references 'A'"));
    }

    #[test]
    fn duplicate_project_is_rejected() {
        let mut config = DocsConfig::default();
        config.dotnet.projects = vec![ProjectConfig::new("A", &[]), ProjectConfig::new("A", &[])];
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_tool_command_is_rejected() {
        let mut config = DocsConfig::default();
        config.tools.xmldocmd.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tools.xmldocmd"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = DocsConfig::default();
        config.tools.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("interop-docs.toml")).unwrap();
        assert_eq!(config, DocsConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("interop-docs.toml");
        fs::write(
            &path,
            r#"
[dotnet]
target_framework = "net6.0"
platform = "win"
arch = "arm64"

[tools]
timeout_secs = 30
max_processes = 2
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.dotnet.target_framework, "net6.0");
        assert_eq!(config.dotnet.runtime_identifier(), "win-arm64");
        assert_eq!(config.tools.timeout_secs, 30);
        assert_eq!(config.tools.max_processes, Some(2));
        assert_eq!(config.tools.dotnet, vec!["dotnet"]);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("interop-docs.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn runtime_identifier_defaults_to_host() {
        let config = DotnetConfig::default();
        assert_eq!(
            config.runtime_identifier(),
            format!("{}-{}", host_platform(), host_arch())
        );
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ToolsConfig {
            max_processes: Some(1),
            ..ToolsConfig::default()
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ToolsConfig {
            max_processes: Some(cores + 64),
            ..ToolsConfig::default()
        };
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn merge_toml_replaces_arrays() {
        let base: toml::Value = toml::from_str("list = [1, 2]\nkeep = true").unwrap();
        let overlay: toml::Value = toml::from_str("list = [3]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["list"].as_array().unwrap().len(), 1);
        assert_eq!(merged["keep"].as_bool(), Some(true));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str("[a.b]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[a.b]\ny = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["b"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["b"]["y"].as_integer(), Some(3));
    }
}
