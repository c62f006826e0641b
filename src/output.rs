//! CLI output formatting for pipeline results.
//!
//! Output leads with what was documented (symbol names, project names,
//! navigation labels), with file paths shown after `→` as context:
//!
//! ```text
//! JavaScript API → docs/reference/js-api.md
//!     property runtimeVersion
//!     function load()
//! 1 property, 2 functions
//! ```
//!
//! ```text
//! 001 Interop.Runtime → out/bin/Release/Interop.Runtime/net8.0/linux-x64/Interop.Runtime.dll
//! 002 Interop.Generator (references Interop.Runtime) → ...
//! Index → docs/reference/dotnet/index.md
//! Post-processed 42 files
//! Navigation → docs/.vitepress/dotnet-nav.mjs
//! ```
//!
//! Each result has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions do no I/O.

use crate::dotnet::DotnetReport;
use crate::js::JsReport;
use crate::types::NavItem;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Path relative to `root` when possible.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn count_of(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

// ============================================================================
// JavaScript page
// ============================================================================

pub fn format_js_output(report: &JsReport, title: &str, root: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "{title} \u{2192} {}",
        display_path(&report.output, root)
    )];
    for name in &report.properties {
        lines.push(format!("{}property {name}", indent(1)));
    }
    for name in &report.functions {
        lines.push(format!("{}function {name}()", indent(1)));
    }
    lines.push(format!(
        "{}, {}",
        count_of(report.properties.len(), "property", "properties"),
        count_of(report.functions.len(), "function", "functions")
    ));
    lines.push(format!(
        "Symbol tree \u{2192} {}",
        display_path(&report.json_output, root)
    ));
    lines
}

pub fn print_js_output(report: &JsReport, title: &str, root: &Path) {
    for line in format_js_output(report, title, root) {
        println!("{}", line);
    }
}

// ============================================================================
// .NET reference
// ============================================================================

pub fn format_dotnet_output(report: &DotnetReport, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for (idx, project) in report.projects.iter().enumerate() {
        let references = if project.externals.is_empty() {
            String::new()
        } else {
            format!(" (references {})", project.externals.join(", "))
        };
        lines.push(format!(
            "{} {}{references} \u{2192} {}",
            format_index(idx + 1),
            project.name,
            display_path(&project.assembly, root)
        ));
    }
    lines.push(format!("Index \u{2192} {}", display_path(&report.index, root)));
    lines.push(format!(
        "Post-processed {}",
        count_of(report.files_processed, "file", "files")
    ));
    lines.push(format!(
        "Navigation \u{2192} {}",
        display_path(&report.nav_file, root)
    ));
    lines
}

pub fn print_dotnet_output(report: &DotnetReport, root: &Path) {
    for line in format_dotnet_output(report, root) {
        println!("{}", line);
    }
}

// ============================================================================
// Navigation tree
// ============================================================================

/// One line per item, indented by depth. Collapsed groups are marked `▸`.
///
/// ```text
/// ▸ Interop.Runtime namespace → /reference/dotnet/#interop-runtime-namespace
///     ▸ JSValue struct → /reference/dotnet/Interop.Runtime/Interop.Runtime/JSValue
///         JSValue.Call method → /reference/dotnet/Interop.Runtime/Interop.Runtime/JSValue/Call
/// ```
pub fn format_nav_tree(items: &[NavItem]) -> Vec<String> {
    let mut lines = Vec::new();
    push_nav_lines(items, 0, &mut lines);
    lines
}

fn push_nav_lines(items: &[NavItem], depth: usize, lines: &mut Vec<String>) {
    for item in items {
        let marker = if item.collapsed == Some(true) {
            "\u{25b8} "
        } else {
            ""
        };
        lines.push(format!(
            "{}{marker}{} \u{2192} {}",
            indent(depth),
            item.text,
            item.link
        ));
        push_nav_lines(item.children(), depth + 1, lines);
    }
}

pub fn print_nav_tree(items: &[NavItem]) {
    for line in format_nav_tree(items) {
        println!("{}", line);
    }
}
