//! Sidebar navigation derived from the generated Markdown tree.
//!
//! The converter writes one top-level page per assembly plus a directory of
//! the same name holding namespace, type, and member pages:
//!
//! ```text
//! dotnet/
//! ├── index.md                  # combined index (skipped, linked by anchor)
//! ├── Interop.Runtime.md        # "## Interop.Runtime namespace" per namespace
//! └── Interop.Runtime/
//!     ├── Interop.Runtime.md    # "# Interop.Runtime namespace"
//!     └── Interop.Runtime/
//!         ├── JSValue.md        # "# JSValue struct"
//!         └── JSValue/
//!             └── Call.md       # "# JSValue.Call method (2 overloads)"
//! ```
//!
//! [`build_nav`] mirrors that layout recursively. The top level reads `##`
//! headings and deeper levels read `#` headings; every heading becomes a
//! [`NavItem`]. A page `X.md` next to a directory `X/` gets the directory's
//! items as collapsed children.
//!
//! ## Labels and links
//!
//! - Overload suffixes (`(2 overloads)`, `(1 of 3)`) are dropped, and repeated
//!   labels collapse into one entry.
//! - `... namespace` headings link into the combined index, where all
//!   namespace summaries live.
//! - Other headings link to their page; later headings on the same page add a
//!   `#slug` anchor.

use crate::types::NavItem;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

static OVERLOAD_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\((?:\d+ overloads?|\d+ of \d+)\)\s*$").expect("valid regex")
});

/// Characters VitePress folds into `-` when generating heading anchors.
static SLUG_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\s~`!@#$%^&*()\-_+=\[\]{}|\\;:"'“”‘’<>,.?/]+"#).expect("valid regex")
});

const NAMESPACE_SUFFIX: &str = " namespace";

#[derive(Error, Debug)]
pub enum NavError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the generated pages are served and which file is the combined index.
#[derive(Debug, Clone)]
pub struct NavOptions {
    /// Site path of the output directory, e.g. `/reference/dotnet`.
    pub site_base: String,
    /// Combined index file name, e.g. `index.md`.
    pub index_file: String,
}

impl NavOptions {
    fn page_link(&self, rel_dir: &str, stem: &str) -> String {
        let base = self.site_base.trim_end_matches('/');
        if rel_dir.is_empty() {
            format!("{base}/{stem}")
        } else {
            format!("{base}/{rel_dir}/{stem}")
        }
    }

    fn index_link(&self) -> String {
        let stem = Path::new(&self.index_file)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if stem == "index" {
            format!("{}/", self.site_base.trim_end_matches('/'))
        } else {
            self.page_link("", &stem)
        }
    }
}

/// Build the navigation tree for the Markdown files under `dir`.
///
/// A namespace contributed by several assemblies is linked through one index
/// anchor, so its top-level entries merge into the first.
pub fn build_nav(dir: &Path, options: &NavOptions) -> Result<Vec<NavItem>, NavError> {
    Ok(merge_shared_namespaces(build_level(dir, "", 0, options)?))
}

fn merge_shared_namespaces(items: Vec<NavItem>) -> Vec<NavItem> {
    let mut merged: Vec<NavItem> = Vec::with_capacity(items.len());
    for item in items {
        let existing = merged
            .iter_mut()
            .find(|m| is_namespace(&m.text) && m.text == item.text);
        match existing {
            Some(first) => {
                let mut children = first.items.take().unwrap_or_default();
                children.extend(item.items.unwrap_or_default());
                *first = NavItem::leaf(first.text.clone(), first.link.clone())
                    .with_children(children);
            }
            None => merged.push(item),
        }
    }
    merged
}

fn build_level(
    dir: &Path,
    rel_dir: &str,
    depth: usize,
    options: &NavOptions,
) -> Result<Vec<NavItem>, NavError> {
    let level = if depth == 0 {
        HeadingLevel::H2
    } else {
        HeadingLevel::H1
    };

    let mut items = Vec::new();
    for file in markdown_files(dir)? {
        if depth == 0 && file.file_name().is_some_and(|n| n == options.index_file.as_str()) {
            continue;
        }
        let Some(stem) = file.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };

        let content = fs::read_to_string(&file)?;
        let page = options.page_link(rel_dir, &stem);
        let mut file_items = items_from_headings(&headings(&content, level), &page, options);

        let subdir = dir.join(&stem);
        if subdir.is_dir() {
            let child_rel = if rel_dir.is_empty() {
                stem.clone()
            } else {
                format!("{rel_dir}/{stem}")
            };
            let subtree = build_level(&subdir, &child_rel, depth + 1, options)?;
            file_items = attach_subtree(file_items, subtree);
        }
        items.extend(file_items);
    }
    Ok(items)
}

fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, NavError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "md"))
        .collect();
    files.sort();
    Ok(files)
}

/// Text of every heading at `level`, in document order.
fn headings(markdown: &str, level: HeadingLevel) -> Vec<String> {
    let options = Options::ENABLE_YAML_STYLE_METADATA_BLOCKS | Options::ENABLE_TABLES;
    let mut found = Vec::new();
    let mut current: Option<String> = None;
    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::Heading { level: l, .. }) if l == level => {
                current = Some(String::new());
            }
            Event::End(TagEnd::Heading(l)) if l == level => {
                if let Some(text) = current.take() {
                    found.push(text.trim().to_string());
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(current) = current.as_mut() {
                    current.push_str(&text);
                }
            }
            _ => {}
        }
    }
    found
}

fn items_from_headings(headings: &[String], page: &str, options: &NavOptions) -> Vec<NavItem> {
    let mut items: Vec<NavItem> = Vec::new();
    for (position, heading) in headings.iter().enumerate() {
        let text = strip_overload_suffix(heading);
        if items.last().is_some_and(|last| last.text == text) {
            continue;
        }
        let link = if is_namespace(&text) {
            format!("{}#{}", options.index_link(), slugify(heading))
        } else if position == 0 {
            page.to_string()
        } else {
            format!("{page}#{}", slugify(heading))
        };
        items.push(NavItem::leaf(text, link));
    }
    items
}

/// Attach a directory's items to the items of its same-named page.
///
/// Subtree items whose label matches a page item hand their children to that
/// item. A single-heading page with no such match adopts the whole subtree.
/// Remaining subtree items follow the page's own items.
fn attach_subtree(file_items: Vec<NavItem>, subtree: Vec<NavItem>) -> Vec<NavItem> {
    let matches = subtree
        .iter()
        .any(|child| file_items.iter().any(|item| item.text == child.text));
    if file_items.len() == 1 && !matches {
        return file_items
            .into_iter()
            .map(|item| item.with_children(subtree.clone()))
            .collect();
    }

    let mut children: Vec<Vec<NavItem>> = vec![Vec::new(); file_items.len()];
    let mut unmatched = Vec::new();
    for child in subtree {
        match file_items.iter().position(|item| item.text == child.text) {
            Some(index) => children[index].extend(child.items.unwrap_or_default()),
            None => unmatched.push(child),
        }
    }
    file_items
        .into_iter()
        .zip(children)
        .map(|(item, children)| item.with_children(children))
        .chain(unmatched)
        .collect()
}

/// `Foo (3 overloads)` → `Foo`.
pub fn strip_overload_suffix(heading: &str) -> String {
    OVERLOAD_SUFFIX.replace(heading, "").trim().to_string()
}

fn is_namespace(text: &str) -> bool {
    text.ends_with(NAMESPACE_SUFFIX) && text.len() > NAMESPACE_SUFFIX.len()
}

/// Heading anchor the way VitePress generates it.
pub fn slugify(heading: &str) -> String {
    let slug = SLUG_SEPARATORS.replace_all(heading, "-");
    let slug = slug.trim_matches('-').to_lowercase();
    if slug.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{slug}")
    } else {
        slug
    }
}

/// Render the tree as an importable ES module.
pub fn render_nav_module(items: &[NavItem]) -> Result<String, NavError> {
    let json = serde_json::to_string_pretty(items)?;
    Ok(format!(
        "// Generated by interop-docs. Do not edit.\nexport default {json};\n"
    ))
}

/// Write the nav module, creating parent directories.
pub fn write_nav(path: &Path, items: &[NavItem]) -> Result<(), NavError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_nav_module(items)?)?;
    Ok(())
}
